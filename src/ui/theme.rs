// Museum - ui/theme.rs
//
// Colour scheme, breadcrumb palette, and layout constants.
// No dependencies on app state or business logic.

use egui::Color32;

/// Breadcrumb palette. A component always gets the same colour.
pub const BREADCRUMB_PALETTE: [Color32; 16] = [
    Color32::from_rgb(0xef, 0x53, 0x50), // Red 400
    Color32::from_rgb(0xec, 0x40, 0x7a), // Pink 400
    Color32::from_rgb(0xab, 0x47, 0xbc), // Purple 400
    Color32::from_rgb(0x7e, 0x57, 0xc2), // Deep Purple 400
    Color32::from_rgb(0x5c, 0x6b, 0xc0), // Indigo 400
    Color32::from_rgb(0x42, 0xa5, 0xf5), // Blue 400
    Color32::from_rgb(0x29, 0xb6, 0xf6), // Light Blue 400
    Color32::from_rgb(0x26, 0xc6, 0xda), // Cyan 400
    Color32::from_rgb(0x26, 0xa6, 0x9a), // Teal 400
    Color32::from_rgb(0x66, 0xbb, 0x6a), // Green 400
    Color32::from_rgb(0x9c, 0xcc, 0x65), // Light Green 400
    Color32::from_rgb(0xd4, 0xe1, 0x57), // Lime 400
    Color32::from_rgb(0xff, 0xee, 0x58), // Yellow 400
    Color32::from_rgb(0xff, 0xca, 0x28), // Amber 400
    Color32::from_rgb(0xff, 0xa7, 0x26), // Orange 400
    Color32::from_rgb(0xff, 0x70, 0x43), // Deep Orange 400
];

/// Stable 31-multiplier hash over UTF-16 code units.
pub fn component_hash(text: &str) -> i32 {
    text.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// Palette colour for a breadcrumb component.
pub fn component_colour(text: &str) -> Color32 {
    let idx = component_hash(text).unsigned_abs() as usize % BREADCRUMB_PALETTE.len();
    BREADCRUMB_PALETTE[idx]
}

/// Outline drawn around a preview.
pub const PREVIEW_OUTLINE: Color32 = Color32::from_rgb(0xc0, 0xc0, 0xc0);

/// Inline error text for a failed exhibit.
pub const ERROR_TEXT: Color32 = Color32::from_rgb(248, 113, 113); // Red 400

/// Warning count in the status bar.
pub const WARNING_TEXT: Color32 = Color32::from_rgb(217, 119, 6); // Amber 600

/// Layout constants.
pub const ROW_SPACING: f32 = 8.0;
pub const PREVIEW_PADDING: f32 = 8.0;
pub const BREADCRUMB_SPACING: f32 = 4.0;
pub const SEARCH_BAR_WIDTH: f32 = 360.0;

/// Switch between the dark and light egui visuals.
pub fn apply(ctx: &egui::Context, dark_mode: bool) {
    let visuals = if dark_mode {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    };
    ctx.set_visuals(visuals);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_matches_string_hash_convention() {
        // Reference values of the common 31-multiplier string hash.
        assert_eq!(component_hash(""), 0);
        assert_eq!(component_hash("a"), 97);
        assert_eq!(component_hash("ab"), 97 * 31 + 98);
    }

    #[test]
    fn test_colour_is_stable_per_component() {
        assert_eq!(component_colour("Titlebars"), component_colour("Titlebars"));
        assert_eq!(component_colour("a"), BREADCRUMB_PALETTE[97 % 16]);
    }

    #[test]
    fn test_long_text_wraps_without_panicking() {
        let text = "x".repeat(10_000);
        let colour = component_colour(&text);
        assert!(BREADCRUMB_PALETTE.contains(&colour));
    }
}
