// Museum - ui/panels/search.rs
//
// Search bar at the top of the gallery.

use crate::app::state::ShowcaseState;
use crate::ui::theme;
use crate::util::constants;

/// Render the search box. `text` is the edit buffer owned by the app.
///
/// Every edit replaces the showcase filter immediately.
pub fn render(ui: &mut egui::Ui, text: &mut String, state: &mut ShowcaseState<egui::Ui>) {
    // Keep the buffer in step with filters posted from elsewhere.
    if text.as_str() != state.filter() {
        *text = state.filter().to_string();
    }

    ui.horizontal(|ui| {
        let response = ui.add(
            egui::TextEdit::singleline(text)
                .hint_text(constants::SEARCH_HINT)
                .desired_width(theme::SEARCH_BAR_WIDTH),
        );
        if response.changed() {
            state.update_filter(text.clone());
        }

        if !text.is_empty() && ui.small_button("\u{2715}").on_hover_text("Clear").clicked() {
            text.clear();
            state.update_filter(String::new());
        }
    });
}
