// Museum - ui/panels/gallery.rs
//
// Central scrolling list of exhibit rows. Each row shows the breadcrumbs,
// the title, the description (when not blank) and a live preview produced
// by invoking the exhibit. A failing exhibit renders an inline error in
// place of its preview; the other rows are unaffected.
//
// Rows vary in height, so `show_rows` does not fit. Instead each row's last
// drawn height is kept in egui temp memory, and a row whose remembered rect
// lies outside the clip rect is replaced by empty space without invoking
// its exhibit. Rows never drawn yet are always drawn once.

use crate::app::state::ShowcaseState;
use crate::core::model::{Entry, Unit};
use crate::ui::theme;
use crate::util::constants;
use crate::util::error::ExhibitFailure;

/// Render the gallery.
pub fn render(ui: &mut egui::Ui, state: &mut ShowcaseState<egui::Ui>, preview_min_height: f32) {
    if state.item_count() == 0 {
        render_empty(ui, state);
        return;
    }

    let mut failures: Vec<ExhibitFailure> = Vec::new();
    let debug = state.debug_mode;

    egui::ScrollArea::vertical()
        .id_salt("gallery")
        .auto_shrink([false; 2])
        .show(ui, |ui| {
            for entry in state.visible_entries() {
                let height_id = egui::Id::new(("gallery_row_height", entry.unit().id()));
                let remembered: Option<f32> = ui.data(|d| d.get_temp(height_id));

                if let Some(height) = remembered {
                    let rect = egui::Rect::from_min_size(
                        ui.cursor().min,
                        egui::vec2(ui.available_width(), height),
                    );
                    if !ui.is_rect_visible(rect) {
                        ui.allocate_space(rect.size());
                        ui.add_space(theme::ROW_SPACING);
                        continue;
                    }
                }

                let top = ui.cursor().min.y;
                if let Err(failure) = render_row(ui, entry, preview_min_height, debug) {
                    failures.push(failure);
                }
                let height = ui.cursor().min.y - top - ui.spacing().item_spacing.y;
                ui.data_mut(|d| d.insert_temp(height_id, height.max(0.0)));
                ui.add_space(theme::ROW_SPACING);
            }
        });

    for failure in &failures {
        state.record_failure(failure);
    }
}

fn render_empty(ui: &mut egui::Ui, state: &ShowcaseState<egui::Ui>) {
    ui.centered_and_justified(|ui| {
        if state.discovery_in_progress && state.catalog().is_empty() {
            ui.label("Discovering exhibits\u{2026}");
        } else if state.catalog().is_empty() {
            ui.label("No exhibits registered.");
        } else {
            ui.label(format!("No exhibits match \"{}\".", state.filter()));
        }
    });
}

/// Draw one row. Returns the exhibit's failure, if it failed.
fn render_row(
    ui: &mut egui::Ui,
    entry: &Entry<egui::Ui>,
    preview_min_height: f32,
    debug: bool,
) -> Result<(), ExhibitFailure> {
    let unit = entry.unit();

    egui::Frame::group(ui.style())
        .show(ui, |ui| {
            ui.set_width(ui.available_width());

            ui.horizontal_wrapped(|ui| {
                ui.spacing_mut().item_spacing.x = theme::BREADCRUMB_SPACING;
                for component in entry.path_components().iter().filter(|c| !c.is_empty()) {
                    let colour = theme::component_colour(component);
                    ui.colored_label(colour, egui::RichText::new(component.as_str()).strong());
                    ui.colored_label(colour, constants::BREADCRUMB_SEPARATOR);
                }
                let title = ui.label(egui::RichText::new(entry.title()).strong().heading());
                if debug {
                    title.on_hover_text(unit.id().as_str());
                }
            });

            if !entry.description().trim().is_empty() {
                ui.label(egui::RichText::new(entry.description()).weak());
            }

            ui.separator();

            ui.push_id(unit.id(), |ui| {
                egui::Frame::new()
                    .stroke(egui::Stroke::new(1.0, theme::PREVIEW_OUTLINE))
                    .inner_margin(theme::PREVIEW_PADDING)
                    .show(ui, |ui| {
                        ui.set_min_height(preview_min_height);
                        invoke_preview(ui, unit, debug)
                    })
                    .inner
            })
            .inner
        })
        .inner
}

/// Invoke the exhibit into `ui`, drawing an inline error on failure.
fn invoke_preview(
    ui: &mut egui::Ui,
    unit: &Unit<egui::Ui>,
    debug: bool,
) -> Result<(), ExhibitFailure> {
    match unit.invoke(ui) {
        Ok(handle) => {
            if let (Some(response), true) = (handle, debug) {
                response.on_hover_text(format!("returned by {}", unit.id()));
            }
            Ok(())
        }
        Err(failure) => {
            ui.colored_label(theme::ERROR_TEXT, format!("\u{26a0} {failure}"));
            Err(failure)
        }
    }
}
