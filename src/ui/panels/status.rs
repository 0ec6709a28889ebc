// Museum - ui/panels/status.rs
//
// Status bar: discovery status, entry counts, warnings, Rescan button.

use crate::app::state::ShowcaseState;
use crate::ui::theme;

/// What the user asked for from the status bar.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatusAction {
    pub rescan: bool,
    pub cancel: bool,
}

/// Render the status bar.
pub fn render(ui: &mut egui::Ui, state: &ShowcaseState<egui::Ui>) -> StatusAction {
    let mut action = StatusAction::default();

    ui.horizontal(|ui| {
        if state.discovery_in_progress {
            ui.spinner();
        }
        ui.label(&state.status_message);

        if state.discovery_in_progress {
            action.cancel = ui.small_button("Cancel").clicked();
        } else {
            action.rescan = ui
                .small_button("Rescan")
                .on_hover_text("Discover exhibits again")
                .clicked();
        }

        if !state.warnings.is_empty() {
            ui.separator();
            let label = format!("\u{26a0} {} warning(s)", state.warnings.len());
            ui.colored_label(theme::WARNING_TEXT, label)
                .on_hover_text(state.warnings.join("\n"));
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let total = state.catalog().len();
            let visible = state.item_count();
            if total > 0 {
                ui.label(format!("{visible}/{total} exhibits"));
            }
        });
    });

    action
}
