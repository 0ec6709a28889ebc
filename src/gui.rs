// Museum - gui.rs
//
// Top-level eframe::App implementation.
// Wires together the UI panels and drives the showcase each frame.

use crate::app::showcase::Showcase;
use crate::ui;
use std::time::Duration;

/// How often to poll for discovery progress while a pass is running.
const DISCOVERY_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Display preferences resolved from config at start-up.
#[derive(Debug, Clone, Copy)]
pub struct GalleryPrefs {
    pub dark_mode: bool,
    pub preview_min_height: f32,
}

/// The Museum gallery application.
pub struct MuseumApp {
    pub showcase: Showcase<egui::Ui>,
    search_text: String,
    prefs: GalleryPrefs,
    theme_applied: bool,
}

impl MuseumApp {
    pub fn new(showcase: Showcase<egui::Ui>, prefs: GalleryPrefs) -> Self {
        let search_text = showcase.state.filter().to_string();
        Self {
            showcase,
            search_text,
            prefs,
            theme_applied: false,
        }
    }
}

impl eframe::App for MuseumApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.theme_applied {
            ui::theme::apply(ctx, self.prefs.dark_mode);
            self.theme_applied = true;
        }

        // Apply discovery progress and posted filters.
        if self.showcase.pump() {
            ctx.request_repaint();
        }
        // Keep polling while a pass is running so the catalog appears promptly.
        if self.showcase.is_discovering() {
            ctx.request_repaint_after(DISCOVERY_POLL_INTERVAL);
        }

        // Search bar
        egui::TopBottomPanel::top("search_bar").show(ctx, |ui| {
            ui.add_space(4.0);
            ui::panels::search::render(ui, &mut self.search_text, &mut self.showcase.state);
            ui.add_space(4.0);
        });

        // Status bar
        let action = egui::TopBottomPanel::bottom("status_bar")
            .show(ctx, |ui| ui::panels::status::render(ui, &self.showcase.state))
            .inner;
        if action.rescan {
            tracing::info!("Rescan requested");
            self.showcase.rescan();
            ctx.request_repaint();
        }
        if action.cancel {
            self.showcase.cancel();
        }

        // Central gallery
        let preview_min_height = self.prefs.preview_min_height;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui::panels::gallery::render(ui, &mut self.showcase.state, preview_min_height);
        });
    }
}
