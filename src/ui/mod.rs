// Museum - ui/mod.rs
//
// UI layer: presentation only.
// Dependencies: app (state), core (read-only models), egui.
// Must NOT depend on: platform, direct I/O.

pub mod panels;
pub mod theme;

use crate::core::model::Container;

/// Exhibits draw straight into an egui `Ui` and may hand back the response
/// of the widget they added.
impl Container for egui::Ui {
    type Handle = egui::Response;
}
