// Museum - demo.rs
//
// Built-in demo exhibits, registered as static sources so a fresh install
// has something to show. The same functions are published in a symbol table
// so manifests can reference them by name.

use crate::core::manifest::SymbolTable;
use crate::core::model::{Metadata, UnitResult};
use crate::core::registry::Registry;
use crate::core::source::{ExhibitSource, StaticSource};
use egui::{Color32, RichText};
use std::sync::Arc;

const STORY: &str = "This is the story of a girl, who cried a river and drowned the whole world";

/// Register the demo sources.
pub fn register_builtin(registry: &mut Registry<egui::Ui>) {
    registry.register(
        StaticSource::new("museum::app::demo_views")
            .exhibit(
                "my_awesome_view",
                Metadata::new("My Awesome View")
                    .with_path("Text")
                    .with_tags(["Text"])
                    .with_description(STORY),
                my_awesome_view,
            )
            .exhibit(
                "dark_titlebar",
                Metadata::new("Dark Titlebar")
                    .with_path("Titlebars")
                    .with_tags(["Titlebar", "Dark"]),
                dark_titlebar,
            )
            .exhibit(
                "light_titlebar",
                Metadata::new("Light Titlebar")
                    .with_path("Titlebars")
                    .with_tags(["Titlebar", "Light"])
                    .with_description(STORY),
                light_titlebar,
            ),
    );

    let widgets: Arc<dyn ExhibitSource<egui::Ui>> = Arc::new(
        StaticSource::new("museum::design::widgets").exhibit(
            "demo_view",
            Metadata::new("Demo View").with_path("Misc"),
            demo_view,
        ),
    );
    registry.register(StaticSource::new("museum::design").nest(widgets));
}

/// The demo functions by name, for use from manifests.
pub fn builtin_symbols() -> SymbolTable<egui::Ui> {
    let mut symbols = SymbolTable::new();
    symbols
        .register("my_awesome_view", my_awesome_view)
        .register("dark_titlebar", dark_titlebar)
        .register("light_titlebar", light_titlebar)
        .register("demo_view", demo_view);
    symbols
}

fn my_awesome_view(ui: &mut egui::Ui) -> UnitResult<egui::Ui> {
    Ok(Some(ui.label(RichText::new("This is a test").size(18.0))))
}

fn dark_titlebar(ui: &mut egui::Ui) -> UnitResult<egui::Ui> {
    Ok(Some(titlebar(
        ui,
        Color32::from_rgb(33, 33, 33),
        Color32::from_rgb(240, 240, 240),
    )))
}

fn light_titlebar(ui: &mut egui::Ui) -> UnitResult<egui::Ui> {
    Ok(Some(titlebar(
        ui,
        Color32::from_rgb(245, 245, 245),
        Color32::from_rgb(33, 33, 33),
    )))
}

fn demo_view(ui: &mut egui::Ui) -> UnitResult<egui::Ui> {
    Ok(Some(ui.label("Another Text View Demo")))
}

fn titlebar(ui: &mut egui::Ui, fill: Color32, text: Color32) -> egui::Response {
    egui::Frame::group(ui.style())
        .fill(fill)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.colored_label(text, "\u{2190}");
                ui.colored_label(text, RichText::new("This is a test").strong());
            });
        })
        .response
}
