// Museum - lib.rs
//
// Library entry point, exposing all non-GUI modules for integration testing
// and for embedding the discovery engine in other hosts.
//
// The `gui` module (the eframe::App) lives in `main.rs` and is not part of
// the library surface.

pub mod app;
pub mod core;
pub mod demo;
pub mod platform;
pub mod ui;
pub mod util;
