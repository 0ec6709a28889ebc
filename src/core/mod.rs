// Museum - core/mod.rs
//
// Core business logic layer: model, sources, discovery, catalog, filter.
// Must NOT depend on: ui, platform, app.

pub mod catalog;
pub mod discovery;
pub mod export;
pub mod filter;
pub mod manifest;
pub mod model;
pub mod registry;
pub mod source;
