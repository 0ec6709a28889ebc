// Museum - app/mod.rs
//
// Application layer: discovery lifecycle, display state, showcase context.
// Dependencies: core layer.
// Must NOT depend on: ui, platform specifics.

pub mod scan;
pub mod showcase;
pub mod state;
