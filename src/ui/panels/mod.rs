// Museum - ui/panels/mod.rs

pub mod gallery;
pub mod search;
pub mod status;
