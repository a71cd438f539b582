// TableKit - platform/mod.rs
//
// Platform abstraction layer: directories, config.toml, input files.
// Dependencies: directories crate, core order specs.
// Must NOT depend on: app.

pub mod config;
pub mod fs;
