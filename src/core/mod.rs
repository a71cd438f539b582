// TableKit - core/mod.rs
//
// Core logic layer: sorting, pagination, filtering, export.
// Dependencies: serde, serde_json, regex, csv, tracing.
// Must NOT depend on: app, platform, or any filesystem access.

pub mod export;
pub mod filter;
pub mod model;
pub mod order;
pub mod paginator;
pub mod value;
