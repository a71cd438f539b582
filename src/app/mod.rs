// TableKit - app/mod.rs
//
// Application layer: stateful controllers and view persistence.
// Dependencies: core layer.
// Must NOT depend on: platform specifics.

pub mod pager;
pub mod session;
pub mod table;
