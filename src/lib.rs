pub mod aggregate;
pub mod api;
pub mod config;
pub mod debounce;
pub mod error;
pub mod lifecycle;
pub mod pipeline;
pub mod records;
pub mod schema;
pub mod scorer;
pub mod state;
pub mod status;
// cmd and reports are binary modules (main.rs); they drive the library
// through `api::Dashboard` with a terminal renderer.
