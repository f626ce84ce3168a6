// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod logging;
pub mod mistakes;
pub mod report;
pub mod resources;
pub mod runtime;
pub mod session;
pub mod source;
pub mod stats;
pub mod store;
pub mod text;
pub mod typer;
pub mod typing_policy;
pub mod ui;

pub use error::{TtError, TtResult};
