//! Named shell commands grouped into a live-reloading panel and dispatched to
//! named terminal sessions.

include!(concat!(env!("OUT_DIR"), "/translations.rs"));

/// Command-line front end.
pub mod cli;
/// File names, directory names and environment variables.
pub mod constants;
/// The config-to-view engine.
pub mod core;
/// Action records, sources and the merged catalog.
pub mod models;
/// The state shared by every command handler.
pub mod state;
/// Host capabilities and OS boundaries.
pub mod system;
