// src/core/mod.rs

/// Global-then-workspace merge into the grouped catalog.
pub mod config_merger;
/// Reading and creating the JSON action files.
pub mod config_store;
/// Storage directory, config file paths and project root discovery.
pub mod paths;
/// Maps an activated action to a live or new terminal session.
pub mod terminal_router;
/// Console rendering of the panel.
pub mod tree_display;
/// The panel's data source.
pub mod tree_provider;
/// File watches over the two action files.
pub mod watcher;
