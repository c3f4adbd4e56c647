// src/cli/handlers/mod.rs

// One module per command; each parses its own arguments.

/// `open`, `open-global`, `open-workspace`.
pub mod open;
/// `panel` (`watch`).
pub mod panel;
/// `paths`.
pub mod paths;
/// `run` and `exec`.
pub mod run;
/// `tree` (`ls`).
pub mod tree;
