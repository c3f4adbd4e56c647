// src/constants.rs

/// The name of the application directory inside the platform config directory.
pub const APP_DIR_NAME: &str = "terminal-shortcuts";

/// Environment variable that overrides the global storage directory.
pub const STORAGE_DIR_ENV: &str = "TERMINAL_SHORTCUTS_HOME";

/// The name of the global action file (inside the storage directory).
pub const GLOBAL_CONFIG_FILENAME: &str = "terminal-shortcuts-global.json";

/// The name of the directory holding the workspace action file (inside the project root).
pub const WORKSPACE_CONFIG_DIR: &str = ".vscode";

/// The name of the workspace action file (inside `.vscode/`).
pub const WORKSPACE_CONFIG_FILENAME: &str = "terminal-shortcuts-workspace.json";

/// The name of the shells configuration file (inside the storage directory).
pub const SHELLS_CONFIG_FILENAME: &str = "shells.toml";

/// The group assigned to records without one.
pub const DEFAULT_GROUP: &str = "Default";

/// Environment variable set in every spawned terminal session, holding its name.
pub const SESSION_NAME_ENV: &str = "TERMINAL_SHORTCUTS_SESSION";

/// Host command bound to leaf activation: `(command, terminal?)`.
pub const RUN_ACTION_COMMAND: &str = "exec";

/// Host command bound to the "open global config" entry.
pub const OPEN_GLOBAL_CONFIG_COMMAND: &str = "open-global";

/// Host command bound to the "open workspace config" entry.
pub const OPEN_WORKSPACE_CONFIG_COMMAND: &str = "open-workspace";
