//! # System Interaction Layer
//!
//! The boundary between the shortcut engine and the machine it runs on.
//!
//! ## Modules
//!
//! - **`host`**: The capabilities the engine needs from its host: user
//!   notifications and terminal sessions. Both are traits so the engine can be
//!   driven by the console front end or by test doubles.
//! - **`shell_terminal`**: A terminal host whose sessions are long-lived shell
//!   processes fed through their stdin.
//! - **`shells_config`**: Loads `shells.toml`, which names the shell used for new
//!   terminal sessions.
//! - **`executor`**: Runs one-off foreground commands, such as the editor that
//!   opens a config file.

/// Foreground command execution.
pub mod executor;
/// Notifier and terminal host traits.
pub mod host;
/// Shell-process terminal sessions.
pub mod shell_terminal;
/// `shells.toml` loading.
pub mod shells_config;
