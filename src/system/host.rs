// src/system/host.rs

//! The narrow capability contract the core calls through: user messaging and
//! terminal sessions. The console implementation of [`Notifier`] lives here;
//! the process-backed [`TerminalHost`] lives in `shell_terminal`.

use colored::Colorize;

/// Severity of a user-visible message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    /// Informational feedback (file created, command executed).
    Info,
    /// Something is missing but the panel keeps working.
    Warning,
    /// Something failed to load; the affected source contributes nothing.
    Error,
}

/// Shows information/warning/error text to the user.
pub trait Notifier {
    /// Surfaces `message` at the given level.
    fn notify(&self, level: MessageLevel, message: &str);

    /// Shorthand for [`MessageLevel::Info`].
    fn info(&self, message: &str) {
        self.notify(MessageLevel::Info, message);
    }

    /// Shorthand for [`MessageLevel::Warning`].
    fn warn(&self, message: &str) {
        self.notify(MessageLevel::Warning, message);
    }

    /// Shorthand for [`MessageLevel::Error`].
    fn error(&self, message: &str) {
        self.notify(MessageLevel::Error, message);
    }
}

/// Prints messages to stderr and mirrors them to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, level: MessageLevel, message: &str) {
        match level {
            MessageLevel::Info => {
                log::info!("{}", message);
                eprintln!("{} {}", "i".cyan().bold(), message);
            }
            MessageLevel::Warning => {
                log::warn!("{}", message);
                eprintln!("{} {}", "Warning:".yellow().bold(), message);
            }
            MessageLevel::Error => {
                log::error!("{}", message);
                eprintln!("{} {}", "Error:".red().bold(), message);
            }
        }
    }
}

/// Opaque handle of a terminal session, stable for the lifetime of the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub usize);

/// A snapshot of one terminal session as listed by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalInfo {
    /// The session handle.
    pub id: SessionId,
    /// The session's display name.
    pub name: String,
    /// Whether this is the currently focused session.
    pub active: bool,
}

/// Lists, creates, focuses and feeds terminal sessions.
///
/// Every method is infallible: a host that cannot reach a session logs the
/// failure itself.
pub trait TerminalHost {
    /// All live sessions, in creation order.
    fn sessions(&self) -> Vec<TerminalInfo>;

    /// The currently focused session, if any.
    fn active(&self) -> Option<SessionId> {
        self.sessions()
            .into_iter()
            .find(|session| session.active)
            .map(|session| session.id)
    }

    /// Creates a session. `None` creates a default, unnamed session.
    fn create(&mut self, name: Option<&str>) -> SessionId;

    /// Brings a session to the foreground and makes it the active one.
    fn show(&mut self, id: SessionId);

    /// Submits `text` as one line of input.
    fn send_text(&mut self, id: SessionId, text: &str);

    /// The display name of a session.
    fn name_of(&self, id: SessionId) -> Option<String> {
        self.sessions()
            .into_iter()
            .find(|session| session.id == id)
            .map(|session| session.name)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory collaborators for unit tests.

    use super::*;
    use std::cell::RefCell;

    /// Records every message instead of printing it.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingNotifier {
        pub(crate) messages: RefCell<Vec<(MessageLevel, String)>>,
    }

    impl RecordingNotifier {
        pub(crate) fn count(&self, level: MessageLevel) -> usize {
            self.messages
                .borrow()
                .iter()
                .filter(|(l, _)| *l == level)
                .count()
        }

        pub(crate) fn last(&self, level: MessageLevel) -> Option<String> {
            self.messages
                .borrow()
                .iter()
                .rev()
                .find(|(l, _)| *l == level)
                .map(|(_, m)| m.clone())
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, level: MessageLevel, message: &str) {
            self.messages.borrow_mut().push((level, message.to_string()));
        }
    }

    #[derive(Debug, Clone)]
    pub(crate) struct FakeSession {
        pub(crate) name: String,
        pub(crate) input: Vec<String>,
        pub(crate) shown: usize,
    }

    /// A terminal host that keeps sessions in memory.
    #[derive(Debug, Default)]
    pub(crate) struct FakeTerminalHost {
        pub(crate) sessions: Vec<FakeSession>,
        pub(crate) active: Option<SessionId>,
        pub(crate) created: usize,
    }

    impl FakeTerminalHost {
        pub(crate) fn with_session(mut self, name: &str, active: bool) -> Self {
            self.sessions.push(FakeSession {
                name: name.to_string(),
                input: Vec::new(),
                shown: 0,
            });
            if active {
                self.active = Some(SessionId(self.sessions.len() - 1));
            }
            self
        }

        pub(crate) fn session(&self, id: SessionId) -> &FakeSession {
            &self.sessions[id.0]
        }
    }

    impl TerminalHost for FakeTerminalHost {
        fn sessions(&self) -> Vec<TerminalInfo> {
            self.sessions
                .iter()
                .enumerate()
                .map(|(i, s)| TerminalInfo {
                    id: SessionId(i),
                    name: s.name.clone(),
                    active: self.active == Some(SessionId(i)),
                })
                .collect()
        }

        fn create(&mut self, name: Option<&str>) -> SessionId {
            self.created += 1;
            self.sessions.push(FakeSession {
                name: name.unwrap_or("sh").to_string(),
                input: Vec::new(),
                shown: 0,
            });
            SessionId(self.sessions.len() - 1)
        }

        fn show(&mut self, id: SessionId) {
            self.sessions[id.0].shown += 1;
            self.active = Some(id);
        }

        fn send_text(&mut self, id: SessionId, text: &str) {
            self.sessions[id.0].input.push(text.to_string());
        }
    }
}
