// src/core/terminal_router.rs

use crate::system::host::{Notifier, SessionId, TerminalHost};
use std::{fmt, rc::Rc};

/// Routes an activated action to a live or new terminal session.
pub struct TerminalRouter<H: TerminalHost> {
    host: H,
    notifier: Rc<dyn Notifier>,
}

impl<H: TerminalHost + fmt::Debug> fmt::Debug for TerminalRouter<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TerminalRouter").field("host", &self.host).finish()
    }
}

impl<H: TerminalHost> TerminalRouter<H> {
    /// Creates a router over a terminal host.
    pub fn new(host: H, notifier: Rc<dyn Notifier>) -> Self {
        Self { host, notifier }
    }

    /// Resolves the target session, shows it and submits `command` as a line of input.
    ///
    /// - A `terminal_name` reuses the first session with exactly that name, or
    ///   creates one with it.
    /// - No name, or an empty one, uses the active session, or creates a default one.
    ///
    /// This never fails; the resolved session is returned.
    pub fn dispatch(&mut self, command: &str, terminal_name: Option<&str>) -> SessionId {
        let session = match terminal_name.filter(|name| !name.is_empty()) {
            Some(name) => self.get_or_create(name),
            None => match self.host.active() {
                Some(active) => active,
                None => self.host.create(None),
            },
        };

        self.host.show(session);
        self.host.send_text(session, command);

        let resolved_name = self.host.name_of(session).unwrap_or_default();
        log::debug!("Dispatched '{}' to session {:?} ('{}')", command, session, resolved_name);
        self.notifier.info(&format!(
            t!("router.info.running"),
            command = command,
            terminal = resolved_name
        ));
        session
    }

    fn get_or_create(&mut self, name: &str) -> SessionId {
        self.host
            .sessions()
            .into_iter()
            .find(|session| session.name == name)
            .map(|session| session.id)
            .unwrap_or_else(|| {
                log::debug!("No terminal named '{}', creating one", name);
                self.host.create(Some(name))
            })
    }

    /// The underlying host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The underlying host, mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}
