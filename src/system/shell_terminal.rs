// src/system/shell_terminal.rs

use crate::{
    constants::SESSION_NAME_ENV,
    system::{
        host::{SessionId, TerminalHost, TerminalInfo},
        shells_config::{self, ShellConfig, ShellError},
    },
};
use colored::Colorize;
use std::{
    fmt,
    io::Write,
    path::{Path, PathBuf},
    process::{Child, ChildStdin, Command, Stdio},
};

/// One long-lived shell process fed through its stdin.
struct ShellSession {
    id: SessionId,
    name: String,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
}

impl fmt::Debug for ShellSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShellSession")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("pid", &self.child.as_ref().map(Child::id))
            .field("open", &self.stdin.is_some())
            .finish()
    }
}

/// A [`TerminalHost`] whose sessions are shell processes sharing this
/// process's stdout/stderr.
///
/// Unnamed sessions are named after the shell. Dropping the host closes every
/// session's input and waits for the shells to finish what they were sent.
#[derive(Debug)]
pub struct ShellTerminalHost {
    shell_name: String,
    shell: ShellConfig,
    cwd: PathBuf,
    sessions: Vec<ShellSession>,
    active: Option<SessionId>,
}

impl ShellTerminalHost {
    /// Creates a host that launches `shell` in `cwd`.
    pub fn new(shell_name: impl Into<String>, shell: ShellConfig, cwd: impl Into<PathBuf>) -> Self {
        Self {
            shell_name: shell_name.into(),
            shell,
            cwd: cwd.into(),
            sessions: Vec::new(),
            active: None,
        }
    }

    /// Creates a host using the default shell from `<storage_dir>/shells.toml`.
    pub fn from_storage(storage_dir: &Path, cwd: impl Into<PathBuf>) -> Result<Self, ShellError> {
        let config = shells_config::load_shells_config(storage_dir)?;
        let (name, shell) = config.default_shell()?;
        Ok(Self::new(name, shell.clone(), cwd))
    }

    fn spawn(&self, name: &str) -> Option<Child> {
        let mut command = Command::new(&self.shell.path);
        if let Some(args) = &self.shell.args {
            command.args(args);
        }
        command
            .current_dir(dunce::simplified(&self.cwd))
            .env(SESSION_NAME_ENV, name)
            .stdin(Stdio::piped())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        match command.spawn() {
            Ok(child) => {
                log::debug!("Spawned terminal '{}' (PID: {})", name, child.id());
                Some(child)
            }
            Err(e) => {
                log::error!(
                    "Could not start shell '{}' for terminal '{}': {}",
                    self.shell.path.display(),
                    name,
                    e
                );
                None
            }
        }
    }

    fn session_mut(&mut self, id: SessionId) -> Option<&mut ShellSession> {
        self.sessions.iter_mut().find(|session| session.id == id)
    }

    /// Closes every session's input and waits for the shells to exit.
    pub fn close_all(&mut self) {
        for session in &mut self.sessions {
            session.stdin.take();
            if let Some(mut child) = session.child.take() {
                match child.wait() {
                    Ok(status) if !status.success() => {
                        log::warn!("Terminal '{}' exited with code: {:?}", session.name, status.code());
                    }
                    Ok(_) => {}
                    Err(e) => log::warn!("Failed to wait for terminal '{}': {}", session.name, e),
                }
            }
        }
        self.active = None;
    }
}

impl TerminalHost for ShellTerminalHost {
    fn sessions(&self) -> Vec<TerminalInfo> {
        self.sessions
            .iter()
            .map(|session| TerminalInfo {
                id: session.id,
                name: session.name.clone(),
                active: self.active == Some(session.id),
            })
            .collect()
    }

    fn active(&self) -> Option<SessionId> {
        self.active
    }

    fn create(&mut self, name: Option<&str>) -> SessionId {
        let name = name.unwrap_or(&self.shell_name).to_string();
        let id = SessionId(self.sessions.len());
        let mut child = self.spawn(&name);
        let stdin = child.as_mut().and_then(|child| child.stdin.take());
        self.sessions.push(ShellSession {
            id,
            name,
            child,
            stdin,
        });
        id
    }

    fn show(&mut self, id: SessionId) {
        let Some(session) = self.session_mut(id) else {
            log::warn!("Cannot show unknown terminal {:?}", id);
            return;
        };
        let banner = format!("── {} ──", session.name);
        eprintln!("{}", banner.cyan().bold());
        self.active = Some(id);
    }

    fn send_text(&mut self, id: SessionId, text: &str) {
        let Some(session) = self.session_mut(id) else {
            log::warn!("Cannot send input to unknown terminal {:?}", id);
            return;
        };
        let Some(stdin) = session.stdin.as_mut() else {
            log::warn!("Terminal '{}' is not accepting input", session.name);
            return;
        };
        let written = writeln!(stdin, "{}", text).and_then(|()| stdin.flush());
        if let Err(e) = written {
            log::warn!("Terminal '{}' stopped accepting input: {}", session.name, e);
            session.stdin = None;
        }
    }

    fn name_of(&self, id: SessionId) -> Option<String> {
        self.sessions
            .iter()
            .find(|session| session.id == id)
            .map(|session| session.name.clone())
    }
}

impl Drop for ShellTerminalHost {
    fn drop(&mut self) {
        self.close_all();
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn sh_host(cwd: &Path) -> ShellTerminalHost {
        let shell = ShellConfig {
            path: PathBuf::from("sh"),
            args: None,
        };
        ShellTerminalHost::new("sh", shell, cwd)
    }

    #[test]
    fn test_sessions_receive_input_as_lines() {
        let dir = tempdir().unwrap();
        let mut host = sh_host(dir.path());

        let named = host.create(Some("build"));
        host.show(named);
        host.send_text(named, "echo \"$TERMINAL_SHORTCUTS_SESSION\" > out.txt");
        host.close_all();

        let written = fs::read_to_string(dir.path().join("out.txt")).unwrap();
        assert_eq!(written.trim(), "build");
    }

    #[test]
    fn test_unnamed_sessions_take_the_shell_name() {
        let dir = tempdir().unwrap();
        let mut host = sh_host(dir.path());

        let id = host.create(None);
        assert_eq!(host.name_of(id).as_deref(), Some("sh"));
        assert_eq!(host.active(), None);
        host.show(id);
        assert_eq!(host.active(), Some(id));
        assert!(host.sessions()[0].active);
    }

    #[test]
    fn test_missing_shell_does_not_fail() {
        let dir = tempdir().unwrap();
        let shell = ShellConfig {
            path: PathBuf::from("definitely-not-a-shell-xyz"),
            args: None,
        };
        let mut host = ShellTerminalHost::new("ghost", shell, dir.path());
        let id = host.create(Some("t"));
        host.show(id);
        host.send_text(id, "echo nothing");
        assert_eq!(host.sessions().len(), 1);
    }
}
