//! # Change Watcher
//!
//! Observes the two action files with `notify` and forwards every content
//! change into a channel. The owner drains that channel on its own loop, so
//! reloads run one at a time and never overlap.

use crate::models::SourceKind;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher, event::ModifyKind};
use std::{
    fmt,
    path::{Path, PathBuf},
    sync::mpsc::{self, Receiver, Sender},
};

/// Messages posted by the watch threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// A watched file was modified.
    Changed(PathBuf),
    /// The backend reported an error for a watched file.
    Failed {
        /// The watched path.
        path: PathBuf,
        /// The backend message.
        message: String,
    },
}

/// Whether an event counts as a "change". Creations, removals and renames do not.
pub fn is_change(kind: &EventKind) -> bool {
    match kind {
        EventKind::Modify(ModifyKind::Name(_)) => false,
        EventKind::Modify(_) => true,
        _ => false,
    }
}

/// A live watch on one file. Dropping or closing it stops all notifications.
pub struct WatchHandle {
    path: PathBuf,
    _watcher: RecommendedWatcher,
}

impl WatchHandle {
    /// The watched file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stops watching.
    pub fn close(self) {
        log::debug!("Closing watcher for '{}'", self.path.display());
    }
}

impl fmt::Debug for WatchHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchHandle").field("path", &self.path).finish()
    }
}

/// Starts watching `path`, posting a [`WatchEvent::Changed`] for every change event.
///
/// Returns `Ok(None)` without watching when `path` does not exist yet; the
/// caller re-arms once the file has been created.
pub fn arm(path: &Path, sender: &Sender<WatchEvent>) -> Result<Option<WatchHandle>, notify::Error> {
    if !path.exists() {
        log::debug!("Not watching '{}': file does not exist", path.display());
        return Ok(None);
    }

    let sender = sender.clone();
    let watched = path.to_path_buf();
    let mut watcher: RecommendedWatcher =
        notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
            let message = match res {
                Ok(event) if is_change(&event.kind) => WatchEvent::Changed(watched.clone()),
                Ok(_) => return,
                Err(e) => WatchEvent::Failed {
                    path: watched.clone(),
                    message: e.to_string(),
                },
            };
            // The receiver is gone once the owner shut down; nothing left to notify.
            let _ = sender.send(message);
        })?;

    watcher.watch(path, RecursiveMode::NonRecursive)?;
    log::debug!("Watching '{}'", path.display());

    Ok(Some(WatchHandle {
        path: path.to_path_buf(),
        _watcher: watcher,
    }))
}

/// The pair of watches over the Global and Workspace files.
#[derive(Debug)]
pub struct ConfigWatcher {
    sender: Sender<WatchEvent>,
    global: Option<WatchHandle>,
    workspace: Option<WatchHandle>,
}

impl ConfigWatcher {
    /// Creates an unarmed watcher and the receiving end of its event channel.
    pub fn new() -> (Self, Receiver<WatchEvent>) {
        let (sender, receiver) = mpsc::channel();
        let watcher = Self {
            sender,
            global: None,
            workspace: None,
        };
        (watcher, receiver)
    }

    /// Closes both watches and arms them again for whichever files exist now.
    ///
    /// Called at construction and after a config file is created. Backend
    /// errors leave that slot unarmed and are logged.
    pub fn rearm(&mut self, global: &Path, workspace: Option<&Path>) {
        self.global = Self::replace(self.global.take(), global, &self.sender);
        self.workspace = match workspace {
            Some(path) => Self::replace(self.workspace.take(), path, &self.sender),
            None => {
                if let Some(handle) = self.workspace.take() {
                    handle.close();
                }
                None
            }
        };
    }

    fn replace(
        previous: Option<WatchHandle>,
        path: &Path,
        sender: &Sender<WatchEvent>,
    ) -> Option<WatchHandle> {
        if let Some(handle) = previous {
            handle.close();
        }
        match arm(path, sender) {
            Ok(handle) => handle,
            Err(e) => {
                log::warn!("Could not watch '{}': {}", path.display(), e);
                None
            }
        }
    }

    /// The file currently watched for the given source.
    pub fn watched_path(&self, kind: SourceKind) -> Option<&Path> {
        let handle = match kind {
            SourceKind::Global => self.global.as_ref(),
            SourceKind::Workspace => self.workspace.as_ref(),
        };
        handle.map(WatchHandle::path)
    }

    /// Whether the given source currently has a live watch.
    pub fn is_armed(&self, kind: SourceKind) -> bool {
        self.watched_path(kind).is_some()
    }

    /// Closes both watches. No further events are posted afterwards.
    pub fn close(&mut self) {
        if let Some(handle) = self.global.take() {
            handle.close();
        }
        if let Some(handle) = self.workspace.take() {
            handle.close();
        }
    }
}
