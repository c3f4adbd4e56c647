// src/state.rs

use crate::{
    core::{paths::ConfigPaths, terminal_router::TerminalRouter, tree_provider::ActionTreeProvider},
    system::{
        host::{ConsoleNotifier, Notifier},
        shell_terminal::ShellTerminalHost,
        shells_config::ShellError,
    },
};
use std::{
    path::{Path, PathBuf},
    rc::Rc,
};

/// Everything a command handler works with: the tree provider (sources,
/// catalog, watches) and the terminal router, sharing one notifier.
#[derive(Debug)]
pub struct AppState {
    /// The resolved config locations.
    pub paths: ConfigPaths,
    /// The panel's data source.
    pub provider: ActionTreeProvider,
    /// Routes activations to shell sessions.
    pub router: TerminalRouter<ShellTerminalHost>,
    storage_dir: PathBuf,
}

impl AppState {
    /// Builds the state for a storage directory and an optional project root.
    pub fn new(storage_dir: &Path, project_root: Option<&Path>) -> Result<Self, ShellError> {
        let notifier: Rc<dyn Notifier> = Rc::new(ConsoleNotifier);
        let paths = ConfigPaths::new(storage_dir, project_root);

        let cwd = match project_root {
            Some(root) => root.to_path_buf(),
            None => std::env::current_dir()?,
        };
        let host = ShellTerminalHost::from_storage(storage_dir, cwd)?;

        let provider = ActionTreeProvider::new(&paths, Rc::clone(&notifier));
        let router = TerminalRouter::new(host, notifier);
        Ok(Self {
            paths,
            provider,
            router,
            storage_dir: storage_dir.to_path_buf(),
        })
    }

    /// The global storage directory.
    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    /// The working directory for editors and shells.
    pub fn working_dir(&self) -> PathBuf {
        self.paths
            .project_root
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| self.storage_dir.clone())
    }

    /// Closes the watches and waits for every terminal session to finish.
    pub fn shutdown(&mut self) {
        self.provider.dispose();
        self.router.host_mut().close_all();
    }
}
