//! # Action Tree Provider
//!
//! Owns both configuration sources, the merged [`Catalog`] and the file
//! watches, and answers the host's child-listing queries:
//!
//! ```text
//! Open global config file...
//! Open workspace config file...
//! ──────────────  (separator)
//! <group>            expandable
//!   <label> [<terminal>]
//! ```
//!
//! Every watched change reloads both files, rebuilds the catalog from scratch
//! and notifies the refresh subscribers, which then re-query everything.

use crate::{
    constants::{DEFAULT_GROUP, OPEN_GLOBAL_CONFIG_COMMAND, OPEN_WORKSPACE_CONFIG_COMMAND},
    core::{
        config_merger,
        config_store::{self, StoreError},
        paths::ConfigPaths,
        watcher::{ConfigWatcher, WatchEvent},
    },
    models::{ActionRecord, Activation, Catalog, ConfigSource, SourceKind},
    system::host::Notifier,
};
use std::{
    fmt,
    path::{Path, PathBuf},
    rc::Rc,
    sync::mpsc::{Receiver, RecvTimeoutError},
    time::Duration,
};
use thiserror::Error;

/// Errors surfaced by provider operations that the user explicitly requested.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The workspace file was requested but no project root is open.
    #[error("No workspace folder is open; there is no workspace config file to open.")]
    NoWorkspace,
    /// Creating the config file failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One node of the panel hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    /// A fixed entry that opens one of the two config files.
    ConfigButton {
        /// The file this button opens.
        kind: SourceKind,
        /// Display label.
        label: String,
        /// Hover text, including the file path.
        tooltip: String,
        /// The host command bound to this entry.
        command: &'static str,
    },
    /// A non-interactive, unlabeled marker between the buttons and the groups.
    Separator,
    /// An expandable group and the actions it holds.
    Group {
        /// The catalog key.
        name: String,
        /// The actions in stored order.
        actions: Vec<ActionRecord>,
    },
    /// A runnable action.
    Leaf {
        /// `label`, suffixed with ` [<terminal>]` for named terminals.
        label: String,
        /// The command line, shown on hover.
        tooltip: String,
        /// What selecting this entry dispatches.
        activation: Activation,
    },
}

impl TreeNode {
    /// Builds the leaf entry for a record.
    pub fn leaf(record: &ActionRecord) -> Self {
        Self::Leaf {
            label: record.display_label(),
            tooltip: record.command.clone(),
            activation: record.activation(),
        }
    }

    /// The display label. Separators have none; unnamed groups show `"Default"`.
    pub fn label(&self) -> &str {
        match self {
            Self::ConfigButton { label, .. } | Self::Leaf { label, .. } => label.as_str(),
            Self::Separator => "",
            Self::Group { name, .. } if name.is_empty() => DEFAULT_GROUP,
            Self::Group { name, .. } => name.as_str(),
        }
    }

    /// Only groups expand.
    pub fn is_expandable(&self) -> bool {
        matches!(self, Self::Group { .. })
    }

    /// Hover text, if the node has any.
    pub fn tooltip(&self) -> Option<String> {
        match self {
            Self::ConfigButton { tooltip, .. } | Self::Leaf { tooltip, .. } => Some(tooltip.clone()),
            Self::Group { .. } => Some(format!("Group: {}", self.label())),
            Self::Separator => None,
        }
    }

    /// The payload dispatched to the terminal router, for leaves.
    pub fn activation(&self) -> Option<&Activation> {
        match self {
            Self::Leaf { activation, .. } => Some(activation),
            _ => None,
        }
    }
}

/// Called with no payload whenever the tree must be re-fetched.
pub type RefreshSubscriber = Box<dyn FnMut()>;

/// The data source behind the panel.
pub struct ActionTreeProvider {
    global: ConfigSource,
    workspace: ConfigSource,
    catalog: Catalog,
    watcher: ConfigWatcher,
    events: Receiver<WatchEvent>,
    subscribers: Vec<RefreshSubscriber>,
    notifier: Rc<dyn Notifier>,
    disposed: bool,
}

impl fmt::Debug for ActionTreeProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionTreeProvider")
            .field("global", &self.global)
            .field("workspace", &self.workspace)
            .field("catalog", &self.catalog)
            .field("watcher", &self.watcher)
            .field("subscribers", &self.subscribers.len())
            .field("disposed", &self.disposed)
            .finish()
    }
}

impl ActionTreeProvider {
    /// Creates the provider: makes sure the Global file exists, loads both
    /// sources and arms the watches.
    pub fn new(paths: &ConfigPaths, notifier: Rc<dyn Notifier>) -> Self {
        let (watcher, events) = ConfigWatcher::new();
        let mut provider = Self {
            global: ConfigSource::new(SourceKind::Global, Some(paths.global.clone())),
            workspace: ConfigSource::new(SourceKind::Workspace, paths.workspace.clone()),
            catalog: Catalog::new(),
            watcher,
            events,
            subscribers: Vec::new(),
            notifier,
            disposed: false,
        };

        if let Err(e) = provider.create_default(SourceKind::Global) {
            provider.notifier.error(&e.to_string());
        }
        provider.reload();
        provider.rearm();
        provider
    }

    /// Registers a refresh subscriber.
    pub fn on_refresh(&mut self, subscriber: impl FnMut() + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// The root listing: both config buttons, the separator, then one node per group.
    pub fn root_children(&self) -> Vec<TreeNode> {
        let global_path = self.global_path().display().to_string();
        let workspace_path = self
            .workspace_path()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| t!("tree.tooltip.no_workspace").to_string());

        let mut nodes = vec![
            TreeNode::ConfigButton {
                kind: SourceKind::Global,
                label: t!("tree.button.open_global").to_string(),
                tooltip: format!(t!("tree.tooltip.open_global"), path = global_path),
                command: OPEN_GLOBAL_CONFIG_COMMAND,
            },
            TreeNode::ConfigButton {
                kind: SourceKind::Workspace,
                label: t!("tree.button.open_workspace").to_string(),
                tooltip: format!(t!("tree.tooltip.open_workspace"), path = workspace_path),
                command: OPEN_WORKSPACE_CONFIG_COMMAND,
            },
            TreeNode::Separator,
        ];
        nodes.extend(self.catalog.groups().iter().map(|group| TreeNode::Group {
            name: group.name.clone(),
            actions: group.actions.clone(),
        }));
        nodes
    }

    /// Answers a child-listing query. `None` is the root; only groups have children.
    pub fn children(&self, node: Option<&TreeNode>) -> Vec<TreeNode> {
        match node {
            None => self.root_children(),
            Some(TreeNode::Group { actions, .. }) => actions.iter().map(TreeNode::leaf).collect(),
            Some(_) => Vec::new(),
        }
    }

    /// The merged catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// One of the two sources.
    pub fn source(&self, kind: SourceKind) -> &ConfigSource {
        match kind {
            SourceKind::Global => &self.global,
            SourceKind::Workspace => &self.workspace,
        }
    }

    /// The Global file path (always defined).
    pub fn global_path(&self) -> &Path {
        self.global.path.as_deref().unwrap_or_else(|| Path::new(""))
    }

    /// The Workspace file path, when a project root is open.
    pub fn workspace_path(&self) -> Option<&Path> {
        self.workspace.path.as_deref()
    }

    /// Whether the given source currently has a live watch.
    pub fn is_watching(&self, kind: SourceKind) -> bool {
        self.watcher.is_armed(kind)
    }

    /// Makes sure the file for `kind` exists, creating the default one if needed.
    ///
    /// On creation the user is told, both watches are re-armed, and the tree is
    /// reloaded and refreshed. Returns the file path.
    pub fn ensure_config(&mut self, kind: SourceKind) -> Result<PathBuf, ProviderError> {
        let path = self
            .source(kind)
            .path
            .clone()
            .ok_or(ProviderError::NoWorkspace)?;
        if self.create_default(kind)? {
            self.rearm();
            self.refresh();
        }
        Ok(path)
    }

    fn create_default(&self, kind: SourceKind) -> Result<bool, ProviderError> {
        let path = self.source(kind).path.as_deref().ok_or(ProviderError::NoWorkspace)?;
        let created = config_store::ensure(path, kind)?;
        if created {
            self.notifier.info(&config_store::creation_message(path, kind));
        }
        Ok(created)
    }

    /// Re-arms both watches for whichever files exist now.
    pub fn rearm(&mut self) {
        if self.disposed {
            return;
        }
        let global = self.global.path.clone().unwrap_or_default();
        self.watcher.rearm(&global, self.workspace.path.as_deref());
    }

    /// Re-reads both sources and rebuilds the catalog, without notifying.
    pub fn reload(&mut self) {
        let notifier = Rc::clone(&self.notifier);
        self.global.entries = match &self.global.path {
            Some(path) => config_store::load(path, SourceKind::Global, notifier.as_ref()),
            None => Vec::new(),
        };
        self.workspace.entries = match &self.workspace.path {
            Some(path) => config_store::load(path, SourceKind::Workspace, notifier.as_ref()),
            None => Vec::new(),
        };
        config_merger::merge_into(
            &mut self.catalog,
            &self.global.entries,
            &self.workspace.entries,
        );
        log::debug!(
            "Catalog rebuilt: {} group(s), {} action(s)",
            self.catalog.groups().len(),
            self.catalog.action_count()
        );
    }

    /// Reloads everything and notifies every subscriber.
    pub fn refresh(&mut self) {
        self.reload();
        self.fire_refresh();
    }

    fn fire_refresh(&mut self) {
        log::debug!("Refreshing tree ({} subscriber(s))", self.subscribers.len());
        for subscriber in &mut self.subscribers {
            subscriber();
        }
    }

    fn handle_event(&mut self, event: WatchEvent) {
        match event {
            WatchEvent::Changed(path) => {
                log::debug!("Config change detected in '{}'", path.display());
                self.refresh();
            }
            WatchEvent::Failed { path, message } => {
                log::warn!("Watch error on '{}': {}", path.display(), message);
            }
        }
    }

    /// Handles every pending watch event, one full reload per change. Returns how many were handled.
    pub fn pump_events(&mut self) -> usize {
        if self.disposed {
            return 0;
        }
        let mut handled = 0;
        while let Ok(event) = self.events.try_recv() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    /// Blocks up to `timeout` for the next watch event, then handles it and any
    /// others already queued. Returns how many were handled.
    pub fn wait_for_events(&mut self, timeout: Duration) -> usize {
        if self.disposed {
            return 0;
        }
        match self.events.recv_timeout(timeout) {
            Ok(event) => {
                self.handle_event(event);
                1 + self.pump_events()
            }
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => 0,
        }
    }

    /// Closes both watches and drops anything still queued. Idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.watcher.close();
        while self.events.try_recv().is_ok() {}
        self.disposed = true;
        log::debug!("Tree provider disposed");
    }
}

impl Drop for ActionTreeProvider {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::host::{MessageLevel, testing::RecordingNotifier};
    use std::{cell::Cell, fs, time::Instant};
    use tempfile::{TempDir, tempdir};

    struct Fixture {
        _dir: TempDir,
        paths: ConfigPaths,
        notifier: Rc<RecordingNotifier>,
    }

    fn fixture(with_project: bool) -> Fixture {
        let dir = tempdir().unwrap();
        let storage = dir.path().join("storage");
        let project = dir.path().join("project");
        fs::create_dir_all(&project).unwrap();
        let paths = ConfigPaths::new(&storage, with_project.then_some(project.as_path()));
        Fixture {
            _dir: dir,
            paths,
            notifier: Rc::new(RecordingNotifier::default()),
        }
    }

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn labels(nodes: &[TreeNode]) -> Vec<String> {
        nodes.iter().map(|n| n.label().to_string()).collect()
    }

    #[test]
    fn test_construction_creates_global_defaults() {
        let fx = fixture(false);
        let provider = ActionTreeProvider::new(&fx.paths, fx.notifier.clone());

        assert!(fx.paths.global.exists());
        assert_eq!(fx.notifier.count(MessageLevel::Info), 1);
        assert_eq!(provider.catalog().group("Global").unwrap().actions.len(), 2);
        assert!(provider.is_watching(SourceKind::Global));
        assert!(!provider.is_watching(SourceKind::Workspace));
    }

    #[test]
    fn test_root_and_group_listing_for_merged_sources() {
        let fx = fixture(true);
        write(
            &fx.paths.global,
            r#"[{"label":"Ver","command":"node --version","group":"Tools"}]"#,
        );
        write(
            fx.paths.workspace.as_ref().unwrap(),
            r#"[{"label":"Lint","command":"npm run lint","group":"Tools","terminal":"lint"}]"#,
        );
        let provider = ActionTreeProvider::new(&fx.paths, fx.notifier.clone());

        let root = provider.children(None);
        assert_eq!(root.len(), 4);
        assert!(matches!(root[0], TreeNode::ConfigButton { kind: SourceKind::Global, .. }));
        assert!(matches!(root[1], TreeNode::ConfigButton { kind: SourceKind::Workspace, .. }));
        assert_eq!(root[2], TreeNode::Separator);
        assert_eq!(root[3].label(), "Tools");
        assert!(root[3].is_expandable());
        assert!(!root[2].is_expandable());
        assert_eq!(root[2].label(), "");

        let leaves = provider.children(Some(&root[3]));
        assert_eq!(labels(&leaves), ["Ver", "Lint [lint]"]);
        assert_eq!(
            leaves[1].activation(),
            Some(&Activation {
                command: "npm run lint".to_string(),
                terminal: Some("lint".to_string()),
            })
        );
        assert!(leaves.iter().all(|leaf| !leaf.is_expandable()));
        assert!(provider.children(Some(&leaves[0])).is_empty());
        assert!(provider.children(Some(&root[0])).is_empty());
    }

    #[test]
    fn test_malformed_global_does_not_block_workspace() {
        let fx = fixture(true);
        write(&fx.paths.global, "{ not json");
        write(
            fx.paths.workspace.as_ref().unwrap(),
            r#"[{"label":"Build","command":"make"}]"#,
        );
        let provider = ActionTreeProvider::new(&fx.paths, fx.notifier.clone());

        assert_eq!(fx.notifier.count(MessageLevel::Error), 1);
        assert!(provider.source(SourceKind::Global).entries.is_empty());
        let names: Vec<_> = provider.catalog().groups().iter().map(|g| g.name.clone()).collect();
        assert_eq!(names, ["Default"]);
    }

    #[test]
    fn test_ensure_workspace_creates_file_and_refreshes_once() {
        let fx = fixture(true);
        let mut provider = ActionTreeProvider::new(&fx.paths, fx.notifier.clone());
        let refreshes = Rc::new(Cell::new(0));
        let counter = Rc::clone(&refreshes);
        provider.on_refresh(move || counter.set(counter.get() + 1));

        let path = provider.ensure_config(SourceKind::Workspace).unwrap();
        assert_eq!(Some(path.as_path()), fx.paths.workspace.as_deref());
        assert_eq!(refreshes.get(), 1);
        assert!(provider.is_watching(SourceKind::Workspace));
        assert_eq!(provider.catalog().group("Workspace").unwrap().actions.len(), 2);
        assert!(
            fx.notifier
                .last(MessageLevel::Info)
                .unwrap()
                .starts_with("Workspace ")
        );

        provider.ensure_config(SourceKind::Workspace).unwrap();
        assert_eq!(refreshes.get(), 1);
    }

    #[test]
    fn test_ensure_workspace_without_project_fails() {
        let fx = fixture(false);
        let mut provider = ActionTreeProvider::new(&fx.paths, fx.notifier.clone());
        assert!(matches!(
            provider.ensure_config(SourceKind::Workspace),
            Err(ProviderError::NoWorkspace)
        ));
    }

    #[test]
    fn test_refresh_drops_stale_entries() {
        let fx = fixture(false);
        write(&fx.paths.global, r#"[{"label":"Old","command":"x","group":"Old"}]"#);
        let mut provider = ActionTreeProvider::new(&fx.paths, fx.notifier.clone());
        assert!(provider.catalog().group("Old").is_some());

        write(&fx.paths.global, r#"[{"label":"New","command":"y","group":"New"}]"#);
        provider.refresh();
        assert!(provider.catalog().group("Old").is_none());
        assert!(provider.catalog().group("New").is_some());
    }

    #[test]
    fn test_file_change_triggers_reload_and_refresh() {
        let fx = fixture(false);
        write(&fx.paths.global, "[]");
        let mut provider = ActionTreeProvider::new(&fx.paths, fx.notifier.clone());
        let refreshed = Rc::new(Cell::new(false));
        let flag = Rc::clone(&refreshed);
        provider.on_refresh(move || flag.set(true));

        fs::write(
            &fx.paths.global,
            r#"[{"label":"Hot","command":"echo hot","group":"Live"}]"#,
        )
        .unwrap();

        let deadline = Instant::now() + Duration::from_secs(10);
        while provider.catalog().group("Live").is_none() && Instant::now() < deadline {
            provider.wait_for_events(Duration::from_millis(100));
        }
        assert!(refreshed.get());
        assert_eq!(provider.catalog().group("Live").unwrap().actions.len(), 1);
    }

    #[test]
    fn test_no_refresh_after_dispose() {
        let fx = fixture(false);
        let mut provider = ActionTreeProvider::new(&fx.paths, fx.notifier.clone());
        let refreshed = Rc::new(Cell::new(false));
        let flag = Rc::clone(&refreshed);
        provider.on_refresh(move || flag.set(true));

        provider.dispose();
        fs::write(&fx.paths.global, "[]").unwrap();
        std::thread::sleep(Duration::from_millis(200));

        assert_eq!(provider.pump_events(), 0);
        assert_eq!(provider.wait_for_events(Duration::from_millis(50)), 0);
        assert!(!refreshed.get());
        assert!(!provider.is_watching(SourceKind::Global));
    }

    #[test]
    fn test_workspace_change_after_lazy_creation_reloads() {
        let fx = fixture(true);
        let mut provider = ActionTreeProvider::new(&fx.paths, fx.notifier.clone());
        let workspace = provider.ensure_config(SourceKind::Workspace).unwrap();
        assert!(provider.is_watching(SourceKind::Workspace));

        fs::write(
            &workspace,
            r#"[{"label":"Serve","command":"npm start","group":"Web"}]"#,
        )
        .unwrap();

        let deadline = Instant::now() + Duration::from_secs(10);
        while provider.catalog().group("Web").is_none() && Instant::now() < deadline {
            provider.wait_for_events(Duration::from_millis(100));
        }
        assert_eq!(provider.catalog().group("Web").unwrap().actions.len(), 1);
        assert!(provider.catalog().group("Workspace").is_none());
        assert!(provider.catalog().group("Global").is_some());
        assert_eq!(fx.notifier.count(MessageLevel::Error), 0);
    }
}
