// src/models.rs

use crate::constants::DEFAULT_GROUP;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

// --- ACTION FILE MODELS (What is read from the JSON configuration files) ---

/// A single user-defined shortcut, as written in a configuration file.
///
/// `label` and `command` are required. Records have no identity beyond their
/// position in the file, so two identical records render as two entries.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ActionRecord {
    /// The text shown in the panel.
    pub label: String,
    /// The command line submitted to the terminal.
    pub command: String,
    /// The named terminal session to run in. `None` means the active (or a new default) one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal: Option<String>,
    /// The group this record belongs to. `None` means `"Default"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl ActionRecord {
    /// Creates a record with the required fields only.
    pub fn new(label: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            command: command.into(),
            terminal: None,
            group: None,
        }
    }

    /// Sets the group of this record.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Sets the target terminal of this record.
    pub fn with_terminal(mut self, terminal: impl Into<String>) -> Self {
        self.terminal = Some(terminal.into());
        self
    }

    /// The group this record is filed under. Absent and empty groups both map to `"Default"`.
    pub fn group_name(&self) -> &str {
        match self.group.as_deref() {
            Some(group) if !group.is_empty() => group,
            _ => DEFAULT_GROUP,
        }
    }

    /// The named terminal, if any. An empty name counts as no name.
    pub fn terminal_name(&self) -> Option<&str> {
        self.terminal.as_deref().filter(|name| !name.is_empty())
    }

    /// The label shown in the panel: `label`, plus ` [<terminal>]` for named terminals.
    pub fn display_label(&self) -> String {
        match self.terminal_name() {
            Some(terminal) => format!("{} [{}]", self.label, terminal),
            None => self.label.clone(),
        }
    }

    /// Returns a copy with the optional fields normalized: empty `group` and
    /// empty `terminal` become `None`.
    pub fn normalized(mut self) -> Self {
        if self.group.as_deref() == Some("") {
            self.group = None;
        }
        if self.terminal.as_deref() == Some("") {
            self.terminal = None;
        }
        self
    }

    /// The payload handed to the terminal router when this record is activated.
    pub fn activation(&self) -> Activation {
        Activation {
            command: self.command.clone(),
            terminal: self.terminal_name().map(str::to_string),
        }
    }
}

/// What a leaf entry dispatches when selected: `(command, terminal?)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    /// The command line to submit.
    pub command: String,
    /// The terminal session name, or `None` for the active/default session.
    pub terminal: Option<String>,
}

// --- CONFIGURATION SOURCES ---

/// The two origins of action records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// User-wide definitions stored in the settings directory.
    Global,
    /// Per-project definitions stored under the project root.
    Workspace,
}

impl SourceKind {
    /// The literal label used as the group of generated default records.
    pub fn label(self) -> &'static str {
        match self {
            Self::Global => "Global",
            Self::Workspace => "Workspace",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One configuration source: where it lives and what was last loaded from it.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    /// Which source this is.
    pub kind: SourceKind,
    /// The resolved absolute path. The Workspace path is `None` when no project is open.
    pub path: Option<PathBuf>,
    /// The records loaded on the last read, with their resolved group names, in file order.
    pub entries: Vec<(String, ActionRecord)>,
}

impl ConfigSource {
    /// Creates an empty source.
    pub fn new(kind: SourceKind, path: Option<PathBuf>) -> Self {
        Self {
            kind,
            path,
            entries: Vec::new(),
        }
    }

    /// Whether the backing file currently exists on disk.
    pub fn exists(&self) -> bool {
        self.path.as_deref().is_some_and(Path::exists)
    }
}

// --- MERGED CATALOG ---

/// A named bucket of actions, rendered as an expandable node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// The group name.
    pub name: String,
    /// The actions in stored order.
    pub actions: Vec<ActionRecord>,
}

/// The merged group → actions mapping that drives the panel.
///
/// Groups keep first-seen order; actions keep append order within their group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    groups: Vec<Group>,
    positions: HashMap<String, usize>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `record` to `group_name`, creating the group at the end if it is new.
    pub fn append(&mut self, group_name: &str, record: ActionRecord) {
        let position = match self.positions.get(group_name) {
            Some(&position) => position,
            None => {
                self.groups.push(Group {
                    name: group_name.to_string(),
                    actions: Vec::new(),
                });
                let position = self.groups.len() - 1;
                self.positions.insert(group_name.to_string(), position);
                position
            }
        };
        if let Some(group) = self.groups.get_mut(position) {
            group.actions.push(record);
        }
    }

    /// Removes every group.
    pub fn clear(&mut self) {
        self.groups.clear();
        self.positions.clear();
    }

    /// The groups in first-seen order.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Looks up a group by name.
    pub fn group(&self, name: &str) -> Option<&Group> {
        self.positions
            .get(name)
            .and_then(|&position| self.groups.get(position))
    }

    /// Total number of actions across all groups.
    pub fn action_count(&self) -> usize {
        self.groups.iter().map(|group| group.actions.len()).sum()
    }

    /// Whether the catalog holds no groups.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
