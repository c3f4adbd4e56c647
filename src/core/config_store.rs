//! # Config Store
//!
//! Reads one JSON action file into `(group, record)` pairs and creates the
//! default file when it is missing. Every failure is reported through the
//! [`Notifier`] and turned into an empty result; nothing here aborts loading
//! of the other source.

use crate::{
    models::{ActionRecord, SourceKind},
    system::host::Notifier,
};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Errors raised while reading or creating an action file.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The file does not exist.
    #[error("No json file found in config folder ({path}).")]
    MissingFile {
        /// The missing path.
        path: PathBuf,
    },
    /// The file exists but is not a JSON array of action records.
    #[error("Failed to parse {path}: {source}")]
    Parse {
        /// The malformed file.
        path: PathBuf,
        /// The underlying parser message.
        #[source]
        source: serde_json::Error,
    },
    /// Reading, writing or creating directories failed.
    #[error("Filesystem error on {path}: {source}")]
    Io {
        /// The path being accessed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

type StoreResult<T> = Result<T, StoreError>;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// The two sample records written to a freshly created file.
pub fn default_records(kind: SourceKind) -> Vec<ActionRecord> {
    vec![
        ActionRecord::new("Show Python version [edit me]", "python --version")
            .with_group(kind.label()),
        ActionRecord::new("Show Node.js version [edit me]", "node --version")
            .with_group(kind.label()),
    ]
}

/// Serializes records the way generated files are written: a pretty JSON array with 4-space indentation.
pub fn to_pretty_json(records: &[ActionRecord]) -> Result<String, serde_json::Error> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    serde::Serialize::serialize(records, &mut serializer)?;
    // serde_json only ever emits valid UTF-8.
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Creates `path` with the default records when it does not exist.
///
/// Returns `Ok(true)` when a file was written and `Ok(false)` when it already
/// existed (the file is left untouched). Parent directories are created as needed.
pub fn ensure(path: &Path, kind: SourceKind) -> StoreResult<bool> {
    if path.exists() {
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StoreError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let content = to_pretty_json(&default_records(kind)).map_err(|e| StoreError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;
    fs::write(path, content).map_err(|e| StoreError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    log::info!("Created default {} config at '{}'", kind, path.display());
    Ok(true)
}

/// The message shown after `ensure` creates a file.
pub fn creation_message(path: &Path, kind: SourceKind) -> String {
    match kind {
        SourceKind::Global => {
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            format!(t!("store.info.global_created"), file = file_name)
        }
        SourceKind::Workspace => {
            format!(t!("store.info.workspace_created"), path = path.display())
        }
    }
}

/// Reads and parses `path` strictly: a JSON array of action records.
///
/// Empty `group`/`terminal` fields are normalized away.
pub fn read_records(path: &Path) -> StoreResult<Vec<ActionRecord>> {
    if !path.exists() {
        return Err(StoreError::MissingFile {
            path: path.to_path_buf(),
        });
    }

    // Bytes, so invalid UTF-8 surfaces as a parse error rather than an I/O one.
    let bytes = fs::read(path).map_err(|e| StoreError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let content = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);

    let records: Vec<ActionRecord> =
        serde_json::from_slice(content).map_err(|e| StoreError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(records.into_iter().map(ActionRecord::normalized).collect())
}

/// Loads `path` as an ordered sequence of `(group name, record)` pairs.
///
/// Never fails: a missing Global file yields a warning, a malformed file an
/// error message, and both yield an empty sequence. A missing Workspace file
/// is silent since it is only created on request.
pub fn load(path: &Path, kind: SourceKind, notifier: &dyn Notifier) -> Vec<(String, ActionRecord)> {
    match read_records(path) {
        Ok(records) => {
            log::debug!(
                "Loaded {} record(s) from {} config '{}'",
                records.len(),
                kind,
                path.display()
            );
            records
                .into_iter()
                .map(|record| (record.group_name().to_string(), record))
                .collect()
        }
        Err(StoreError::MissingFile { path }) => {
            if kind == SourceKind::Global {
                notifier.warn(&format!(t!("store.warn.missing_file"), path = path.display()));
            } else {
                log::debug!("No {} config at '{}'", kind, path.display());
            }
            Vec::new()
        }
        Err(e @ StoreError::Parse { .. }) => {
            notifier.error(&e.to_string());
            Vec::new()
        }
        Err(e) => {
            notifier.warn(&e.to_string());
            Vec::new()
        }
    }
}
