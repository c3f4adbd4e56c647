// src/core/paths.rs

use crate::constants::{
    APP_DIR_NAME, GLOBAL_CONFIG_FILENAME, STORAGE_DIR_ENV, WORKSPACE_CONFIG_DIR,
    WORKSPACE_CONFIG_FILENAME,
};
use lazy_static::lazy_static;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

lazy_static! {
    static ref STORAGE_DIR: Mutex<Option<PathBuf>> = Mutex::new(None);
}

/// Errors raised while resolving the storage directory and project root.
#[derive(Error, Debug)]
pub enum PathError {
    /// The platform has no config directory and no override was given.
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
    /// `~` or an environment variable in a path could not be expanded.
    #[error("Failed to expand path template '{template}': {message}")]
    Expansion {
        /// The unexpanded path.
        template: String,
        /// Why expansion failed.
        message: String,
    },
    /// The project root could not be canonicalized.
    #[error("Could not resolve project root '{path}': {source}")]
    ProjectRoot {
        /// The requested root.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Returns the global storage directory (`$TERMINAL_SHORTCUTS_HOME`, or
/// `<config dir>/terminal-shortcuts`). The directory is not created here.
///
/// This function is memoized: the first call computes and caches the path,
/// subsequent calls return the cached value instantly.
pub fn get_storage_dir() -> Result<PathBuf, PathError> {
    let mut cached_path_guard = STORAGE_DIR
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    if let Some(path) = &*cached_path_guard {
        return Ok(path.clone());
    }

    let storage_path = match std::env::var(STORAGE_DIR_ENV) {
        Ok(template) if !template.trim().is_empty() => expand_path_template(&template)?,
        _ => dirs::config_dir()
            .ok_or(PathError::ConfigDirNotFound)?
            .join(APP_DIR_NAME),
    };

    log::debug!("Global storage directory: {}", storage_path.display());
    *cached_path_guard = Some(storage_path.clone());
    Ok(storage_path)
}

/// Expands `~` and environment variables (`$VAR` / `${VAR}`) in a path template.
pub fn expand_path_template(template: &str) -> Result<PathBuf, PathError> {
    let expanded = shellexpand::full(template).map_err(|e| PathError::Expansion {
        template: template.to_string(),
        message: e.to_string(),
    })?;
    Ok(PathBuf::from(expanded.into_owned()))
}

/// The global action file inside `storage_dir`.
pub fn global_config_path(storage_dir: &Path) -> PathBuf {
    storage_dir.join(GLOBAL_CONFIG_FILENAME)
}

/// The workspace action file for a project root: `<root>/.vscode/terminal-shortcuts-workspace.json`.
pub fn workspace_config_path(project_root: &Path) -> PathBuf {
    project_root
        .join(WORKSPACE_CONFIG_DIR)
        .join(WORKSPACE_CONFIG_FILENAME)
}

/// Finds the project root for `start`: the nearest ancestor (including `start`)
/// that already holds a workspace action file, or `start` itself when none does.
pub fn find_project_root(start: &Path) -> Result<PathBuf, PathError> {
    let canonical = dunce::canonicalize(start).map_err(|e| PathError::ProjectRoot {
        path: start.display().to_string(),
        source: e,
    })?;

    let found = canonical
        .ancestors()
        .find(|dir| workspace_config_path(dir).is_file())
        .map(Path::to_path_buf);

    Ok(found.unwrap_or(canonical))
}

/// The resolved locations of both configuration sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    /// Always defined; the file is created on demand.
    pub global: PathBuf,
    /// Defined only when a project root is open; the file is created lazily.
    pub workspace: Option<PathBuf>,
    /// The open project root, if any.
    pub project_root: Option<PathBuf>,
}

impl ConfigPaths {
    /// Builds both paths from a storage directory and an optional project root.
    pub fn new(storage_dir: &Path, project_root: Option<&Path>) -> Self {
        Self {
            global: global_config_path(storage_dir),
            workspace: project_root.map(workspace_config_path),
            project_root: project_root.map(Path::to_path_buf),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_config_paths_layout() {
        let paths = ConfigPaths::new(Path::new("/store"), Some(Path::new("/proj")));
        assert_eq!(
            paths.global,
            Path::new("/store").join("terminal-shortcuts-global.json")
        );
        assert_eq!(
            paths.workspace.as_deref(),
            Some(
                Path::new("/proj")
                    .join(".vscode")
                    .join("terminal-shortcuts-workspace.json")
                    .as_path()
            )
        );

        let no_project = ConfigPaths::new(Path::new("/store"), None);
        assert!(no_project.workspace.is_none());
    }

    #[test]
    fn test_find_project_root_walks_up_to_existing_workspace_file() {
        let root = tempdir().unwrap();
        let nested = root.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        let config = workspace_config_path(root.path());
        fs::create_dir_all(config.parent().unwrap()).unwrap();
        fs::write(&config, "[]").unwrap();

        let found = find_project_root(&nested).unwrap();
        assert_eq!(found, dunce::canonicalize(root.path()).unwrap());
    }

    #[test]
    fn test_find_project_root_falls_back_to_start() {
        let root = tempdir().unwrap();
        let found = find_project_root(root.path()).unwrap();
        assert_eq!(found, dunce::canonicalize(root.path()).unwrap());
    }

    #[test]
    fn test_expand_path_template_keeps_plain_paths() {
        let expanded = expand_path_template("/tmp/shortcuts").unwrap();
        assert_eq!(expanded, PathBuf::from("/tmp/shortcuts"));
    }
}
