// src/system/shells_config.rs

use crate::constants::SHELLS_CONFIG_FILENAME;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    env, fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Errors raised while loading `shells.toml`.
#[derive(Error, Debug)]
pub enum ShellError {
    /// Reading or writing the file failed.
    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),
    /// `default` names a shell missing from the `shells` table.
    #[error("Requested shell '{0}' is not defined in shells.toml.")]
    ShellNotDefined(String),
    /// The file is not valid TOML for this schema.
    #[error("Failed to parse shells.toml: {0}")]
    TomlParse(#[from] toml::de::Error),
    /// The default config could not be written out.
    #[error("Failed to serialize shells config to TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// How to launch one shell as a terminal session.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    /// Executable name or path.
    pub path: PathBuf,
    /// Extra arguments; the shell must keep reading commands from stdin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,
}

/// The contents of `shells.toml`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ShellsConfig {
    /// The shell used for new sessions.
    pub default: String,
    /// Every known shell, by name.
    #[serde(default)]
    pub shells: BTreeMap<String, ShellConfig>,
}

impl ShellsConfig {
    /// The default shell's name and launch settings.
    pub fn default_shell(&self) -> Result<(&str, &ShellConfig), ShellError> {
        self.shells
            .get(&self.default)
            .map(|shell| (self.default.as_str(), shell))
            .ok_or_else(|| ShellError::ShellNotDefined(self.default.clone()))
    }
}

/// Loads `<storage_dir>/shells.toml`, writing the platform defaults first if it is missing.
pub fn load_shells_config(storage_dir: &Path) -> Result<ShellsConfig, ShellError> {
    let shells_path = storage_dir.join(SHELLS_CONFIG_FILENAME);
    if !shells_path.exists() {
        let default_config = generate_default_shells_config();
        let toml_string = toml::to_string_pretty(&default_config)?;
        fs::create_dir_all(storage_dir)?;
        fs::write(&shells_path, toml_string)?;
        log::debug!("Created default shells config at '{}'", shells_path.display());
        Ok(default_config)
    } else {
        let content = fs::read_to_string(shells_path)?;
        Ok(toml::from_str(&content)?)
    }
}

/// The platform defaults: `cmd`/`powershell` on Windows, `sh`/`bash` elsewhere.
pub fn generate_default_shells_config() -> ShellsConfig {
    let mut shells = BTreeMap::new();
    if cfg!(target_os = "windows") {
        shells.insert(
            "cmd".to_string(),
            ShellConfig {
                path: PathBuf::from("cmd.exe"),
                args: Some(vec!["/Q".to_string()]),
            },
        );
        if is_executable_in_path("powershell.exe") {
            shells.insert(
                "powershell".to_string(),
                ShellConfig {
                    path: PathBuf::from("powershell.exe"),
                    args: Some(vec!["-NoLogo".to_string(), "-Command".to_string(), "-".to_string()]),
                },
            );
        }
    } else {
        shells.insert(
            "sh".to_string(),
            ShellConfig {
                path: PathBuf::from("sh"),
                args: None,
            },
        );
        if is_executable_in_path("bash") {
            shells.insert(
                "bash".to_string(),
                ShellConfig {
                    path: PathBuf::from("bash"),
                    args: None,
                },
            );
        }
    }

    let default = get_default_shell_name(&shells).to_string();
    ShellsConfig { default, shells }
}

fn is_executable_in_path(executable_name: &str) -> bool {
    if let Ok(path_var) = env::var("PATH") {
        for path in env::split_paths(&path_var) {
            if path.join(executable_name).is_file() {
                return true;
            }
        }
    }
    false
}

fn get_default_shell_name(shells: &BTreeMap<String, ShellConfig>) -> &'static str {
    if cfg!(target_os = "windows") {
        "cmd"
    } else if shells.contains_key("bash") {
        "bash"
    } else {
        "sh"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_names_an_existing_shell() {
        let config = generate_default_shells_config();
        let (name, shell) = config.default_shell().unwrap();
        assert_eq!(name, config.default);
        assert!(!shell.path.as_os_str().is_empty());
    }

    #[test]
    fn test_load_writes_defaults_then_reads_them_back() {
        let dir = tempdir().unwrap();
        let first = load_shells_config(dir.path()).unwrap();
        assert!(dir.path().join("shells.toml").exists());
        let second = load_shells_config(dir.path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_default_shell_is_an_error() {
        let config = ShellsConfig {
            default: "fish".to_string(),
            shells: BTreeMap::new(),
        };
        assert!(matches!(
            config.default_shell(),
            Err(ShellError::ShellNotDefined(name)) if name == "fish"
        ));
    }
}
