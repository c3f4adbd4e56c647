// src/system/executor.rs

use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command as StdCommand, Stdio};
use thiserror::Error;

/// Errors raised while running a foreground command.
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// The command line has unbalanced quotes.
    #[error("Command could not be parsed: {0}")]
    CommandParse(String),
    /// The program could not be started.
    #[error("Command '{0}' could not be executed: {1}")]
    CommandFailed(String, std::io::Error),
    /// The program ran and reported failure.
    #[error("Command '{0}' exited with a non-zero error code.")]
    NonZeroExitStatus(String),
}

/// Wraps a value in double quotes, escaping internal quotes, so it survives `shlex` splitting.
pub fn wrap_value(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Runs a command line in the foreground and waits for it.
pub fn execute_command(command_line: &str, cwd: &Path) -> Result<(), ExecutionError> {
    let trimmed_command = command_line.trim();
    if trimmed_command.is_empty() {
        return Ok(());
    }

    let parts = shlex::split(trimmed_command)
        .ok_or_else(|| ExecutionError::CommandParse(trimmed_command.to_string()))?;
    let Some((program, args)) = parts.split_first() else {
        return Ok(());
    };
    let clean_cwd = dunce::simplified(cwd);

    let mut command = StdCommand::new(program);
    command
        .args(args)
        .current_dir(clean_cwd)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    // Windows built-ins such as `start` only exist inside `cmd`.
    let status = match command.status() {
        Ok(status) => status,
        Err(e) if e.kind() == ErrorKind::NotFound && cfg!(target_os = "windows") => {
            log::debug!("Command '{}' not found. Retrying with cmd /C.", program);
            StdCommand::new("cmd")
                .arg("/C")
                .arg(trimmed_command)
                .current_dir(clean_cwd)
                .status()
                .map_err(|e| ExecutionError::CommandFailed(trimmed_command.to_string(), e))?
        }
        Err(e) => return Err(ExecutionError::CommandFailed(trimmed_command.to_string(), e)),
    };

    if !status.success() {
        return Err(ExecutionError::NonZeroExitStatus(trimmed_command.to_string()));
    }
    Ok(())
}

/// The editor command: `$VISUAL`, then `$EDITOR`, then the platform opener.
pub fn editor_command() -> String {
    ["VISUAL", "EDITOR"]
        .iter()
        .filter_map(|key| std::env::var(key).ok())
        .find(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default_opener().to_string())
}

fn default_opener() -> &'static str {
    if cfg!(target_os = "windows") {
        "notepad"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    }
}

/// Opens `file` with the user's editor and waits for it to return.
pub fn open_in_editor(file: &Path, cwd: &Path) -> Result<(), ExecutionError> {
    let command_line = format!(
        "{} {}",
        editor_command(),
        wrap_value(&file.display().to_string())
    );
    log::debug!("Opening editor: {}", command_line);
    execute_command(&command_line, cwd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_wrap_value_survives_shlex_split() {
        let path = r#"/tmp/my "quoted" dir/file.json"#;
        let parts = shlex::split(&format!("editor {}", wrap_value(path))).unwrap();
        assert_eq!(parts, ["editor", path]);
    }

    #[test]
    fn test_empty_command_is_a_no_op() {
        let dir = tempdir().unwrap();
        assert!(execute_command("   ", dir.path()).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_status_is_reported() {
        let dir = tempdir().unwrap();
        assert!(execute_command("true", dir.path()).is_ok());
        assert!(matches!(
            execute_command("false", dir.path()),
            Err(ExecutionError::NonZeroExitStatus(_))
        ));
    }

    #[test]
    fn test_unbalanced_quotes_fail_to_parse() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            execute_command("echo \"unterminated", dir.path()),
            Err(ExecutionError::CommandParse(_))
        ));
    }
}
