// src/bin/terminal-shortcuts.rs

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::path::PathBuf;
use terminal_shortcuts::{
    cli::{Cli, dispatcher},
    core::paths,
    state::AppState,
    t,
};

fn main() {
    env_logger::init();

    if let Err(e) = run_cli(Cli::parse()) {
        eprintln!("\n{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Resolves the storage directory and project root, builds the state, and
/// hands the remaining arguments to the command dispatcher.
fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    let storage_dir = match cli.storage_dir.as_deref() {
        Some(template) => paths::expand_path_template(template)?,
        None => paths::get_storage_dir()?,
    };
    let project_root = resolve_project_root(&cli)?;
    log::debug!(
        "Storage dir: '{}', project root: {:?}",
        storage_dir.display(),
        project_root
    );

    let mut state = AppState::new(&storage_dir, project_root.as_deref())
        .context(t!("cli.error.shell_setup"))?;
    let result = dispatcher::dispatch(cli.args, &mut state);
    state.shutdown();
    result
}

/// `--no-workspace` wins, then `--workspace`, then the nearest ancestor of the
/// current directory holding a workspace config file (or the directory itself).
fn resolve_project_root(cli: &Cli) -> Result<Option<PathBuf>> {
    if cli.no_workspace {
        return Ok(None);
    }
    let start = match &cli.workspace {
        Some(dir) => {
            let root = dunce::canonicalize(dir)
                .with_context(|| format!(t!("cli.error.workspace_not_found"), path = dir.display()))?;
            return Ok(Some(root));
        }
        None => std::env::current_dir()?,
    };
    Ok(Some(paths::find_project_root(&start)?))
}
