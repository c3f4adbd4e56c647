// src/cli/handlers/open.rs

use anyhow::Result;
use clap::{Parser, ValueEnum};
use colored::Colorize;

use crate::{models::SourceKind, state::AppState, system::executor};

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum SourceArg {
    Global,
    Workspace,
}

impl From<SourceArg> for SourceKind {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Global => SourceKind::Global,
            SourceArg::Workspace => SourceKind::Workspace,
        }
    }
}

#[derive(Parser, Debug)]
#[command(no_binary_name = true)]
struct OpenArgs {
    /// Which config file to open.
    #[arg(value_enum)]
    source: SourceArg,
}

/// The main handler for the `open` command.
pub fn handle(args: Vec<String>, state: &mut AppState) -> Result<()> {
    let open_args = OpenArgs::try_parse_from(&args)?;
    open_config(open_args.source.into(), state)
}

/// The handler bound to the "Open global config file..." button.
pub fn handle_global(args: Vec<String>, state: &mut AppState) -> Result<()> {
    NoArgs::try_parse_from(&args)?;
    open_config(SourceKind::Global, state)
}

/// The handler bound to the "Open workspace config file..." button.
pub fn handle_workspace(args: Vec<String>, state: &mut AppState) -> Result<()> {
    NoArgs::try_parse_from(&args)?;
    open_config(SourceKind::Workspace, state)
}

#[derive(Parser, Debug)]
#[command(no_binary_name = true)]
struct NoArgs {}

/// Creates the config file for `kind` if needed, then opens it in the editor.
pub fn open_config(kind: SourceKind, state: &mut AppState) -> Result<()> {
    let path = state.provider.ensure_config(kind)?;

    println!(
        "\n> {}",
        format!(t!("open.info.opening"), path = path.display()).green()
    );
    executor::open_in_editor(&path, &state.working_dir())?;

    // Whatever the editor saved is picked up by the watches.
    state.provider.pump_events();
    Ok(())
}
