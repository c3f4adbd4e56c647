use anyhow::{Result, anyhow};
use clap::Parser;
use colored::Colorize;

use crate::{
    cli::handlers::open,
    core::{tree_display, tree_provider::TreeNode},
    state::AppState,
};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Runs an action from the panel in its terminal."
)]
struct RunArgs {
    /// The action's label, display label (`Label [terminal]`) or `group/label`.
    action: String,
}

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Sends a command line to a terminal, the way an action would."
)]
struct ExecArgs {
    /// The command line to send.
    command: String,
    /// The terminal to run it in. Defaults to the active terminal.
    terminal: Option<String>,
}

/// Main entry point for the 'run' command.
pub fn handle(args: Vec<String>, state: &mut AppState) -> Result<()> {
    let run_args = RunArgs::try_parse_from(&args)?;

    let node = tree_display::find_leaf(&state.provider, &run_args.action)
        .ok_or_else(|| anyhow!(t!("run.error.not_found"), query = run_args.action.cyan()))?;
    activate(&node, state)
}

/// Main entry point for the 'exec' command, the one every leaf is bound to.
pub fn handle_exec(args: Vec<String>, state: &mut AppState) -> Result<()> {
    let exec_args = ExecArgs::try_parse_from(&args)?;
    state
        .router
        .dispatch(&exec_args.command, exec_args.terminal.as_deref());
    Ok(())
}

/// Performs what selecting `node` in the panel does.
pub fn activate(node: &TreeNode, state: &mut AppState) -> Result<()> {
    match node {
        TreeNode::ConfigButton { kind, .. } => open::open_config(*kind, state),
        TreeNode::Leaf { activation, .. } => {
            state
                .router
                .dispatch(&activation.command, activation.terminal.as_deref());
            Ok(())
        }
        TreeNode::Separator | TreeNode::Group { .. } => Ok(()),
    }
}
