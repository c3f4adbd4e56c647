use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use crate::{
    core::tree_display::{self, DisplayOptions},
    state::AppState,
};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Displays the shortcut panel as a tree."
)]
struct TreeArgs {
    /// Show the hover text next to each entry: file paths and command lines.
    #[arg(long, short)]
    commands: bool,

    /// Number the entries that can be selected.
    #[arg(long, short)]
    numbered: bool,
}

/// The main handler for the `tree` command.
pub fn handle(args: Vec<String>, state: &mut AppState) -> Result<()> {
    let tree_args = TreeArgs::try_parse_from(&args)?;

    let options = DisplayOptions {
        show_commands: tree_args.commands,
        numbered: tree_args.numbered,
    };

    println!("\n{}", t!("tree.header").bold());
    println!("{}", tree_display::render_tree(&state.provider, &options));

    if state.provider.catalog().is_empty() {
        println!("\n{}", t!("tree.info.empty").dimmed());
    }
    Ok(())
}
