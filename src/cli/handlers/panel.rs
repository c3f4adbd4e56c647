use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use dialoguer::{Select, theme::ColorfulTheme};
use std::{cell::Cell, rc::Rc};

use crate::{
    cli::handlers::run,
    core::tree_display::{self, DisplayOptions},
    state::AppState,
};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Interactive panel: pick entries to run while the config files are watched."
)]
struct PanelArgs {
    /// Show the hover text next to each entry: file paths and command lines.
    #[arg(long, short)]
    commands: bool,
}

/// The main handler for the `panel` command.
///
/// The tree is printed again whenever the provider refreshes, whether from a
/// watched file changing or from a config file being created.
pub fn handle(args: Vec<String>, state: &mut AppState) -> Result<()> {
    let panel_args = PanelArgs::try_parse_from(&args)?;
    let options = DisplayOptions {
        show_commands: panel_args.commands,
        numbered: false,
    };

    let dirty = Rc::new(Cell::new(true));
    let flag = Rc::clone(&dirty);
    state.provider.on_refresh(move || flag.set(true));

    let theme = ColorfulTheme::default();
    loop {
        state.provider.pump_events();
        if dirty.replace(false) {
            println!("\n{}", t!("tree.header").bold());
            println!("{}", tree_display::render_tree(&state.provider, &options));
        }

        let nodes = tree_display::activatable_nodes(&state.provider);
        let mut items: Vec<String> = nodes
            .iter()
            .map(|(group, node)| match group {
                Some(group) => format!("{} › {}", group, node.label()),
                None => node.label().to_string(),
            })
            .collect();
        let reload_index = items.len();
        items.push(t!("panel.item.reload").to_string());
        items.push(t!("panel.item.quit").to_string());

        let selection = Select::with_theme(&theme)
            .with_prompt(t!("panel.prompt"))
            .items(&items)
            .default(0)
            .interact_opt()?;

        let Some(index) = selection else { break };
        if index == reload_index {
            state.provider.refresh();
            continue;
        }
        let Some((group, node)) = nodes.get(index) else { break };

        // The files may have changed while the prompt was open.
        state.provider.pump_events();
        let node = if dirty.get() {
            match tree_display::resolve_entry(&state.provider, group.as_deref(), node.label()) {
                Some(fresh) => fresh,
                None => {
                    eprintln!(
                        "{}",
                        format!(t!("panel.warn.entry_gone"), label = node.label()).yellow()
                    );
                    continue;
                }
            }
        } else {
            node.clone()
        };

        if let Err(e) = run::activate(&node, state) {
            eprintln!("{} {}", "Error:".red().bold(), e);
        }
    }

    Ok(())
}
