use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use crate::{
    models::{ConfigSource, SourceKind},
    state::AppState,
};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Shows where the config files live and whether they are watched."
)]
struct PathsArgs {}

/// The main handler for the `paths` command.
pub fn handle(args: Vec<String>, state: &mut AppState) -> Result<()> {
    PathsArgs::try_parse_from(&args)?;

    println!("\n{}", t!("paths.header").bold());
    println!(
        "  {:<12} {}",
        t!("paths.label.storage"),
        state.storage_dir().display()
    );
    print_source(
        t!("paths.label.global"),
        state.provider.source(SourceKind::Global),
        state.provider.is_watching(SourceKind::Global),
    );
    print_source(
        t!("paths.label.workspace"),
        state.provider.source(SourceKind::Workspace),
        state.provider.is_watching(SourceKind::Workspace),
    );
    Ok(())
}

fn print_source(label: &str, source: &ConfigSource, watched: bool) {
    let Some(path) = source.path.as_deref() else {
        println!("  {:<12} {}", label, t!("paths.status.no_workspace").dimmed());
        return;
    };

    let status = if !source.exists() {
        t!("paths.status.missing").yellow()
    } else if watched {
        t!("paths.status.watched").green()
    } else {
        t!("paths.status.exists").normal()
    };
    println!("  {:<12} {} ({})", label, path.display(), status);
}
