use clap::Parser;
use std::path::PathBuf;

/// The command registry.
pub mod dispatcher;
/// One handler per command.
pub mod handlers;

/// Builds the dynamic, color-aware full help string at runtime.
fn build_help_string() -> &'static str {
    let use_colors = colored::control::SHOULD_COLORIZE.should_colorize();

    let template = t!("cli.help.template");

    let title = if use_colors { "\x1b[1;33m" } else { "" }; // Bold Yellow
    let cmd = if use_colors { "\x1b[36m" } else { "" }; // Cyan
    let dim = if use_colors { "\x1b[2m" } else { "" }; // Dim
    let reset = if use_colors { "\x1b[0m" } else { "" };

    let formatted_string = template
        .replace("<title>", title)
        .replace("</title>", reset)
        .replace("<cmd>", cmd)
        .replace("</cmd>", reset)
        .replace("<dim>", dim)
        .replace("</dim>", reset);

    Box::leak(formatted_string.into_boxed_str())
}

/// terminal-shortcuts: named shell commands, grouped and dispatched to named terminals.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    help_template = { build_help_string() },
    styles = clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
        .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
)]
#[command(disable_help_subcommand = true)]
#[command(trailing_var_arg = true)]
pub struct Cli {
    /// Directory holding the global config file and shells.toml.
    #[arg(long, value_name = "DIR")]
    pub storage_dir: Option<String>,

    /// Project root whose `.vscode/` holds the workspace config file.
    #[arg(long, value_name = "DIR", conflicts_with = "no_workspace")]
    pub workspace: Option<PathBuf>,

    /// Run without a project: only the global config is used.
    #[arg(long)]
    pub no_workspace: bool,

    /// The command and its arguments.
    #[arg(allow_hyphen_values = true)]
    pub args: Vec<String>,
}
