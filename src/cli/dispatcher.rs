use anyhow::{Result, anyhow};

use crate::{cli::handlers, constants, state::AppState};

/// Defines a command, its aliases, and its handler.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: fn(Vec<String>, &mut AppState) -> Result<()>,
}

/// The single source of truth for all commands.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "tree",
        aliases: &["ls"],
        handler: handlers::tree::handle,
    },
    CommandDefinition {
        name: "run",
        aliases: &[],
        handler: handlers::run::handle,
    },
    CommandDefinition {
        name: constants::RUN_ACTION_COMMAND,
        aliases: &[],
        handler: handlers::run::handle_exec,
    },
    CommandDefinition {
        name: "open",
        aliases: &[],
        handler: handlers::open::handle,
    },
    CommandDefinition {
        name: constants::OPEN_GLOBAL_CONFIG_COMMAND,
        aliases: &[],
        handler: handlers::open::handle_global,
    },
    CommandDefinition {
        name: constants::OPEN_WORKSPACE_CONFIG_COMMAND,
        aliases: &[],
        handler: handlers::open::handle_workspace,
    },
    CommandDefinition {
        name: "panel",
        aliases: &["watch"],
        handler: handlers::panel::handle,
    },
    CommandDefinition {
        name: "paths",
        aliases: &[],
        handler: handlers::paths::handle,
    },
];

/// Finds a command definition in the registry by its name or alias.
fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// Routes `all_args` to its handler. No arguments shows the tree.
pub fn dispatch(all_args: Vec<String>, state: &mut AppState) -> Result<()> {
    log::debug!("Dispatching args: {:?}", all_args);

    let mut args = all_args.into_iter();
    let Some(name) = args.next() else {
        return handlers::tree::handle(Vec::new(), state);
    };

    let command = find_command(&name).ok_or_else(|| anyhow!(t!("cli.error.unknown_command"), name = name))?;
    (command.handler)(args.collect(), state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_resolves_names_and_aliases() {
        assert!(find_command("tree").is_some());
        assert!(find_command("ls").is_some());
        assert!(find_command("watch").is_some());
        assert!(find_command("exec").is_some());
        assert!(find_command("open-workspace").is_some());
        assert!(find_command("build").is_none());
    }

    #[test]
    fn test_registry_names_are_unique() {
        let mut names: Vec<_> = COMMAND_REGISTRY
            .iter()
            .flat_map(|cmd| std::iter::once(cmd.name).chain(cmd.aliases.iter().copied()))
            .collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }
}
