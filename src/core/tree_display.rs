// src/core/tree_display.rs

use crate::core::tree_provider::{ActionTreeProvider, TreeNode};
use colored::Colorize;

/// Options for rendering the panel as text.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisplayOptions {
    /// Append the hover text after each entry: the file path for config
    /// buttons, the command line for leaves.
    pub show_commands: bool,
    /// Prefix activatable entries with their selection number.
    pub numbered: bool,
}

/// Renders the full tree: the root listing with every group expanded.
///
/// With `numbered`, config buttons and leaves are numbered from 1 in the same
/// order as [`activatable_nodes`].
pub fn render_tree(provider: &ActionTreeProvider, options: &DisplayOptions) -> String {
    let mut lines = Vec::new();
    let mut counter = 0;
    let mut number = |numbered: bool| -> String {
        if numbered {
            counter += 1;
            format!("{:>3}. ", counter)
        } else {
            String::new()
        }
    };

    for node in provider.children(None) {
        match &node {
            TreeNode::ConfigButton { label, .. } => {
                let mut line = format!("{}{} {}", number(options.numbered), "⚙".dimmed(), label);
                push_tooltip(&mut line, &node, options);
                lines.push(line);
            }
            TreeNode::Separator => {
                lines.push("─".repeat(24).dimmed().to_string());
            }
            TreeNode::Group { .. } => {
                lines.push(node.label().bold().to_string());
                let leaves = provider.children(Some(&node));
                for (i, leaf) in leaves.iter().enumerate() {
                    let is_last = i + 1 == leaves.len();
                    let connector = if is_last { "└─ " } else { "├─ " };
                    let mut line = format!("{}{}{}", connector, number(options.numbered), leaf.label());
                    push_tooltip(&mut line, leaf, options);
                    lines.push(line);
                }
            }
            TreeNode::Leaf { .. } => lines.push(node.label().to_string()),
        }
    }

    lines.join("\n")
}

fn push_tooltip(line: &mut String, node: &TreeNode, options: &DisplayOptions) {
    if !options.show_commands {
        return;
    }
    if let Some(tooltip) = node.tooltip() {
        line.push_str(&format!("  {}", tooltip.dimmed()));
    }
}

/// Every entry a user can select, in display order: the config buttons, then
/// each group's leaves. Each leaf is paired with the name of its group.
pub fn activatable_nodes(provider: &ActionTreeProvider) -> Vec<(Option<String>, TreeNode)> {
    let mut nodes = Vec::new();
    for node in provider.children(None) {
        match &node {
            TreeNode::ConfigButton { .. } => nodes.push((None, node.clone())),
            TreeNode::Group { .. } => {
                let group = node.label().to_string();
                nodes.extend(
                    provider
                        .children(Some(&node))
                        .into_iter()
                        .map(|leaf| (Some(group.clone()), leaf)),
                );
            }
            TreeNode::Separator | TreeNode::Leaf { .. } => {}
        }
    }
    nodes
}

/// Looks up a selectable entry again by its group and label, in the current tree.
///
/// Returns `None` when a reload removed it. A leaf whose command changed comes
/// back with the new command.
pub fn resolve_entry(provider: &ActionTreeProvider, group: Option<&str>, label: &str) -> Option<TreeNode> {
    activatable_nodes(provider)
        .into_iter()
        .find(|(g, node)| g.as_deref() == group && node.label() == label)
        .map(|(_, node)| node)
}

/// Finds the first leaf matching `query`, which is either a label or `group/label`.
///
/// Labels match the record label or its display label (with the terminal suffix).
pub fn find_leaf(provider: &ActionTreeProvider, query: &str) -> Option<TreeNode> {
    let (group_filter, label) = match query.split_once('/') {
        Some((group, label)) if provider.catalog().group(group).is_some() => (Some(group), label),
        _ => (None, query),
    };

    provider
        .catalog()
        .groups()
        .iter()
        .filter(|group| group_filter.is_none_or(|wanted| group.name == wanted))
        .flat_map(|group| group.actions.iter())
        .find(|record| record.label == label || record.display_label() == label)
        .map(TreeNode::leaf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::paths::ConfigPaths, system::host::testing::RecordingNotifier};
    use std::{fs, rc::Rc};
    use tempfile::tempdir;

    fn provider_with(global: &str) -> (tempfile::TempDir, ActionTreeProvider) {
        colored::control::set_override(false);
        let dir = tempdir().unwrap();
        let paths = ConfigPaths::new(dir.path(), None);
        fs::write(&paths.global, global).unwrap();
        let provider = ActionTreeProvider::new(&paths, Rc::new(RecordingNotifier::default()));
        (dir, provider)
    }

    const SAMPLE: &str = r#"[
        {"label":"Ver","command":"node --version","group":"Tools"},
        {"label":"Lint","command":"npm run lint","group":"Tools","terminal":"lint"},
        {"label":"Up","command":"docker compose up","group":"Ops"}
    ]"#;

    #[test]
    fn test_render_tree_lists_buttons_separator_and_groups() {
        let (_dir, provider) = provider_with(SAMPLE);
        let text = render_tree(&provider, &DisplayOptions::default());
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "⚙ Open global config file...");
        assert_eq!(lines[1], "⚙ Open workspace config file...");
        assert!(lines[2].starts_with('─'));
        assert_eq!(lines[3], "Tools");
        assert_eq!(lines[4], "├─ Ver");
        assert_eq!(lines[5], "└─ Lint [lint]");
        assert_eq!(lines[6], "Ops");
        assert_eq!(lines[7], "└─ Up");
    }

    #[test]
    fn test_numbering_matches_activatable_order() {
        let (_dir, provider) = provider_with(SAMPLE);
        let options = DisplayOptions {
            numbered: true,
            ..Default::default()
        };
        let text = render_tree(&provider, &options);
        assert!(text.contains("  4. Lint [lint]"));

        let nodes = activatable_nodes(&provider);
        assert_eq!(nodes.len(), 5);
        assert_eq!(nodes[3].1.label(), "Lint [lint]");
        assert_eq!(nodes[3].0.as_deref(), Some("Tools"));
    }

    #[test]
    fn test_find_leaf_by_label_or_group_path() {
        let (_dir, provider) = provider_with(SAMPLE);

        let lint = find_leaf(&provider, "Lint").unwrap();
        assert_eq!(lint.activation().unwrap().terminal.as_deref(), Some("lint"));
        assert!(find_leaf(&provider, "Tools/Lint [lint]").is_some());
        assert!(find_leaf(&provider, "Ops/Ver").is_none());
        assert!(find_leaf(&provider, "Missing").is_none());
    }

    #[test]
    fn test_resolve_entry_follows_reloads() {
        let (dir, mut provider) = provider_with(SAMPLE);
        let global = dir.path().join("terminal-shortcuts-global.json");

        fs::write(
            &global,
            r#"[{"label":"Lint","command":"cargo clippy","group":"Tools","terminal":"lint"}]"#,
        )
        .unwrap();
        provider.refresh();

        let lint = resolve_entry(&provider, Some("Tools"), "Lint [lint]").unwrap();
        assert_eq!(lint.activation().unwrap().command, "cargo clippy");
        assert!(resolve_entry(&provider, Some("Ops"), "Up").is_none());
        assert!(resolve_entry(&provider, None, "Open global config file...").is_some());
    }

    #[test]
    fn test_show_commands_appends_hover_text() {
        let (dir, provider) = provider_with(SAMPLE);
        let options = DisplayOptions {
            show_commands: true,
            ..Default::default()
        };
        let text = render_tree(&provider, &options);
        let lines: Vec<_> = text.lines().collect();

        assert!(lines[0].starts_with("⚙ Open global config file...  Open the global config file ("));
        assert!(lines[0].contains(&dir.path().display().to_string()));
        assert_eq!(lines[5], "└─ Lint [lint]  npm run lint");
        assert_eq!(lines[3], "Tools");
    }
}
