// src/core/config_merger.rs

use crate::models::{ActionRecord, Catalog};

/// Builds a fresh catalog from both sources.
///
/// Global entries are appended first, then Workspace entries, each in file
/// order. A group seen in both sources keeps its Global position and gains the
/// Workspace entries at its end; nothing already appended is replaced.
pub fn merge(global: &[(String, ActionRecord)], workspace: &[(String, ActionRecord)]) -> Catalog {
    let mut catalog = Catalog::new();
    merge_into(&mut catalog, global, workspace);
    catalog
}

/// Clears `catalog` and repopulates it from both sources.
pub fn merge_into(
    catalog: &mut Catalog,
    global: &[(String, ActionRecord)],
    workspace: &[(String, ActionRecord)],
) {
    catalog.clear();
    for (group, record) in global.iter().chain(workspace) {
        catalog.append(group, record.clone());
    }
    log::debug!(
        "Merged {} global + {} workspace record(s) into {} group(s)",
        global.len(),
        workspace.len(),
        catalog.groups().len()
    );
}
