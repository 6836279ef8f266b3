//! Commit attribution: partition commits across modules by the files they
//! touched.
//!
//! Ownership is longest-prefix: a file under `bar/v2/` belongs to the
//! module at `bar/v2`, not to the one at `bar`, and the root module only
//! receives files no deeper module claims.

use std::collections::HashMap;

use crate::domain::Module;
use crate::git::CommitInfo;

/// Map each module to the commits that touched its subtree, preserving the
/// input commit order (newest first as produced by the history walk).
/// Commits that touch no module's tree are dropped.
pub fn group_commits(
    commits: &[CommitInfo],
    modules: &[Module],
) -> HashMap<Module, Vec<CommitInfo>> {
    let by_depth = modules_by_depth(modules);

    let mut groups: HashMap<Module, Vec<CommitInfo>> = HashMap::new();
    for commit in commits {
        let mut touched: Vec<&Module> = Vec::new();
        for path in &commit.paths {
            if let Some(m) = owner_of(path, &by_depth) {
                if !touched.contains(&m) {
                    touched.push(m);
                }
            }
        }
        for m in touched {
            groups.entry(m.clone()).or_default().push(commit.clone());
        }
    }
    groups
}

/// The modules whose subtrees a set of file paths spans, in the order the
/// modules appear in `modules` (discovery order).
pub fn changed_modules(paths: &[String], modules: &[Module]) -> Vec<Module> {
    let by_depth = modules_by_depth(modules);

    let mut changed: Vec<&Module> = Vec::new();
    for path in paths {
        if let Some(m) = owner_of(path, &by_depth) {
            if !changed.contains(&m) {
                changed.push(m);
            }
        }
    }

    modules
        .iter()
        .filter(|m| changed.contains(m))
        .cloned()
        .collect()
}

fn modules_by_depth(modules: &[Module]) -> Vec<&Module> {
    let mut by_depth: Vec<&Module> = modules.iter().collect();
    by_depth.sort_by_key(|m| std::cmp::Reverse(m.path.len()));
    by_depth
}

fn owner_of<'a>(path: &str, by_depth: &[&'a Module]) -> Option<&'a Module> {
    by_depth.iter().find(|m| m.contains(path)).copied()
}
