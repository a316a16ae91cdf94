/// Flatten a command tree into a table keyed by space-joined paths.
use std::sync::Arc;

use indexmap::IndexMap;

use super::tree::{Command, CommandTree, INDEX, Node};

/// Full command path (segments joined by a single space) to command.
pub type FlatTable = IndexMap<String, Arc<Command>>;

/// Flatten `tree` into a [`FlatTable`].
///
/// Traversal is depth-first in insertion order. An `index` key is anchored at
/// its group's own path (or `"index"` at the top level). With
/// `expand_aliases`, every alias adds another key pointing at the same
/// `Arc<Command>`. Later writes to an existing key win.
#[must_use]
pub fn flatten(tree: &CommandTree, expand_aliases: bool) -> FlatTable {
    let mut table = FlatTable::new();
    walk(tree, expand_aliases, "", &mut |path, command| {
        table.insert(path, Arc::clone(command));
    });
    table
}

/// Keys that more than one entry writes to when flattening with aliases.
///
/// Flattening resolves these last-write-wins; callers usually want to treat
/// them as configuration mistakes.
#[must_use]
pub fn collisions(tree: &CommandTree) -> Vec<String> {
    let mut seen: IndexMap<String, usize> = IndexMap::new();
    walk(tree, true, "", &mut |path, _| {
        *seen.entry(path).or_default() += 1;
    });
    seen.into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(path, _)| path)
        .collect()
}

fn walk<'a>(
    tree: &'a CommandTree,
    expand_aliases: bool,
    prefix: &str,
    visit: &mut dyn FnMut(String, &'a Arc<Command>),
) {
    for (key, node) in tree.iter() {
        let full_path = if key == INDEX {
            if prefix.is_empty() {
                INDEX.to_owned()
            } else {
                prefix.to_owned()
            }
        } else {
            join(prefix, key)
        };

        match node {
            Node::Command(command) => {
                visit(full_path, command);
                if expand_aliases {
                    for alias in command.aliases() {
                        visit(join(prefix, alias), command);
                    }
                }
            }
            Node::Group(group) => walk(group, expand_aliases, &full_path, visit),
        }
    }
}

fn join(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_owned()
    } else {
        format!("{prefix} {segment}")
    }
}
