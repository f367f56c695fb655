//! Help introspection.
//!
//! Enumerates commands related to a given path: children (strict path
//! prefix), siblings (same parent, different last segment), and their
//! union. Enumeration order is registration order, so pages are stable.

use crate::actor::Actor;
use crate::path::CommandPath;
use crate::tree::{CommandTree, ExecutableCommand};

/// One command in a help listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HelpEntry {
    /// The command's declared path, placeholders included.
    pub path: String,
    /// The full usage line including trailing parameters.
    pub usage: String,
    /// The command's description annotation, if any.
    pub description: Option<String>,
}

impl HelpEntry {
    fn from_command<A: Actor>(command: &ExecutableCommand<A>) -> Self {
        Self {
            path: command.path().to_string(),
            usage: command.usage(),
            description: command.description().map(ToString::to_string),
        }
    }
}

/// Commands whose path has `path` as a strict prefix.
pub(crate) fn children_of<A: Actor>(tree: &CommandTree<A>, path: &CommandPath) -> Vec<HelpEntry> {
    tree.executables()
        .filter(|exec| path.is_strict_prefix_of(exec.path()))
        .map(HelpEntry::from_command)
        .collect()
}

/// Commands sharing `path`'s parent and differing in the last segment.
pub(crate) fn siblings_of<A: Actor>(tree: &CommandTree<A>, path: &CommandPath) -> Vec<HelpEntry> {
    let Some(parent) = path.parent() else {
        return Vec::new();
    };
    tree.executables()
        .filter(|exec| {
            exec.path().len() == path.len()
                && parent.matches_prefix(exec.path())
                && !path.matches_prefix(exec.path())
        })
        .map(HelpEntry::from_command)
        .collect()
}

/// Union of children and siblings, de-duplicated, registration order.
pub(crate) fn related_to<A: Actor>(tree: &CommandTree<A>, path: &CommandPath) -> Vec<HelpEntry> {
    let mut entries = children_of(tree, path);
    for sibling in siblings_of(tree, path) {
        if !entries.contains(&sibling) {
            entries.push(sibling);
        }
    }
    entries
}

/// Returns page `page` (1-indexed) of `size` entries.
///
/// Out-of-range pages are empty; the last page may be short.
#[must_use]
pub fn paginate<T>(entries: &[T], page: usize, size: usize) -> &[T] {
    if page == 0 || size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(size);
    if start >= entries.len() {
        return &[];
    }
    let end = start.saturating_add(size).min(entries.len());
    &entries[start..end]
}
