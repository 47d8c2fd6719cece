//! Tree Views
//!
//! Selects the visible subset of a materialized tree, either from the set of
//! expanded node ids or from a free-text search. Inputs are never mutated; the
//! result borrows from the node slice and keeps its order.

mod debounce;
mod expanded;
mod session;

pub use debounce::Debouncer;
pub use expanded::ExpandedSet;
pub use session::TreeSession;

use crate::tree::{TreeIndex, TreeNode};
use std::collections::{HashMap, HashSet};

/// Visible nodes of `nodes`.
///
/// An empty or whitespace-only `filter_text` selects by expansion: a node is
/// shown iff every ancestor up to its root is expanded. Any other text is
/// searched as typed, surrounding spaces included, and the expansion state is
/// ignored; see [`filter_matches`].
pub fn visible<'a>(
    nodes: &'a [TreeNode],
    expanded: &ExpandedSet,
    filter_text: &str,
) -> Vec<&'a TreeNode> {
    if filter_text.trim().is_empty() {
        visible_by_expansion(nodes, expanded)
    } else {
        filter_matches(nodes, filter_text)
    }
}

/// Nodes whose ancestors are all expanded
pub fn visible_by_expansion<'a>(nodes: &'a [TreeNode], expanded: &ExpandedSet) -> Vec<&'a TreeNode> {
    let index = TreeIndex::new(nodes);
    let mut memo: HashMap<&'a str, bool> = HashMap::with_capacity(nodes.len());
    nodes
        .iter()
        .filter(|node| is_shown(node, &index, expanded, &mut memo, nodes.len()))
        .collect()
}

fn is_shown<'a>(
    node: &'a TreeNode,
    index: &TreeIndex<'a>,
    expanded: &ExpandedSet,
    memo: &mut HashMap<&'a str, bool>,
    limit: usize,
) -> bool {
    // Every node pushed here shares the verdict of the walk: each one's
    // parent link was checked against the expanded set on the way up.
    let mut pending: Vec<&'a str> = Vec::new();
    let mut current = node;
    let verdict = loop {
        if let Some(known) = memo.get(current.id.as_str()) {
            break *known;
        }
        pending.push(current.id.as_str());
        let Some(parent_id) = current.parent_id.as_deref() else {
            break true;
        };
        if !expanded.contains(parent_id) {
            break false;
        }
        match index.get(parent_id) {
            Some(parent) => current = parent,
            None => break true,
        }
        if pending.len() > limit {
            break false;
        }
    };
    for id in pending {
        memo.insert(id, verdict);
    }
    verdict
}

/// Case-insensitive search over titles and values.
///
/// Keeps every match, every ancestor of a match, every direct child of a
/// match, and every root node.
pub fn filter_matches<'a>(nodes: &'a [TreeNode], filter_text: &str) -> Vec<&'a TreeNode> {
    let needle = filter_text.to_lowercase();
    let index = TreeIndex::new(nodes);

    let matched: HashSet<&str> = nodes
        .iter()
        .filter(|node| node_matches(node, &needle))
        .map(|node| node.id.as_str())
        .collect();

    let mut included: HashSet<&str> = matched.clone();
    for id in &matched {
        let mut current = index.get(id);
        while let Some(parent) = current.and_then(|node| index.parent(node)) {
            if !included.insert(parent.id.as_str()) {
                break;
            }
            current = Some(parent);
        }
    }

    nodes
        .iter()
        .filter(|node| {
            included.contains(node.id.as_str())
                || node.is_root()
                || node
                    .parent_id
                    .as_deref()
                    .map(|parent| matched.contains(parent))
                    .unwrap_or(false)
        })
        .collect()
}

fn node_matches(node: &TreeNode, needle: &str) -> bool {
    node.title.to_lowercase().contains(needle)
        || node
            .value
            .as_deref()
            .map(|value| value.to_lowercase().contains(needle))
            .unwrap_or(false)
}
