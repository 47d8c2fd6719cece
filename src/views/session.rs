//! Display state of one tree: expansion, applied search, pending keystrokes.

use super::{visible, Debouncer, ExpandedSet};
use crate::config::SearchConfig;
use crate::tree::{BuiltTree, TreeNode};
use std::time::Instant;
use tracing::debug;

/// A materialized tree plus the state needed to render it
pub struct TreeSession {
    tree: BuiltTree,
    expanded: ExpandedSet,
    filter: String,
    search: Debouncer<String>,
}

impl TreeSession {
    /// Start with the tree's default expansion and no filter
    pub fn new(tree: BuiltTree, search: &SearchConfig) -> Self {
        let expanded = tree.default_expanded.iter().cloned().collect();
        Self {
            tree,
            expanded,
            filter: String::new(),
            search: Debouncer::new(search.debounce()),
        }
    }

    pub fn tree(&self) -> &BuiltTree {
        &self.tree
    }

    pub fn expanded(&self) -> &ExpandedSet {
        &self.expanded
    }

    pub fn expanded_mut(&mut self) -> &mut ExpandedSet {
        &mut self.expanded
    }

    /// Filter currently applied to the view
    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn toggle(&mut self, id: &str) -> bool {
        self.expanded.toggle(id)
    }

    pub fn expand_all(&mut self) {
        let ids: Vec<String> = self
            .tree
            .nodes
            .iter()
            .filter(|n| n.has_children)
            .map(|n| n.id.clone())
            .collect();
        self.expanded.extend(ids);
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    /// Record a keystroke; applied by [`poll`](Self::poll) after the quiet period
    pub fn type_filter(&mut self, text: impl Into<String>, now: Instant) {
        self.search.push(text.into(), now);
    }

    /// Apply a pending filter whose quiet period elapsed. Returns true when
    /// the applied filter changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.search.poll(now) {
            Some(text) => self.apply_filter(text),
            None => false,
        }
    }

    /// Apply `text` right away, dropping any pending keystrokes
    pub fn set_filter(&mut self, text: impl Into<String>) -> bool {
        self.search.cancel();
        self.apply_filter(text.into())
    }

    fn apply_filter(&mut self, text: String) -> bool {
        if text == self.filter {
            return false;
        }
        debug!(filter = %text, "Applying tree filter");
        self.filter = text;
        true
    }

    /// Nodes to render for the current state
    pub fn visible(&self) -> Vec<&TreeNode> {
        visible(&self.tree.nodes, &self.expanded, &self.filter)
    }

    /// Swap in a rebuild of the same dataset; expansion carries over by id
    pub fn rebuild(&mut self, tree: BuiltTree) {
        self.expanded.retain_known(tree.ids());
        self.tree = tree;
    }

    /// Swap in a different dataset's tree with its default expansion
    pub fn reset(&mut self, tree: BuiltTree) {
        self.expanded = tree.default_expanded.iter().cloned().collect();
        self.tree = tree;
        self.filter.clear();
        self.search.cancel();
    }
}
