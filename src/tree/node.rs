//! Tree node types and id-path helpers

use crate::types::PATH_DELIMITER;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One addressable node of a materialized tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    /// Derived from the ancestor path; stable across rebuilds of unchanged data
    pub id: String,
    pub title: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    pub level: usize,
    /// Sibling index at every level from the root down to this node
    pub position: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_id: Option<String>,
    pub selectable: bool,
    pub has_children: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_extra_info: Option<bool>,
}

impl TreeNode {
    pub fn new(id: impl Into<String>, title: impl Into<String>, level: usize) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            node_type: None,
            level,
            position: Vec::new(),
            parent_id: None,
            root_id: None,
            selectable: true,
            has_children: false,
            icon: None,
            value: None,
            has_extra_info: None,
        }
    }

    /// A node is a root when it is its own root
    pub fn is_root(&self) -> bool {
        self.root_id.as_deref() == Some(self.id.as_str())
    }
}

/// Join a parent id and a key into a child id
pub fn child_id(parent: Option<&str>, key: &str) -> String {
    match parent {
        Some(parent) => format!("{}{}{}", parent, PATH_DELIMITER, key),
        None => key.to_string(),
    }
}

/// Position of a child given its parent's position and sibling index
pub fn child_position(parent: &[usize], index: usize) -> Vec<usize> {
    let mut position = Vec::with_capacity(parent.len() + 1);
    position.extend_from_slice(parent);
    position.push(index);
    position
}

/// id -> node lookup over one materialized snapshot
pub struct TreeIndex<'a> {
    by_id: HashMap<&'a str, &'a TreeNode>,
}

impl<'a> TreeIndex<'a> {
    pub fn new(nodes: &'a [TreeNode]) -> Self {
        let by_id = nodes.iter().map(|n| (n.id.as_str(), n)).collect();
        Self { by_id }
    }

    pub fn get(&self, id: &str) -> Option<&'a TreeNode> {
        self.by_id.get(id).copied()
    }

    pub fn parent(&self, node: &TreeNode) -> Option<&'a TreeNode> {
        node.parent_id.as_deref().and_then(|id| self.get(id))
    }

    /// Ancestor ids of `id`, nearest first.
    ///
    /// Stops at the first parent id that is not part of the snapshot.
    pub fn ancestor_ids(&self, id: &str) -> Vec<&'a str> {
        let mut out = Vec::new();
        let mut current = self.get(id);
        while let Some(node) = current {
            let Some(parent) = self.parent(node) else {
                break;
            };
            // Guard against a malformed snapshot linking back onto itself.
            if out.contains(&parent.id.as_str()) {
                break;
            }
            out.push(parent.id.as_str());
            current = Some(parent);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, parent: Option<&str>, level: usize) -> TreeNode {
        let mut n = TreeNode::new(id, id, level);
        n.parent_id = parent.map(str::to_string);
        n
    }

    #[test]
    fn test_child_id() {
        assert_eq!(child_id(None, "a"), "a");
        assert_eq!(child_id(Some("a"), "b"), "a.b");
    }

    #[test]
    fn test_child_position() {
        assert_eq!(child_position(&[0, 2], 1), vec![0, 2, 1]);
        assert_eq!(child_position(&[], 3), vec![3]);
    }

    #[test]
    fn test_ancestor_ids_nearest_first() {
        let nodes = vec![
            node("a", None, 0),
            node("a.b", Some("a"), 1),
            node("a.b.c", Some("a.b"), 2),
        ];
        let index = TreeIndex::new(&nodes);
        assert_eq!(index.ancestor_ids("a.b.c"), vec!["a.b", "a"]);
        assert!(index.ancestor_ids("a").is_empty());
        assert!(index.ancestor_ids("missing").is_empty());
    }

    #[test]
    fn test_is_root() {
        let mut n = node("d1", None, 0);
        assert!(!n.is_root());
        n.root_id = Some("d1".to_string());
        assert!(n.is_root());
    }
}
