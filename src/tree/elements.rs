//! Project-elements strategy
//!
//! Walks the element graph from its boards (or the isolated root) and emits a
//! container node per element followed by synthetic nodes for each bindable
//! input. Input node ids follow `<elementId>.inputs.<key>...`, the same path
//! shape the binding resolver reads back.

use crate::config::TreeConfig;
use crate::elements::{Element, ElementGraph};
use crate::error::TreeError;
use crate::tree::builder::BuildContext;
use crate::tree::node::{child_id, child_position, TreeNode};
use crate::types::{Binding, INPUTS_SEGMENT};
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, warn};

pub(crate) const INPUT_TYPE: &str = "input";
pub(crate) const INPUT_GROUP_TYPE: &str = "inputGroup";

pub(crate) fn build(
    raw: &Value,
    context: &BuildContext,
    config: &TreeConfig,
) -> Result<(Vec<TreeNode>, Vec<String>), TreeError> {
    let graph =
        ElementGraph::from_value(raw).map_err(|e| TreeError::MalformedElementGraph(e.to_string()))?;

    let roots: Vec<&str> = match context.isolated_root.as_deref() {
        Some(root) if graph.contains(root) => vec![root],
        Some(root) => {
            warn!(root_id = root, "Isolated root is not part of the element graph");
            Vec::new()
        }
        None => graph.board_ids(),
    };

    let mut walk = ElementWalk {
        graph: &graph,
        config,
        nodes: Vec::new(),
        expanded: Vec::new(),
        visited: HashSet::new(),
    };
    for (index, root) in roots.into_iter().enumerate() {
        walk.element(root, None, root, 0, vec![index]);
    }
    Ok((walk.nodes, walk.expanded))
}

/// True when an input may be offered for binding
pub(crate) fn is_bindable_input(key: &str, value: &Value, config: &TreeConfig) -> bool {
    if !config.reserved_input_prefix.is_empty() && key.starts_with(&config.reserved_input_prefix) {
        return false;
    }
    if config.excluded_inputs.iter().any(|excluded| excluded == key) {
        return false;
    }
    Binding::from_reference(value).is_none()
}

struct ElementWalk<'a> {
    graph: &'a ElementGraph,
    config: &'a TreeConfig,
    nodes: Vec<TreeNode>,
    expanded: Vec<String>,
    visited: HashSet<&'a str>,
}

impl<'a> ElementWalk<'a> {
    fn element(
        &mut self,
        id: &'a str,
        parent_id: Option<&str>,
        root_id: &str,
        level: usize,
        position: Vec<usize>,
    ) {
        if !self.visited.insert(id) {
            debug!(element_id = id, "Element reached twice, skipping");
            return;
        }
        if level > self.config.max_depth {
            warn!(element_id = id, level, "Element graph exceeds maximum depth");
            return;
        }
        let graph = self.graph;
        let config = self.config;
        let Some(element) = graph.get(id) else {
            return;
        };

        let inputs: Vec<(&String, &Value)> = element
            .inputs
            .iter()
            .filter(|(key, value)| is_bindable_input(key, value, config))
            .collect();
        let children: Vec<&'a str> = self.existing_children(element);

        let mut node = TreeNode::new(id, element.display_name(), level);
        node.node_type = Some(element.kind.as_str().to_string());
        node.position = position.clone();
        node.parent_id = parent_id.map(str::to_string);
        node.root_id = Some(root_id.to_string());
        node.selectable = false;
        node.has_children = !inputs.is_empty() || !children.is_empty();
        node.icon = Some(element.kind.icon().to_string());
        self.nodes.push(node);
        self.expanded.push(id.to_string());

        let inputs_prefix = child_id(Some(id), INPUTS_SEGMENT);
        for (index, (key, value)) in inputs.iter().enumerate() {
            let input_id = child_id(Some(inputs_prefix.as_str()), key);
            self.input(
                input_id,
                key,
                value,
                id,
                root_id,
                level + 1,
                child_position(&position, index),
            );
        }

        let mut sibling = inputs.len();
        for child in children {
            if self.visited.contains(child) {
                debug!(element_id = id, child_id = child, "Child already emitted, skipping");
                continue;
            }
            self.element(child, Some(id), root_id, level + 1, child_position(&position, sibling));
            sibling += 1;
        }
    }

    /// Child ids present in the graph and not emitted yet; deleted ids are dropped
    fn existing_children(&self, element: &'a Element) -> Vec<&'a str> {
        element
            .child_ids
            .iter()
            .filter(|child| !self.visited.contains(child.as_str()))
            .filter(|child| {
                let exists = self.graph.contains(child);
                if !exists {
                    debug!(element_id = %element.id, child_id = %child, "Skipping absent child");
                }
                exists
            })
            .map(String::as_str)
            .collect()
    }

    #[allow(clippy::too_many_arguments)]
    fn input(
        &mut self,
        id: String,
        key: &str,
        value: &Value,
        parent_id: &str,
        root_id: &str,
        level: usize,
        position: Vec<usize>,
    ) {
        let entries = input_entries(value);
        let mut node = TreeNode::new(id.clone(), key, level);
        node.parent_id = Some(parent_id.to_string());
        node.root_id = Some(root_id.to_string());
        node.position = position.clone();
        node.selectable = true;

        match entries {
            Some(entries) => {
                node.node_type = Some(INPUT_GROUP_TYPE.to_string());
                node.has_children = !entries.is_empty();
                node.icon = Some("data_object".to_string());
                self.nodes.push(node);
                for (index, (child_key, child_value)) in entries.into_iter().enumerate() {
                    let nested_id = child_id(Some(id.as_str()), &child_key);
                    self.input(
                        nested_id,
                        &child_key,
                        child_value,
                        &id,
                        root_id,
                        level + 1,
                        child_position(&position, index),
                    );
                }
            }
            None => {
                node.node_type = Some(INPUT_TYPE.to_string());
                node.icon = Some("label".to_string());
                node.value = Some(serde_json::to_string(value).unwrap_or_default());
                self.nodes.push(node);
                self.expanded.push(id);
            }
        }
    }
}

/// Nested entries of an object/array input, minus already-bound values.
/// `None` for scalars.
fn input_entries(value: &Value) -> Option<Vec<(String, &Value)>> {
    let entries: Vec<(String, &Value)> = match value {
        Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        _ => return None,
    };
    Some(
        entries
            .into_iter()
            .filter(|(_, v)| Binding::from_reference(v).is_none())
            .collect(),
    )
}
