//! Accessibility strategy: every element under every top-level element,
//! flagged with whether it carries accessibility metadata.

use crate::config::TreeConfig;
use crate::elements::ElementGraph;
use crate::error::TreeError;
use crate::tree::node::{child_position, TreeNode};
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, warn};

pub(crate) fn build(
    raw: &Value,
    config: &TreeConfig,
) -> Result<(Vec<TreeNode>, Vec<String>), TreeError> {
    let graph =
        ElementGraph::from_value(raw).map_err(|e| TreeError::MalformedElementGraph(e.to_string()))?;

    let mut nodes = Vec::new();
    let mut visited: HashSet<&str> = HashSet::new();
    // (id, parent id, root id, level, position)
    let mut stack: Vec<(&str, Option<&str>, &str, usize, Vec<usize>)> = graph
        .top_level_ids()
        .into_iter()
        .enumerate()
        .rev()
        .map(|(index, id)| (id, None, id, 0, vec![index]))
        .collect();

    while let Some((id, parent_id, root_id, level, position)) = stack.pop() {
        if !visited.insert(id) {
            debug!(element_id = id, "Element reached twice, skipping");
            continue;
        }
        if level > config.max_depth {
            warn!(element_id = id, level, "Element graph exceeds maximum depth");
            continue;
        }
        let Some(element) = graph.get(id) else {
            continue;
        };
        let children: Vec<&str> = element
            .child_ids
            .iter()
            .map(String::as_str)
            .filter(|child| graph.contains(child) && !visited.contains(child))
            .collect();

        let mut node = TreeNode::new(id, element.display_name(), level);
        node.node_type = Some(element.kind.as_str().to_string());
        node.position = position.clone();
        node.parent_id = parent_id.map(str::to_string);
        node.root_id = Some(root_id.to_string());
        node.has_children = !children.is_empty();
        node.icon = Some(element.kind.icon().to_string());
        node.has_extra_info = Some(element.has_a11y_content());
        nodes.push(node);

        for (index, child) in children.into_iter().enumerate().rev() {
            stack.push((
                child,
                Some(id),
                root_id,
                level + 1,
                child_position(&position, index),
            ));
        }
    }

    let expanded = nodes.iter().map(|n| n.id.clone()).collect();
    Ok((nodes, expanded))
}
