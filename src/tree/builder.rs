//! Tree builder entry point
//!
//! Dispatches on the picker type and post-processes the default expansion.
//! Building is a pure function of (picker type, raw value, context, config).

use crate::config::TreeConfig;
use crate::error::TreeError;
use crate::registry::SourceTree;
use crate::tree::node::{TreeIndex, TreeNode};
use crate::tree::{a11y, elements, generic};
use crate::types::PickerType;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Dataset shown as a synthetic root above the data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetWrapper {
    pub id: String,
    pub name: String,
}

/// Inputs to a build besides the raw value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildContext {
    /// Inject a display-only root for the dataset (generic JSON only)
    pub dataset: Option<DatasetWrapper>,
    /// Currently selected node; its ancestors start out expanded
    pub selected_id: Option<String>,
    /// Isolation mode: restrict the element graph to this element's subtree
    pub isolated_root: Option<String>,
}

impl BuildContext {
    pub fn with_dataset(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.dataset = Some(DatasetWrapper {
            id: id.into(),
            name: name.into(),
        });
        self
    }

    pub fn with_selected(mut self, selected_id: impl Into<String>) -> Self {
        self.selected_id = Some(selected_id.into());
        self
    }

    pub fn with_isolated_root(mut self, root_id: impl Into<String>) -> Self {
        self.isolated_root = Some(root_id.into());
        self
    }
}

/// Result of one build: the node list and its default expansion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuiltTree {
    pub nodes: Vec<TreeNode>,
    pub default_expanded: Vec<String>,
}

impl BuiltTree {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&TreeNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn index(&self) -> TreeIndex<'_> {
        TreeIndex::new(&self.nodes)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.id.as_str())
    }
}

/// Builds trees for one picker type
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    picker_type: PickerType,
    config: TreeConfig,
    context: BuildContext,
}

impl TreeBuilder {
    pub fn new(picker_type: PickerType) -> Self {
        Self {
            picker_type,
            config: TreeConfig::default(),
            context: BuildContext::default(),
        }
    }

    pub fn with_config(mut self, config: TreeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_context(mut self, context: BuildContext) -> Self {
        self.context = context;
        self
    }

    pub fn picker_type(&self) -> PickerType {
        self.picker_type
    }

    /// Materialize `raw` into a tree
    pub fn build(&self, raw: &Value) -> Result<BuiltTree, TreeError> {
        let (nodes, expanded) = match self.picker_type {
            PickerType::Default => generic::build(raw, &self.context),
            PickerType::ProjectElements => elements::build(raw, &self.context, &self.config)?,
            PickerType::A11yProps => a11y::build(raw, &self.config)?,
        };
        let default_expanded = finish_expansion(&nodes, expanded, &self.context);
        Ok(BuiltTree {
            nodes,
            default_expanded,
        })
    }

    /// Materialize a registry snapshot, taking the dataset wrapper and
    /// isolation root from the snapshot itself.
    pub fn build_source(&self, source: &SourceTree) -> Result<BuiltTree, TreeError> {
        let raw: Value =
            serde_json::from_str(&source.value).map_err(|e| TreeError::MalformedSnapshot {
                dataset_id: source.dataset.id.clone(),
                message: e.to_string(),
            })?;
        let mut context = self.context.clone();
        if self.picker_type == PickerType::Default && context.dataset.is_none() {
            context.dataset = Some(DatasetWrapper {
                id: source.dataset.id.clone(),
                name: source.dataset.name.clone(),
            });
        }
        if let Some(symbol_id) = &source.symbol_id {
            context.isolated_root = Some(symbol_id.clone());
        }
        self.clone().with_context(context).build(&raw)
    }
}

/// Add the selection's ancestor chain and drop duplicates, keeping order
fn finish_expansion(
    nodes: &[TreeNode],
    mut expanded: Vec<String>,
    context: &BuildContext,
) -> Vec<String> {
    if let Some(selected) = &context.selected_id {
        let index = TreeIndex::new(nodes);
        let mut chain: Vec<String> = index
            .ancestor_ids(selected)
            .into_iter()
            .map(str::to_string)
            .collect();
        chain.reverse();
        expanded.extend(chain);
    }
    let mut seen = HashSet::new();
    expanded.retain(|id| seen.insert(id.clone()));
    expanded
}
