//! Element Graph
//!
//! Model of the live document being edited: an id -> element map where each
//! element lists its children by id and carries a record of bindable inputs.
//! The host application owns the graph; the registry reads it through the
//! [`ElementSource`] port.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;

/// Visual type of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementKind {
    Board,
    Symbol,
    Group,
    Text,
    Image,
    Icon,
    Shape,
    Input,
    #[default]
    #[serde(other)]
    Other,
}

impl ElementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Board => "board",
            ElementKind::Symbol => "symbol",
            ElementKind::Group => "group",
            ElementKind::Text => "text",
            ElementKind::Image => "image",
            ElementKind::Icon => "icon",
            ElementKind::Shape => "shape",
            ElementKind::Input => "input",
            ElementKind::Other => "other",
        }
    }

    /// Icon shown next to elements of this kind
    pub fn icon(&self) -> &'static str {
        match self {
            ElementKind::Board => "dashboard",
            ElementKind::Symbol => "widgets",
            ElementKind::Group => "folder",
            ElementKind::Text => "text_fields",
            ElementKind::Image => "image",
            ElementKind::Icon => "emoji_symbols",
            ElementKind::Shape => "crop_square",
            ElementKind::Input => "input",
            ElementKind::Other => "layers",
        }
    }
}

/// Accessibility metadata attached to an element
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct A11yMetadata {
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl A11yMetadata {
    /// True when at least one attribute has a value or notes are present
    pub fn has_content(&self) -> bool {
        self.attributes.values().any(|v| !v.trim().is_empty())
            || self
                .notes
                .as_deref()
                .map(|n| !n.trim().is_empty())
                .unwrap_or(false)
    }
}

/// One element of the document graph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: ElementKind,
    #[serde(default)]
    pub child_ids: Vec<String>,
    #[serde(default)]
    pub inputs: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a11y: Option<A11yMetadata>,
}

impl Element {
    pub fn new(id: impl Into<String>, kind: ElementKind) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            kind,
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_children<I, S>(mut self, child_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.child_ids = child_ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_input(mut self, key: impl Into<String>, value: Value) -> Self {
        self.inputs.insert(key.into(), value);
        self
    }

    pub fn with_a11y(mut self, a11y: A11yMetadata) -> Self {
        self.a11y = Some(a11y);
        self
    }

    /// Name shown in trees, falling back to the id
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    pub fn has_a11y_content(&self) -> bool {
        self.a11y.as_ref().map(|a| a.has_content()).unwrap_or(false)
    }
}

/// id -> element map of a document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementGraph {
    elements: BTreeMap<String, Element>,
}

impl ElementGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an element map from a JSON value
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        let mut graph: ElementGraph = serde_json::from_value(value.clone())?;
        // Map keys are authoritative for ids.
        for (id, element) in graph.elements.iter_mut() {
            element.id.clone_from(id);
        }
        Ok(graph)
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    pub fn insert(&mut self, element: Element) {
        self.elements.insert(element.id.clone(), element);
    }

    pub fn remove(&mut self, id: &str) -> Option<Element> {
        self.elements.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Element)> {
        self.elements.iter()
    }

    /// Ids of all board elements, ordered by id
    pub fn board_ids(&self) -> Vec<&str> {
        self.elements
            .values()
            .filter(|e| e.kind == ElementKind::Board)
            .map(|e| e.id.as_str())
            .collect()
    }

    /// Ids of elements that no other element lists as a child, ordered by id
    pub fn top_level_ids(&self) -> Vec<&str> {
        let referenced: HashSet<&str> = self
            .elements
            .iter()
            .flat_map(|(id, e)| {
                e.child_ids
                    .iter()
                    .map(String::as_str)
                    .filter(move |child| *child != id.as_str())
            })
            .collect();
        self.elements
            .keys()
            .map(String::as_str)
            .filter(|id| !referenced.contains(id))
            .collect()
    }

    /// The elements reachable from `root_id` through `child_ids`.
    ///
    /// Absent children are skipped and every element is visited at most once;
    /// the walk stops descending below `max_depth`.
    pub fn subtree(&self, root_id: &str, max_depth: usize) -> ElementGraph {
        let mut out = ElementGraph::new();
        if !self.contains(root_id) {
            return out;
        }
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        let mut stack: Vec<(&str, usize)> = vec![(root_id, 0)];
        while let Some((id, depth)) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            let Some(element) = self.get(id) else {
                continue;
            };
            out.insert(element.clone());
            if depth >= max_depth {
                continue;
            }
            for child in element.child_ids.iter().rev() {
                if self.contains(child) {
                    stack.push((child.as_str(), depth + 1));
                }
            }
        }
        out
    }
}

impl FromIterator<Element> for ElementGraph {
    fn from_iter<T: IntoIterator<Item = Element>>(iter: T) -> Self {
        let mut graph = ElementGraph::new();
        for element in iter {
            graph.insert(element);
        }
        graph
    }
}

/// Host port supplying the live element graph
pub trait ElementSource: Send + Sync {
    /// Copy of the whole current graph
    fn snapshot(&self) -> ElementGraph;

    /// Copy of a single element
    fn element(&self, id: &str) -> Option<Element>;
}

/// Element graph shared between the host (writer) and the registry (reader)
#[derive(Clone, Default)]
pub struct SharedElementGraph {
    inner: Arc<RwLock<ElementGraph>>,
}

impl SharedElementGraph {
    pub fn new(graph: ElementGraph) -> Self {
        Self {
            inner: Arc::new(RwLock::new(graph)),
        }
    }

    pub fn replace(&self, graph: ElementGraph) {
        *self.inner.write() = graph;
    }

    pub fn upsert(&self, element: Element) {
        self.inner.write().insert(element);
    }

    pub fn remove(&self, id: &str) -> Option<Element> {
        self.inner.write().remove(id)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

impl ElementSource for SharedElementGraph {
    fn snapshot(&self) -> ElementGraph {
        self.inner.read().clone()
    }

    fn element(&self, id: &str) -> Option<Element> {
        self.inner.read().get(id).cloned()
    }
}
