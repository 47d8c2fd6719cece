//! Data Source Registry
//!
//! Owns the named data sources: metadata, raw JSON values, and which storage
//! paths have been loaded. The live document element graph is exposed under
//! the synthetic [`PROJECT_ELEMENTS_ID`] and read from the host on demand
//! rather than stored.
//!
//! Every mutation publishes the whole `id -> value` map on a watch channel.

use crate::config::TreeConfig;
use crate::elements::{ElementGraph, ElementSource};
use crate::error::RegistryError;
use crate::types::{DataSource, PickerType, PROJECT_ELEMENTS_ID, PROJECT_ELEMENTS_NAME};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

/// Serialized view of one dataset, ready to feed the tree builder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceTree {
    #[serde(flatten)]
    pub dataset: DataSource,
    /// JSON text of the raw value
    pub value: String,
    /// Symbol the element graph is isolated to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol_id: Option<String>,
}

/// Whole-registry snapshot published after every mutation
#[derive(Debug, Clone, Default)]
pub struct DataSnapshot {
    /// Bumped on every publish
    pub version: u64,
    pub values: Arc<BTreeMap<String, Value>>,
}

impl DataSnapshot {
    pub fn get(&self, id: &str) -> Option<&Value> {
        self.values.get(id)
    }
}

/// Registry of bindable data sources
pub struct DataSourceRegistry {
    datasets: BTreeMap<String, DataSource>,
    raw_values: BTreeMap<String, Value>,
    loaded_storage_paths: HashSet<String>,
    elements: Option<Arc<dyn ElementSource>>,
    isolated_symbol: Option<String>,
    tree_config: TreeConfig,
    version: u64,
    changes: watch::Sender<DataSnapshot>,
}

impl Default for DataSourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DataSourceRegistry {
    /// Create an empty registry without a live element graph
    pub fn new() -> Self {
        let (changes, _) = watch::channel(DataSnapshot::default());
        Self {
            datasets: BTreeMap::new(),
            raw_values: BTreeMap::new(),
            loaded_storage_paths: HashSet::new(),
            elements: None,
            isolated_symbol: None,
            tree_config: TreeConfig::default(),
            version: 0,
            changes,
        }
    }

    /// Attach the host's live element graph
    pub fn with_elements(mut self, elements: Arc<dyn ElementSource>) -> Self {
        self.elements = Some(elements);
        self
    }

    pub fn with_tree_config(mut self, tree_config: TreeConfig) -> Self {
        self.tree_config = tree_config;
        self
    }

    /// Enter (`Some(symbol id)`) or leave (`None`) isolation mode
    pub fn set_isolation(&mut self, symbol_id: Option<String>) {
        self.isolated_symbol = symbol_id;
    }

    pub fn isolation(&self) -> Option<&str> {
        self.isolated_symbol.as_deref()
    }

    /// Register a dataset and its value, replacing any previous one with the same id
    pub fn add_source(&mut self, dataset: DataSource, value: Value) {
        if dataset.id == PROJECT_ELEMENTS_ID {
            warn!(dataset_id = %dataset.id, "Refusing to shadow the live element dataset");
            return;
        }
        // A replaced dataset no longer holds its previous file.
        let previous = self
            .datasets
            .get(&dataset.id)
            .and_then(|old| old.storage_path.clone());
        if let Some(old_path) = previous {
            if dataset.storage_path.as_ref() != Some(&old_path) {
                self.loaded_storage_paths.remove(&old_path);
            }
        }
        if let Some(path) = &dataset.storage_path {
            self.loaded_storage_paths.insert(path.clone());
        }
        info!(dataset_id = %dataset.id, name = %dataset.name, "Adding data source");
        self.raw_values.insert(dataset.id.clone(), value);
        self.datasets.insert(dataset.id.clone(), dataset);
        self.publish();
    }

    /// Register a dataset from serialized JSON.
    ///
    /// Malformed input registers nothing and is reported both as a warning
    /// and as the returned error.
    pub fn ingest_serialized(&mut self, dataset: DataSource, blob: &str) -> Result<(), RegistryError> {
        match serde_json::from_str::<Value>(blob) {
            Ok(value) => {
                self.add_source(dataset, value);
                Ok(())
            }
            Err(e) => {
                warn!(dataset_id = %dataset.id, error = %e, "Ignoring data source with malformed JSON");
                Err(RegistryError::MalformedJson {
                    dataset_id: dataset.id,
                    message: e.to_string(),
                })
            }
        }
    }

    /// Replace a dataset's value wholesale. Returns false for unknown ids.
    pub fn update_source(&mut self, id: &str, value: Value) -> bool {
        if !self.datasets.contains_key(id) {
            return false;
        }
        info!(dataset_id = id, "Updating data source");
        self.raw_values.insert(id.to_string(), value);
        self.publish();
        true
    }

    /// Delete a dataset's metadata and value
    pub fn remove_source(&mut self, id: &str) -> Option<DataSource> {
        let dataset = self.datasets.remove(id)?;
        self.raw_values.remove(id);
        if let Some(path) = &dataset.storage_path {
            self.loaded_storage_paths.remove(path);
        }
        info!(dataset_id = id, "Removed data source");
        self.publish();
        Some(dataset)
    }

    /// Whether a dataset's data is already loaded.
    ///
    /// Storage-backed datasets are matched by storage path, which survives
    /// edits that reassign the id; others are matched by id.
    pub fn has_data(&self, dataset: &DataSource) -> bool {
        match &dataset.storage_path {
            Some(path) => self.loaded_storage_paths.contains(path),
            None => self.contains(&dataset.id),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        if id == PROJECT_ELEMENTS_ID {
            return self.elements.is_some();
        }
        self.datasets.contains_key(id)
    }

    /// All datasets; the live element graph first, then stored ones by id
    pub fn get_source_list(&self) -> Vec<DataSource> {
        let mut list = Vec::with_capacity(self.datasets.len() + 1);
        if self.elements.is_some() {
            list.push(Self::elements_metadata());
        }
        list.extend(self.datasets.values().cloned());
        list
    }

    pub fn get_metadata(&self, id: &str) -> Option<DataSource> {
        if id == PROJECT_ELEMENTS_ID {
            return self.elements.as_ref().map(|_| Self::elements_metadata());
        }
        self.datasets.get(id).cloned()
    }

    /// Metadata plus a JSON-text snapshot of the value
    pub fn get_tree(&self, id: &str) -> Option<SourceTree> {
        if id == PROJECT_ELEMENTS_ID {
            let graph = self.visible_element_graph()?;
            return Some(SourceTree {
                dataset: Self::elements_metadata(),
                value: serde_json::to_string(&graph).ok()?,
                symbol_id: self.isolated_symbol.clone(),
            });
        }
        let dataset = self.datasets.get(id)?.clone();
        let value = serde_json::to_string(self.raw_values.get(id)?).ok()?;
        Some(SourceTree {
            dataset,
            value,
            symbol_id: None,
        })
    }

    /// Stored raw value; the element graph is not stored, see [`raw_value`](Self::raw_value)
    pub fn stored_value(&self, id: &str) -> Option<&Value> {
        self.raw_values.get(id)
    }

    /// Raw value of any dataset, including the live element graph
    pub fn raw_value(&self, id: &str) -> Option<Value> {
        if id == PROJECT_ELEMENTS_ID {
            return self.visible_element_graph().map(|g| g.to_value());
        }
        self.raw_values.get(id).cloned()
    }

    pub fn element_source(&self) -> Option<&Arc<dyn ElementSource>> {
        self.elements.as_ref()
    }

    /// Whole document, or only the isolated symbol's subtree in isolation mode
    fn visible_element_graph(&self) -> Option<ElementGraph> {
        let elements = self.elements.as_ref()?;
        let graph = elements.snapshot();
        Some(match &self.isolated_symbol {
            Some(symbol) => graph.subtree(symbol, self.tree_config.max_depth),
            None => graph,
        })
    }

    fn elements_metadata() -> DataSource {
        DataSource::new(PROJECT_ELEMENTS_ID, PROJECT_ELEMENTS_NAME)
            .with_picker(PickerType::ProjectElements)
    }

    /// Receive a snapshot after every mutation
    pub fn subscribe(&self) -> watch::Receiver<DataSnapshot> {
        self.changes.subscribe()
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> DataSnapshot {
        self.changes.borrow().clone()
    }

    /// Re-publish after the host mutated the live element graph
    pub fn refresh_elements(&mut self) {
        self.publish();
    }

    fn publish(&mut self) {
        self.version += 1;
        self.changes.send_replace(DataSnapshot {
            version: self.version,
            values: Arc::new(self.raw_values.clone()),
        });
    }
}
