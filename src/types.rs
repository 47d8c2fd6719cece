//! Core types shared by the tree builder, registry, and binding resolver.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Delimiter joining the segments of a node id / lookup path
pub const PATH_DELIMITER: char = '.';

/// Token separating an element id from its input path in element-graph paths
pub const INPUTS_SEGMENT: &str = "inputs";

/// Synthetic dataset id standing for the live document element graph
pub const PROJECT_ELEMENTS_ID: &str = "__project_elements__";

/// Display name of the live element graph dataset
pub const PROJECT_ELEMENTS_NAME: &str = "Project elements";

/// Strategy used to materialize a dataset into a tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PickerType {
    /// Free-form JSON document
    #[default]
    Default,
    /// Live element/property graph of the edited document
    ProjectElements,
    /// Accessibility view of the element graph
    A11yProps,
}

impl PickerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PickerType::Default => "default",
            PickerType::ProjectElements => "project-elements",
            PickerType::A11yProps => "a11y-props",
        }
    }
}

impl std::str::FromStr for PickerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(PickerType::Default),
            "project-elements" | "elements" => Ok(PickerType::ProjectElements),
            "a11y-props" | "a11y" => Ok(PickerType::A11yProps),
            other => Err(format!(
                "Unknown picker type: {} (must be 'default', 'project-elements' or 'a11y')",
                other
            )),
        }
    }
}

/// Metadata of a named, bindable data source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSource {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub picker_type: PickerType,
    /// Set when the dataset is backed by an uploaded file in host storage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<String>,
}

impl DataSource {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            picker_type: PickerType::Default,
            storage_path: None,
        }
    }

    pub fn with_picker(mut self, picker_type: PickerType) -> Self {
        self.picker_type = picker_type;
        self
    }

    pub fn with_storage_path(mut self, storage_path: impl Into<String>) -> Self {
        self.storage_path = Some(storage_path.into());
        self
    }

    pub fn is_storage_backed(&self) -> bool {
        self.storage_path.is_some()
    }
}

/// A stored `(dataset id, lookup path)` reference on a UI property
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    pub dataset_id: String,
    pub lookup_path: String,
}

impl Binding {
    pub fn new(dataset_id: impl Into<String>, lookup_path: impl Into<String>) -> Self {
        Self {
            dataset_id: dataset_id.into(),
            lookup_path: lookup_path.into(),
        }
    }

    /// Binding to the dataset as a whole
    pub fn whole_source(dataset_id: impl Into<String>) -> Self {
        let dataset_id = dataset_id.into();
        Self {
            lookup_path: dataset_id.clone(),
            dataset_id,
        }
    }

    pub fn is_whole_source(&self) -> bool {
        self.lookup_path == self.dataset_id
    }

    /// Recognize a JSON value that is itself a stored binding.
    ///
    /// Element inputs holding such a value are already data-bound and are not
    /// offered for binding again.
    pub fn from_reference(value: &Value) -> Option<Binding> {
        let object = value.as_object()?;
        let dataset_id = object.get("datasetId")?.as_str()?;
        let lookup_path = object.get("lookupPath")?.as_str()?;
        Some(Binding::new(dataset_id, lookup_path))
    }
}
