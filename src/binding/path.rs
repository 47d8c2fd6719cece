//! Lookup path classification and value traversal.

use crate::types::{Binding, INPUTS_SEGMENT, PATH_DELIMITER, PROJECT_ELEMENTS_ID};
use serde_json::Value;

/// What a binding's lookup path addresses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathKind {
    /// The dataset itself (`lookup_path == dataset_id`)
    WholeSource,
    /// `<element id>.inputs.<key>[.<segment>...]` in the live element graph
    ElementInput {
        element_id: String,
        segments: Vec<String>,
    },
    /// Plain key path into a stored JSON value
    KeyPath(Vec<String>),
}

impl PathKind {
    /// Classify `binding`.
    ///
    /// Returns `None` for element-graph paths that do not name an input,
    /// since those can never resolve.
    pub fn classify(binding: &Binding) -> Option<PathKind> {
        if binding.is_whole_source() {
            return Some(PathKind::WholeSource);
        }
        let segments = split_path(&binding.lookup_path);
        if binding.dataset_id != PROJECT_ELEMENTS_ID {
            return Some(PathKind::KeyPath(segments));
        }

        let mut segments = segments.into_iter();
        let element_id = segments.next()?;
        if segments.next()? != INPUTS_SEGMENT {
            return None;
        }
        let segments: Vec<String> = segments.collect();
        if segments.is_empty() {
            return None;
        }
        Some(PathKind::ElementInput {
            element_id,
            segments,
        })
    }
}

pub fn split_path(path: &str) -> Vec<String> {
    path.split(PATH_DELIMITER).map(str::to_string).collect()
}

/// Walk `segments` down from `root`. Numeric segments index arrays.
pub fn lookup<'a, S: AsRef<str>>(root: &'a Value, segments: &[S]) -> Option<&'a Value> {
    segments
        .iter()
        .try_fold(root, |current, segment| match current {
            Value::Object(map) => map.get(segment.as_ref()),
            Value::Array(items) => segment
                .as_ref()
                .parse::<usize>()
                .ok()
                .and_then(|index| items.get(index)),
            _ => None,
        })
}

/// Value handed to consumers: containers as JSON text, scalars unchanged
pub fn present(value: &Value) -> Value {
    match value {
        Value::Object(_) | Value::Array(_) => Value::String(value.to_string()),
        scalar => scalar.clone(),
    }
}
