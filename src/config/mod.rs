//! Configuration
//!
//! Settings for the tree builder's input filtering, the search debounce window,
//! and logging. Loaded through [`ConfigLoader`] from defaults, an optional
//! config file, and `BINDERY__*` environment variables.

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BinderyConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub tree: TreeConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// Tree builder settings for the element graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Inputs whose key starts with this prefix are never offered for binding
    #[serde(default = "default_reserved_input_prefix")]
    pub reserved_input_prefix: String,

    /// Input keys never offered for binding
    #[serde(default = "default_excluded_inputs")]
    pub excluded_inputs: Vec<String>,

    /// Deepest element level walked
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_reserved_input_prefix() -> String {
    "_".to_string()
}

fn default_excluded_inputs() -> Vec<String> {
    ["childIds", "parentId", "dataBindings", "actions", "states"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_max_depth() -> usize {
    256
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            reserved_input_prefix: default_reserved_input_prefix(),
            excluded_inputs: default_excluded_inputs(),
            max_depth: default_max_depth(),
        }
    }
}

/// Free-text search settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet period before a typed filter is applied
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_debounce_ms() -> u64 {
    100
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}
