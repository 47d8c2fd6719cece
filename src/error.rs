//! Error types

use thiserror::Error;

/// Errors raised while materializing a data source into a tree
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("Malformed element graph: {0}")]
    MalformedElementGraph(String),

    #[error("Malformed tree snapshot for {dataset_id}: {message}")]
    MalformedSnapshot { dataset_id: String, message: String },
}

/// Errors raised by the data source registry
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Dataset {dataset_id} is not valid JSON: {message}")]
    MalformedJson { dataset_id: String, message: String },

    #[error("Unknown data source: {0}")]
    UnknownSource(String),
}

/// Top-level error for configuration, logging, and tooling
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
