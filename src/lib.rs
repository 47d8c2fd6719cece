//! Bindery: Data-Binding Tree Resolver
//!
//! Materializes heterogeneous data sources (free-form JSON, a live element
//! graph, accessibility metadata) into flat, addressable trees, narrows those
//! trees for display by expansion state or free-text search, and resolves
//! stored `(dataset id, lookup path)` bindings back into values.

pub mod binding;
pub mod config;
pub mod elements;
pub mod error;
pub mod logging;
pub mod registry;
pub mod tooling;
pub mod tree;
pub mod types;
pub mod views;
