//! Binding Resolver
//!
//! Answers what a stored `(dataset id, lookup path)` reference points to right
//! now, using the same path rules the tree builder uses for node ids, without
//! materializing a tree. Missing data at any depth yields `None`.

pub mod path;
mod resolver;
mod tracker;

pub use path::PathKind;
pub use resolver::BindingResolver;
pub use tracker::{BindingState, BindingTracker};
