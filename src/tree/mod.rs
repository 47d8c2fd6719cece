//! Tree Builder
//!
//! Materializes one raw data source into a flat list of addressable nodes,
//! plus the ids that start out expanded. Three strategies exist, selected by
//! the dataset's picker type: generic JSON, the project element graph, and the
//! accessibility view of that graph.

mod a11y;
pub mod builder;
mod elements;
mod generic;
pub mod node;

pub use builder::{BuildContext, BuiltTree, DatasetWrapper, TreeBuilder};
pub use node::{TreeIndex, TreeNode};
