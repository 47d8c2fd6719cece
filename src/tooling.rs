//! Tooling & Integration Layer
//!
//! Command-line access to the registry, tree builder, and binding resolver.

pub mod cli;

pub use cli::{Cli, CliContext, Commands};
