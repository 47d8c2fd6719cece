//! Integration tests for the data-binding tree resolver

mod cli_contracts;
mod element_trees;
mod registry_binding_flow;
