//! Per-property binding state, re-evaluated whenever the backing data changes.

use super::resolver::BindingResolver;
use crate::registry::DataSnapshot;
use crate::types::Binding;
use serde_json::Value;
use tracing::debug;

/// Lifecycle of one bound property
#[derive(Debug, Clone, PartialEq)]
pub enum BindingState {
    Unbound,
    /// Binding resolves; `value` is what it currently points to
    Bound { binding: Binding, value: Value },
    /// Binding is kept but currently points nowhere
    Dangling { binding: Binding },
}

impl BindingState {
    pub fn binding(&self) -> Option<&Binding> {
        match self {
            BindingState::Unbound => None,
            BindingState::Bound { binding, .. } | BindingState::Dangling { binding } => {
                Some(binding)
            }
        }
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            BindingState::Bound { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn is_dangling(&self) -> bool {
        matches!(self, BindingState::Dangling { .. })
    }

    fn evaluate(binding: Binding, resolver: &BindingResolver<'_>) -> BindingState {
        if !resolver.in_active_source(&binding) {
            return BindingState::Dangling { binding };
        }
        match resolver.resolve(&binding) {
            Some(value) => BindingState::Bound { binding, value },
            None => BindingState::Dangling { binding },
        }
    }
}

/// Tracks one binding across data changes.
///
/// Transitions happen only on [`bind`](Self::bind),
/// [`rebind_path`](Self::rebind_path), [`unbind`](Self::unbind), or a new
/// snapshot; a dangling binding stays dangling until one of those.
#[derive(Debug, Clone)]
pub struct BindingTracker {
    state: BindingState,
    seen_version: Option<u64>,
}

impl Default for BindingTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl BindingTracker {
    pub fn new() -> Self {
        Self {
            state: BindingState::Unbound,
            seen_version: None,
        }
    }

    pub fn state(&self) -> &BindingState {
        &self.state
    }

    pub fn bind(&mut self, binding: Binding, resolver: &BindingResolver<'_>) -> &BindingState {
        let next = BindingState::evaluate(binding, resolver);
        self.transition(next);
        &self.state
    }

    /// Point the current binding at another path in the same dataset.
    /// Returns false when nothing is bound.
    pub fn rebind_path(
        &mut self,
        lookup_path: impl Into<String>,
        resolver: &BindingResolver<'_>,
    ) -> bool {
        let Some(current) = self.state.binding() else {
            return false;
        };
        let binding = Binding::new(current.dataset_id.clone(), lookup_path);
        self.bind(binding, resolver);
        true
    }

    pub fn unbind(&mut self) {
        self.transition(BindingState::Unbound);
    }

    /// Re-resolve against a newly published snapshot. Returns true when the
    /// state changed.
    pub fn on_snapshot(&mut self, snapshot: &DataSnapshot, resolver: &BindingResolver<'_>) -> bool {
        if self.seen_version == Some(snapshot.version) {
            return false;
        }
        self.seen_version = Some(snapshot.version);
        let Some(binding) = self.state.binding().cloned() else {
            return false;
        };
        self.transition(BindingState::evaluate(binding, resolver))
    }

    fn transition(&mut self, next: BindingState) -> bool {
        if next == self.state {
            return false;
        }
        match (&self.state, &next) {
            (BindingState::Bound { .. }, BindingState::Dangling { binding }) => {
                debug!(dataset_id = %binding.dataset_id, lookup_path = %binding.lookup_path, "Binding is now dangling");
            }
            (BindingState::Dangling { .. }, BindingState::Bound { binding, .. }) => {
                debug!(dataset_id = %binding.dataset_id, lookup_path = %binding.lookup_path, "Binding resolves again");
            }
            _ => {}
        }
        self.state = next;
        true
    }
}
