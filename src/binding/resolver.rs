//! Resolves stored bindings against the registry's current data.

use super::path::{lookup, present, PathKind};
use crate::registry::DataSourceRegistry;
use crate::types::Binding;
use serde_json::Value;

/// Point-in-time view of the registry used to resolve bindings.
///
/// Resolution never caches: each call reads the registry as it is now.
pub struct BindingResolver<'a> {
    registry: &'a DataSourceRegistry,
    active_source: Option<&'a str>,
}

impl<'a> BindingResolver<'a> {
    pub fn new(registry: &'a DataSourceRegistry) -> Self {
        Self {
            registry,
            active_source: None,
        }
    }

    /// Dataset currently selected by the consumer; bindings into any other
    /// dataset are reported invalid
    pub fn with_active_source(mut self, active_source: Option<&'a str>) -> Self {
        self.active_source = active_source;
        self
    }

    /// Current value behind `binding`, or `None` when any part is missing
    pub fn resolve(&self, binding: &Binding) -> Option<Value> {
        match PathKind::classify(binding)? {
            PathKind::WholeSource => self
                .registry
                .get_metadata(&binding.dataset_id)
                .map(|dataset| Value::String(dataset.name)),
            PathKind::KeyPath(segments) => {
                let root = self.registry.stored_value(&binding.dataset_id)?;
                lookup(root, &segments).map(present)
            }
            PathKind::ElementInput {
                element_id,
                segments,
            } => {
                let element = self.registry.element_source()?.element(&element_id)?;
                let (key, rest) = segments.split_first()?;
                let input = element.inputs.get(key.as_str())?;
                lookup(input, rest).map(present)
            }
        }
    }

    /// Whether `binding` resolves and belongs to the active source
    pub fn is_valid(&self, binding: &Binding) -> bool {
        self.in_active_source(binding) && self.resolve(binding).is_some()
    }

    /// True when no active source is set or `binding` points into it
    pub fn in_active_source(&self, binding: &Binding) -> bool {
        self.active_source
            .map(|active| active == binding.dataset_id)
            .unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Element, ElementKind, SharedElementGraph};
    use crate::types::{DataSource, PROJECT_ELEMENTS_ID};
    use proptest::prelude::*;
    use serde_json::json;
    use std::sync::Arc;

    fn registry() -> DataSourceRegistry {
        let mut registry = DataSourceRegistry::new();
        registry.add_source(
            DataSource::new("d1", "Orders"),
            json!({"a": {"b": 1, "tags": ["x", "y"]}, "nil": null}),
        );
        registry
    }

    #[test]
    fn test_whole_source_resolves_to_name() {
        let registry = registry();
        let resolver = BindingResolver::new(&registry);
        assert_eq!(
            resolver.resolve(&Binding::whole_source("d1")),
            Some(json!("Orders"))
        );
    }

    #[test]
    fn test_key_paths() {
        let registry = registry();
        let resolver = BindingResolver::new(&registry);
        assert_eq!(resolver.resolve(&Binding::new("d1", "a.b")), Some(json!(1)));
        assert_eq!(
            resolver.resolve(&Binding::new("d1", "a")),
            Some(json!(r#"{"b":1,"tags":["x","y"]}"#))
        );
        assert_eq!(
            resolver.resolve(&Binding::new("d1", "a.tags.1")),
            Some(json!("y"))
        );
        assert_eq!(resolver.resolve(&Binding::new("d1", "nil")), Some(json!(null)));
        assert_eq!(resolver.resolve(&Binding::new("d1", "a.c")), None);
        assert_eq!(resolver.resolve(&Binding::new("d1", "a.b.c")), None);
        assert_eq!(resolver.resolve(&Binding::new("d2", "a.b")), None);
    }

    #[test]
    fn test_element_inputs() {
        let shared = SharedElementGraph::new(
            [Element::new("el1", ElementKind::Text)
                .with_input("text", json!("Hello"))
                .with_input("style", json!({"color": "red"}))]
            .into_iter()
            .collect(),
        );
        let registry = DataSourceRegistry::new().with_elements(Arc::new(shared.clone()));
        let resolver = BindingResolver::new(&registry);

        let bind = |path: &str| Binding::new(PROJECT_ELEMENTS_ID, path);
        assert_eq!(resolver.resolve(&bind("el1.inputs.text")), Some(json!("Hello")));
        assert_eq!(resolver.resolve(&bind("el1.inputs.style.color")), Some(json!("red")));
        assert_eq!(
            resolver.resolve(&bind("el1.inputs.style")),
            Some(json!(r#"{"color":"red"}"#))
        );
        assert_eq!(resolver.resolve(&bind("el1.text")), None);
        assert_eq!(resolver.resolve(&bind("el2.inputs.text")), None);

        shared.remove("el1");
        assert_eq!(resolver.resolve(&bind("el1.inputs.text")), None);
    }

    #[test]
    fn test_validity_checks_active_source() {
        let registry = registry();
        let binding = Binding::new("d1", "a.b");
        assert!(BindingResolver::new(&registry).is_valid(&binding));
        assert!(BindingResolver::new(&registry)
            .with_active_source(Some("d1"))
            .is_valid(&binding));
        assert!(!BindingResolver::new(&registry)
            .with_active_source(Some("other"))
            .is_valid(&binding));
        assert!(!BindingResolver::new(&registry).is_valid(&Binding::new("d1", "zzz")));
    }

    proptest! {
        #[test]
        fn prop_removed_source_never_resolves(path in "[a-z.]{0,12}") {
            let mut registry = registry();
            registry.remove_source("d1");
            let resolver = BindingResolver::new(&registry);
            prop_assert_eq!(resolver.resolve(&Binding::new("d1", path)), None);
            prop_assert_eq!(resolver.resolve(&Binding::whole_source("d1")), None);
        }

        #[test]
        fn prop_self_binding_is_display_name(name in "[A-Za-z ]{1,16}", id in "[a-z0-9]{1,8}") {
            let mut registry = DataSourceRegistry::new();
            registry.add_source(DataSource::new(id.clone(), name.clone()), json!({}));
            let resolver = BindingResolver::new(&registry);
            prop_assert_eq!(resolver.resolve(&Binding::whole_source(id)), Some(Value::String(name)));
        }
    }
}
