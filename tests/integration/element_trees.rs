use bindery::binding::BindingResolver;
use bindery::elements::{A11yMetadata, Element, ElementGraph, ElementKind, SharedElementGraph};
use bindery::registry::DataSourceRegistry;
use bindery::tree::TreeBuilder;
use bindery::types::{Binding, PickerType, PROJECT_ELEMENTS_ID};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

fn document() -> SharedElementGraph {
    let graph: ElementGraph = [
        Element::new("page", ElementKind::Board)
            .with_name("Page")
            .with_children(["card", "stale-id"]),
        Element::new("card", ElementKind::Symbol)
            .with_name("Card")
            .with_children(["title", "cover"]),
        Element::new("title", ElementKind::Text)
            .with_input("text", json!("Welcome"))
            .with_input("fontSize", json!(18))
            .with_a11y(A11yMetadata {
                attributes: BTreeMap::from([("aria-label".to_string(), "Heading".to_string())]),
                notes: None,
            }),
        Element::new("cover", ElementKind::Image)
            .with_input("src", json!({"datasetId": "photos", "lookupPath": "0.url"}))
            .with_input("alt", json!("Cover")),
    ]
    .into_iter()
    .collect();
    SharedElementGraph::new(graph)
}

#[test]
fn element_tree_inputs_resolve_through_the_registry() {
    let registry = DataSourceRegistry::new().with_elements(Arc::new(document()));
    let source = registry.get_tree(PROJECT_ELEMENTS_ID).unwrap();
    let tree = TreeBuilder::new(PickerType::ProjectElements)
        .build_source(&source)
        .unwrap();

    assert!(tree.get("stale-id").is_none());
    // Already-bound inputs are not offered again.
    assert!(tree.get("cover.inputs.src").is_none());

    let resolver = BindingResolver::new(&registry);
    let inputs: Vec<_> = tree.nodes.iter().filter(|n| n.selectable).collect();
    assert_eq!(inputs.len(), 3);
    for node in inputs {
        let binding = Binding::new(PROJECT_ELEMENTS_ID, node.id.clone());
        let resolved = resolver.resolve(&binding).unwrap();
        assert_eq!(node.value.as_deref(), Some(resolved.to_string().as_str()));
    }
}

#[test]
fn isolation_limits_the_element_tree() {
    let mut registry = DataSourceRegistry::new().with_elements(Arc::new(document()));
    registry.set_isolation(Some("card".to_string()));
    let source = registry.get_tree(PROJECT_ELEMENTS_ID).unwrap();
    assert_eq!(source.symbol_id.as_deref(), Some("card"));

    let tree = TreeBuilder::new(PickerType::ProjectElements)
        .build_source(&source)
        .unwrap();
    assert_eq!(tree.nodes[0].id, "card");
    assert!(tree.get("page").is_none());
    assert!(tree.get("title.inputs.text").is_some());
}

#[test]
fn a11y_tree_flags_metadata() {
    let registry = DataSourceRegistry::new().with_elements(Arc::new(document()));
    let source = registry.get_tree(PROJECT_ELEMENTS_ID).unwrap();
    let tree = TreeBuilder::new(PickerType::A11yProps)
        .build_source(&source)
        .unwrap();

    let ids: Vec<&str> = tree.ids().collect();
    assert_eq!(ids, vec!["page", "card", "title", "cover"]);
    assert_eq!(tree.default_expanded.len(), tree.len());
    assert_eq!(tree.get("title").unwrap().has_extra_info, Some(true));
    assert_eq!(tree.get("cover").unwrap().has_extra_info, Some(false));
    assert_eq!(tree.get("cover").unwrap().icon.as_deref(), Some("image"));
}

#[test]
fn host_mutations_show_up_after_refresh() {
    let shared = document();
    let mut registry = DataSourceRegistry::new().with_elements(Arc::new(shared.clone()));
    let mut rx = registry.subscribe();
    let binding = Binding::new(PROJECT_ELEMENTS_ID, "title.inputs.text");

    shared.remove("title");
    registry.refresh_elements();
    assert!(rx.has_changed().unwrap());
    assert_eq!(BindingResolver::new(&registry).resolve(&binding), None);
}
