use bindery::binding::{BindingResolver, BindingState, BindingTracker};
use bindery::registry::DataSourceRegistry;
use bindery::tree::TreeBuilder;
use bindery::types::{Binding, DataSource, PickerType};
use bindery::views::{visible, ExpandedSet, TreeSession};
use bindery::config::SearchConfig;
use serde_json::json;

#[test]
fn dataset_example_builds_and_filters() {
    let mut registry = DataSourceRegistry::new();
    registry.add_source(DataSource::new("d1", "Data"), json!({"a": {"b": 1}}));

    let tree = TreeBuilder::new(PickerType::Default)
        .build(&registry.raw_value("d1").unwrap())
        .unwrap();
    let ids: Vec<&str> = tree.ids().collect();
    assert_eq!(ids, vec!["a", "a.b"]);
    assert_eq!(tree.nodes[0].level, 0);
    assert!(tree.nodes[0].has_children);
    assert_eq!(tree.nodes[1].level, 1);
    assert_eq!(tree.nodes[1].value.as_deref(), Some("1"));

    let none = ExpandedSet::new();
    let shown: Vec<&str> = visible(&tree.nodes, &none, "b")
        .iter()
        .map(|n| n.id.as_str())
        .collect();
    assert_eq!(shown, vec!["a", "a.b"]);
    assert!(visible(&tree.nodes, &none, "z").is_empty());
}

#[test]
fn update_does_not_touch_materialized_nodes() {
    let mut registry = DataSourceRegistry::new();
    registry.add_source(DataSource::new("d1", "Data"), json!({"x": 1}));
    let before = TreeBuilder::new(PickerType::Default)
        .build_source(&registry.get_tree("d1").unwrap())
        .unwrap();
    let snapshot = before.clone();

    registry.update_source("d1", json!({"x": 2}));
    assert_eq!(registry.get_tree("d1").unwrap().value, r#"{"x":2}"#);
    assert_eq!(before, snapshot);

    let after = TreeBuilder::new(PickerType::Default)
        .build_source(&registry.get_tree("d1").unwrap())
        .unwrap();
    // Dataset wrapper root first, then the data.
    assert_eq!(after.nodes[0].id, "d1");
    assert_eq!(after.get("x").unwrap().value.as_deref(), Some("2"));
    assert_eq!(before.get("x").unwrap().value.as_deref(), Some("1"));
}

#[test]
fn tree_node_ids_resolve_as_bindings() {
    let mut registry = DataSourceRegistry::new();
    let data = json!({"user": {"name": "Ada", "langs": ["en", "fr"]}, "n": null});
    registry.add_source(DataSource::new("d1", "People"), data);

    let tree = TreeBuilder::new(PickerType::Default)
        .build_source(&registry.get_tree("d1").unwrap())
        .unwrap();
    let resolver = BindingResolver::new(&registry);
    for node in &tree.nodes {
        let binding = Binding::new("d1", node.id.clone());
        assert!(resolver.resolve(&binding).is_some(), "{} did not resolve", node.id);
    }
    assert_eq!(
        resolver.resolve(&Binding::new("d1", "user.langs.1")),
        Some(json!("fr"))
    );
}

#[test]
fn removal_turns_bindings_dangling_without_panicking() {
    let mut registry = DataSourceRegistry::new();
    registry.add_source(DataSource::new("d1", "Data"), json!({"a": {"b": 1}}));
    let mut rx = registry.subscribe();

    let mut tracker = BindingTracker::new();
    tracker.bind(Binding::new("d1", "a.b"), &BindingResolver::new(&registry));
    assert!(matches!(tracker.state(), BindingState::Bound { .. }));

    registry.remove_source("d1");
    assert!(rx.has_changed().unwrap());
    let snapshot = rx.borrow_and_update().clone();
    assert!(snapshot.values.is_empty());

    tracker.on_snapshot(&snapshot, &BindingResolver::new(&registry));
    assert!(tracker.state().is_dangling());
    assert_eq!(
        BindingResolver::new(&registry).resolve(&Binding::new("d1", "a.b")),
        None
    );
    assert_eq!(
        BindingResolver::new(&registry).resolve(&Binding::whole_source("d1")),
        None
    );
}

#[test]
fn session_survives_data_updates() {
    let mut registry = DataSourceRegistry::new();
    registry.add_source(DataSource::new("d1", "Data"), json!({"a": {"b": 1}, "c": {"d": 2}}));
    let builder = TreeBuilder::new(PickerType::Default);

    let mut session = TreeSession::new(
        builder.build(&registry.raw_value("d1").unwrap()).unwrap(),
        &SearchConfig::default(),
    );
    session.toggle("c");

    registry.update_source("d1", json!({"a": {"b": 1}, "c": {"d": 2, "e": 3}}));
    session.rebuild(builder.build(&registry.raw_value("d1").unwrap()).unwrap());
    let shown: Vec<String> = session.visible().iter().map(|n| n.id.clone()).collect();
    assert_eq!(shown, vec!["a", "c", "c.d", "c.e"]);
}
