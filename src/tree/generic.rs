//! Generic JSON strategy: flattens nested objects and arrays by key path.

use crate::tree::builder::BuildContext;
use crate::tree::node::{child_id, child_position, TreeNode};
use serde_json::Value;

pub(crate) fn build(raw: &Value, context: &BuildContext) -> (Vec<TreeNode>, Vec<String>) {
    let mut nodes = Vec::new();
    let mut expanded = Vec::new();

    match &context.dataset {
        Some(wrapper) => {
            let mut root = TreeNode::new(wrapper.id.clone(), wrapper.name.clone(), 0);
            root.node_type = Some("dataset".to_string());
            root.position = vec![0];
            root.root_id = Some(wrapper.id.clone());
            root.has_children = has_entries(raw);
            root.value = leaf_value(raw);
            nodes.push(root);
            expanded.push(wrapper.id.clone());

            let scope = Scope {
                prefix: None,
                parent_id: Some(wrapper.id.as_str()),
                root_id: Some(wrapper.id.as_str()),
                level: 1,
                position: &[0],
            };
            flatten(raw, &scope, &mut nodes);
        }
        None => {
            let scope = Scope {
                prefix: None,
                parent_id: None,
                root_id: None,
                level: 0,
                position: &[],
            };
            flatten(raw, &scope, &mut nodes);
        }
    }

    expanded.extend(
        nodes
            .iter()
            .filter(|n| n.level == 1)
            .map(|n| n.id.clone()),
    );
    (nodes, expanded)
}

/// Where the entries of one container land in the tree
struct Scope<'a> {
    /// Id prefix for children; the dataset wrapper contributes none
    prefix: Option<&'a str>,
    parent_id: Option<&'a str>,
    root_id: Option<&'a str>,
    level: usize,
    position: &'a [usize],
}

fn flatten(value: &Value, scope: &Scope<'_>, nodes: &mut Vec<TreeNode>) {
    for (index, (key, child)) in entries(value).into_iter().enumerate() {
        let id = child_id(scope.prefix, &key);
        let position = child_position(scope.position, index);

        let mut node = TreeNode::new(id.clone(), key, scope.level);
        node.node_type = Some(json_type(child).to_string());
        node.position = position.clone();
        node.parent_id = scope.parent_id.map(str::to_string);
        node.root_id = scope.root_id.map(str::to_string);
        node.has_children = has_entries(child);
        node.value = leaf_value(child);
        nodes.push(node);

        if has_entries(child) {
            let inner = Scope {
                prefix: Some(id.as_str()),
                parent_id: Some(id.as_str()),
                root_id: scope.root_id,
                level: scope.level + 1,
                position: &position,
            };
            flatten(child, &inner, nodes);
        }
    }
}

/// Keyed children of a container; array indices become decimal keys
fn entries(value: &Value) -> Vec<(String, &Value)> {
    match value {
        Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        _ => Vec::new(),
    }
}

fn has_entries(value: &Value) -> bool {
    match value {
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => false,
    }
}

/// Display value of a leaf: `null` is spelled out, strings are unquoted
pub(crate) fn leaf_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some("null".to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::builder::TreeBuilder;
    use crate::types::PickerType;
    use proptest::prelude::*;
    use serde_json::{json, Map};

    fn build_plain(raw: &Value) -> (Vec<TreeNode>, Vec<String>) {
        build(raw, &BuildContext::default())
    }

    #[test]
    fn test_nested_object_example() {
        let (nodes, _) = build_plain(&json!({"a": {"b": 1}}));
        assert_eq!(nodes.len(), 2);

        assert_eq!(nodes[0].id, "a");
        assert_eq!(nodes[0].level, 0);
        assert!(nodes[0].has_children);
        assert_eq!(nodes[0].value, None);
        assert_eq!(nodes[0].root_id, None);

        assert_eq!(nodes[1].id, "a.b");
        assert_eq!(nodes[1].level, 1);
        assert_eq!(nodes[1].value.as_deref(), Some("1"));
        assert_eq!(nodes[1].parent_id.as_deref(), Some("a"));
        assert_eq!(nodes[1].position, vec![0, 0]);
    }

    #[test]
    fn test_leaf_values() {
        let (nodes, _) = build_plain(&json!({
            "n": null, "t": true, "s": "hello", "f": 1.5, "e": {}, "l": []
        }));
        let value = |id: &str| nodes.iter().find(|n| n.id == id).unwrap().value.clone();
        assert_eq!(value("n").as_deref(), Some("null"));
        assert_eq!(value("t").as_deref(), Some("true"));
        assert_eq!(value("s").as_deref(), Some("hello"));
        assert_eq!(value("f").as_deref(), Some("1.5"));
        assert_eq!(value("e"), None);
        assert_eq!(value("l"), None);
    }

    #[test]
    fn test_arrays_flatten_by_index() {
        let (nodes, _) = build_plain(&json!({"list": ["x", {"y": 2}]}));
        let ids: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["list", "list.0", "list.1", "list.1.y"]);
        assert_eq!(nodes[0].node_type.as_deref(), Some("array"));
    }

    #[test]
    fn test_wrapper_root() {
        let context = BuildContext::default().with_dataset("d1", "Data");
        let (nodes, expanded) = build(&json!({"a": {"b": 1}, "c": 2}), &context);
        assert_eq!(nodes[0].id, "d1");
        assert!(nodes[0].is_root());
        assert!(nodes.iter().all(|n| n.root_id.as_deref() == Some("d1")));
        assert_eq!(nodes[1].id, "a");
        assert_eq!(nodes[1].level, 1);
        assert_eq!(nodes[1].position, vec![0, 0]);
        assert_eq!(expanded, vec!["d1", "a", "c"]);
    }

    #[test]
    fn test_scalar_document_with_wrapper() {
        let context = BuildContext::default().with_dataset("d1", "Data");
        let (nodes, _) = build(&json!(42), &context);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].value.as_deref(), Some("42"));
        assert!(!nodes[0].has_children);
    }

    #[test]
    fn test_default_expansion_is_level_one() {
        let (nodes, expanded) = build_plain(&json!({"a": {"b": {"c": 1}}, "d": 1}));
        assert_eq!(expanded, vec!["a.b"]);
        assert_eq!(nodes.len(), 4);
    }

    /// Re-nest a flat node list by id path
    fn renest(nodes: &[TreeNode]) -> Value {
        fn insert(target: &mut Map<String, Value>, path: &[&str], node: &TreeNode) {
            if path.len() == 1 {
                let value = match node.node_type.as_deref() {
                    Some("object") | Some("array") => Value::Object(Map::new()),
                    Some("null") => Value::Null,
                    Some("boolean") => Value::Bool(node.value.as_deref() == Some("true")),
                    Some("number") => serde_json::from_str(node.value.as_deref().unwrap()).unwrap(),
                    _ => Value::String(node.value.clone().unwrap_or_default()),
                };
                target.entry(path[0].to_string()).or_insert(value);
                return;
            }
            let child = target
                .entry(path[0].to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            insert(child.as_object_mut().unwrap(), &path[1..], node);
        }
        let mut root = Map::new();
        for node in nodes {
            let path: Vec<&str> = node.id.split('.').collect();
            insert(&mut root, &path, node);
        }
        Value::Object(root)
    }

    fn json_object() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i32>().prop_map(|n| json!(n)),
            "[a-z ]{0,8}".prop_map(Value::String),
        ];
        let tree = leaf.prop_recursive(4, 32, 4, |inner| {
            prop::collection::btree_map("[a-z]{1,5}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect()))
        });
        prop::collection::btree_map("[a-z]{1,5}", tree, 0..5)
            .prop_map(|m| Value::Object(m.into_iter().collect()))
    }

    proptest! {
        #[test]
        fn prop_flatten_round_trips(raw in json_object()) {
            let (nodes, _) = build_plain(&raw);
            prop_assert_eq!(renest(&nodes), raw);
        }

        #[test]
        fn prop_build_is_deterministic(raw in json_object()) {
            let builder = TreeBuilder::new(PickerType::Default);
            let first = builder.build(&raw).unwrap();
            let second = builder.build(&raw).unwrap();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_ids_are_unique(raw in json_object()) {
            let (nodes, _) = build_plain(&raw);
            let ids: std::collections::HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
            prop_assert_eq!(ids.len(), nodes.len());
        }
    }
}
