use std::fs;

use bindery::config::BinderyConfig;
use bindery::tooling::cli::{CliContext, Commands};
use bindery::types::PickerType;
use tempfile::TempDir;

fn context() -> CliContext {
    CliContext::with_config(BinderyConfig::default())
}

fn tree_command(file: std::path::PathBuf, filter: Option<&str>) -> Commands {
    Commands::Tree {
        file,
        picker: PickerType::Default,
        name: Some("Orders".to_string()),
        filter: filter.map(str::to_string),
        expand_all: false,
        selected: None,
        symbol: None,
        format: "json".to_string(),
    }
}

#[test]
fn tree_json_contract_has_node_fields() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("orders.json");
    fs::write(&path, r#"{"a": {"b": 1}}"#).unwrap();

    let output = context().execute(&tree_command(path, None)).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    let nodes = parsed.as_array().unwrap();

    // Wrapper root plus its expanded level-1 children.
    assert_eq!(nodes[0]["id"], "orders");
    assert_eq!(nodes[0]["title"], "Orders");
    assert_eq!(nodes[0]["rootId"], "orders");
    assert_eq!(nodes[1]["id"], "a");
    assert_eq!(nodes[1]["parentId"], "orders");
    assert!(nodes[1]["hasChildren"].as_bool().unwrap());
    assert!(nodes[1].get("position").and_then(|v| v.as_array()).is_some());
    assert!(nodes[1].get("selectable").and_then(|v| v.as_bool()).is_some());
}

#[test]
fn tree_filter_narrows_output() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("orders.json");
    fs::write(&path, r#"{"a": {"b": 1}, "c": 2}"#).unwrap();

    let output = context().execute(&tree_command(path, Some("b"))).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    let ids: Vec<&str> = parsed
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["orders", "a", "a.b"]);
}

#[test]
fn tree_rejects_malformed_json() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.json");
    fs::write(&path, "{not json").unwrap();
    assert!(context().execute(&tree_command(path, None)).is_err());
}

#[test]
fn resolve_prints_value_or_dangling() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("d1.json");
    fs::write(&path, r#"{"user": {"name": "Ada", "tags": ["x"]}}"#).unwrap();

    let resolve = |lookup: &str| {
        context()
            .execute(&Commands::Resolve {
                file: path.clone(),
                path: lookup.to_string(),
                dataset_id: None,
            })
            .unwrap()
    };
    assert_eq!(resolve("user.name"), "Ada");
    assert_eq!(resolve("user.tags"), r#"["x"]"#);
    assert_eq!(resolve("d1"), "d1");
    assert_eq!(resolve("user.missing"), "dangling");
}

#[test]
fn sources_lists_loaded_and_skipped_files() {
    let temp_dir = TempDir::new().unwrap();
    let good = temp_dir.path().join("good.json");
    let bad = temp_dir.path().join("bad.json");
    fs::write(&good, r#"{"x": 1}"#).unwrap();
    fs::write(&bad, "{oops").unwrap();

    let output = context()
        .execute(&Commands::Sources {
            files: vec![good, bad],
        })
        .unwrap();
    assert!(output.contains("good"));
    assert!(output.contains("good.json"));
    assert!(output.contains("skipped"));
    assert!(output.contains("bad.json"));
}
