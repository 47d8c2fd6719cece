//! CLI Tooling
//!
//! Command-line front end over the registry, tree builder, views, and binding
//! resolver. Every command renders its output into a `String` so callers (the
//! binary, tests) decide where it goes.

use crate::binding::BindingResolver;
use crate::config::{BinderyConfig, ConfigLoader};
use crate::elements::{ElementGraph, SharedElementGraph};
use crate::error::{ApiError, RegistryError, TreeError};
use crate::logging::LoggingConfig;
use crate::registry::DataSourceRegistry;
use crate::tree::{BuildContext, TreeBuilder, TreeNode};
use crate::types::{Binding, DataSource, PickerType, PROJECT_ELEMENTS_ID};
use crate::views::{ExpandedSet, TreeSession};
use clap::{Parser, Subcommand};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::Value;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Bindery CLI - inspect bindable data sources
#[derive(Parser)]
#[command(name = "bindery")]
#[command(about = "Materialize, filter and resolve bindable data sources")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, both)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Fold the logging flags over the configured logging section.
    /// `--log-file` is passed to logging init separately.
    pub fn logging_config(&self, base: &LoggingConfig) -> LoggingConfig {
        let mut config = base.clone();
        if let Some(level) = &self.log_level {
            config.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            config.output = output.clone();
        }
        config
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Materialize a data file into a tree and print the visible nodes
    Tree {
        /// JSON file: a dataset, or an element graph for element pickers
        file: PathBuf,
        /// Picker type (default, project-elements, a11y)
        #[arg(long, default_value = "default")]
        picker: PickerType,
        /// Dataset display name (default: file stem)
        #[arg(long)]
        name: Option<String>,
        /// Free-text search applied to the tree
        #[arg(long)]
        filter: Option<String>,
        /// Expand every node with children
        #[arg(long)]
        expand_all: bool,
        /// Selected node id; its ancestors start expanded
        #[arg(long)]
        selected: Option<String>,
        /// Isolate the element graph to this symbol's subtree
        #[arg(long)]
        symbol: Option<String>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Resolve a lookup path against a data file
    Resolve {
        /// JSON file holding the dataset
        file: PathBuf,
        /// Lookup path; the dataset id itself binds the whole source
        path: String,
        /// Dataset id (default: file stem)
        #[arg(long)]
        dataset_id: Option<String>,
    },
    /// Load data files into a registry and list them
    Sources {
        /// JSON files to ingest
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

/// CLI context for executing commands
pub struct CliContext {
    config: BinderyConfig,
    color: bool,
}

impl CliContext {
    /// Load configuration from the global file, `config_path`, and the environment
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = ConfigLoader::load(config_path.as_deref())?;
        Ok(Self::with_config(config))
    }

    pub fn with_config(config: BinderyConfig) -> Self {
        let color = color_enabled(&config);
        Self { config, color }
    }

    /// Force styled output on or off
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn config(&self) -> &BinderyConfig {
        &self.config
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Tree {
                file,
                picker,
                name,
                filter,
                expand_all,
                selected,
                symbol,
                format,
            } => self.handle_tree(
                file,
                *picker,
                name.as_deref(),
                filter.as_deref(),
                *expand_all,
                selected.as_deref(),
                symbol.as_deref(),
                format,
            ),
            Commands::Resolve {
                file,
                path,
                dataset_id,
            } => self.handle_resolve(file, path, dataset_id.as_deref()),
            Commands::Sources { files } => self.handle_sources(files),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn handle_tree(
        &self,
        file: &Path,
        picker: PickerType,
        name: Option<&str>,
        filter: Option<&str>,
        expand_all: bool,
        selected: Option<&str>,
        symbol: Option<&str>,
        format: &str,
    ) -> Result<String, ApiError> {
        let blob = std::fs::read_to_string(file)?;
        let id = file_stem(file);
        let dataset = DataSource::new(id.clone(), name.unwrap_or(&id)).with_picker(picker);

        let mut registry = DataSourceRegistry::new().with_tree_config(self.config.tree.clone());
        let source_id = match picker {
            PickerType::Default => {
                registry.ingest_serialized(dataset, &blob)?;
                id
            }
            PickerType::ProjectElements | PickerType::A11yProps => {
                registry = registry.with_elements(Arc::new(load_element_graph(&id, &blob)?));
                if picker == PickerType::ProjectElements {
                    registry.set_isolation(symbol.map(str::to_string));
                }
                PROJECT_ELEMENTS_ID.to_string()
            }
        };
        let source = registry
            .get_tree(&source_id)
            .ok_or_else(|| RegistryError::UnknownSource(source_id.clone()))?;

        let mut context = BuildContext::default();
        if let Some(selected) = selected {
            context = context.with_selected(selected);
        }
        let tree = TreeBuilder::new(picker)
            .with_config(self.config.tree.clone())
            .with_context(context)
            .build_source(&source)?;
        info!(dataset_id = %source_id, nodes = tree.len(), "Built tree");

        let mut session = TreeSession::new(tree, &self.config.search);
        if expand_all {
            session.expand_all();
        }
        if let Some(filter) = filter {
            session.set_filter(filter);
        }

        let visible = session.visible();
        match format {
            "json" => serde_json::to_string_pretty(&visible)
                .map_err(|e| ApiError::ConfigError(format!("Failed to serialize tree: {}", e))),
            "text" => Ok(render_tree_text(&visible, session.expanded(), self.color)),
            other => Err(ApiError::ConfigError(format!(
                "Unknown output format: {} (must be 'text' or 'json')",
                other
            ))),
        }
    }

    fn handle_resolve(
        &self,
        file: &Path,
        path: &str,
        dataset_id: Option<&str>,
    ) -> Result<String, ApiError> {
        let blob = std::fs::read_to_string(file)?;
        let id = dataset_id
            .map(str::to_string)
            .unwrap_or_else(|| file_stem(file));

        let mut registry = DataSourceRegistry::new().with_tree_config(self.config.tree.clone());
        if id == PROJECT_ELEMENTS_ID {
            registry = registry.with_elements(Arc::new(load_element_graph(&id, &blob)?));
        } else {
            registry.ingest_serialized(DataSource::new(id.clone(), id.clone()), &blob)?;
        }

        let binding = Binding::new(id, path);
        let resolved = BindingResolver::new(&registry).resolve(&binding);
        Ok(match resolved {
            Some(Value::String(s)) => s,
            Some(value) => value.to_string(),
            None => "dangling".to_string(),
        })
    }

    fn handle_sources(&self, files: &[PathBuf]) -> Result<String, ApiError> {
        let mut registry = DataSourceRegistry::new();
        let mut skipped: Vec<(String, String)> = Vec::new();

        for file in files {
            let display = file.display().to_string();
            let blob = match std::fs::read_to_string(file) {
                Ok(blob) => blob,
                Err(e) => {
                    skipped.push((display, e.to_string()));
                    continue;
                }
            };
            let name = file
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(&display)
                .to_string();
            let dataset =
                DataSource::new(file_stem(file), name).with_storage_path(display.clone());
            if let Err(e) = registry.ingest_serialized(dataset, &blob) {
                skipped.push((display, e.to_string()));
            }
        }

        let mut out = String::new();
        let sources = registry.get_source_list();
        if sources.is_empty() {
            out.push_str("No data sources loaded.\n");
        } else {
            let mut table = Table::new();
            table.load_preset(UTF8_BORDERS_ONLY);
            table.set_header(vec!["Id", "Name", "Picker", "Storage path"]);
            for source in &sources {
                table.add_row(vec![
                    source.id.clone(),
                    source.name.clone(),
                    source.picker_type.as_str().to_string(),
                    source.storage_path.clone().unwrap_or_else(|| "-".to_string()),
                ]);
            }
            out.push_str(&format!("{}\n", table));
        }
        for (path, reason) in &skipped {
            let label = paint("skipped", self.color, |t| t.yellow().to_string());
            out.push_str(&format!("{} {}: {}\n", label, path, reason));
        }
        Ok(out)
    }
}

fn file_stem(file: &Path) -> String {
    file.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("data")
        .to_string()
}

fn load_element_graph(dataset_id: &str, blob: &str) -> Result<SharedElementGraph, ApiError> {
    let value: Value = serde_json::from_str(blob).map_err(|e| TreeError::MalformedSnapshot {
        dataset_id: dataset_id.to_string(),
        message: e.to_string(),
    })?;
    let graph = ElementGraph::from_value(&value)
        .map_err(|e| TreeError::MalformedElementGraph(e.to_string()))?;
    Ok(SharedElementGraph::new(graph))
}

/// One line per node, indented by level
/// Styling follows `logging.color`, `NO_COLOR`, and whether stdout is a terminal
fn color_enabled(config: &BinderyConfig) -> bool {
    config.logging.color
        && std::env::var_os("NO_COLOR").is_none()
        && std::io::stdout().is_terminal()
}

fn paint(text: &str, color: bool, style: impl Fn(&str) -> String) -> String {
    if color {
        style(text)
    } else {
        text.to_string()
    }
}

fn render_tree_text(nodes: &[&TreeNode], expanded: &ExpandedSet, color: bool) -> String {
    let mut out = String::new();
    for node in nodes {
        let marker = match (node.has_children, expanded.contains(&node.id)) {
            (false, _) => " ",
            (true, true) => "▾",
            (true, false) => "▸",
        };
        let title = if node.selectable {
            paint(&node.title, color, |t| t.bold().to_string())
        } else {
            paint(&node.title, color, |t| t.dimmed().to_string())
        };
        out.push_str(&"  ".repeat(node.level));
        out.push_str(&format!("{} {}", marker, title));
        if let Some(value) = &node.value {
            out.push_str(&format!(" = {}", paint(value, color, |t| t.cyan().to_string())));
        }
        out.push_str(&format!("  {}\n", paint(&node.id, color, |t| t.dimmed().to_string())));
    }
    out
}
