//! Configuration sources

pub mod global_file {
    //! Per-user config file under the platform config directory

    use config::builder::DefaultState;
    use config::{ConfigBuilder, File};
    use std::path::PathBuf;

    /// `<config dir>/bindery/config.toml`, when the platform has one
    pub fn path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "bindery", "bindery")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Add the global file as an optional source.
    pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
        match path() {
            Some(path) => builder.add_source(File::from(path).required(false)),
            None => builder,
        }
    }
}

pub mod environment {
    //! Environment variable source: BINDERY_ prefix with __ separator

    use config::builder::DefaultState;
    use config::{ConfigBuilder, Environment};

    /// Add environment variable overlay to builder.
    /// `BINDERY__TREE__EXCLUDED_INPUTS` takes a comma separated list.
    pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
        builder.add_source(
            Environment::with_prefix("BINDERY")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("tree.excluded_inputs"),
        )
    }
}
