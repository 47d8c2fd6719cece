//! Bindery CLI Binary
//!
//! Command-line interface for inspecting bindable data sources.

use bindery::logging::init_logging_with_cli_file;
use bindery::tooling::cli::{Cli, CliContext};
use clap::Parser;
use std::process;

fn main() {
    let cli = Cli::parse();

    let context = match CliContext::new(cli.config.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            process::exit(1);
        }
    };

    let logging = cli.logging_config(&context.config().logging);
    if let Err(e) = init_logging_with_cli_file(Some(&logging), cli.log_file.clone()) {
        eprintln!("Warning: failed to initialize logging: {}", e);
    }

    match context.execute(&cli.command) {
        Ok(output) => {
            println!("{}", output.trim_end());
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
