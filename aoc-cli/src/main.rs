//! AOC CLI - Command-line interface for running Advent of Code solvers

mod cli;
mod config;
mod error;
mod executor;
mod inputs;
mod output;

// Import aoc-solutions to link the solver plugins
use aoc_solutions as _;

use aoc_solver::{RegistryBuilder, SolverRegistry};
use clap::Parser;
use cli::Args;
use config::Config;
use error::CliError;
use executor::Executor;
use output::OutputFormatter;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

fn main() {
    let config = Config::from_args(Args::parse());
    init_tracing(&config);

    if let Err(e) = run(&config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr so answers on stdout stay machine-readable
fn init_tracing(config: &Config) {
    let filter_layer = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter()));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}

fn run(config: &Config) -> Result<(), CliError> {
    // Build registry with tag filtering (only once)
    let registry = build_registry(&config.tags)?;
    let executor = Executor::new(registry, config);

    let work_items = executor.collect_work_items();
    if work_items.is_empty() && config.input_file.is_none() {
        println!("No solvers found matching the specified filters.");
        return Ok(());
    }

    info!("Running {} solver(s)...", work_items.len());
    let formatter = OutputFormatter::new(config.quiet);
    let results = executor.execute(&work_items)?;

    for result in &results {
        formatter.print_result(result);
    }
    formatter.print_summary(&results);

    Ok(())
}

/// Build registry with tag filtering
fn build_registry(tags: &[String]) -> Result<SolverRegistry, CliError> {
    let builder = RegistryBuilder::new();

    let builder = if tags.is_empty() {
        builder.register_all_plugins()?
    } else {
        builder.register_solver_plugins(|plugin| {
            tags.iter().all(|tag| plugin.tags.contains(&tag.as_str()))
        })?
    };

    Ok(builder.build())
}
