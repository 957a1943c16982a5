//! rules-adapter CLI
//!
//! Keeps a Prometheus rule file in step with the rules published in a Redis
//! list and signals Prometheus to reload when the file changes.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG overrides the default level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| CliError::user(format!("Failed to set tracing subscriber: {e}")))?;
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "rules-adapter starting");

    match cli.command {
        Commands::Update {
            path,
            address,
            password,
        } => commands::run_update(&path, &address, &password),
    }
}
