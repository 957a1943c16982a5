//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// rules-adapter - Keep a Prometheus rule file in sync with a Redis list
#[derive(Parser, Debug)]
#[command(name = "rules-adapter")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Reconcile the rule file against the remote list, forever
    ///
    /// Reads `rules-adapter.toml` from the directory when present.
    ///
    /// Example:
    ///   rules-adapter update /etc/prometheus/rules 10.0.0.5:6379 s3cret
    Update {
        /// Directory holding the managed rule file (must exist)
        #[arg(value_parser = existing_dir)]
        path: PathBuf,

        /// Remote store address as host:port
        #[arg(value_parser = host_port)]
        address: String,

        /// Remote store password (empty for none)
        password: String,
    },
}

fn existing_dir(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if path.is_dir() {
        Ok(path)
    } else {
        Err(format!("'{value}' is not an existing directory"))
    }
}

fn host_port(value: &str) -> Result<String, String> {
    let (host, port) = value
        .rsplit_once(':')
        .ok_or_else(|| format!("'{value}' is not in host:port form"))?;
    if host.is_empty() {
        return Err(format!("'{value}' has an empty host"));
    }
    port.parse::<u16>()
        .map_err(|_| format!("'{port}' is not a valid port"))?;
    Ok(value.to_string())
}
