//! The update command: run the reconciliation loop

use std::path::Path;

use colored::Colorize;
use rules_core::{AdapterConfig, Reconciler, Scheduler};
use rules_fs::NormalizedPath;

use crate::error::Result;

/// Resolve configuration and run the scheduler until the process is killed.
///
/// Only startup problems are returned; cycle failures are logged by the
/// scheduler.
pub fn run_update(path: &Path, address: &str, password: &str) -> Result<()> {
    let dir = NormalizedPath::canonical_dir(path)?;
    let config = AdapterConfig::load(&dir)?;
    tracing::debug!(dir = %dir, config = ?config, "resolved configuration");
    let reconciler = Reconciler::from_config(&config, &dir, address, password)?;

    println!(
        "{} Reconciling {} against {} every {}s",
        "=>".blue().bold(),
        config.rule_file(&dir).as_str().cyan(),
        address,
        config.interval_secs
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let mut scheduler = Scheduler::new(reconciler, config.interval());
    runtime.block_on(scheduler.run());
    Ok(())
}
