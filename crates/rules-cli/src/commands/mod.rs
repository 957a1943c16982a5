//! Command implementations for rules-cli

pub mod update;

pub use update::run_update;
