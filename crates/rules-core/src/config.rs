//! Adapter configuration
//!
//! Connection target and credential come from the command line; everything
//! else is read from an optional `rules-adapter.toml` in the managed
//! directory. Every field has a default, so the file only needs the keys it
//! overrides:
//!
//! ```toml
//! file_name = "wonder.yml"
//! interval_secs = 3
//!
//! [reload]
//! process = "prometheus"
//! signal = "HUP"
//! ```

use std::time::Duration;

use rules_fs::{ConfigStore, NormalizedPath};
use rules_meta::GroupNaming;
use serde::Deserialize;

use crate::{Error, Result};

/// Name of the optional configuration file inside the managed directory
pub const CONFIG_FILE_NAME: &str = "rules-adapter.toml";

/// How the downstream process is told to reload
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReloadConfig {
    /// Process name pattern handed to `pkill`
    pub process: String,
    /// Signal name without the `SIG` prefix
    pub signal: String,
}

impl Default for ReloadConfig {
    fn default() -> Self {
        Self {
            process: "prometheus".to_string(),
            signal: "HUP".to_string(),
        }
    }
}

/// Resolved adapter settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdapterConfig {
    /// Managed rule file name inside the directory
    pub file_name: String,
    pub group_prefix: String,
    pub group_suffix: String,
    /// Remote list holding the desired records
    pub list_key: String,
    /// Logical database of the remote store
    pub database: i64,
    /// Seconds between reconciliation cycles
    pub interval_secs: u64,
    /// Deadline for one remote fetch, in seconds
    pub fetch_timeout_secs: u64,
    pub reload: ReloadConfig,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            file_name: "wonder.yml".to_string(),
            group_prefix: "wonder".to_string(),
            group_suffix: "Group".to_string(),
            list_key: "CUSTOM_EXPRESS_STRATEGY".to_string(),
            database: 0,
            interval_secs: 3,
            fetch_timeout_secs: 10,
            reload: ReloadConfig::default(),
        }
    }
}

impl AdapterConfig {
    /// Load `rules-adapter.toml` from `dir`, falling back to defaults when
    /// the file does not exist.
    pub fn load(dir: &NormalizedPath) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        let config = ConfigStore::new()
            .load_optional::<Self>(&path)?
            .unwrap_or_default();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.file_name.is_empty() || self.file_name.contains(['/', '\\']) {
            return Err(Error::invalid_config(format!(
                "file_name must be a bare file name, got '{}'",
                self.file_name
            )));
        }
        if self.list_key.is_empty() {
            return Err(Error::invalid_config("list_key must not be empty"));
        }
        if self.interval_secs == 0 {
            return Err(Error::invalid_config("interval_secs must be positive"));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(Error::invalid_config("fetch_timeout_secs must be positive"));
        }
        if self.database < 0 {
            return Err(Error::invalid_config("database must not be negative"));
        }
        if self.reload.process.is_empty() {
            return Err(Error::invalid_config("reload.process must not be empty"));
        }
        if self.reload.signal.is_empty() || !self.reload.signal.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(Error::invalid_config(format!(
                "reload.signal must be a signal name or number, got '{}'",
                self.reload.signal
            )));
        }
        Ok(())
    }

    /// Path of the managed rule file inside `dir`
    pub fn rule_file(&self, dir: &NormalizedPath) -> NormalizedPath {
        dir.join(&self.file_name)
    }

    pub fn naming(&self) -> GroupNaming {
        GroupNaming::new(&self.group_prefix, &self.group_suffix)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}
