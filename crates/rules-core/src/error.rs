//! Error types for rules-core

use std::path::PathBuf;
use std::time::Duration;

/// Result type for rules-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a reconciliation cycle or prevent startup
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The remote store could not be reached, authenticated or read
    #[error("Failed to fetch desired rules: {message}")]
    Fetch { message: String },

    /// The remote fetch exceeded its deadline
    #[error("Timed out fetching desired rules after {timeout:?}")]
    FetchTimeout { timeout: Duration },

    /// The local rule file exists but cannot be understood
    #[error("Local rule file {path} is unusable: {source}")]
    LocalRules {
        path: PathBuf,
        #[source]
        source: rules_meta::Error,
    },

    /// The desired rule set could not be rendered
    #[error("Failed to render desired rules: {0}")]
    Render(#[source] rules_meta::Error),

    /// The rule file write task did not complete
    #[error("Write of {path} did not complete: {message}")]
    Write { path: PathBuf, message: String },

    /// The downstream process could not be signalled
    #[error("Reload signal failed: {message}")]
    Reload { message: String },

    /// Startup configuration is invalid
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Filesystem error from rules-fs
    #[error(transparent)]
    Fs(#[from] rules_fs::Error),

    /// Redis client error
    #[error(transparent)]
    Redis(#[from] redis::RedisError),
}

impl Error {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Whether the error means the desired state is unknown this cycle.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Self::Fetch { .. } | Self::FetchTimeout { .. } | Self::Redis(_)
        )
    }
}
