//! Error types for rules-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that stop the daemon from starting
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from rules-core
    #[error(transparent)]
    Core(#[from] rules_core::Error),

    /// Error from rules-fs
    #[error(transparent)]
    Fs(#[from] rules_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
