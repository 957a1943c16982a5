//! Error types for rules-meta

use crate::validation::ValidationError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Malformed rule file: {message}")]
    Parse { message: String },

    #[error("Group name '{name}' is repeated in the same file")]
    DuplicateGroup { name: String },

    #[error("Invalid interval '{value}' in group '{group}'")]
    InvalidInterval { group: String, value: String },

    #[error("Rule #{index} in group '{group}' must set exactly one of 'record' or 'alert'")]
    AmbiguousRuleName { group: String, index: usize },

    #[error("Invalid rule '{name}' in group '{group}': {reason}")]
    InvalidRule {
        group: String,
        name: String,
        #[source]
        reason: ValidationError,
    },

    #[error("Failed to serialize rule set: {message}")]
    Serialize { message: String },
}
