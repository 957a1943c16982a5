//! Current-state reader for the managed rule file

use rules_fs::{NormalizedPath, io};
use rules_meta::{ExpressionValidator, RuleSet, parse_rule_file};
use tracing::{debug, info};

use crate::{Error, Result};

/// Reads and parses the managed rule file.
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: NormalizedPath,
}

impl LocalStore {
    pub fn new(path: NormalizedPath) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    /// Load the current rule set.
    ///
    /// A missing file is created empty and reads as an empty set. A file
    /// that exists but cannot be parsed or holds an invalid rule is an
    /// error: nothing may be written over content that was not understood.
    pub fn load(&self, expressions: &dyn ExpressionValidator) -> Result<RuleSet> {
        if io::ensure_file(&self.path)? {
            info!(path = %self.path, "created empty rule file");
        }

        let content = io::read_text(&self.path)?;
        let set = parse_rule_file(&content, expressions).map_err(|source| Error::LocalRules {
            path: self.path.to_native(),
            source,
        })?;

        debug!(path = %self.path, rules = set.record_count(), "loaded current rules");
        Ok(set)
    }
}
