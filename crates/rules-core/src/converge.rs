//! Applying the desired rule set to the managed file

use std::sync::Arc;

use rules_fs::checksum::compute_content_checksum;
use rules_fs::{NormalizedPath, RobustnessConfig, io};
use rules_meta::{RuleSet, render_rule_file};
use similar::TextDiff;
use tracing::{Level, debug, error, info};

use crate::reload::ReloadSignal;
use crate::{Error, Result};

/// What a convergence pass did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvergeOutcome {
    /// Nothing changed; no write, no reload.
    Unchanged,
    /// The file was rewritten.
    Applied {
        /// Checksum of the written content
        checksum: String,
        /// Whether the reload signal was delivered
        reloaded: bool,
    },
}

/// Sole writer of the managed rule file.
pub struct Converger {
    reload: Arc<dyn ReloadSignal>,
    robustness: RobustnessConfig,
}

impl Converger {
    pub fn new(reload: Arc<dyn ReloadSignal>) -> Self {
        Self {
            reload,
            robustness: RobustnessConfig::default(),
        }
    }

    pub fn with_robustness(mut self, robustness: RobustnessConfig) -> Self {
        self.robustness = robustness;
        self
    }

    /// Make the file at `path` hold exactly `desired`.
    ///
    /// No-op when `change_count` is zero. Otherwise the whole set is
    /// rendered, written atomically and the reload signal sent. Render or
    /// write failures return before anything reaches the file or the
    /// downstream process. A failed reload is logged and not retried; the
    /// file keeps the new content.
    ///
    /// The write runs on the blocking thread pool, since waiting for the
    /// sidecar lock sleeps between attempts for up to the configured
    /// `lock_timeout`.
    pub async fn converge(
        &self,
        desired: &RuleSet,
        change_count: usize,
        path: &NormalizedPath,
    ) -> Result<ConvergeOutcome> {
        if change_count == 0 {
            return Ok(ConvergeOutcome::Unchanged);
        }

        let rendered = render_rule_file(desired).map_err(Error::Render)?;

        if tracing::enabled!(Level::DEBUG) {
            let previous = io::read_text(path).unwrap_or_default();
            let diff = TextDiff::from_lines(previous.as_str(), rendered.as_str());
            let mut unified = diff.unified_diff();
            unified.context_radius(2).header("current", "desired");
            debug!(path = %path, diff = %unified, "rule file changes");
        }

        let target = path.clone();
        let content = rendered.clone();
        let robustness = self.robustness;
        tokio::task::spawn_blocking(move || io::write_atomic(&target, content.as_bytes(), robustness))
            .await
            .map_err(|e| Error::Write {
                path: path.to_native(),
                message: e.to_string(),
            })??;

        let checksum = compute_content_checksum(rendered.as_bytes());
        info!(
            path = %path,
            checksum = %checksum,
            rules = desired.record_count(),
            changes = change_count,
            "rule file rewritten"
        );

        let reloaded = match self.reload.reload().await {
            Ok(()) => {
                info!("reload signal sent");
                true
            }
            Err(e) => {
                error!(error = %e, "reload failed; rule file is updated but not loaded");
                false
            }
        };

        Ok(ConvergeOutcome::Applied { checksum, reloaded })
    }
}
