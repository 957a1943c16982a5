//! Downstream reload signalling

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::{Error, Result};

/// Tells the downstream process to pick up the rewritten rule file.
///
/// There is no acknowledgement: success only means the signal was sent.
#[async_trait]
pub trait ReloadSignal: Send + Sync {
    async fn reload(&self) -> Result<()>;
}

/// Sends a signal by process name with `pkill -<signal> <pattern>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSignal {
    signal: String,
    pattern: String,
}

impl ProcessSignal {
    pub fn new(signal: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            signal: signal.into(),
            pattern: pattern.into(),
        }
    }

    /// Arguments passed to `pkill`.
    pub fn args(&self) -> [String; 2] {
        [format!("-{}", self.signal), self.pattern.clone()]
    }
}

#[async_trait]
impl ReloadSignal for ProcessSignal {
    async fn reload(&self) -> Result<()> {
        let output = Command::new("pkill")
            .args(self.args())
            .output()
            .await
            .map_err(|e| Error::Reload {
                message: format!("failed to run pkill: {e}"),
            })?;

        match output.status.code() {
            Some(0) => {
                debug!(signal = %self.signal, pattern = %self.pattern, "signal delivered");
                Ok(())
            }
            Some(1) => Err(Error::Reload {
                message: format!("no process matched '{}'", self.pattern),
            }),
            _ => Err(Error::Reload {
                message: format!(
                    "pkill exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            }),
        }
    }
}
