//! One reconciliation cycle

use std::sync::Arc;
use std::time::Duration;

use rules_fs::NormalizedPath;
use rules_meta::{ExpressionValidator, GroupNaming, PromqlSyntax};
use tracing::debug;

use crate::config::AdapterConfig;
use crate::converge::{ConvergeOutcome, Converger};
use crate::diff::{DiffReport, diff};
use crate::local::LocalStore;
use crate::reload::ProcessSignal;
use crate::remote::{RedisSource, RemoteSource, decode_rule_set};
use crate::{Error, Result};

/// Summary of a completed cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// Valid records in the desired state
    pub desired_rules: usize,
    /// Records found in the managed file before convergence
    pub current_rules: usize,
    pub diff: DiffReport,
    pub outcome: ConvergeOutcome,
}

/// Wires a remote source, the managed file and the converger together.
pub struct Reconciler {
    remote: Arc<dyn RemoteSource>,
    local: LocalStore,
    converger: Converger,
    naming: GroupNaming,
    expressions: Arc<dyn ExpressionValidator>,
    fetch_timeout: Duration,
}

impl Reconciler {
    pub fn new(remote: Arc<dyn RemoteSource>, local: LocalStore, converger: Converger) -> Self {
        Self {
            remote,
            local,
            converger,
            naming: GroupNaming::default(),
            expressions: Arc::new(PromqlSyntax),
            fetch_timeout: Duration::from_secs(10),
        }
    }

    pub fn with_naming(mut self, naming: GroupNaming) -> Self {
        self.naming = naming;
        self
    }

    pub fn with_expressions(mut self, expressions: Arc<dyn ExpressionValidator>) -> Self {
        self.expressions = expressions;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Build the production wiring: Redis list source, `pkill` reload.
    ///
    /// Fails when `address` does not form a valid connection target.
    pub fn from_config(
        config: &AdapterConfig,
        dir: &NormalizedPath,
        address: &str,
        password: &str,
    ) -> Result<Self> {
        let remote = RedisSource::new(address, password, config.database, &config.list_key);
        remote.connection_info()?;
        let reload = ProcessSignal::new(&config.reload.signal, &config.reload.process);

        Ok(Self::new(
            Arc::new(remote),
            LocalStore::new(config.rule_file(dir)),
            Converger::new(Arc::new(reload)),
        )
        .with_naming(config.naming())
        .with_fetch_timeout(config.fetch_timeout()))
    }

    pub fn rule_file(&self) -> &NormalizedPath {
        self.local.path()
    }

    /// Run one fetch, diff and converge pass.
    ///
    /// A fetch failure or an unreadable local file ends the cycle before
    /// anything is written. An empty remote list is a valid desired state
    /// and removes every local rule.
    pub async fn reconcile_once(&self) -> Result<CycleReport> {
        let raw = tokio::time::timeout(self.fetch_timeout, self.remote.fetch())
            .await
            .map_err(|_| Error::FetchTimeout {
                timeout: self.fetch_timeout,
            })??;
        debug!(entries = raw.len(), "fetched remote records");

        let desired = decode_rule_set(&raw, &self.naming, self.expressions.as_ref());
        let current = self.local.load(self.expressions.as_ref())?;

        let report = diff(&current, &desired);
        report.log();

        let outcome = self
            .converger
            .converge(&desired, report.change_count(), self.local.path())
            .await?;

        Ok(CycleReport {
            desired_rules: desired.record_count(),
            current_rules: current.record_count(),
            diff: report,
            outcome,
        })
    }
}
