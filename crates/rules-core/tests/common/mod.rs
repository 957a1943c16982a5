//! Stub sources and reload signals shared by the reconciliation tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rules_core::{Converger, Error, LocalStore, Reconciler, ReloadSignal, RemoteSource, Result};
use rules_fs::NormalizedPath;
use rules_meta::ExpressionValidator;

/// Remote list whose content can be swapped between cycles.
#[derive(Default)]
pub struct StaticSource {
    entries: Mutex<Vec<String>>,
    pub fetches: AtomicUsize,
}

impl StaticSource {
    pub fn new(entries: &[&str]) -> Self {
        let source = Self::default();
        source.set(entries);
        source
    }

    pub fn set(&self, entries: &[&str]) {
        *self.entries.lock().unwrap() = entries.iter().map(|s| s.to_string()).collect();
    }
}

#[async_trait]
impl RemoteSource for StaticSource {
    async fn fetch(&self) -> Result<Vec<String>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.entries.lock().unwrap().clone())
    }
}

/// Fails the first `failures` fetches, then serves `entries`.
pub struct FailingSource {
    failures: usize,
    entries: Vec<String>,
    pub fetches: AtomicUsize,
}

impl FailingSource {
    pub fn always() -> Self {
        Self::then(usize::MAX, &[])
    }

    pub fn then(failures: usize, entries: &[&str]) -> Self {
        Self {
            failures,
            entries: entries.iter().map(|s| s.to_string()).collect(),
            fetches: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl RemoteSource for FailingSource {
    async fn fetch(&self) -> Result<Vec<String>> {
        let n = self.fetches.fetch_add(1, Ordering::SeqCst);
        if n < self.failures {
            return Err(Error::Fetch {
                message: "connection refused".to_string(),
            });
        }
        Ok(self.entries.clone())
    }
}

/// Takes `delay` per fetch and records the highest number of concurrent
/// fetches it has seen.
pub struct SlowSource {
    delay: Duration,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub fetches: AtomicUsize,
}

impl SlowSource {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            fetches: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl RemoteSource for SlowSource {
    async fn fetch(&self) -> Result<Vec<String>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(self.delay).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(vec![
            r#"{"alarm_name": "cpu", "expre": "rate(cpu[5m])", "step": 30}"#.to_string(),
        ])
    }
}

/// Counts reload requests instead of signalling a process.
#[derive(Default)]
pub struct RecordingReload {
    pub calls: AtomicUsize,
}

impl RecordingReload {
    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReloadSignal for RecordingReload {
    async fn reload(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Rejects any expression that calls `rate`.
pub struct RejectRate;

impl ExpressionValidator for RejectRate {
    fn check(&self, expr: &str) -> std::result::Result<(), String> {
        if expr.contains("rate(") {
            return Err("rate() is not allowed here".to_string());
        }
        Ok(())
    }
}

/// Reconciler over `remote` writing to `file`, with a recording reload.
pub fn reconciler(
    remote: Arc<dyn RemoteSource>,
    file: &std::path::Path,
) -> (Reconciler, Arc<RecordingReload>) {
    let reload = Arc::new(RecordingReload::default());
    let reconciler = Reconciler::new(
        remote,
        LocalStore::new(NormalizedPath::new(file)),
        Converger::new(reload.clone()),
    );
    (reconciler, reload)
}
