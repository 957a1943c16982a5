//! Fixed-interval driver for the reconciler
//!
//! Cycles run on the scheduler's own task and are awaited before the next
//! tick is taken, so two cycles never overlap. Ticks that fall due while a
//! cycle is still running are skipped rather than queued.

use std::time::Duration;

use tokio::time::{MissedTickBehavior, interval};
use tracing::{Instrument, error, info, info_span, warn};

use crate::engine::{CycleReport, Reconciler};

pub struct Scheduler {
    reconciler: Reconciler,
    period: Duration,
    cycles: u64,
}

impl Scheduler {
    pub fn new(reconciler: Reconciler, period: Duration) -> Self {
        Self {
            reconciler,
            period,
            cycles: 0,
        }
    }

    /// Number of cycles started so far.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Run until the task is dropped. The first cycle starts immediately.
    pub async fn run(&mut self) {
        info!(
            path = %self.reconciler.rule_file(),
            interval = ?self.period,
            "starting reconciliation loop"
        );

        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            self.run_cycle().await;
        }
    }

    /// Run a single cycle, logging its failure instead of returning it.
    pub async fn run_cycle(&mut self) -> Option<CycleReport> {
        self.cycles += 1;
        let span = info_span!("cycle", n = self.cycles);

        async {
            match self.reconciler.reconcile_once().await {
                Ok(report) => Some(report),
                Err(e) if e.is_fetch_failure() => {
                    warn!(error = %e, "desired state unavailable; keeping current rules");
                    None
                }
                Err(e) => {
                    error!(error = %e, "reconciliation cycle failed");
                    None
                }
            }
        }
        .instrument(span)
        .await
    }
}
