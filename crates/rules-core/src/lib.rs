//! Reconciliation engine for rules-adapter
//!
//! Each cycle fetches the desired rules from the remote list, reads the
//! managed rule file, diffs the two and rewrites the file (then signals the
//! downstream process) only when something changed:
//!
//! ```text
//!   Scheduler ── tick ──> Reconciler
//!                            |  remote: RemoteSource -> decode -> RuleSet
//!                            |  local:  LocalStore   -> parse  -> RuleSet
//!                            |  diff(local, remote)  -> DiffReport
//!                            v
//!                         Converger -> write_atomic -> ReloadSignal
//! ```

pub mod config;
pub mod converge;
pub mod diff;
pub mod engine;
pub mod error;
pub mod local;
pub mod reload;
pub mod remote;
pub mod scheduler;

pub use config::{AdapterConfig, CONFIG_FILE_NAME, ReloadConfig};
pub use converge::{ConvergeOutcome, Converger};
pub use diff::{DiffReport, diff};
pub use engine::{CycleReport, Reconciler};
pub use error::{Error, Result};
pub use local::LocalStore;
pub use reload::{ProcessSignal, ReloadSignal};
pub use remote::{RedisSource, RemoteSource, decode_rule_set};
pub use scheduler::Scheduler;
