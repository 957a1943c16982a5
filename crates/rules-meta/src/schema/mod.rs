//! Serde shapes of the two external formats
//!
//! - [`rule_file`]: the YAML rule file the downstream process loads
//! - [`remote`]: the JSON records published to the remote list

pub mod remote;
pub mod rule_file;

pub use remote::RemoteRecord;
pub use rule_file::{RuleDocument, RuleFileDocument, RuleGroupDocument};
