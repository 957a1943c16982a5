//! Rule file layout
//!
//! # Example YAML
//!
//! ```yaml
//! groups:
//!   - name: wonder30Group
//!     interval: 30s
//!     rules:
//!       - record: job:http_errors:rate5m
//!         expr: sum by (job) (rate(http_errors_total[5m]))
//!         labels:
//!           team: infra
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Top-level rule file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RuleFileDocument {
    #[serde(default)]
    pub groups: Vec<RuleGroupDocument>,
}

/// One group entry
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RuleGroupDocument {
    pub name: String,
    /// Duration string such as `30s`; absent means the global default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    #[serde(default)]
    pub rules: Vec<RuleDocument>,
}

/// One rule entry.
///
/// Files written by this tool only contain recording rules. Alerting rules
/// written by hand are still read so they can be reconciled away.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RuleDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert: Option<String>,
    pub expr: String,
    #[serde(default, rename = "for", skip_serializing_if = "Option::is_none")]
    pub for_duration: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}
