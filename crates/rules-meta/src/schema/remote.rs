//! Records published to the remote list
//!
//! # Example JSON
//!
//! ```json
//! {"alarm_name": "job:http_errors:rate5m", "expre": "rate(http_errors_total[5m])", "step": 30}
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

use crate::model::{RuleKind, RuleRecord};

/// One raw desired-state entry.
///
/// Missing name or expression decode as empty strings and are rejected later
/// by validation, so the log carries the validation reason.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteRecord {
    #[serde(default, rename = "alarm_name")]
    pub name: String,
    #[serde(default, rename = "expre")]
    pub expr: String,
    /// Evaluation interval in seconds; an integer or a numeric string.
    #[serde(default, deserialize_with = "deserialize_step")]
    pub step: u64,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl RemoteRecord {
    /// Decode one raw list entry.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    /// Convert into the model, trimming surrounding whitespace from the
    /// expression.
    pub fn into_record(self) -> RuleRecord {
        RuleRecord {
            name: self.name,
            kind: RuleKind::Recording,
            expr: self.expr.trim().to_string(),
            labels: self.labels,
            interval: self.step,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Step {
    Number(u64),
    Text(String),
}

fn deserialize_step<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match Step::deserialize(deserializer)? {
        Step::Number(n) => Ok(n),
        Step::Text(s) if s.trim().is_empty() => Ok(0),
        Step::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("step '{s}' is not a whole number of seconds"))),
    }
}
