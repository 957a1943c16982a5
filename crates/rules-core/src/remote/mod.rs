//! Desired-state source
//!
//! A [`RemoteSource`] hands back the raw entries of the remote list;
//! [`decode_rule_set`] turns them into a [`RuleSet`], skipping entries that
//! cannot be decoded or fail validation.

mod redis_source;

pub use redis_source::RedisSource;

use async_trait::async_trait;
use rules_meta::{ExpressionValidator, GroupNaming, RemoteRecord, RuleSet};
use tracing::warn;

use crate::Result;

/// Fetches the raw desired-state records.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Return every entry of the desired-state list.
    ///
    /// An error means the desired state is unknown; an empty list means
    /// "no rules".
    async fn fetch(&self) -> Result<Vec<String>>;
}

/// Decode raw entries into the desired [`RuleSet`].
///
/// Undecodable entries and invalid rules are logged and dropped; the rest
/// of the batch is kept.
pub fn decode_rule_set(
    raw: &[String],
    naming: &GroupNaming,
    expressions: &dyn ExpressionValidator,
) -> RuleSet {
    let records = raw.iter().enumerate().filter_map(|(index, entry)| {
        let record = match RemoteRecord::from_json(entry) {
            Ok(record) => record.into_record(),
            Err(e) => {
                warn!(index, error = %e, "skipping undecodable remote record");
                return None;
            }
        };
        if let Err(reason) = record.validate(expressions) {
            warn!(rule = %record.name, reason = %reason, "skipping invalid remote rule");
            return None;
        }
        Some(record)
    });

    RuleSet::from_records(records, naming)
}
