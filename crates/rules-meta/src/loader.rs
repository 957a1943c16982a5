//! Conversion between rule file text and the rule model

use std::collections::HashSet;

use crate::duration::{format_interval, parse_duration};
use crate::model::{RuleGroup, RuleKind, RuleRecord, RuleSet};
use crate::schema::{RuleDocument, RuleFileDocument, RuleGroupDocument};
use crate::validation::ExpressionValidator;
use crate::{Error, Result};

/// Parse rule file content into a [`RuleSet`].
///
/// Empty or whitespace-only content is an empty set. Any structural problem
/// or invalid rule fails the whole file.
pub fn parse_rule_file(content: &str, expressions: &dyn ExpressionValidator) -> Result<RuleSet> {
    if content.trim().is_empty() {
        return Ok(RuleSet::empty());
    }

    let document: RuleFileDocument = serde_yaml::from_str::<Option<RuleFileDocument>>(content)
        .map_err(|e| Error::Parse {
            message: e.to_string(),
        })?
        .unwrap_or_default();

    let mut seen = HashSet::new();
    let mut groups = Vec::with_capacity(document.groups.len());

    for group in document.groups {
        if !seen.insert(group.name.clone()) {
            return Err(Error::DuplicateGroup { name: group.name });
        }
        groups.push(convert_group(group, expressions)?);
    }

    Ok(RuleSet::new(groups))
}

fn convert_group(group: RuleGroupDocument, expressions: &dyn ExpressionValidator) -> Result<RuleGroup> {
    let interval = match group.interval.as_deref() {
        None => 0,
        Some(value) => parse_duration(value)
            .ok_or_else(|| Error::InvalidInterval {
                group: group.name.clone(),
                value: value.to_string(),
            })?
            .as_secs(),
    };

    let mut records = Vec::with_capacity(group.rules.len());
    for (index, rule) in group.rules.into_iter().enumerate() {
        let (name, kind) = match (rule.record, rule.alert) {
            (Some(name), None) => (name, RuleKind::Recording),
            (None, Some(name)) => (name, RuleKind::Alerting),
            _ => {
                return Err(Error::AmbiguousRuleName {
                    group: group.name,
                    index,
                });
            }
        };
        let record = RuleRecord {
            name,
            kind,
            expr: rule.expr,
            labels: rule.labels,
            interval,
        };
        if let Err(reason) = record.validate(expressions) {
            return Err(Error::InvalidRule {
                group: group.name,
                name: record.name,
                reason,
            });
        }
        records.push(record);
    }

    Ok(RuleGroup {
        name: group.name,
        interval,
        records,
    })
}

/// Render a [`RuleSet`] as rule file content.
///
/// Records are written under `record:` or `alert:` according to their kind.
pub fn render_rule_file(set: &RuleSet) -> Result<String> {
    let document = RuleFileDocument {
        groups: set
            .groups()
            .iter()
            .map(|group| RuleGroupDocument {
                name: group.name.clone(),
                interval: format_interval(group.interval),
                rules: group
                    .records
                    .iter()
                    .map(|record| RuleDocument {
                        record: (record.kind == RuleKind::Recording).then(|| record.name.clone()),
                        alert: (record.kind == RuleKind::Alerting).then(|| record.name.clone()),
                        expr: record.expr.clone(),
                        labels: record.labels.clone(),
                        ..Default::default()
                    })
                    .collect(),
            })
            .collect(),
    };

    serde_yaml::to_string(&document).map_err(|e| Error::Serialize {
        message: e.to_string(),
    })
}
