//! Typed rule model compared by the reconciliation engine

use std::collections::BTreeMap;

use tracing::debug;

use crate::validation::{ExpressionValidator, ValidationError};

/// Which rule-file key named the rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RuleKind {
    /// `record:`; the only kind the remote list produces
    #[default]
    Recording,
    /// `alert:`; only ever read from a hand-edited local file
    Alerting,
}

/// A single rule.
///
/// Equality covers kind, name, expression and labels. `interval` only
/// decides which group the record belongs to.
#[derive(Debug, Clone)]
pub struct RuleRecord {
    pub name: String,
    pub kind: RuleKind,
    pub expr: String,
    pub labels: BTreeMap<String, String>,
    /// Evaluation interval in seconds, `0` when unset.
    pub interval: u64,
}

impl RuleRecord {
    pub fn new(name: impl Into<String>, expr: impl Into<String>, interval: u64) -> Self {
        Self {
            name: name.into(),
            kind: RuleKind::Recording,
            expr: expr.into(),
            labels: BTreeMap::new(),
            interval,
        }
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Check the record against the validity rules.
    pub fn validate(&self, expressions: &dyn ExpressionValidator) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.expr.trim().is_empty() {
            return Err(ValidationError::EmptyExpression);
        }
        expressions
            .check(&self.expr)
            .map_err(ValidationError::MalformedExpression)?;
        if self.labels.keys().any(|key| key.is_empty()) {
            return Err(ValidationError::EmptyLabelKey);
        }
        Ok(())
    }
}

impl PartialEq for RuleRecord {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.name == other.name
            && self.expr == other.expr
            && labels_equal(&self.labels, &other.labels)
    }
}

impl Eq for RuleRecord {}

/// Same key set, each key mapped to the same value.
fn labels_equal(a: &BTreeMap<String, String>, b: &BTreeMap<String, String>) -> bool {
    a.len() == b.len() && a.iter().all(|(key, value)| b.get(key) == Some(value))
}

/// Derives group names from evaluation intervals: `<prefix><interval><suffix>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupNaming {
    pub prefix: String,
    pub suffix: String,
}

impl GroupNaming {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    pub fn group_name(&self, interval: u64) -> String {
        format!("{}{}{}", self.prefix, interval, self.suffix)
    }
}

impl Default for GroupNaming {
    fn default() -> Self {
        Self::new("wonder", "Group")
    }
}

/// A named, ordered sequence of records sharing one interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleGroup {
    pub name: String,
    /// Interval in seconds, `0` when the group does not declare one.
    pub interval: u64,
    pub records: Vec<RuleRecord>,
}

impl RuleGroup {
    pub fn find(&self, name: &str) -> Option<&RuleRecord> {
        self.records.iter().find(|record| record.name == name)
    }
}

/// One side of a reconciliation: every group of the desired or current state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    groups: Vec<RuleGroup>,
}

impl RuleSet {
    pub fn new(groups: Vec<RuleGroup>) -> Self {
        Self { groups }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Group records by interval.
    ///
    /// Groups come out ordered by ascending interval, records in arrival
    /// order. A record whose name was already seen replaces the earlier one,
    /// wherever that one was grouped.
    pub fn from_records(records: impl IntoIterator<Item = RuleRecord>, naming: &GroupNaming) -> Self {
        let mut by_interval: BTreeMap<u64, Vec<RuleRecord>> = BTreeMap::new();

        for record in records {
            for (interval, group) in by_interval.iter_mut() {
                if let Some(pos) = group.iter().position(|r| r.name == record.name) {
                    group.remove(pos);
                    debug!(
                        rule = %record.name,
                        replaced_interval = *interval,
                        interval = record.interval,
                        "duplicate rule name, keeping the later record"
                    );
                    break;
                }
            }
            by_interval.entry(record.interval).or_default().push(record);
        }

        let groups = by_interval
            .into_iter()
            .filter(|(_, records)| !records.is_empty())
            .map(|(interval, records)| RuleGroup {
                name: naming.group_name(interval),
                interval,
                records,
            })
            .collect();

        Self { groups }
    }

    pub fn groups(&self) -> &[RuleGroup] {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<&RuleGroup> {
        self.groups.iter().find(|group| group.name == name)
    }

    /// Every record across all groups, in group order.
    pub fn records(&self) -> impl Iterator<Item = &RuleRecord> {
        self.groups.iter().flat_map(|group| group.records.iter())
    }

    pub fn record_count(&self) -> usize {
        self.groups.iter().map(|group| group.records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::PromqlSyntax;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_equality_ignores_interval() {
        let a = RuleRecord::new("cpu", "rate(cpu[5m])", 30);
        let b = RuleRecord::new("cpu", "rate(cpu[5m])", 60);
        assert_eq!(a, b);
    }

    #[test]
    fn test_equality_compares_labels_by_content() {
        let a = RuleRecord::new("cpu", "up", 30)
            .with_label("team", "infra")
            .with_label("env", "prod");
        let b = RuleRecord::new("cpu", "up", 30)
            .with_label("env", "prod")
            .with_label("team", "infra");
        let c = RuleRecord::new("cpu", "up", 30).with_label("team", "infra");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(c, RuleRecord::new("cpu", "up", 30).with_label("team", "db"));
    }

    #[test]
    fn test_alert_never_equals_recording_rule() {
        let recording = RuleRecord::new("cpu", "up", 30);
        let alert = RuleRecord {
            kind: RuleKind::Alerting,
            ..recording.clone()
        };
        assert_ne!(alert, recording);
    }

    #[test]
    fn test_validate() {
        let ok = RuleRecord::new("cpu", "rate(cpu[5m])", 30);
        assert_eq!(ok.validate(&PromqlSyntax), Ok(()));

        assert_eq!(
            RuleRecord::new("", "up", 30).validate(&PromqlSyntax),
            Err(ValidationError::EmptyName)
        );
        assert_eq!(
            RuleRecord::new("cpu", "  ", 30).validate(&PromqlSyntax),
            Err(ValidationError::EmptyExpression)
        );
        assert!(matches!(
            RuleRecord::new("cpu", "rate(cpu[5m]", 30).validate(&PromqlSyntax),
            Err(ValidationError::MalformedExpression(_))
        ));
        assert_eq!(
            RuleRecord::new("cpu", "up", 30)
                .with_label("", "x")
                .validate(&PromqlSyntax),
            Err(ValidationError::EmptyLabelKey)
        );
    }

    #[test]
    fn test_group_naming() {
        assert_eq!(GroupNaming::default().group_name(30), "wonder30Group");
        assert_eq!(GroupNaming::new("team-", "-rules").group_name(0), "team-0-rules");
    }

    #[test]
    fn test_from_records_groups_by_interval() {
        let set = RuleSet::from_records(
            vec![
                RuleRecord::new("b", "up", 60),
                RuleRecord::new("a", "up", 30),
                RuleRecord::new("c", "up", 60),
            ],
            &GroupNaming::default(),
        );

        let names: Vec<_> = set.groups().iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["wonder30Group", "wonder60Group"]);

        let sixty = set.group("wonder60Group").unwrap();
        assert_eq!(sixty.interval, 60);
        let records: Vec<_> = sixty.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(records, vec!["b", "c"]);
        assert_eq!(set.record_count(), 3);
    }

    #[test]
    fn test_from_records_last_write_wins() {
        let set = RuleSet::from_records(
            vec![
                RuleRecord::new("cpu", "first", 30),
                RuleRecord::new("mem", "up", 30),
                RuleRecord::new("cpu", "second", 30),
            ],
            &GroupNaming::default(),
        );

        assert_eq!(set.record_count(), 2);
        let group = set.group("wonder30Group").unwrap();
        assert_eq!(group.find("cpu").unwrap().expr, "second");
    }

    #[test]
    fn test_from_records_last_write_wins_across_intervals() {
        let set = RuleSet::from_records(
            vec![
                RuleRecord::new("cpu", "first", 30),
                RuleRecord::new("cpu", "second", 60),
            ],
            &GroupNaming::default(),
        );

        assert_eq!(set.groups().len(), 1);
        assert_eq!(set.groups()[0].name, "wonder60Group");
        assert_eq!(set.groups()[0].records[0].expr, "second");
    }

    #[test]
    fn test_empty_set() {
        let set = RuleSet::from_records(Vec::new(), &GroupNaming::default());
        assert!(set.is_empty());
        assert!(set.groups().is_empty());
    }
}
