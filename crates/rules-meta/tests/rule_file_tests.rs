//! Tests for reading and writing rule files

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rules_meta::{
    Error, GroupNaming, PromqlSyntax, RuleKind, RuleRecord, RuleSet, ValidationError, parse_rule_file,
    render_rule_file,
};

const SAMPLE: &str = r#"
groups:
  - name: wonder30Group
    interval: 30s
    rules:
      - record: job:http_errors:rate5m
        expr: sum by (job) (rate(http_errors_total[5m]))
        labels:
          team: infra
      - record: job:up:count
        expr: count by (job) (up)
  - name: handwritten
    rules:
      - alert: InstanceDown
        expr: up == 0
        for: 5m
        annotations:
          summary: instance down
"#;

#[test]
fn test_parse_sample_file() {
    let set = parse_rule_file(SAMPLE, &PromqlSyntax).unwrap();

    assert_eq!(set.groups().len(), 2);
    assert_eq!(set.record_count(), 3);

    let group = set.group("wonder30Group").unwrap();
    assert_eq!(group.interval, 30);
    assert!(group.records.iter().all(|r| r.interval == 30));
    assert_eq!(
        group.find("job:http_errors:rate5m").unwrap().labels.get("team").map(String::as_str),
        Some("infra")
    );

    let handwritten = set.group("handwritten").unwrap();
    assert_eq!(handwritten.interval, 0);
    assert_eq!(handwritten.records[0].name, "InstanceDown");
    assert_eq!(handwritten.records[0].kind, RuleKind::Alerting);
    assert_eq!(group.records[0].kind, RuleKind::Recording);
}

#[test]
fn test_parse_empty_content() {
    assert!(parse_rule_file("", &PromqlSyntax).unwrap().is_empty());
    assert!(parse_rule_file("  \n\n", &PromqlSyntax).unwrap().is_empty());
    assert!(parse_rule_file("groups: []\n", &PromqlSyntax).unwrap().is_empty());
}

#[test]
fn test_parse_rejects_malformed_yaml() {
    let err = parse_rule_file("groups: [name: {", &PromqlSyntax).unwrap_err();
    assert!(matches!(err, Error::Parse { .. }));
}

#[test]
fn test_parse_rejects_repeated_group() {
    let yaml = "groups:\n  - name: g\n    rules: []\n  - name: g\n    rules: []\n";
    let err = parse_rule_file(yaml, &PromqlSyntax).unwrap_err();
    assert!(matches!(err, Error::DuplicateGroup { ref name } if name == "g"));
}

#[test]
fn test_parse_rejects_bad_interval() {
    let yaml = "groups:\n  - name: g\n    interval: often\n    rules: []\n";
    let err = parse_rule_file(yaml, &PromqlSyntax).unwrap_err();
    assert!(matches!(err, Error::InvalidInterval { ref value, .. } if value == "often"));
}

#[test]
fn test_parse_rejects_rule_with_both_names() {
    let yaml = "groups:\n  - name: g\n    rules:\n      - record: a\n        alert: A\n        expr: up\n";
    let err = parse_rule_file(yaml, &PromqlSyntax).unwrap_err();
    assert!(matches!(err, Error::AmbiguousRuleName { index: 0, .. }));
}

#[test]
fn test_parse_rejects_invalid_rule() {
    let yaml = "groups:\n  - name: g\n    rules:\n      - record: a\n        expr: rate(x[5m]\n";
    let err = parse_rule_file(yaml, &PromqlSyntax).unwrap_err();
    match err {
        Error::InvalidRule { name, reason, .. } => {
            assert_eq!(name, "a");
            assert!(matches!(reason, ValidationError::MalformedExpression(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_render_layout() {
    let set = RuleSet::from_records(
        vec![
            RuleRecord::new("cpu", "rate(cpu[5m])", 30).with_label("team", "infra"),
            RuleRecord::new("default", "up", 0),
        ],
        &GroupNaming::default(),
    );

    let yaml = render_rule_file(&set).unwrap();

    assert!(yaml.contains("name: wonder30Group"));
    assert!(yaml.contains("interval: 30s"));
    assert!(yaml.contains("record: cpu"));
    assert!(yaml.contains("team: infra"));
    assert!(yaml.contains("name: wonder0Group"));
    // The zero-interval group must not pin an interval.
    assert_eq!(yaml.matches("interval:").count(), 1);
}

fn arb_record() -> impl Strategy<Value = RuleRecord> {
    (
        "[a-z_:][a-z0-9_:]{0,12}",
        "[a-z_]{1,8}(\\[[1-9]m\\])?",
        prop::sample::select(vec![0u64, 15, 30, 60]),
        prop::collection::btree_map("[a-z_]{1,6}", "[ -~]{0,10}", 0..3),
    )
        .prop_map(|(name, expr, interval, labels)| RuleRecord {
            name,
            kind: RuleKind::Recording,
            expr,
            labels,
            interval,
        })
}

proptest! {
    // A file written from a desired set must read back as that same set,
    // otherwise every cycle would see phantom changes.
    #[test]
    fn test_rendered_sets_read_back_unchanged(records in prop::collection::vec(arb_record(), 0..12)) {
        let desired = RuleSet::from_records(records, &GroupNaming::default());
        let yaml = render_rule_file(&desired).unwrap();
        let parsed = parse_rule_file(&yaml, &PromqlSyntax).unwrap();

        prop_assert_eq!(parsed.groups().len(), desired.groups().len());
        for (read, written) in parsed.groups().iter().zip(desired.groups()) {
            prop_assert_eq!(&read.name, &written.name);
            prop_assert_eq!(read.interval, written.interval);
            prop_assert_eq!(&read.records, &written.records);
        }
    }
}
