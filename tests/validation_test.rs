//! Tests for the bulk consistency check over a table upload

use pretty_assertions::assert_eq;
use rulelint::{validate_table, CellValue, FieldDef, FieldType, HitPolicy, Rule, RuleTable};

fn base_table() -> RuleTable {
    RuleTable {
        slug: "consistency_check_table".into(),
        description: Some("bulk upload validation".into()),
        hit_policy: HitPolicy::FirstHit,
        input_schema: vec![
            FieldDef {
                key: "age".into(),
                field_type: FieldType::Number,
            },
            FieldDef {
                key: "is_active".into(),
                field_type: FieldType::Boolean,
            },
        ],
        output_schema: vec![FieldDef {
            key: "score".into(),
            field_type: FieldType::Decimal,
        }],
        rules: vec![],
    }
}

fn rule(id: &str, priority: usize, inputs: &[(&str, &str)], score: f64) -> Rule {
    Rule {
        id: id.into(),
        priority,
        inputs: inputs
            .iter()
            .map(|(k, v)| ((*k).to_string(), CellValue::from(*v)))
            .collect(),
        outputs: [("score".to_string(), CellValue::Number(score))]
            .into_iter()
            .collect(),
    }
}

#[test]
fn test_consistency_check_zero_errors() {
    let mut table = base_table();
    table.rules = vec![
        rule("r1", 0, &[("age", "18..40"), ("is_active", "True")], 10.5),
        rule("r2", 1, &[("age", ">=41"), ("is_active", "False")], 3.25),
    ];

    let report = validate_table(&table);
    assert_eq!(report.total_rules, 2);
    assert_eq!(report.error_count, 0);
    assert_eq!(report.issues, vec![]);
}

#[test]
fn test_consistency_check_collects_row_errors() {
    let mut table = base_table();
    table.rules = vec![
        rule(
            "r1",
            0,
            &[("age", "invalid range"), ("is_active", ">1")],
            1.0,
        ),
        rule("r2", 1, &[("age", "10..20")], 2.0),
    ];

    let report = validate_table(&table);
    assert_eq!(report.total_rules, 2);
    assert!(report.error_count >= 2);
    let messages: Vec<&str> = report.issues.iter().map(|i| i.message.as_str()).collect();
    assert!(messages
        .iter()
        .any(|m| m.contains("does not support range or comparison logic")));
    assert!(messages
        .iter()
        .any(|m| m.contains("Missing required input field")));
}

#[test]
fn test_row_numbers_follow_rule_order() {
    let mut table = base_table();
    table.rules = vec![
        rule("ok", 0, &[("age", "18..40"), ("is_active", "True")], 1.0),
        rule("bad", 1, &[("age", "40..18"), ("is_active", "True")], 1.0),
    ];

    let report = validate_table(&table);
    assert_eq!(report.error_count, 1);
    assert_eq!(report.issues[0].row, 3);
    assert_eq!(report.issues[0].rule_id, "bad");
    assert_eq!(report.issues[0].field.as_deref(), Some("age"));
}

#[test]
fn test_validation_never_blocks_analysis() {
    // Garbage syntax degrades to literals; analyze still runs and the
    // identical literal rows still shadow each other.
    let mut table = base_table();
    table.rules = vec![
        rule(
            "r1",
            0,
            &[("age", "invalid range"), ("is_active", "True")],
            1.0,
        ),
        rule(
            "r2",
            1,
            &[("age", "invalid range"), ("is_active", "True")],
            2.0,
        ),
    ];

    let report = validate_table(&table);
    assert!(!report.is_valid());

    let result = rulelint::analyze(&table);
    assert_eq!(result.findings.len(), 1);
    assert_eq!(
        result.findings[0].finding_type,
        rulelint::FindingType::Shadowed
    );
}

#[test]
fn test_report_serializes_like_the_wire_format() {
    let mut table = base_table();
    table.rules = vec![rule("r1", 0, &[("age", "40..18")], 1.0)];
    let report = validate_table(&table);
    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"total_rules\":1"));
    assert!(json.contains("\"error_count\""));
    assert!(json.contains("\"row\":2"));
}

#[test]
fn test_extra_input_not_in_schema() {
    let mut table = base_table();
    let mut r = rule("r1", 0, &[("age", "18..40"), ("is_active", "True")], 1.0);
    r.inputs
        .insert("unknown_field".into(), CellValue::from("x"));
    table.rules = vec![r];

    let report = validate_table(&table);
    assert!(report
        .issues
        .iter()
        .any(|i| i.message.contains("Input field 'unknown_field' not defined")));
}

#[test]
fn test_empty_table_is_valid() {
    let table = base_table();
    let report = validate_table(&table);
    assert_eq!(report.total_rules, 0);
    assert!(report.is_valid());
}
