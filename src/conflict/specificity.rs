//! Restrictiveness scoring for rules
//!
//! An ordinal heuristic used to tie-break covering and overlapping rules:
//! exact literals beat sets, sets beat intervals, intervals beat patterns,
//! wildcards count nothing. It is not a decision procedure — two rules of
//! equal score can still have different coverage.

use crate::condition::{parse, ConditionSpec};
use crate::table::{Rule, RuleTable};

/// Weight of one condition by kind; higher = more restrictive
pub fn condition_weight(spec: &ConditionSpec) -> u32 {
    match spec {
        ConditionSpec::Wildcard => 0,
        ConditionSpec::ExactString(_) | ConditionSpec::ExactNumber(_) => 4,
        ConditionSpec::Set(_) => 3,
        ConditionSpec::Range { .. } | ConditionSpec::Comparison { .. } => 2,
        ConditionSpec::Pattern(_) => 1,
    }
}

/// Sum of condition weights across the table's input schema
pub fn rule_specificity(table: &RuleTable, rule: &Rule) -> u32 {
    table
        .input_schema
        .iter()
        .map(|field| {
            let spec = parse(&rule.input_cell(&field.key), field.field_type);
            condition_weight(&spec)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{CellValue, FieldDef, FieldType};
    use std::collections::HashMap;

    fn table_with(fields: &[(&str, FieldType)]) -> RuleTable {
        RuleTable {
            slug: "t".into(),
            input_schema: fields
                .iter()
                .map(|(key, field_type)| FieldDef {
                    key: (*key).into(),
                    field_type: *field_type,
                })
                .collect(),
            ..Default::default()
        }
    }

    fn rule_with(inputs: &[(&str, &str)]) -> Rule {
        Rule {
            id: "r".into(),
            priority: 0,
            inputs: inputs
                .iter()
                .map(|(k, v)| ((*k).to_string(), CellValue::from(*v)))
                .collect(),
            outputs: HashMap::new(),
        }
    }

    #[test]
    fn test_weights_by_kind() {
        let table = table_with(&[
            ("a", FieldType::String),
            ("b", FieldType::Number),
            ("c", FieldType::String),
            ("d", FieldType::Number),
            ("e", FieldType::String),
        ]);
        let rule = rule_with(&[
            ("a", "gold"),       // exact: 4
            ("b", "1..10"),      // range: 2
            ("c", "IN (x, y)"),  // set: 3
            ("d", ""),           // wildcard: 0
            ("e", "CP A*"),      // pattern: 1
        ]);
        assert_eq!(rule_specificity(&table, &rule), 10);
    }

    #[test]
    fn test_exact_beats_comparison() {
        let table = table_with(&[("age", FieldType::Number)]);
        let exact = rule_with(&[("age", "30")]);
        let broad = rule_with(&[("age", ">18")]);
        assert!(rule_specificity(&table, &exact) > rule_specificity(&table, &broad));
    }

    #[test]
    fn test_missing_cell_counts_as_wildcard() {
        let table = table_with(&[("a", FieldType::String)]);
        let rule = rule_with(&[]);
        assert_eq!(rule_specificity(&table, &rule), 0);
    }
}
