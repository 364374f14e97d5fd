//! Apply accepted findings to a rule table
//!
//! Fixes are applied to a snapshot and return a new table; the input is
//! never mutated. Priorities are renumbered to the dense ascending
//! permutation after every structural edit, preserving the relative order
//! of untouched rules. Applying a fix invalidates any prior analysis —
//! callers must run `analyze` again on the result.

use crate::conflict::classify::{Finding, Fix};
use crate::error::{Error, Result};
use crate::table::RuleTable;

/// Apply one finding's suggested fix, producing a new table.
///
/// Fails with `Error::StaleFinding` when either referenced rule is no
/// longer in the table: the table changed since analysis and silently
/// doing nothing would hide that.
pub fn apply_fix(table: &RuleTable, finding: &Finding) -> Result<RuleTable> {
    let later_pos = position_of(table, &finding.later_rule_id)?;
    position_of(table, &finding.earlier_rule_id)?;

    let mut out = table.clone();
    match finding.fix {
        Fix::None => {
            return Err(Error::UnsupportedFix(format!(
                "finding on rules '{}' and '{}' carries no suggested fix",
                finding.earlier_rule_id, finding.later_rule_id
            )));
        }
        Fix::RemoveLater => {
            out.rules.remove(later_pos);
        }
        Fix::MoveBefore => {
            let moved = out.rules.remove(later_pos);
            // Position of the earlier rule after the removal
            let earlier_pos = position_of(&out, &finding.earlier_rule_id)?;
            out.rules.insert(earlier_pos, moved);
        }
    }
    renumber_priorities(&mut out);
    Ok(out)
}

fn position_of(table: &RuleTable, rule_id: &str) -> Result<usize> {
    table
        .rules
        .iter()
        .position(|r| r.id == rule_id)
        .ok_or_else(|| Error::StaleFinding(rule_id.to_string()))
}

/// Restore the dense ascending priority invariant
fn renumber_priorities(table: &mut RuleTable) {
    for (idx, rule) in table.rules.iter_mut().enumerate() {
        rule.priority = idx;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::classify::FindingType;
    use crate::table::{CellValue, FieldDef, FieldType, HitPolicy, Rule};
    use std::collections::HashMap;

    fn rule(id: &str, priority: usize, age: &str) -> Rule {
        Rule {
            id: id.into(),
            priority,
            inputs: [("age".to_string(), CellValue::from(age))]
                .into_iter()
                .collect(),
            outputs: HashMap::new(),
        }
    }

    fn make_table(rules: Vec<Rule>) -> RuleTable {
        RuleTable {
            slug: "t".into(),
            hit_policy: HitPolicy::FirstHit,
            input_schema: vec![FieldDef {
                key: "age".into(),
                field_type: FieldType::Number,
            }],
            rules,
            ..Default::default()
        }
    }

    fn finding(fix: Fix, earlier: &str, later: &str) -> Finding {
        Finding {
            finding_type: FindingType::Overlap,
            message: String::new(),
            earlier_rule_id: earlier.into(),
            later_rule_id: later.into(),
            earlier_row: 2,
            later_row: 3,
            fix,
        }
    }

    #[test]
    fn test_remove_later_renumbers() {
        let table = make_table(vec![
            rule("r1", 0, ">0"),
            rule("r2", 1, ">10"),
            rule("r3", 2, "<0"),
        ]);
        let fixed = apply_fix(&table, &finding(Fix::RemoveLater, "r1", "r2")).unwrap();
        let ids: Vec<_> = fixed.rules.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r1", "r3"]);
        let priorities: Vec<_> = fixed.rules.iter().map(|r| r.priority).collect();
        assert_eq!(priorities, vec![0, 1]);
        // Input snapshot untouched
        assert_eq!(table.rules.len(), 3);
    }

    #[test]
    fn test_move_before_reorders_and_renumbers() {
        let table = make_table(vec![
            rule("r1", 0, ">18"),
            rule("r2", 1, "<5"),
            rule("r3", 2, "20..30"),
        ]);
        let fixed = apply_fix(&table, &finding(Fix::MoveBefore, "r1", "r3")).unwrap();
        let ids: Vec<_> = fixed.rules.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r3", "r1", "r2"]);
        let priorities: Vec<_> = fixed.rules.iter().map(|r| r.priority).collect();
        assert_eq!(priorities, vec![0, 1, 2]);
    }

    #[test]
    fn test_stale_finding_rejected() {
        let table = make_table(vec![rule("r1", 0, ">0"), rule("r2", 1, ">10")]);
        let err = apply_fix(&table, &finding(Fix::RemoveLater, "r1", "gone")).unwrap_err();
        assert!(matches!(err, Error::StaleFinding(id) if id == "gone"));

        let err = apply_fix(&table, &finding(Fix::MoveBefore, "gone", "r2")).unwrap_err();
        assert!(matches!(err, Error::StaleFinding(id) if id == "gone"));
    }

    #[test]
    fn test_fix_none_rejected() {
        let table = make_table(vec![rule("r1", 0, ">0"), rule("r2", 1, ">10")]);
        let err = apply_fix(&table, &finding(Fix::None, "r1", "r2")).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFix(_)));
    }
}
