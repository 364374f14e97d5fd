//! Conflict classification across a whole rule table
//!
//! Walks the rules in priority order and reports, per later rule, at most
//! one blocking finding (`Unreachable` or `Shadowed`) and, when unblocked,
//! at most one `Overlap` finding against the first earlier rule involved.
//!
//! Under FIRST_HIT an earlier covering rule makes the later one dead and
//! dropping it is always safe. Under COLLECT_ALL and UNIQUE order carries
//! no suppression semantics, so only overlaps are reported and no reorder
//! is ever suggested.

use crate::condition::{parse, ConditionSpec};
use crate::conflict::relation::{covers, overlaps, Ternary};
use crate::conflict::specificity::condition_weight;
use crate::table::{HitPolicy, Rule, RuleTable};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Classification of a detected conflict
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub enum FindingType {
    /// Both rules can match the same input
    Overlap,
    /// The later rule is fully covered by an equally-or-more specific earlier rule
    Shadowed,
    /// The later rule is fully covered by a broader earlier rule and can never fire
    Unreachable,
}

/// Suggested remediation for a finding
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Fix {
    /// No safe automatic fix
    #[default]
    None,
    /// Delete the later rule; no input can ever select it
    RemoveLater,
    /// Reinsert the later rule immediately before the earlier one
    MoveBefore,
}

/// A detected conflict between two rules
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct Finding {
    pub finding_type: FindingType,
    pub message: String,
    pub earlier_rule_id: String,
    pub later_rule_id: String,
    /// CSV-style row numbers (row 1 is the header, rules start at 2)
    pub earlier_row: usize,
    pub later_row: usize,
    pub fix: Fix,
}

/// Result of one analysis pass over a table snapshot
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ConflictAnalysisResult {
    pub findings: Vec<Finding>,
    /// Hash of the analyzed snapshot; lets callers detect staleness
    pub table_hash: String,
}

impl ConflictAnalysisResult {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

/// One rule with its conditions parsed against the table schema
struct ParsedRule<'a> {
    rule: &'a Rule,
    specs: Vec<ConditionSpec>,
    raw: Vec<String>,
    specificity: u32,
    all_wildcard: bool,
}

fn parse_rule<'a>(table: &RuleTable, rule: &'a Rule) -> ParsedRule<'a> {
    let mut specs = Vec::with_capacity(table.input_schema.len());
    let mut raw = Vec::with_capacity(table.input_schema.len());
    for field in &table.input_schema {
        specs.push(parse(&rule.input_cell(&field.key), field.field_type));
        raw.push(rule.input_text(&field.key));
    }
    let specificity = specs.iter().map(condition_weight).sum();
    let all_wildcard = specs.iter().all(ConditionSpec::is_wildcard);
    ParsedRule {
        rule,
        specs,
        raw,
        specificity,
        all_wildcard,
    }
}

fn covers_all(earlier: &ParsedRule, later: &ParsedRule) -> Ternary {
    Ternary::all_of(
        earlier
            .specs
            .iter()
            .zip(&later.specs)
            .map(|(e, l)| covers(e, l)),
    )
}

fn overlaps_all(a: &ParsedRule, b: &ParsedRule) -> Ternary {
    // Rules touching only through unconstrained dimensions carry no
    // actionable relationship; require a field both rules constrain.
    let shares_constrained_field = a
        .specs
        .iter()
        .zip(&b.specs)
        .any(|(x, y)| !x.is_wildcard() && !y.is_wildcard());
    if !shares_constrained_field {
        return Ternary::Unknown;
    }
    Ternary::all_of(a.specs.iter().zip(&b.specs).map(|(x, y)| overlaps(x, y)))
}

/// Whether every value matching `later` also matches `earlier`, field by field
pub fn rule_covers(table: &RuleTable, earlier: &Rule, later: &Rule) -> Ternary {
    covers_all(&parse_rule(table, earlier), &parse_rule(table, later))
}

/// Whether some context can match both rules; `Unknown` when the rules
/// share no constrained field
pub fn rule_overlaps(table: &RuleTable, a: &Rule, b: &Rule) -> Ternary {
    overlaps_all(&parse_rule(table, a), &parse_rule(table, b))
}

/// Row 1 is the header row; rules are rows 2..
fn row_number(index: usize) -> usize {
    index + 2
}

/// Analyze a table snapshot for conflicting rules.
///
/// Pure and deterministic: the same snapshot always yields the same
/// findings in the same order. Conditions are re-parsed from raw cells on
/// every call; no state survives between runs.
pub fn analyze(table: &RuleTable) -> ConflictAnalysisResult {
    let parsed: Vec<ParsedRule> = table
        .rules
        .iter()
        .map(|rule| parse_rule(table, rule))
        .collect();
    let first_hit = table.hit_policy == HitPolicy::FirstHit;

    let mut findings = Vec::new();
    for j in 1..parsed.len() {
        let later = &parsed[j];
        let mut blocked = false;

        if first_hit {
            for (i, earlier) in parsed[..j].iter().enumerate() {
                if covers_all(earlier, later) == Ternary::Yes {
                    findings.push(blocking_finding(earlier, later, i, j));
                    blocked = true;
                    break;
                }
            }
        }

        if !blocked {
            for (i, earlier) in parsed[..j].iter().enumerate() {
                if overlaps_all(earlier, later) == Ternary::Yes {
                    findings.push(overlap_finding(earlier, later, i, j, first_hit));
                    break;
                }
            }
        }
    }

    ConflictAnalysisResult {
        findings,
        table_hash: table.hash(),
    }
}

fn blocking_finding(earlier: &ParsedRule, later: &ParsedRule, i: usize, j: usize) -> Finding {
    // A broader earlier rule makes the later one unreachable; an equally
    // or more specific one (or an identical duplicate) shadows it. Either
    // way no context value can select the later rule, so removal is safe.
    let broader = earlier.all_wildcard || earlier.specificity < later.specificity;
    let identical = earlier.raw == later.raw;
    let (finding_type, message) = if broader && !identical {
        (
            FindingType::Unreachable,
            format!(
                "Rule '{}' (row {}) can never fire: broader rule '{}' (row {}) accepts every value it accepts",
                later.rule.id,
                row_number(j),
                earlier.rule.id,
                row_number(i),
            ),
        )
    } else {
        (
            FindingType::Shadowed,
            format!(
                "Rule '{}' (row {}) is shadowed by earlier rule '{}' (row {})",
                later.rule.id,
                row_number(j),
                earlier.rule.id,
                row_number(i),
            ),
        )
    };
    Finding {
        finding_type,
        message,
        earlier_rule_id: earlier.rule.id.clone(),
        later_rule_id: later.rule.id.clone(),
        earlier_row: row_number(i),
        later_row: row_number(j),
        fix: Fix::RemoveLater,
    }
}

fn overlap_finding(
    earlier: &ParsedRule,
    later: &ParsedRule,
    i: usize,
    j: usize,
    first_hit: bool,
) -> Finding {
    // Moving the narrower rule ahead is only meaningful under FIRST_HIT,
    // and only safe when the later rule is strictly more specific.
    let fix = if first_hit && later.specificity > earlier.specificity {
        Fix::MoveBefore
    } else {
        Fix::None
    };
    Finding {
        finding_type: FindingType::Overlap,
        message: format!(
            "Rules '{}' (row {}) and '{}' (row {}) can match the same input",
            earlier.rule.id,
            row_number(i),
            later.rule.id,
            row_number(j),
        ),
        earlier_rule_id: earlier.rule.id.clone(),
        later_rule_id: later.rule.id.clone(),
        earlier_row: row_number(i),
        later_row: row_number(j),
        fix,
    }
}
