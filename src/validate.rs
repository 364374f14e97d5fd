//! Per-rule syntax and schema validation
//!
//! Diagnostics for the table editor's bulk "consistency check": malformed
//! condition text (inverted ranges, bad comparisons, broken `IN`/`CP`
//! syntax) and schema violations (missing or unknown fields, conditions
//! mathematically incompatible with the field type).
//!
//! Purely advisory. The condition parser is total and the conflict
//! classifier runs regardless; these issues tell the author *why* a cell
//! is being read as a literal instead of an operator.

use crate::condition::{comparison_re, cp_re, in_re, range_re, strip_quotes};
use crate::table::{FieldType, Rule, RuleTable};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One problem on one rule row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct ValidationIssue {
    /// CSV-style row number (row 1 is the header)
    pub row: usize,
    pub rule_id: String,
    /// Affected input field, when the issue is field-scoped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

/// Aggregated result of validating every rule in a table
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ValidationReport {
    pub total_rules: usize,
    pub error_count: usize,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.error_count == 0
    }
}

/// Check one condition string for valid, logically sensible syntax.
///
/// Returns false for garbage: inverted ranges, comparison prefixes that
/// fail the comparison grammar, `IN` without its parentheses, `CP` with
/// an empty pattern. Plain literals are always valid.
pub fn validate_syntax(condition: &str) -> bool {
    let s = condition.trim();

    if let Some(caps) = range_re().captures(s) {
        // Inverted range matches nothing; flag it rather than parse it
        return match (caps[1].parse::<f64>(), caps[2].parse::<f64>()) {
            (Ok(min), Ok(max)) => min <= max,
            _ => false,
        };
    }

    if s.contains('>') || s.contains('<') {
        if comparison_re().is_match(s) {
            return true;
        }
        if s.starts_with('>') || s.starts_with('<') {
            return false;
        }
        // Operator in the middle of a literal is just a literal
    }

    let upper = s.to_uppercase();

    if upper.starts_with("IN") {
        return in_re().is_match(s);
    }

    if upper.starts_with("CP") {
        return match cp_re().captures(s) {
            Some(caps) => !strip_quotes(caps[1].trim()).is_empty(),
            None => false,
        };
    }

    true
}

/// Validate every rule against the table schema and condition grammar
pub fn validate_table(table: &RuleTable) -> ValidationReport {
    let mut issues = Vec::new();

    for (idx, rule) in table.rules.iter().enumerate() {
        let row = idx + 2; // CSV-style row index (1 = header)
        check_schema(table, rule, row, &mut issues);
        check_syntax(table, rule, row, &mut issues);
    }

    ValidationReport {
        total_rules: table.rules.len(),
        error_count: issues.len(),
        issues,
    }
}

fn check_schema(table: &RuleTable, rule: &Rule, row: usize, issues: &mut Vec<ValidationIssue>) {
    for field in &table.input_schema {
        if !rule.inputs.contains_key(&field.key) {
            issues.push(ValidationIssue {
                row,
                rule_id: rule.id.clone(),
                field: Some(field.key.clone()),
                message: format!("Missing required input field '{}'", field.key),
            });
        }
    }

    let mut input_keys: Vec<&String> = rule.inputs.keys().collect();
    input_keys.sort();
    for key in input_keys {
        let Some(field_type) = table.input_type(key) else {
            issues.push(ValidationIssue {
                row,
                rule_id: rule.id.clone(),
                field: Some(key.clone()),
                message: format!("Input field '{}' not defined in table schema", key),
            });
            continue;
        };

        let condition = rule.input_text(key);
        let s = condition.trim();
        let is_cp = cp_re().is_match(s);
        let is_range = range_re().is_match(s);
        let has_comparison_prefix = s.starts_with('>') || s.starts_with('<');

        // Conditions mathematically incompatible with the field type
        match field_type {
            FieldType::Boolean => {
                if is_range || has_comparison_prefix {
                    issues.push(ValidationIssue {
                        row,
                        rule_id: rule.id.clone(),
                        field: Some(key.clone()),
                        message: format!(
                            "Field '{}' is boolean and does not support range or comparison logic",
                            key
                        ),
                    });
                }
                if is_cp {
                    issues.push(ValidationIssue {
                        row,
                        rule_id: rule.id.clone(),
                        field: Some(key.clone()),
                        message: format!(
                            "Field '{}' is boolean and does not support CP pattern logic",
                            key
                        ),
                    });
                }
            }
            FieldType::Number | FieldType::Decimal => {
                if is_cp {
                    issues.push(ValidationIssue {
                        row,
                        rule_id: rule.id.clone(),
                        field: Some(key.clone()),
                        message: format!(
                            "Field '{}' is numeric and does not support CP pattern logic",
                            key
                        ),
                    });
                }
            }
            FieldType::String => {
                if is_range || has_comparison_prefix {
                    issues.push(ValidationIssue {
                        row,
                        rule_id: rule.id.clone(),
                        field: Some(key.clone()),
                        message: format!(
                            "Field '{}' is string and does not support numeric range/comparison operators",
                            key
                        ),
                    });
                }
            }
        }
    }

    let output_keys: std::collections::HashSet<&str> =
        table.output_schema.iter().map(|f| f.key.as_str()).collect();
    let mut rule_outputs: Vec<&String> = rule.outputs.keys().collect();
    rule_outputs.sort();
    for key in rule_outputs {
        if !output_keys.contains(key.as_str()) {
            issues.push(ValidationIssue {
                row,
                rule_id: rule.id.clone(),
                field: Some(key.clone()),
                message: format!("Output field '{}' not defined in table schema", key),
            });
        }
    }
}

fn check_syntax(table: &RuleTable, rule: &Rule, row: usize, issues: &mut Vec<ValidationIssue>) {
    for field in &table.input_schema {
        if !rule.inputs.contains_key(&field.key) {
            continue;
        }
        let condition = rule.input_text(&field.key);
        if !validate_syntax(&condition) {
            issues.push(ValidationIssue {
                row,
                rule_id: rule.id.clone(),
                field: Some(field.key.clone()),
                message: format!(
                    "Invalid syntax for field '{}': '{}'",
                    field.key, condition
                ),
            });
        }
    }
}
