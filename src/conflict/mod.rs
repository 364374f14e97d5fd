//! Conflict analysis for decision tables
//!
//! This module finds logical defects in a prioritized rule table:
//! - Unreachable rules (fully covered by a broader earlier rule)
//! - Shadowed rules (fully covered by an equally specific earlier rule)
//! - Overlapping rules (some input can match both)
//!
//! Conditions are reduced to canonical specs, compared field by field with
//! three-valued logic, and aggregated into whole-rule verdicts under the
//! table's hit policy.
//!
//! ## Submodules
//!
//! - `relation` - three-valued field-level Covers/Overlaps
//! - `specificity` - restrictiveness scoring for tie-breaks
//! - `classify` - whole-table classification into findings
//! - `fix` - applying accepted fixes and renumbering priorities
//!
//! ## Example
//!
//! ```ignore
//! use rulelint::{analyze, apply_fix};
//!
//! let result = analyze(&table);
//! for finding in &result.findings {
//!     println!("{}", finding.message);
//! }
//! if let Some(finding) = result.findings.first() {
//!     let fixed = apply_fix(&table, finding)?;
//!     let result = analyze(&fixed); // findings are stale after any edit
//! }
//! ```

mod classify;
mod fix;
mod relation;
mod specificity;

pub use classify::{
    analyze, rule_covers, rule_overlaps, ConflictAnalysisResult, Finding, FindingType, Fix,
};
pub use fix::apply_fix;
pub use relation::{covers, overlaps, Ternary};
pub use specificity::{condition_weight, rule_specificity};
