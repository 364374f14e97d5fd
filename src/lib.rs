// Production-quality lints
#![warn(
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
// Deny truly dangerous patterns
#![deny(clippy::mem_forget)]
// Allow common patterns in library code
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! # Rulelint — static conflict analysis for decision tables
//!
//! A decision table is an ordered set of prioritized, condition-based
//! rules sharing one input/output schema and a hit policy. Rulelint
//! analyzes a table snapshot for logical defects:
//!
//! - **Overlap** — two rules can match the same input
//! - **Shadowed** — a rule is fully covered by an equally specific earlier rule
//! - **Unreachable** — a rule is fully covered by a broader earlier rule
//!   and can never fire under FIRST_HIT
//!
//! and proposes safe automatic fixes (remove the dead rule, or move the
//! more specific rule ahead).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rulelint::{analyze, apply_fix, RuleTable};
//!
//! let table = RuleTable::from_yaml(r#"
//!   slug: loyalty_discount
//!   hit_policy: FIRST_HIT
//!   input_schema:
//!     - key: age
//!       type: number
//!   output_schema:
//!     - key: discount
//!       type: decimal
//!   rules:
//!     - id: r1
//!       priority: 0
//!       inputs: { age: "" }
//!       outputs: { discount: 0.1 }
//!     - id: r2
//!       priority: 1
//!       inputs: { age: ">65" }
//!       outputs: { discount: 0.2 }
//! "#)?;
//!
//! let result = analyze(&table);
//! for finding in &result.findings {
//!     println!("{}", finding.message); // r2 is unreachable behind wildcard r1
//! }
//!
//! // Accept a finding, get a new table, re-analyze
//! let fixed = apply_fix(&table, &result.findings[0])?;
//! let result = analyze(&fixed);
//! assert!(result.is_clean());
//! ```
//!
//! ## Condition Grammar
//!
//! Raw cell text is parsed per field into a canonical condition:
//!
//! | Cell | Meaning |
//! |------|---------|
//! | blank | wildcard, matches anything |
//! | `gold` | exact literal |
//! | `18..65` | inclusive numeric range |
//! | `>=41` | numeric comparison |
//! | `IN (gold, silver)` | set membership |
//! | `CP A+C*` | glob pattern (`*` any run, `+` one character) |
//!
//! Parsing never fails; unrecognized text is treated as a literal and
//! flagged separately by [`validate_table`].
//!
//! ## Three-Valued Relations
//!
//! Field relations are [`Ternary`]: `Yes`, `No`, or `Unknown`. Some
//! relationships (glob containment in particular) are deliberately
//! reported as `Unknown` rather than guessed; `Unknown` never produces
//! a finding. Analysis is a pure function of the snapshot — no I/O, no
//! shared state, same findings in the same order on every call.

pub mod condition;
pub mod conflict;
pub mod error;
pub mod table;
pub mod validate;

// Re-exports
pub use condition::{parse, pattern_matches, CmpOp, ConditionSpec, SetValues};
pub use conflict::{
    analyze, apply_fix, condition_weight, covers, overlaps, rule_covers, rule_overlaps,
    rule_specificity, ConflictAnalysisResult, Finding, FindingType, Fix, Ternary,
};
pub use error::{Error, Result};
pub use table::{CellValue, FieldDef, FieldType, HitPolicy, Rule, RuleTable};
pub use validate::{validate_syntax, validate_table, ValidationIssue, ValidationReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
