//! Condition parsing — raw cell text to canonical `ConditionSpec`
//!
//! One cell of a rule row holds a textual condition for one input field.
//! The grammar (SAP-flavored, inherited from the table editor):
//!
//! - blank → wildcard, matches anything
//! - `CP <pattern>` → glob pattern; `*` = any run, `+` = one character
//! - `<min>..<max>` → inclusive numeric range
//! - `>n`, `>=n`, `<n`, `<=n` → numeric comparison
//! - `IN (a, b, c)` → set membership
//! - anything else → literal (numeric on number/decimal fields when it parses)
//!
//! Parsing never fails: unrecognized text degrades to a literal. This keeps
//! the analysis total over whatever the editing surface hands us; garbage
//! syntax is reported separately by `validate`.

use crate::table::{CellValue, FieldType};
use regex::Regex;
use std::sync::OnceLock;

const SIGNED_NUMBER: &str = r"[-+]?(?:\d+(?:\.\d+)?|\.\d+)";

pub(crate) fn range_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"^({n})\.\.({n})$", n = SIGNED_NUMBER)).expect("static regex")
    })
}

pub(crate) fn comparison_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"^(>=|<=|>|<)\s*({n})$", n = SIGNED_NUMBER)).expect("static regex")
    })
}

pub(crate) fn in_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)^IN\s*\((.*)\)$").expect("static regex"))
}

pub(crate) fn cp_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)^CP\s+(.+)$").expect("static regex"))
}

/// Comparison operators appearing in conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Gt,
    Ge,
    Lt,
    Le,
}

impl std::fmt::Display for CmpOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CmpOp::Gt => write!(f, ">"),
            CmpOp::Ge => write!(f, ">="),
            CmpOp::Lt => write!(f, "<"),
            CmpOp::Le => write!(f, "<="),
        }
    }
}

/// Set members; element type follows the field type
#[derive(Debug, Clone, PartialEq)]
pub enum SetValues {
    Strings(Vec<String>),
    Numbers(Vec<f64>),
}

impl SetValues {
    pub fn len(&self) -> usize {
        match self {
            SetValues::Strings(v) => v.len(),
            SetValues::Numbers(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Canonical symbolic form of one rule-field condition
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionSpec {
    /// Blank cell; matches any value
    Wildcard,
    ExactString(String),
    ExactNumber(f64),
    Set(SetValues),
    /// Both bounds inclusive
    Range { min: f64, max: f64 },
    Comparison { op: CmpOp, value: f64 },
    /// Glob: `*` any run, `+` exactly one character
    Pattern(String),
}

impl ConditionSpec {
    pub fn is_wildcard(&self) -> bool {
        matches!(self, ConditionSpec::Wildcard)
    }
}

/// Parse one raw cell into its canonical condition.
///
/// Infallible: text that fits no recognized shape becomes a literal.
pub fn parse(cell: &CellValue, field_type: FieldType) -> ConditionSpec {
    if cell.is_blank() {
        return ConditionSpec::Wildcard;
    }

    match cell {
        CellValue::Number(n) => {
            if field_type.is_numeric() {
                ConditionSpec::ExactNumber(*n)
            } else {
                ConditionSpec::ExactString(n.to_string())
            }
        }
        CellValue::Bool(b) => ConditionSpec::ExactString(b.to_string()),
        CellValue::Null => ConditionSpec::Wildcard,
        CellValue::String(raw) => parse_text(raw.trim(), field_type),
    }
}

fn parse_text(s: &str, field_type: FieldType) -> ConditionSpec {
    if let Some(caps) = cp_re().captures(s) {
        let pattern = strip_quotes(caps[1].trim());
        if !pattern.is_empty() {
            return ConditionSpec::Pattern(pattern);
        }
        // `CP ''` has no pattern; treat the whole cell as a literal
    }

    if let Some(caps) = range_re().captures(s) {
        if let (Ok(min), Ok(max)) = (caps[1].parse::<f64>(), caps[2].parse::<f64>()) {
            return ConditionSpec::Range { min, max };
        }
    }

    if let Some(caps) = comparison_re().captures(s) {
        if let Ok(value) = caps[2].parse::<f64>() {
            let op = match &caps[1] {
                ">" => CmpOp::Gt,
                ">=" => CmpOp::Ge,
                "<" => CmpOp::Lt,
                _ => CmpOp::Le,
            };
            return ConditionSpec::Comparison { op, value };
        }
    }

    if let Some(caps) = in_re().captures(s) {
        return ConditionSpec::Set(parse_set_members(&caps[1], field_type));
    }

    if field_type.is_numeric() {
        if let Ok(n) = s.parse::<f64>() {
            return ConditionSpec::ExactNumber(n);
        }
    }

    ConditionSpec::ExactString(strip_quotes(s))
}

fn parse_set_members(inner: &str, field_type: FieldType) -> SetValues {
    let tokens = inner
        .split(',')
        .map(|t| strip_quotes(t.trim()))
        .filter(|t| !t.is_empty());

    if field_type.is_numeric() {
        // Unparsable members cannot match a numeric value; drop them
        SetValues::Numbers(tokens.filter_map(|t| t.parse::<f64>().ok()).collect())
    } else {
        SetValues::Strings(tokens.collect())
    }
}

pub(crate) fn strip_quotes(s: &str) -> String {
    let bytes = s.as_bytes();
    if s.len() >= 2 && bytes[0] == bytes[s.len() - 1] && (bytes[0] == b'\'' || bytes[0] == b'"') {
        s[1..s.len() - 1].to_string()
    } else {
        s.to_string()
    }
}

/// Test whether a glob pattern matches a string.
///
/// Translated to an anchored regex with literal segments escaped.
pub fn pattern_matches(pattern: &str, text: &str) -> bool {
    let mut rx = String::with_capacity(pattern.len() + 8);
    rx.push('^');
    for ch in pattern.chars() {
        match ch {
            '*' => rx.push_str(".*"),
            '+' => rx.push('.'),
            _ => rx.push_str(&regex::escape(&ch.to_string())),
        }
    }
    rx.push('$');
    Regex::new(&rx).map(|re| re.is_match(text)).unwrap_or(false)
}

/// The universal pattern matches every string
pub fn is_universal_pattern(pattern: &str) -> bool {
    !pattern.is_empty() && pattern.chars().all(|c| c == '*')
}
