//! Field-level set relations between two condition specs
//!
//! `covers(earlier, later)`: does every value matching `later` also match
//! `earlier`? `overlaps(a, b)`: can some value match both at once?
//!
//! Both are three-valued. Numeric shapes reduce to intervals and are fully
//! decidable; glob-vs-glob is deliberately not solved and reports `Unknown`
//! unless the patterns are identical or one is the universal `*`.

use crate::condition::{is_universal_pattern, pattern_matches, CmpOp, ConditionSpec, SetValues};

/// Three-valued relation result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ternary {
    Yes,
    No,
    Unknown,
}

impl Ternary {
    pub fn from_bool(b: bool) -> Self {
        if b {
            Ternary::Yes
        } else {
            Ternary::No
        }
    }

    /// Combine per-field results into a whole-rule verdict:
    /// `No` dominates; else `Unknown` if any is `Unknown`; else `Yes`.
    pub fn all_of(results: impl IntoIterator<Item = Ternary>) -> Ternary {
        let mut out = Ternary::Yes;
        for r in results {
            match r {
                Ternary::No => return Ternary::No,
                Ternary::Unknown => out = Ternary::Unknown,
                Ternary::Yes => {}
            }
        }
        out
    }
}

/// Numeric value interval with per-bound inclusiveness
#[derive(Debug, Clone, Copy, PartialEq)]
struct Interval {
    min: f64,
    max: f64,
    min_incl: bool,
    max_incl: bool,
}

impl Interval {
    fn point(v: f64) -> Self {
        Interval {
            min: v,
            max: v,
            min_incl: true,
            max_incl: true,
        }
    }

    fn as_point(&self) -> Option<f64> {
        if self.min == self.max && self.min_incl && self.max_incl {
            Some(self.min)
        } else {
            None
        }
    }

    fn contains(&self, v: f64) -> bool {
        let above = v > self.min || (v == self.min && self.min_incl);
        let below = v < self.max || (v == self.max && self.max_incl);
        above && below
    }

    /// Every value in `other` is also in `self`
    fn covers(&self, other: &Interval) -> bool {
        let lower_ok = self.min < other.min
            || (self.min == other.min && (self.min_incl || !other.min_incl));
        let upper_ok = self.max > other.max
            || (self.max == other.max && (self.max_incl || !other.max_incl));
        lower_ok && upper_ok
    }

    /// Some value lies in both intervals. A boundary touch counts only
    /// when both touching bounds are inclusive.
    fn overlaps(&self, other: &Interval) -> bool {
        let lo = self.min.max(other.min);
        let hi = self.max.min(other.max);
        if lo < hi {
            true
        } else if lo > hi {
            false
        } else {
            self.contains(lo) && other.contains(lo)
        }
    }
}

/// Interval form of a numeric spec, if it has one
fn as_interval(spec: &ConditionSpec) -> Option<Interval> {
    match spec {
        ConditionSpec::ExactNumber(n) => Some(Interval::point(*n)),
        ConditionSpec::Range { min, max } => Some(Interval {
            min: *min,
            max: *max,
            min_incl: true,
            max_incl: true,
        }),
        ConditionSpec::Comparison { op, value } => Some(match op {
            CmpOp::Gt => Interval {
                min: *value,
                max: f64::INFINITY,
                min_incl: false,
                max_incl: false,
            },
            CmpOp::Ge => Interval {
                min: *value,
                max: f64::INFINITY,
                min_incl: true,
                max_incl: false,
            },
            CmpOp::Lt => Interval {
                min: f64::NEG_INFINITY,
                max: *value,
                min_incl: false,
                max_incl: false,
            },
            CmpOp::Le => Interval {
                min: f64::NEG_INFINITY,
                max: *value,
                min_incl: false,
                max_incl: true,
            },
        }),
        _ => None,
    }
}

/// A pattern with no wildcard characters is just a literal
fn pattern_literal(pattern: &str) -> Option<&str> {
    if pattern.contains(['*', '+']) {
        None
    } else {
        Some(pattern)
    }
}

/// Does every value matching `later` also match `earlier`?
pub fn covers(earlier: &ConditionSpec, later: &ConditionSpec) -> Ternary {
    use ConditionSpec::*;

    if earlier.is_wildcard() {
        return Ternary::Yes;
    }
    if later.is_wildcard() {
        return Ternary::No;
    }

    match (as_interval(earlier), as_interval(later)) {
        (Some(a), Some(b)) => return Ternary::from_bool(a.covers(&b)),
        (Some(a), None) => {
            return match later {
                Set(SetValues::Numbers(members)) => {
                    Ternary::from_bool(members.iter().all(|m| a.contains(*m)))
                }
                // An unparsable literal on a numeric field denotes no number
                ExactString(_) => Ternary::No,
                _ => Ternary::Unknown,
            };
        }
        (None, Some(b)) => {
            return match earlier {
                // A finite set covers an interval only when it collapses to a point
                Set(SetValues::Numbers(members)) => match b.as_point() {
                    Some(p) => Ternary::from_bool(members.iter().any(|m| *m == p)),
                    None => Ternary::No,
                },
                ExactString(_) => Ternary::No,
                _ => Ternary::Unknown,
            };
        }
        (None, None) => {}
    }

    match (earlier, later) {
        (ExactString(a), ExactString(b)) => Ternary::from_bool(a == b),
        (Set(SetValues::Strings(m)), ExactString(s)) => Ternary::from_bool(m.contains(s)),
        (ExactString(s), Set(SetValues::Strings(m))) => {
            Ternary::from_bool(m.iter().all(|x| x == s))
        }
        (Set(SetValues::Strings(a)), Set(SetValues::Strings(b))) => {
            Ternary::from_bool(b.iter().all(|x| a.contains(x)))
        }
        (Set(SetValues::Numbers(a)), Set(SetValues::Numbers(b))) => {
            Ternary::from_bool(b.iter().all(|x| a.contains(x)))
        }
        (Set(SetValues::Numbers(_)), ExactString(_))
        | (ExactString(_), Set(SetValues::Numbers(_))) => Ternary::No,
        (Pattern(p), ExactString(s)) => Ternary::from_bool(pattern_matches(p, s)),
        (Pattern(p), Set(SetValues::Strings(m))) => {
            Ternary::from_bool(m.iter().all(|s| pattern_matches(p, s)))
        }
        (ExactString(s), Pattern(p)) => match pattern_literal(p) {
            Some(lit) => Ternary::from_bool(lit == s),
            None => Ternary::No,
        },
        (Set(SetValues::Strings(m)), Pattern(p)) => match pattern_literal(p) {
            Some(lit) => Ternary::from_bool(m.iter().any(|s| s == lit)),
            None => Ternary::No,
        },
        (Pattern(p), Pattern(q)) => {
            if p == q || is_universal_pattern(p) {
                Ternary::Yes
            } else if is_universal_pattern(q) {
                // Nothing narrower covers the universal pattern
                Ternary::No
            } else {
                Ternary::Unknown
            }
        }
        _ => Ternary::Unknown,
    }
}

/// Can some value match both specs simultaneously?
pub fn overlaps(a: &ConditionSpec, b: &ConditionSpec) -> Ternary {
    use ConditionSpec::*;

    if a.is_wildcard() || b.is_wildcard() {
        return Ternary::Yes;
    }

    match (as_interval(a), as_interval(b)) {
        (Some(ia), Some(ib)) => return Ternary::from_bool(ia.overlaps(&ib)),
        (Some(iv), None) => return interval_overlaps_other(&iv, b),
        (None, Some(iv)) => return interval_overlaps_other(&iv, a),
        (None, None) => {}
    }

    match (a, b) {
        (ExactString(x), ExactString(y)) => Ternary::from_bool(x == y),
        (Set(SetValues::Strings(m)), ExactString(s))
        | (ExactString(s), Set(SetValues::Strings(m))) => Ternary::from_bool(m.contains(s)),
        (Set(SetValues::Strings(x)), Set(SetValues::Strings(y))) => {
            Ternary::from_bool(x.iter().any(|v| y.contains(v)))
        }
        (Set(SetValues::Numbers(x)), Set(SetValues::Numbers(y))) => {
            Ternary::from_bool(x.iter().any(|v| y.contains(v)))
        }
        (Set(SetValues::Numbers(_)), ExactString(_))
        | (ExactString(_), Set(SetValues::Numbers(_))) => Ternary::No,
        (Pattern(p), ExactString(s)) | (ExactString(s), Pattern(p)) => {
            Ternary::from_bool(pattern_matches(p, s))
        }
        (Pattern(p), Set(SetValues::Strings(m))) | (Set(SetValues::Strings(m)), Pattern(p)) => {
            Ternary::from_bool(m.iter().any(|s| pattern_matches(p, s)))
        }
        (Pattern(p), Pattern(q)) => {
            if p == q || is_universal_pattern(p) || is_universal_pattern(q) {
                Ternary::Yes
            } else {
                Ternary::Unknown
            }
        }
        _ => Ternary::Unknown,
    }
}

fn interval_overlaps_other(iv: &Interval, other: &ConditionSpec) -> Ternary {
    match other {
        ConditionSpec::Set(SetValues::Numbers(members)) => {
            Ternary::from_bool(members.iter().any(|m| iv.contains(*m)))
        }
        ConditionSpec::ExactString(_) => Ternary::No,
        _ => Ternary::Unknown,
    }
}
