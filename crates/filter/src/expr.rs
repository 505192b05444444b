//! Filter expression types (AST nodes).

use std::borrow::Cow;
use std::fmt;

use crate::encode::{encode_bytes, encode_str};

/// A parsed filter expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterExpr {
    /// True iff every child is true; empty is true
    And(Vec<FilterExpr>),
    /// True iff any child is true; empty is false
    Or(Vec<FilterExpr>),
    /// Negation
    Not(Box<FilterExpr>),
    /// Single attribute assertion
    Atomic {
        /// Attribute id to test
        attr: String,
        /// Comparison operator
        kind: MatchKind,
        /// Assertion value
        pattern: Pattern,
    },
}

impl FilterExpr {
    /// Build an atomic assertion
    pub fn atomic(attr: impl Into<String>, kind: MatchKind, pattern: Pattern) -> Self {
        FilterExpr::Atomic {
            attr: attr.into(),
            kind,
            pattern,
        }
    }

    /// Negate an expression
    pub fn not(inner: FilterExpr) -> Self {
        FilterExpr::Not(Box::new(inner))
    }
}

impl fmt::Display for FilterExpr {
    /// Canonical filter text; parsing it yields an equal expression
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterExpr::And(parts) => {
                f.write_str("(&")?;
                for p in parts {
                    write!(f, "{p}")?;
                }
                f.write_str(")")
            }
            FilterExpr::Or(parts) => {
                f.write_str("(|")?;
                for p in parts {
                    write!(f, "{p}")?;
                }
                f.write_str(")")
            }
            FilterExpr::Not(inner) => write!(f, "(!{inner})"),
            FilterExpr::Atomic {
                attr,
                kind,
                pattern,
            } => write!(f, "({attr}{}{pattern})", kind.operator()),
        }
    }
}

/// Comparison operator of an atomic assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchKind {
    /// `=`: case-insensitive wildcard match
    Equal,
    /// `~=`: same semantics as Equal
    Approx,
    /// `>=`: lexicographic, value >= pattern
    GreaterEq,
    /// `<=`: lexicographic, value <= pattern
    LessEq,
}

impl MatchKind {
    /// Operator text as written in a filter
    pub fn operator(self) -> &'static str {
        match self {
            MatchKind::Equal => "=",
            MatchKind::Approx => "~=",
            MatchKind::GreaterEq => ">=",
            MatchKind::LessEq => "<=",
        }
    }
}

// =============================================================================
// Pattern
// =============================================================================

/// One piece of an assertion value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PatternPart {
    /// Unescaped literal octets
    Literal(Vec<u8>),
    /// `*`
    Wildcard,
}

/// An unescaped assertion value split at its wildcards.
///
/// Consecutive wildcards collapse into one and empty literals are dropped, so
/// literals and wildcards always alternate. An escaped `\2a` is a literal
/// `*` and never a wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Pattern {
    parts: Vec<PatternPart>,
}

impl Pattern {
    /// Build a pattern from parts, normalizing as described above
    pub fn new(parts: impl IntoIterator<Item = PatternPart>) -> Self {
        let mut out: Vec<PatternPart> = Vec::new();
        for part in parts {
            match part {
                PatternPart::Wildcard => {
                    if out.last() != Some(&PatternPart::Wildcard) {
                        out.push(PatternPart::Wildcard);
                    }
                }
                PatternPart::Literal(bytes) if bytes.is_empty() => {}
                PatternPart::Literal(bytes) => match out.last_mut() {
                    Some(PatternPart::Literal(prev)) => prev.extend_from_slice(&bytes),
                    _ => out.push(PatternPart::Literal(bytes)),
                },
            }
        }
        Pattern { parts: out }
    }

    /// A wildcard-free pattern
    pub fn literal(value: impl Into<Vec<u8>>) -> Self {
        Self::new([PatternPart::Literal(value.into())])
    }

    /// The bare `*` pattern
    pub fn presence() -> Self {
        Self::new([PatternPart::Wildcard])
    }

    /// Parts in order
    pub fn parts(&self) -> &[PatternPart] {
        &self.parts
    }

    /// True for the bare `*` pattern
    pub fn is_presence(&self) -> bool {
        self.parts == [PatternPart::Wildcard]
    }

    /// True if any wildcard is present
    pub fn has_wildcard(&self) -> bool {
        self.parts.contains(&PatternPart::Wildcard)
    }

    /// Literal chunks in order
    pub fn literals(&self) -> impl Iterator<Item = &[u8]> {
        self.parts.iter().filter_map(|p| match p {
            PatternPart::Literal(b) => Some(b.as_slice()),
            PatternPart::Wildcard => None,
        })
    }

    /// Octets compared by the ordering operators, wildcards rendered as `*`
    pub fn ordering_bytes(&self) -> Cow<'_, [u8]> {
        match self.parts.as_slice() {
            [] => Cow::Borrowed(&[]),
            [PatternPart::Literal(b)] => Cow::Borrowed(b),
            parts => {
                let mut out = Vec::new();
                for p in parts {
                    match p {
                        PatternPart::Literal(b) => out.extend_from_slice(b),
                        PatternPart::Wildcard => out.push(b'*'),
                    }
                }
                Cow::Owned(out)
            }
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for p in &self.parts {
            match p {
                PatternPart::Wildcard => f.write_str("*")?,
                PatternPart::Literal(b) => match std::str::from_utf8(b) {
                    Ok(s) => f.write_str(&encode_str(s))?,
                    Err(_) => f.write_str(&encode_bytes(b))?,
                },
            }
        }
        Ok(())
    }
}
