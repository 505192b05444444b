//! Evaluation of filter expressions against attribute sets.

use hiermem_core::{AttrValue, Attributes};

use super::expr::{FilterExpr, MatchKind, Pattern, PatternPart};

impl FilterExpr {
    /// Evaluate this expression against a candidate's attributes.
    pub fn evaluate(&self, attrs: &Attributes) -> bool {
        match self {
            FilterExpr::And(parts) => parts.iter().all(|p| p.evaluate(attrs)),
            FilterExpr::Or(parts) => parts.iter().any(|p| p.evaluate(attrs)),
            FilterExpr::Not(inner) => !inner.evaluate(attrs),
            FilterExpr::Atomic {
                attr,
                kind,
                pattern,
            } => evaluate_atomic(attrs, attr, *kind, pattern),
        }
    }
}

fn evaluate_atomic(attrs: &Attributes, id: &str, kind: MatchKind, pattern: &Pattern) -> bool {
    let Some(attr) = attrs.get(id) else {
        return false;
    };

    match kind {
        MatchKind::Equal | MatchKind::Approx => {
            // A bare `*` is a presence test and holds even with zero values.
            if pattern.is_presence() {
                return true;
            }
            attr.values().iter().any(|v| wildcard_matches(pattern, v))
        }
        MatchKind::GreaterEq => {
            let bound = pattern.ordering_bytes();
            attr.values().iter().any(|v| v.as_bytes() >= &*bound)
        }
        MatchKind::LessEq => {
            let bound = pattern.ordering_bytes();
            attr.values().iter().any(|v| v.as_bytes() <= &*bound)
        }
    }
}

/// Case-insensitive wildcard match of `pattern` against a single value.
///
/// Without wildcards the whole value must equal the pattern. Otherwise the
/// literal chunks must occur in order without overlapping, the first one at
/// the start of the value unless the pattern opens with `*`, the last one at
/// the end unless the pattern closes with `*`.
pub fn wildcard_matches(pattern: &Pattern, value: &AttrValue) -> bool {
    let (candidate, fold): (Vec<u8>, fn(&[u8]) -> Vec<u8>) = match value {
        AttrValue::Text(s) => (fold_str(s), fold_text),
        AttrValue::Bytes(b) => (b.to_ascii_lowercase(), fold_ascii),
    };
    let candidate = candidate.as_slice();

    let parts = pattern.parts();
    if !pattern.has_wildcard() {
        let literal = pattern.literals().next().unwrap_or(&[]);
        return fold(literal) == candidate;
    }

    let literals: Vec<Vec<u8>> = pattern.literals().map(fold).collect();
    if literals.is_empty() {
        return true;
    }

    let anchored_start = !matches!(parts.first(), Some(PatternPart::Wildcard));
    let anchored_end = !matches!(parts.last(), Some(PatternPart::Wildcard));

    let mut lo = 0;
    let mut hi = candidate.len();
    let mut middle: &[Vec<u8>] = &literals;

    if anchored_start {
        let first = &middle[0];
        if !candidate.starts_with(first) {
            return false;
        }
        lo = first.len();
        middle = &middle[1..];
    }

    if anchored_end {
        let Some((last, rest)) = middle.split_last() else {
            return false;
        };
        if candidate.len() < lo + last.len() || !candidate.ends_with(last) {
            return false;
        }
        hi = candidate.len() - last.len();
        middle = rest;
    }

    for chunk in middle {
        match find(&candidate[lo..hi], chunk) {
            Some(at) => lo += at + chunk.len(),
            None => return false,
        }
    }
    true
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

// Text values fold char by char with Unicode lowercase, so pattern chunks
// that are valid UTF-8 must fold the same way. Binary values only ever fold
// ASCII.
fn fold_text(bytes: &[u8]) -> Vec<u8> {
    match std::str::from_utf8(bytes) {
        Ok(s) => fold_str(s),
        Err(_) => bytes.to_ascii_lowercase(),
    }
}

// No context-sensitive mappings: a chunk must fold the same on its own as
// inside the value.
fn fold_str(s: &str) -> Vec<u8> {
    s.chars().flat_map(char::to_lowercase).collect::<String>().into_bytes()
}

fn fold_ascii(bytes: &[u8]) -> Vec<u8> {
    bytes.to_ascii_lowercase()
}
