//! Recursive-descent parser for RFC 2254 style filter strings.
//!
//! ```text
//! filter     := '(' filtercomp ')'
//! filtercomp := and | or | not | item
//! and        := '&' filter*
//! or         := '|' filter*
//! not        := '!' filter
//! item       := attrId matchop value
//! matchop    := '=' | '~=' | '>=' | '<='
//! ```
//!
//! Input that does not start with `(` is wrapped in one pair of parentheses
//! first. Positions in errors are character offsets into that normalized text.

use hiermem_core::{DirError, DirResult};

use super::expr::{FilterExpr, MatchKind, Pattern, PatternPart};

/// Parser state over one normalized filter string.
pub struct FilterParser {
    text: String,
    chars: Vec<char>,
    pos: usize,
}

impl FilterParser {
    /// Parse filter text into an expression.
    pub fn parse(input: &str) -> DirResult<FilterExpr> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(DirError::invalid_filter(0, input, "empty filter"));
        }
        let text = if trimmed.starts_with('(') {
            trimmed.to_string()
        } else {
            format!("({trimmed})")
        };

        let mut parser = FilterParser {
            chars: text.chars().collect(),
            text,
            pos: 0,
        };
        let expr = parser.parse_filter()?;
        parser.skip_whitespace();
        if parser.pos < parser.chars.len() {
            return Err(parser.error("unexpected characters after filter"));
        }
        Ok(expr)
    }

    fn parse_filter(&mut self) -> DirResult<FilterExpr> {
        self.skip_whitespace();
        self.expect('(')?;
        self.skip_whitespace();

        let expr = match self.peek() {
            Some('&') => {
                self.pos += 1;
                FilterExpr::And(self.parse_filter_list()?)
            }
            Some('|') => {
                self.pos += 1;
                FilterExpr::Or(self.parse_filter_list()?)
            }
            Some('!') => {
                self.pos += 1;
                FilterExpr::not(self.parse_filter()?)
            }
            Some(_) => self.parse_item()?,
            None => return Err(self.error("unexpected end of filter")),
        };

        self.skip_whitespace();
        self.expect(')')?;
        Ok(expr)
    }

    fn parse_filter_list(&mut self) -> DirResult<Vec<FilterExpr>> {
        let mut parts = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(')') => return Ok(parts),
                Some('(') => parts.push(self.parse_filter()?),
                Some(_) => return Err(self.error("expected '(' to start a nested filter")),
                None => return Err(self.error("unterminated filter list")),
            }
        }
    }

    fn parse_item(&mut self) -> DirResult<FilterExpr> {
        let start = self.pos;
        let end = self
            .find_from(start, ')')
            .ok_or_else(|| self.error("missing ')' after assertion"))?;
        let eq = self.chars[start..end]
            .iter()
            .position(|&c| c == '=')
            .map(|i| start + i)
            .ok_or_else(|| self.error_at(start, "missing '=' in assertion"))?;

        let (kind, id_end) = match eq.checked_sub(1).map(|i| self.chars[i]) {
            Some('~') if eq > start => (MatchKind::Approx, eq - 1),
            Some('>') if eq > start => (MatchKind::GreaterEq, eq - 1),
            Some('<') if eq > start => (MatchKind::LessEq, eq - 1),
            Some(':') if eq > start => {
                return Err(DirError::not_supported(format!(
                    "extensible match at position {} in {:?}",
                    eq - 1,
                    self.text
                )))
            }
            _ => (MatchKind::Equal, eq),
        };

        let attr: String = self.chars[start..id_end].iter().collect();
        let attr = attr.trim();
        if attr.is_empty() {
            return Err(self.error_at(start, "missing attribute id"));
        }
        if let Some(bad) = attr.chars().find(|c| matches!(c, '(' | '*' | '\\' | '=')) {
            return Err(self.error_at(start, format!("invalid character {bad:?} in attribute id")));
        }

        let pattern = self.parse_value(eq + 1, end)?;
        self.pos = end;
        Ok(FilterExpr::atomic(attr, kind, pattern))
    }

    /// Unescape `chars[from..to]` into a pattern.
    fn parse_value(&self, from: usize, to: usize) -> DirResult<Pattern> {
        let mut parts = Vec::new();
        let mut literal: Vec<u8> = Vec::new();
        let mut i = from;
        let mut buf = [0u8; 4];

        while i < to {
            match self.chars[i] {
                '*' => {
                    parts.push(PatternPart::Literal(std::mem::take(&mut literal)));
                    parts.push(PatternPart::Wildcard);
                    i += 1;
                }
                '\\' => {
                    let hi = self.hex_at(i + 1, to);
                    let lo = self.hex_at(i + 2, to);
                    match (hi, lo) {
                        (Some(hi), Some(lo)) => literal.push((hi << 4) | lo),
                        _ => return Err(self.error_at(i, "escape must be followed by two hex digits")),
                    }
                    i += 3;
                }
                c => {
                    literal.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                    i += 1;
                }
            }
        }
        parts.push(PatternPart::Literal(literal));

        Ok(Pattern::new(parts))
    }

    fn hex_at(&self, idx: usize, limit: usize) -> Option<u8> {
        if idx >= limit {
            return None;
        }
        self.chars[idx].to_digit(16).map(|d| d as u8)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn expect(&mut self, c: char) -> DirResult<()> {
        if self.peek() == Some(c) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(format!("expected '{c}'")))
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn find_from(&self, from: usize, c: char) -> Option<usize> {
        self.chars[from..].iter().position(|&x| x == c).map(|i| from + i)
    }

    fn error(&self, reason: impl Into<String>) -> DirError {
        self.error_at(self.pos, reason)
    }

    fn error_at(&self, position: usize, reason: impl Into<String>) -> DirError {
        DirError::invalid_filter(position, self.text.as_str(), reason)
    }
}
