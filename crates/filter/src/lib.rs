//! Search filters for hiermem.
//!
//! Two kinds of filter decide whether an entry's attributes match:
//! - SearchFilter: an RFC 2254 style boolean expression parsed from text
//! - ContainmentFilter: a plain attribute-superset test
//!
//! Both implement [`Filter`], the seam the search engine evaluates candidates
//! through. The `encode` module builds filter text from values and templates.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod containment;
pub mod encode;
mod evaluate;
pub mod expr;
mod parser;

use std::fmt;
use std::str::FromStr;

use hiermem_core::{AttrValue, Attributes, DirError, DirResult};

pub use containment::ContainmentFilter;
pub use encode::{encode_bytes, encode_str, encode_value, format_attributes, format_template};
pub use evaluate::wildcard_matches;
pub use expr::{FilterExpr, MatchKind, Pattern, PatternPart};
pub use parser::FilterParser;

/// Decides whether a candidate's attributes match.
pub trait Filter {
    /// Test a candidate
    fn check(&self, attrs: &Attributes) -> bool;

    /// Attributes reported for a matching candidate; `None` returns all.
    fn select(&self, attrs: &Attributes, ids: Option<&[String]>) -> Attributes {
        attrs.select(ids)
    }
}

impl<F: Filter + ?Sized> Filter for &F {
    fn check(&self, attrs: &Attributes) -> bool {
        (**self).check(attrs)
    }

    fn select(&self, attrs: &Attributes, ids: Option<&[String]>) -> Attributes {
        (**self).select(attrs, ids)
    }
}

impl<F: Filter + ?Sized> Filter for Box<F> {
    fn check(&self, attrs: &Attributes) -> bool {
        (**self).check(attrs)
    }

    fn select(&self, attrs: &Attributes, ids: Option<&[String]>) -> Attributes {
        (**self).select(attrs, ids)
    }
}

/// A parsed filter string.
///
/// # Examples
///
/// ```
/// use hiermem_core::Attributes;
/// use hiermem_filter::{Filter, SearchFilter};
///
/// let filter: SearchFilter = "(&(objectClass=person)(cn=al*))".parse().unwrap();
/// let attrs = Attributes::with_ignore_case(true)
///     .with("objectClass", ["person"])
///     .with("cn", ["Alice"]);
/// assert!(filter.check(&attrs));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    text: String,
    expr: FilterExpr,
}

impl SearchFilter {
    /// Parse filter text
    pub fn parse(text: &str) -> DirResult<Self> {
        let expr = FilterParser::parse(text).map_err(|e| {
            tracing::debug!(target: "hiermem::filter", filter = %text, error = %e, "rejected filter");
            e
        })?;
        Ok(SearchFilter {
            text: text.to_string(),
            expr,
        })
    }

    /// Substitute `args` into `template` (see [`format_template`]) and parse
    pub fn from_template(template: &str, args: &[AttrValue]) -> DirResult<Self> {
        Self::parse(&format_template(template, args)?)
    }

    /// Filter asserting every value of `attrs` (see [`format_attributes`])
    pub fn from_attributes(attrs: &Attributes) -> DirResult<Self> {
        Self::parse(&format_attributes(attrs))
    }

    /// Filter text as given
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Parsed expression
    pub fn expr(&self) -> &FilterExpr {
        &self.expr
    }
}

impl Filter for SearchFilter {
    fn check(&self, attrs: &Attributes) -> bool {
        self.expr.evaluate(attrs)
    }
}

impl Filter for FilterExpr {
    fn check(&self, attrs: &Attributes) -> bool {
        self.evaluate(attrs)
    }
}

impl FromStr for SearchFilter {
    type Err = DirError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SearchFilter::parse(s)
    }
}

impl fmt::Display for SearchFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
