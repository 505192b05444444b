//! Multi-valued attributes and attribute sets.
//!
//! - AttrValue: a single text or binary value
//! - Attribute: an id plus an ordered list of distinct values
//! - Attributes: an ordered set of attributes, optionally matching ids
//!   case-insensitively
//! - Modification: one add / replace / remove step for `Attributes::apply`
//!
//! An attribute with no values is a presence-only attribute: it exists on the
//! entry but carries nothing to compare against.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// AttrValue
// =============================================================================

/// A single attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttrValue {
    /// UTF-8 text
    Text(String),
    /// Raw octets
    Bytes(Vec<u8>),
}

impl AttrValue {
    /// Byte view used for ordering and wildcard comparison
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            AttrValue::Text(s) => s.as_bytes(),
            AttrValue::Bytes(b) => b,
        }
    }

    /// Text view, if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            AttrValue::Bytes(_) => None,
        }
    }

    /// Check if this is a binary value
    pub fn is_bytes(&self) -> bool {
        matches!(self, AttrValue::Bytes(_))
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Text(s) => f.write_str(s),
            AttrValue::Bytes(b) => {
                for byte in b {
                    write!(f, "{:02x}", byte)?;
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Text(v.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::Text(v)
    }
}

impl From<Vec<u8>> for AttrValue {
    fn from(v: Vec<u8>) -> Self {
        AttrValue::Bytes(v)
    }
}

impl From<&[u8]> for AttrValue {
    fn from(v: &[u8]) -> Self {
        AttrValue::Bytes(v.to_vec())
    }
}

// =============================================================================
// Attribute
// =============================================================================

/// A named, multi-valued property.
///
/// Values keep insertion order and are distinct: adding a value that is
/// already present leaves the attribute unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    id: String,
    values: Vec<AttrValue>,
}

impl Attribute {
    /// Create a presence-only attribute (no values)
    pub fn new(id: impl Into<String>) -> Self {
        Attribute {
            id: id.into(),
            values: Vec::new(),
        }
    }

    /// Create an attribute from a list of values, dropping duplicates
    pub fn with_values<I, V>(id: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<AttrValue>,
    {
        let mut attr = Attribute::new(id);
        for v in values {
            attr.add(v);
        }
        attr
    }

    /// Attribute identifier as given at creation
    pub fn id(&self) -> &str {
        &self.id
    }

    /// All values in insertion order
    pub fn values(&self) -> &[AttrValue] {
        &self.values
    }

    /// First value, if any
    pub fn first(&self) -> Option<&AttrValue> {
        self.values.first()
    }

    /// Number of values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True for presence-only attributes
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Check whether `value` is one of this attribute's values
    pub fn contains(&self, value: &AttrValue) -> bool {
        self.values.contains(value)
    }

    /// Add a value; returns false if it was already present
    pub fn add(&mut self, value: impl Into<AttrValue>) -> bool {
        let value = value.into();
        if self.values.contains(&value) {
            return false;
        }
        self.values.push(value);
        true
    }

    /// Remove a value; returns false if it was not present
    pub fn remove(&mut self, value: &AttrValue) -> bool {
        match self.values.iter().position(|v| v == value) {
            Some(idx) => {
                self.values.remove(idx);
                true
            }
            None => false,
        }
    }
}

// =============================================================================
// Attributes
// =============================================================================

/// An ordered set of attributes keyed by id.
///
/// When `ignore_case` is set, ids are compared after Unicode lowercasing; the
/// id stored is the one first used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    ignore_case: bool,
    attrs: Vec<Attribute>,
}

impl Attributes {
    /// Create an empty, case-sensitive attribute set
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty set with the given id matching mode
    pub fn with_ignore_case(ignore_case: bool) -> Self {
        Attributes {
            ignore_case,
            attrs: Vec::new(),
        }
    }

    /// Builder: add a value-carrying attribute (merging with an existing one)
    pub fn with<I, V>(mut self, id: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<AttrValue>,
    {
        self.merge(Attribute::with_values(id, values));
        self
    }

    /// Builder: add a presence-only attribute
    pub fn with_present(mut self, id: &str) -> Self {
        self.merge(Attribute::new(id));
        self
    }

    /// Whether ids are matched case-insensitively
    pub fn ignore_case(&self) -> bool {
        self.ignore_case
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// Check if the set holds no attributes
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// Compare two ids under this set's matching mode
    pub fn ids_match(&self, a: &str, b: &str) -> bool {
        if self.ignore_case {
            a.chars()
                .flat_map(char::to_lowercase)
                .eq(b.chars().flat_map(char::to_lowercase))
        } else {
            a == b
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.attrs.iter().position(|a| self.ids_match(&a.id, id))
    }

    /// Look up an attribute by id
    pub fn get(&self, id: &str) -> Option<&Attribute> {
        self.position(id).map(|idx| &self.attrs[idx])
    }

    /// Look up an attribute by id for mutation
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Attribute> {
        match self.position(id) {
            Some(idx) => Some(&mut self.attrs[idx]),
            None => None,
        }
    }

    /// Insert or replace an attribute, returning the previous one.
    ///
    /// A replaced attribute keeps its position in the set.
    pub fn put(&mut self, attr: Attribute) -> Option<Attribute> {
        match self.position(&attr.id) {
            Some(idx) => Some(std::mem::replace(&mut self.attrs[idx], attr)),
            None => {
                self.attrs.push(attr);
                None
            }
        }
    }

    /// Merge values into an existing attribute, or insert it.
    pub fn merge(&mut self, attr: Attribute) {
        match self.get_mut(&attr.id) {
            Some(existing) => {
                for v in attr.values {
                    existing.add(v);
                }
            }
            None => self.attrs.push(attr),
        }
    }

    /// Remove an attribute by id
    pub fn remove(&mut self, id: &str) -> Option<Attribute> {
        self.position(id).map(|idx| self.attrs.remove(idx))
    }

    /// Iterate attributes in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.attrs.iter()
    }

    /// Attribute ids in insertion order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.attrs.iter().map(|a| a.id.as_str())
    }

    /// Copy of this set restricted to `ids`; ids not present are skipped.
    ///
    /// `None` selects every attribute.
    pub fn select(&self, ids: Option<&[String]>) -> Attributes {
        let Some(ids) = ids else {
            return self.clone();
        };
        let mut out = Attributes::with_ignore_case(self.ignore_case);
        for id in ids {
            if let Some(attr) = self.get(id) {
                out.put(attr.clone());
            }
        }
        out
    }

    /// Apply modifications in order.
    pub fn apply(&mut self, mods: &[Modification]) {
        for m in mods {
            let attr = &m.attribute;
            match m.op {
                ModOp::Add => self.merge(attr.clone()),
                ModOp::Replace => {
                    if attr.is_empty() {
                        self.remove(attr.id());
                    } else {
                        self.put(attr.clone());
                    }
                }
                ModOp::Remove => {
                    if attr.is_empty() {
                        self.remove(attr.id());
                        continue;
                    }
                    let now_empty = match self.get_mut(attr.id()) {
                        Some(existing) => {
                            for v in attr.values() {
                                existing.remove(v);
                            }
                            existing.is_empty()
                        }
                        None => false,
                    };
                    if now_empty {
                        self.remove(attr.id());
                    }
                }
            }
        }
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.attrs.iter()
    }
}

impl FromIterator<Attribute> for Attributes {
    fn from_iter<T: IntoIterator<Item = Attribute>>(iter: T) -> Self {
        let mut out = Attributes::new();
        for attr in iter {
            out.merge(attr);
        }
        out
    }
}

// =============================================================================
// Modification
// =============================================================================

/// Kind of attribute modification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModOp {
    /// Merge values into the attribute, creating it if needed
    Add,
    /// Overwrite the attribute; zero values removes it
    Replace,
    /// Remove listed values; zero values removes the whole attribute
    Remove,
}

/// A single modification step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modification {
    /// What to do
    pub op: ModOp,
    /// The attribute (id and values) it applies to
    pub attribute: Attribute,
}

impl Modification {
    /// Create a modification
    pub fn new(op: ModOp, attribute: Attribute) -> Self {
        Modification { op, attribute }
    }

    /// Add-values modification
    pub fn add(attribute: Attribute) -> Self {
        Self::new(ModOp::Add, attribute)
    }

    /// Replace modification
    pub fn replace(attribute: Attribute) -> Self {
        Self::new(ModOp::Replace, attribute)
    }

    /// Remove modification
    pub fn remove(attribute: Attribute) -> Self {
        Self::new(ModOp::Remove, attribute)
    }
}
