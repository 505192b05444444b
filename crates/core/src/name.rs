//! Hierarchical names and the syntax used to read and write them.
//!
//! A `Name` is an ordered list of components, leftmost component closest to
//! the root. Flat strings become names through a `NameParser`; the default
//! parser is driven by a `NameSyntax` that each tree carries as configuration.
//!
//! # Default Syntax
//!
//! | Property    | Default | Meaning                                        |
//! |-------------|---------|------------------------------------------------|
//! | separator   | `/`     | splits components                              |
//! | escape      | `\`     | makes the next separator/escape/quote literal  |
//! | quote       | `"`     | a component may be quoted as a whole           |
//! | ignore_case | true    | sibling names compare case-insensitively       |
//! | trim_blanks | false   | strip surrounding whitespace from components   |

use crate::error::{DirError, DirResult};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

// =============================================================================
// Name
// =============================================================================

/// An ordered sequence of name components.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Name {
    components: Vec<String>,
}

impl Name {
    /// The empty name
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a name from components
    pub fn from_components(components: Vec<String>) -> Self {
        Name { components }
    }

    /// All components
    pub fn components(&self) -> &[String] {
        &self.components
    }

    /// Number of components
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Check if this is the empty name
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Append a component (builder pattern)
    pub fn child(mut self, component: impl Into<String>) -> Self {
        self.components.push(component.into());
        self
    }

    /// Append a component (mutating)
    pub fn push(&mut self, component: impl Into<String>) {
        self.components.push(component.into());
    }

    /// Append every component of `other`
    pub fn extend(&mut self, other: &Name) {
        self.components.extend(other.components.iter().cloned());
    }

    /// Last component (None if empty)
    pub fn leaf(&self) -> Option<&str> {
        self.components.last().map(String::as_str)
    }

    /// All components but the last (None if empty)
    pub fn parent(&self) -> Option<Name> {
        let (_, rest) = self.components.split_last()?;
        Some(Name::from_components(rest.to_vec()))
    }
}

impl FromIterator<String> for Name {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Name::from_components(iter.into_iter().collect())
    }
}

impl fmt::Display for Name {
    /// Renders with the default syntax
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&NameSyntax::default().format(self))
    }
}

// =============================================================================
// NameSyntax
// =============================================================================

/// Syntax properties for parsing and rendering names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NameSyntax {
    /// Component separator
    pub separator: char,
    /// Escape character
    pub escape: char,
    /// Quote character
    pub quote: char,
    /// Compare components case-insensitively
    pub ignore_case: bool,
    /// Strip whitespace around components
    pub trim_blanks: bool,
}

impl Default for NameSyntax {
    fn default() -> Self {
        NameSyntax {
            separator: '/',
            escape: '\\',
            quote: '"',
            ignore_case: true,
            trim_blanks: false,
        }
    }
}

impl NameSyntax {
    /// Parse a flat string into a name.
    ///
    /// The empty string is the empty name. A dangling escape or an
    /// unterminated quote is an InvalidName error.
    pub fn parse(&self, input: &str) -> DirResult<Name> {
        if input.is_empty() {
            return Ok(Name::empty());
        }

        let mut components = Vec::new();
        let mut current = String::new();
        let mut chars = input.chars().peekable();
        let mut at_component_start = true;

        while let Some(c) = chars.next() {
            if c == self.escape {
                match chars.next() {
                    Some(next) if self.is_special(next) => current.push(next),
                    Some(next) => {
                        current.push(c);
                        current.push(next);
                    }
                    None => {
                        return Err(DirError::invalid_name(format!(
                            "{input:?}: escape at end of name"
                        )))
                    }
                }
                at_component_start = false;
            } else if c == self.quote && at_component_start {
                let mut closed = false;
                while let Some(q) = chars.next() {
                    if q == self.escape {
                        match chars.next() {
                            Some(next) => current.push(next),
                            None => break,
                        }
                    } else if q == self.quote {
                        closed = true;
                        break;
                    } else {
                        current.push(q);
                    }
                }
                if !closed {
                    return Err(DirError::invalid_name(format!(
                        "{input:?}: unterminated quote"
                    )));
                }
                match chars.peek() {
                    None => {}
                    Some(&next) if next == self.separator => {}
                    Some(_) => {
                        return Err(DirError::invalid_name(format!(
                            "{input:?}: quoted component must end at a separator"
                        )))
                    }
                }
                at_component_start = false;
            } else if c == self.separator {
                components.push(self.finish(std::mem::take(&mut current)));
                at_component_start = true;
            } else {
                current.push(c);
                at_component_start = false;
            }
        }
        components.push(self.finish(current));

        Ok(Name::from_components(components))
    }

    /// Render a name, escaping characters that would otherwise be read back
    /// as syntax.
    pub fn format(&self, name: &Name) -> String {
        let mut out = String::new();
        for (i, comp) in name.components().iter().enumerate() {
            if i > 0 {
                out.push(self.separator);
            }
            for c in comp.chars() {
                if self.is_special(c) {
                    out.push(self.escape);
                }
                out.push(c);
            }
        }
        out
    }

    /// Comparison key for a component under this syntax
    pub fn key<'a>(&self, component: &'a str) -> Cow<'a, str> {
        let component = if self.trim_blanks {
            component.trim()
        } else {
            component
        };
        if self.ignore_case {
            Cow::Owned(component.chars().flat_map(char::to_lowercase).collect())
        } else {
            Cow::Borrowed(component)
        }
    }

    /// Compare two components under this syntax
    pub fn components_match(&self, a: &str, b: &str) -> bool {
        self.key(a) == self.key(b)
    }

    fn is_special(&self, c: char) -> bool {
        c == self.separator || c == self.escape || c == self.quote
    }

    fn finish(&self, component: String) -> String {
        if self.trim_blanks {
            component.trim().to_string()
        } else {
            component
        }
    }
}

// =============================================================================
// NameParser
// =============================================================================

/// Splits flat string names into components.
///
/// Pluggable per tree; `SyntaxParser` is the default.
pub trait NameParser: Send + Sync + fmt::Debug {
    /// Parse a flat name
    fn parse(&self, name: &str) -> DirResult<Name>;

    /// Syntax used to render and compare names
    fn syntax(&self) -> &NameSyntax;
}

/// `NameParser` backed by a `NameSyntax`.
#[derive(Debug, Clone, Default)]
pub struct SyntaxParser {
    syntax: NameSyntax,
}

impl SyntaxParser {
    /// Create a parser for the given syntax
    pub fn new(syntax: NameSyntax) -> Self {
        SyntaxParser { syntax }
    }
}

impl NameParser for SyntaxParser {
    fn parse(&self, name: &str) -> DirResult<Name> {
        self.syntax.parse(name)
    }

    fn syntax(&self) -> &NameSyntax {
        &self.syntax
    }
}
