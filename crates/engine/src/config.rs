//! Tree configuration.
//!
//! [`TreeOptions`] is built in code with the builder methods or loaded from a
//! TOML document:
//!
//! ```toml
//! access_mode = "ReadOnly"
//! ignore_case = true
//! always_materialize = false
//!
//! [name_syntax]
//! separator = "."
//! trim_blanks = true
//! ```

use hiermem_core::{DirError, DirResult, NameSyntax};
use serde::{Deserialize, Serialize};

/// Controls whether the tree accepts mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccessMode {
    /// Allow both reads and writes (default).
    #[default]
    ReadWrite,
    /// Every mutating operation fails with a ReadOnly error.
    ReadOnly,
}

/// Options for creating a [`NamespaceTree`](crate::NamespaceTree).
///
/// ```
/// use hiermem_engine::{AccessMode, TreeOptions};
///
/// let opts = TreeOptions::new()
///     .access_mode(AccessMode::ReadOnly)
///     .always_materialize(true);
/// assert_eq!(opts.access_mode, AccessMode::ReadOnly);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeOptions {
    /// Whether the tree accepts mutations
    pub access_mode: AccessMode,
    /// Match attribute ids case-insensitively in entries the tree creates
    pub ignore_case: bool,
    /// Route lookups, listings and returned search objects through the
    /// object factory, and bound values through its state hook
    pub always_materialize: bool,
    /// Syntax for parsing, rendering and comparing names
    pub name_syntax: NameSyntax,
}

impl TreeOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the access mode.
    pub fn access_mode(mut self, mode: AccessMode) -> Self {
        self.access_mode = mode;
        self
    }

    /// Set case-insensitive matching for both attribute ids and names.
    pub fn ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self.name_syntax.ignore_case = ignore_case;
        self
    }

    /// Enable or disable the object factory hooks.
    pub fn always_materialize(mut self, enabled: bool) -> Self {
        self.always_materialize = enabled;
        self
    }

    /// Replace the name syntax.
    pub fn name_syntax(mut self, syntax: NameSyntax) -> Self {
        self.name_syntax = syntax;
        self
    }

    /// Load options from a TOML document. Missing keys keep their defaults.
    ///
    /// `ignore_case` also sets `name_syntax.ignore_case` unless the
    /// `[name_syntax]` table sets it explicitly, as the builder does.
    pub fn from_toml_str(text: &str) -> DirResult<Self> {
        let table: toml::Table = text.parse().map_err(config_error)?;
        let names_explicit = table
            .get("name_syntax")
            .and_then(|syntax| syntax.get("ignore_case"))
            .is_some();

        let mut opts: TreeOptions = toml::Value::Table(table)
            .try_into()
            .map_err(config_error)?;
        if !names_explicit {
            opts.name_syntax.ignore_case = opts.ignore_case;
        }
        Ok(opts)
    }
}

fn config_error(err: toml::de::Error) -> DirError {
    DirError::config(err.to_string())
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            access_mode: AccessMode::ReadWrite,
            ignore_case: true,
            always_materialize: false,
            name_syntax: NameSyntax::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = TreeOptions::new();
        assert_eq!(opts.access_mode, AccessMode::ReadWrite);
        assert!(opts.ignore_case);
        assert!(!opts.always_materialize);
        assert_eq!(opts.name_syntax.separator, '/');
    }

    #[test]
    fn test_ignore_case_applies_to_names() {
        let opts = TreeOptions::new().ignore_case(false);
        assert!(!opts.ignore_case);
        assert!(!opts.name_syntax.ignore_case);
    }

    #[test]
    fn test_from_toml() {
        let opts = TreeOptions::from_toml_str(
            r#"
            access_mode = "ReadOnly"
            always_materialize = true

            [name_syntax]
            separator = "."
            trim_blanks = true
            "#,
        )
        .unwrap();
        assert_eq!(opts.access_mode, AccessMode::ReadOnly);
        assert!(opts.always_materialize);
        assert!(opts.ignore_case);
        assert_eq!(opts.name_syntax.separator, '.');
        assert_eq!(opts.name_syntax.escape, '\\');
        assert!(opts.name_syntax.trim_blanks);
    }

    #[test]
    fn test_from_toml_empty_is_default() {
        assert_eq!(TreeOptions::from_toml_str("").unwrap(), TreeOptions::default());
    }

    #[test]
    fn test_from_toml_ignore_case_applies_to_names() {
        let opts = TreeOptions::from_toml_str("ignore_case = false").unwrap();
        assert!(!opts.ignore_case);
        assert!(!opts.name_syntax.ignore_case);
        assert_eq!(opts, TreeOptions::new().ignore_case(false));

        let opts = TreeOptions::from_toml_str(
            r#"
            ignore_case = false

            [name_syntax]
            ignore_case = true
            "#,
        )
        .unwrap();
        assert!(!opts.ignore_case);
        assert!(opts.name_syntax.ignore_case);
    }

    #[test]
    fn test_from_toml_rejects_bad_values() {
        let err = TreeOptions::from_toml_str("access_mode = \"Sometimes\"").unwrap_err();
        assert!(matches!(err, DirError::Config { .. }));
    }
}
