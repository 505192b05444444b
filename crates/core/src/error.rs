//! Error types shared by every hiermem crate.
//!
//! One enum covers naming, schema, filter and access failures so callers can
//! match on the kind regardless of which layer produced it. Errors are `Clone`
//! because a read-only tree hands out copies of the error registered with it.

use thiserror::Error;

/// Result alias used throughout the workspace.
pub type DirResult<T> = std::result::Result<T, DirError>;

/// Errors produced by the namespace, the filter layer and the search engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirError {
    /// A lookup or resolution step missed.
    #[error("name not found: {name}")]
    NameNotFound {
        /// The component or name that could not be resolved
        name: String,
    },

    /// bind / create / rename destination already exists.
    #[error("name already bound: {name}")]
    NameAlreadyBound {
        /// The colliding name
        name: String,
    },

    /// A value or modification the tree cannot store.
    #[error("schema violation: {reason}")]
    SchemaViolation {
        /// What was rejected
        reason: String,
    },

    /// Malformed or empty name where a non-empty one is required.
    #[error("invalid name: {reason}")]
    InvalidName {
        /// Why the name was rejected
        reason: String,
    },

    /// An intermediate component is bound to an object rather than a context.
    #[error("not a context: {name}")]
    NotContext {
        /// The offending component
        name: String,
    },

    /// Schema stubs and extensible-match filters.
    #[error("operation not supported: {operation}")]
    OperationNotSupported {
        /// The unsupported operation
        operation: String,
    },

    /// Filter text that does not follow the grammar.
    #[error("invalid filter at position {position}: {reason} (filter: {filter:?})")]
    InvalidFilter {
        /// Character offset into `filter` where parsing stopped
        position: usize,
        /// The normalized filter text
        filter: String,
        /// What went wrong
        reason: String,
    },

    /// Mutation attempted on a read-only tree.
    #[error("read-only: {reason}")]
    ReadOnly {
        /// Reason registered when the tree was made read-only
        reason: String,
    },

    /// Invalid configuration input.
    #[error("configuration error: {reason}")]
    Config {
        /// Parser or validation message
        reason: String,
    },
}

impl DirError {
    /// Create a NameNotFound error
    pub fn name_not_found(name: impl Into<String>) -> Self {
        DirError::NameNotFound { name: name.into() }
    }

    /// Create a NameAlreadyBound error
    pub fn name_already_bound(name: impl Into<String>) -> Self {
        DirError::NameAlreadyBound { name: name.into() }
    }

    /// Create a SchemaViolation error
    pub fn schema_violation(reason: impl Into<String>) -> Self {
        DirError::SchemaViolation {
            reason: reason.into(),
        }
    }

    /// Create an InvalidName error
    pub fn invalid_name(reason: impl Into<String>) -> Self {
        DirError::InvalidName {
            reason: reason.into(),
        }
    }

    /// Create a NotContext error
    pub fn not_context(name: impl Into<String>) -> Self {
        DirError::NotContext { name: name.into() }
    }

    /// Create an OperationNotSupported error
    pub fn not_supported(operation: impl Into<String>) -> Self {
        DirError::OperationNotSupported {
            operation: operation.into(),
        }
    }

    /// Create an InvalidFilter error
    pub fn invalid_filter(
        position: usize,
        filter: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        DirError::InvalidFilter {
            position,
            filter: filter.into(),
            reason: reason.into(),
        }
    }

    /// Create a ReadOnly error
    pub fn read_only(reason: impl Into<String>) -> Self {
        DirError::ReadOnly {
            reason: reason.into(),
        }
    }

    /// Create a Config error
    pub fn config(reason: impl Into<String>) -> Self {
        DirError::Config {
            reason: reason.into(),
        }
    }

    /// Check if this is a NameNotFound error
    pub fn is_name_not_found(&self) -> bool {
        matches!(self, DirError::NameNotFound { .. })
    }

    /// Check if this is a NameAlreadyBound error
    pub fn is_name_already_bound(&self) -> bool {
        matches!(self, DirError::NameAlreadyBound { .. })
    }

    /// Check if this is an InvalidName error
    pub fn is_invalid_name(&self) -> bool {
        matches!(self, DirError::InvalidName { .. })
    }

    /// Check if this is an InvalidFilter error
    pub fn is_invalid_filter(&self) -> bool {
        matches!(self, DirError::InvalidFilter { .. })
    }

    /// Check if this is a ReadOnly error
    pub fn is_read_only(&self) -> bool {
        matches!(self, DirError::ReadOnly { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_filter_display_carries_position_and_text() {
        let err = DirError::invalid_filter(3, "(cn=a", "missing ')'");
        let msg = err.to_string();
        assert!(msg.contains("position 3"));
        assert!(msg.contains("(cn=a"));
        assert!(msg.contains("missing ')'"));
    }

    #[test]
    fn test_predicates() {
        assert!(DirError::name_not_found("a").is_name_not_found());
        assert!(DirError::name_already_bound("a").is_name_already_bound());
        assert!(DirError::invalid_name("empty").is_invalid_name());
        assert!(DirError::read_only("frozen").is_read_only());
        assert!(!DirError::config("bad").is_read_only());
    }

    #[test]
    fn test_errors_are_cloneable_and_comparable() {
        let err = DirError::read_only("snapshot");
        assert_eq!(err.clone(), err);
    }
}
