//! Public types for the hiermem API.
//!
//! This module re-exports types from the workspace crates with one flat
//! namespace.

// ============================================================================
// Values, names & errors
// ============================================================================

pub use hiermem_core::{
    AttrValue, Attribute, Attributes, DirError, DirResult, Environment, ModOp, Modification,
    Name, NameParser, NameSyntax, ObjectValue, SyntaxParser,
};

// ============================================================================
// Filters
// ============================================================================

pub use hiermem_filter::{
    ContainmentFilter, Filter, FilterExpr, FilterParser, MatchKind, Pattern, PatternPart,
    SearchFilter,
};

// ============================================================================
// Tree, walker & search
// ============================================================================

pub use hiermem_engine::{
    AccessMode, Binding, BindingKind, Bound, Entry, LazyMatcher, NameClassPair, NamespaceTree,
    NodeRef, NoopFactory, ObjectFactory, Scope, Search, SearchControls, SearchHit, SharedTree,
    SubtreeWalker, TreeOptions,
};
