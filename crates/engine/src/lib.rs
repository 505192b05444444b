//! Namespace engine for hiermem.
//!
//! This crate holds the tree itself and everything that reads it:
//! - `NamespaceTree`: entries, bindings and the naming operations
//! - `SubtreeWalker`: lazy scope-aware enumeration
//! - `LazyMatcher`: filter evaluation one candidate at a time
//! - `SharedTree`: a lock-protected handle for use across threads
//!
//! ```
//! use hiermem_core::Attributes;
//! use hiermem_engine::{NamespaceTree, Scope, SearchControls};
//!
//! let mut tree = NamespaceTree::new();
//! tree.create_subcontext("ou", Some(Attributes::new().with("ou", ["people"]))).unwrap();
//! tree.create_subcontext("ou/alice", Some(Attributes::new().with("cn", ["Alice"]))).unwrap();
//!
//! let controls = SearchControls::new().scope(Scope::Subtree);
//! let found = tree.search("", "(cn=alice)", Some(controls)).unwrap().count();
//! assert_eq!(found, 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod entry;
pub mod factory;
pub mod matcher;
pub mod search;
pub mod shared;
pub mod tree;
pub mod walker;

pub use config::{AccessMode, TreeOptions};
pub use entry::{BindingKind, Bound, Entry, NodeRef};
pub use factory::{NoopFactory, ObjectFactory};
pub use matcher::{LazyMatcher, Materializer, SearchControls, SearchHit};
pub use search::Search;
pub use shared::SharedTree;
pub use tree::{Binding, NameClassPair, NamespaceTree};
pub use walker::{Scope, SubtreeWalker};
