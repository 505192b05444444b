//! hiermem: an embeddable in-memory hierarchical directory.
//!
//! Entries live in a [`NamespaceTree`] under slash-separated names, each with
//! a multi-valued attribute set. Subtrees are searched with RFC 2254 style
//! filters and results are produced lazily.
//!
//! ```
//! use hiermem::{Attributes, NamespaceTree, ObjectValue, Scope, SearchControls};
//!
//! let mut tree = NamespaceTree::new();
//! tree.create_subcontext("people", None).unwrap();
//! tree.create_subcontext(
//!     "people/alice",
//!     Some(Attributes::new().with("objectClass", ["person"]).with("cn", ["Alice"])),
//! )
//! .unwrap();
//! tree.bind("people/printer", ObjectValue::from("lp0"), None).unwrap();
//!
//! let controls = SearchControls::new().scope(Scope::Subtree);
//! let hits: Vec<String> = tree
//!     .search("", "(&(objectClass=person)(cn=al*))", Some(controls))
//!     .unwrap()
//!     .map(|hit| hit.unwrap().name.to_string())
//!     .collect();
//! assert_eq!(hits, ["people/alice"]);
//! ```
//!
//! The workspace crates can also be used directly:
//! - `hiermem-core`: attributes, names, errors, object values
//! - `hiermem-filter`: filter parsing, evaluation and encoding
//! - `hiermem-engine`: the tree, walker, matcher and shared handle

#![warn(missing_docs)]

mod types;

pub use types::*;

/// Filter text encoding helpers
pub mod encode {
    pub use hiermem_filter::{
        encode_bytes, encode_str, encode_value, format_attributes, format_template,
    };
}
