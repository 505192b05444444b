//! Core types for hiermem
//!
//! This crate defines the vocabulary shared by the filter and engine crates:
//! - DirError / DirResult: the error kinds of the directory
//! - Attribute, Attributes, Modification: multi-valued attribute sets
//! - Name, NameSyntax, NameParser: hierarchical names
//! - ObjectValue: leaf values bound in the namespace
//! - Environment: copy-on-write property bag

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod attr;
pub mod env;
pub mod error;
pub mod name;
pub mod value;

pub use attr::{AttrValue, Attribute, Attributes, ModOp, Modification};
pub use env::Environment;
pub use error::{DirError, DirResult};
pub use name::{Name, NameParser, NameSyntax, SyntaxParser};
pub use value::ObjectValue;
