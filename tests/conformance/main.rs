//! hiermem Conformance Suite
//!
//! Behavioural guarantees of the public API, grouped by area:
//!
//! - **tree_properties**: bind / rebind / unbind / rename / list contracts
//! - **walker_order**: preorder and scope rules of the subtree walker
//! - **filter_semantics**: parsing, evaluation, encoding round trips
//! - **search_matcher**: laziness and exactly-once visitation of searches
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test conformance
//! ```

mod test_utils;

mod filter_semantics;
mod search_matcher;
mod tree_properties;
mod walker_order;
