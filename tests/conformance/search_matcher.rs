//! Lazy matching over walker output.

use crate::test_utils::{init_tracing, rabc_with_object};
use hiermem::{
    Attributes, LazyMatcher, Name, NamespaceTree, NodeRef, Scope, SearchControls, SearchFilter,
    SubtreeWalker,
};
use std::cell::RefCell;

/// Walker wrapper that records every candidate it hands out.
fn recording<'a>(
    tree: &'a NamespaceTree,
    scope: Scope,
    log: &'a RefCell<Vec<String>>,
) -> impl Iterator<Item = (Name, NodeRef<'a>)> + 'a {
    SubtreeWalker::new(tree.root(), scope).inspect(move |(name, _)| {
        log.borrow_mut().push(name.to_string());
    })
}

#[test]
fn each_candidate_is_visited_exactly_once() {
    init_tracing();
    let tree = rabc_with_object();
    let log = RefCell::new(Vec::new());
    let filter = SearchFilter::parse("(cn=*)").unwrap();
    let mut matcher = LazyMatcher::new(
        recording(&tree, Scope::Subtree, &log),
        filter,
        SearchControls::new(),
    );

    let mut found = Vec::new();
    while matcher.has_next().unwrap() {
        assert!(matcher.has_next().unwrap());
        assert!(matcher.has_next().unwrap());
        found.push(matcher.next_hit().unwrap().unwrap().name.to_string());
    }

    assert_eq!(found, ["A", "A/C", "B"]);
    assert_eq!(*log.borrow(), ["", "A", "A/C", "B", "B/leaf"]);
}

#[test]
fn nothing_is_probed_before_demand() {
    init_tracing();
    let tree = rabc_with_object();
    let log = RefCell::new(Vec::new());
    let filter = SearchFilter::parse("(cn=a)").unwrap();
    let mut matcher = LazyMatcher::new(
        recording(&tree, Scope::Subtree, &log),
        filter,
        SearchControls::new(),
    );
    assert!(log.borrow().is_empty());

    assert!(matcher.has_next().unwrap());
    assert_eq!(*log.borrow(), ["", "A"]);

    let _ = matcher.next();
    assert_eq!(log.borrow().len(), 2);
}

#[test]
fn matches_come_in_walk_order() {
    init_tracing();
    let mut tree = NamespaceTree::new();
    for name in ["d", "b", "c", "a"] {
        tree.create_subcontext(name, Some(Attributes::new().with("k", ["v"])))
            .unwrap();
    }
    let names: Vec<_> = tree
        .search("", "(k=v)", None)
        .unwrap()
        .map(|hit| hit.unwrap().name.to_string())
        .collect();
    assert_eq!(names, ["d", "b", "c", "a"]);
}

#[test]
fn count_limit_stops_probing() {
    init_tracing();
    let tree = rabc_with_object();
    let log = RefCell::new(Vec::new());
    let filter = SearchFilter::parse("(cn=*)").unwrap();
    let matcher = LazyMatcher::new(
        recording(&tree, Scope::Subtree, &log),
        filter,
        SearchControls::new().count_limit(1),
    );
    assert_eq!(matcher.count(), 1);
    assert_eq!(*log.borrow(), ["", "A"]);
}

#[test]
fn object_candidates_are_skipped() {
    init_tracing();
    let tree = rabc_with_object();
    let hits = tree
        .search("B", "(&)", Some(SearchControls::new().scope(Scope::OneLevel)))
        .unwrap()
        .count();
    assert_eq!(hits, 0);
}
