//! Subtree walker ordering and scope rules.

use crate::test_utils::{rabc, rabc_with_object};
use hiermem::{Attributes, BindingKind, NamespaceTree, Scope, SubtreeWalker};
use proptest::prelude::*;

fn walk(tree: &NamespaceTree, scope: Scope) -> Vec<String> {
    SubtreeWalker::new(tree.root(), scope)
        .map(|(name, _)| name.to_string())
        .collect()
}

#[test]
fn subtree_is_preorder() {
    assert_eq!(walk(&rabc(), Scope::Subtree), ["", "A", "A/C", "B"]);
}

#[test]
fn one_level_is_direct_children() {
    assert_eq!(walk(&rabc(), Scope::OneLevel), ["A", "B"]);
}

#[test]
fn base_is_start_only() {
    assert_eq!(walk(&rabc(), Scope::Base), [""]);
}

#[test]
fn objects_are_yielded_but_not_descended() {
    let tree = rabc_with_object();
    let items: Vec<_> = SubtreeWalker::new(tree.root(), Scope::Subtree)
        .map(|(name, node)| (name.to_string(), node.kind()))
        .collect();
    assert_eq!(
        items,
        vec![
            ("".to_string(), BindingKind::Context),
            ("A".to_string(), BindingKind::Context),
            ("A/C".to_string(), BindingKind::Context),
            ("B".to_string(), BindingKind::Context),
            ("B/leaf".to_string(), BindingKind::Object),
        ]
    );
}

#[test]
fn walk_from_inner_entry_uses_relative_names() {
    let tree = rabc();
    let a = tree.lookup("A").unwrap().as_context().unwrap();
    let names: Vec<_> = SubtreeWalker::new(a, Scope::Subtree)
        .map(|(name, _)| name.to_string())
        .collect();
    assert_eq!(names, ["", "C"]);
}

/// Build a tree from a list of parent choices: node `i + 1` hangs under node
/// `parents[i] % (i + 1)`, giving every shape up to the list length.
fn build(parents: &[usize]) -> (NamespaceTree, Vec<String>) {
    let mut tree = NamespaceTree::new();
    let mut paths = vec![String::new()];
    for (i, p) in parents.iter().enumerate() {
        let parent = paths[p % (i + 1)].clone();
        let path = if parent.is_empty() {
            format!("n{i}")
        } else {
            format!("{parent}/n{i}")
        };
        tree.create_subcontext(&path, Some(Attributes::new().with("idx", [i.to_string()])))
            .unwrap();
        paths.push(path);
    }
    (tree, paths)
}

proptest! {
    #[test]
    fn subtree_visits_every_entry_once_parents_first(parents in proptest::collection::vec(any::<usize>(), 0..30)) {
        let (tree, paths) = build(&parents);
        let walked = walk(&tree, Scope::Subtree);

        prop_assert_eq!(walked.len(), paths.len());
        let mut sorted_walked = walked.clone();
        sorted_walked.sort();
        let mut sorted_paths = paths.clone();
        sorted_paths.sort();
        prop_assert_eq!(sorted_walked, sorted_paths);

        for (pos, name) in walked.iter().enumerate() {
            if let Some((parent, _)) = name.rsplit_once('/') {
                let parent_pos = walked.iter().position(|n| n == parent).unwrap();
                prop_assert!(parent_pos < pos);
            }
        }
    }

    #[test]
    fn one_level_matches_list(parents in proptest::collection::vec(any::<usize>(), 0..30)) {
        let (tree, _) = build(&parents);
        let listed: Vec<String> = tree.list("").unwrap().into_iter().map(|p| p.name).collect();
        prop_assert_eq!(walk(&tree, Scope::OneLevel), listed);
    }
}
