//! Shared fixtures for the conformance suite.

use hiermem::{Attributes, NamespaceTree, ObjectValue};

/// Route library logs to the test output; safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// R
/// ├── A
/// │   └── C
/// └── B
pub fn rabc() -> NamespaceTree {
    let mut tree = NamespaceTree::new();
    tree.create_subcontext("A", Some(Attributes::new().with("cn", ["A"])))
        .unwrap();
    tree.create_subcontext("A/C", Some(Attributes::new().with("cn", ["C"])))
        .unwrap();
    tree.create_subcontext("B", Some(Attributes::new().with("cn", ["B"])))
        .unwrap();
    tree
}

/// `rabc` with an object leaf under B.
pub fn rabc_with_object() -> NamespaceTree {
    let mut tree = rabc();
    tree.bind("B/leaf", ObjectValue::from("v"), None).unwrap();
    tree
}

/// Local names of a context's children, in listing order.
pub fn child_names(tree: &NamespaceTree, name: &str) -> Vec<String> {
    tree.list(name)
        .unwrap()
        .into_iter()
        .map(|pair| pair.name)
        .collect()
}
