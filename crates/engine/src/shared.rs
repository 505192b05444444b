//! Thread-safe handle to a tree.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::tree::NamespaceTree;

/// A tree shared between threads.
///
/// Readers run concurrently; a writer excludes everyone else. Searches borrow
/// the tree, so they run to completion inside [`SharedTree::read`].
///
/// ```
/// use hiermem_core::ObjectValue;
/// use hiermem_engine::{NamespaceTree, SharedTree};
///
/// let shared = SharedTree::new(NamespaceTree::new());
/// shared.write(|tree| tree.bind("x", ObjectValue::from(1i64), None)).unwrap();
/// let count = shared.read(|tree| tree.list("").map(|l| l.len())).unwrap();
/// assert_eq!(count, 1);
/// ```
#[derive(Clone, Default)]
pub struct SharedTree {
    inner: Arc<RwLock<NamespaceTree>>,
}

impl SharedTree {
    /// Wrap a tree.
    pub fn new(tree: NamespaceTree) -> Self {
        Self {
            inner: Arc::new(RwLock::new(tree)),
        }
    }

    /// Run `f` under the read lock.
    pub fn read<R>(&self, f: impl FnOnce(&NamespaceTree) -> R) -> R {
        let guard = self.inner.read();
        f(&guard)
    }

    /// Run `f` under the write lock.
    pub fn write<R>(&self, f: impl FnOnce(&mut NamespaceTree) -> R) -> R {
        let mut guard = self.inner.write();
        f(&mut guard)
    }
}

impl From<NamespaceTree> for SharedTree {
    fn from(tree: NamespaceTree) -> Self {
        Self::new(tree)
    }
}

impl std::fmt::Debug for SharedTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedTree")
            .field("locked", &self.inner.is_locked())
            .finish_non_exhaustive()
    }
}
