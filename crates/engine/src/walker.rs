//! Scope-aware preorder enumeration of a subtree.

use std::slice;

use hiermem_core::Name;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::entry::{Bound, Entry, NodeRef};

/// How far below the start entry a walk reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Scope {
    /// The start entry only
    Base,
    /// Direct children of the start entry
    #[default]
    OneLevel,
    /// The start entry and every descendant
    Subtree,
}

#[derive(Debug)]
struct Frame<'a> {
    children: slice::Iter<'a, (String, Bound)>,
    prefix: Name,
}

/// Lazily yields `(relative name, binding)` pairs in preorder.
///
/// Names are relative to the start entry, which itself has the empty name.
/// Parents come before their children and each subtree is drained before the
/// next sibling. Only contexts are descended into. The walker borrows the
/// tree, so the tree cannot change while a walk is in progress.
#[derive(Debug)]
pub struct SubtreeWalker<'a> {
    start: Option<NodeRef<'a>>,
    stack: Vec<Frame<'a>>,
    scope: Scope,
}

impl<'a> SubtreeWalker<'a> {
    /// Walk from `start` with the given scope.
    pub fn new(start: &'a Entry, scope: Scope) -> Self {
        let start_node = NodeRef::Context(start);
        let mut walker = SubtreeWalker {
            start: None,
            stack: Vec::new(),
            scope,
        };
        match scope {
            Scope::Base => walker.start = Some(start_node),
            Scope::OneLevel => walker.push_frame(start, Name::empty()),
            Scope::Subtree => {
                walker.start = Some(start_node);
                walker.push_frame(start, Name::empty());
            }
        }
        walker
    }

    /// Walk that yields exactly one node under the empty name.
    ///
    /// Used for Base-scope walks that start at an object.
    pub fn single(node: NodeRef<'a>) -> Self {
        SubtreeWalker {
            start: Some(node),
            stack: Vec::new(),
            scope: Scope::Base,
        }
    }

    /// Scope of this walk
    pub fn scope(&self) -> Scope {
        self.scope
    }

    fn push_frame(&mut self, entry: &'a Entry, prefix: Name) {
        trace!(
            target: "hiermem::walk",
            prefix = %prefix,
            children = entry.child_count(),
            depth = self.stack.len(),
            "descend"
        );
        self.stack.push(Frame {
            children: entry.slots().iter(),
            prefix,
        });
    }
}

impl<'a> Iterator for SubtreeWalker<'a> {
    type Item = (Name, NodeRef<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(start) = self.start.take() {
            return Some((Name::empty(), start));
        }

        loop {
            let frame = self.stack.last_mut()?;
            let Some((local, bound)) = frame.children.next() else {
                self.stack.pop();
                continue;
            };

            let name = frame.prefix.clone().child(local.as_str());
            if self.scope == Scope::Subtree {
                if let Bound::Context(entry) = bound {
                    self.push_frame(entry, name.clone());
                }
            }
            return Some((name, bound.as_node()));
        }
    }
}
