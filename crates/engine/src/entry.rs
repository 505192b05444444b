//! Entries and the values bound under them.
//!
//! An [`Entry`] owns its children, so the namespace is a tree by
//! construction: a child can only be attached by moving it into its parent.
//! Children keep insertion order and are matched through the tree's
//! [`NameSyntax`].

use std::borrow::Cow;
use std::collections::HashSet;

use hiermem_core::{Attributes, DirError, DirResult, NameSyntax, ObjectValue};
use serde::{Deserialize, Serialize};

// =============================================================================
// Bound
// =============================================================================

/// A value bound to a name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Bound {
    /// An internal node with attributes and children
    Context(Entry),
    /// An opaque leaf value; carries no attributes and no children
    Object(ObjectValue),
}

impl Bound {
    /// Kind of this binding
    pub fn kind(&self) -> BindingKind {
        match self {
            Bound::Context(_) => BindingKind::Context,
            Bound::Object(_) => BindingKind::Object,
        }
    }

    /// The entry, if this is a context
    pub fn as_context(&self) -> Option<&Entry> {
        match self {
            Bound::Context(entry) => Some(entry),
            Bound::Object(_) => None,
        }
    }

    /// The value, if this is an object
    pub fn as_object(&self) -> Option<&ObjectValue> {
        match self {
            Bound::Context(_) => None,
            Bound::Object(value) => Some(value),
        }
    }

    /// Borrowed view of this binding
    pub fn as_node(&self) -> NodeRef<'_> {
        match self {
            Bound::Context(entry) => NodeRef::Context(entry),
            Bound::Object(value) => NodeRef::Object(Cow::Borrowed(value)),
        }
    }
}

impl From<ObjectValue> for Bound {
    fn from(value: ObjectValue) -> Self {
        Bound::Object(value)
    }
}

impl From<Entry> for Bound {
    fn from(entry: Entry) -> Self {
        Bound::Context(entry)
    }
}

/// Discriminant reported by listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BindingKind {
    /// Bound to an entry
    Context,
    /// Bound to an object value
    Object,
}

/// A binding as handed to callers.
///
/// Walkers borrow objects from the tree; lookups that ran through an object
/// factory own the value it produced.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeRef<'a> {
    /// An entry in the tree
    Context(&'a Entry),
    /// An object value
    Object(Cow<'a, ObjectValue>),
}

impl<'a> NodeRef<'a> {
    /// Kind of this node
    pub fn kind(&self) -> BindingKind {
        match self {
            NodeRef::Context(_) => BindingKind::Context,
            NodeRef::Object(_) => BindingKind::Object,
        }
    }

    /// The entry, if this is a context
    pub fn as_context(&self) -> Option<&'a Entry> {
        match self {
            NodeRef::Context(entry) => Some(*entry),
            NodeRef::Object(_) => None,
        }
    }

    /// The value, if this is an object
    pub fn as_object(&self) -> Option<&ObjectValue> {
        match self {
            NodeRef::Context(_) => None,
            NodeRef::Object(value) => Some(&**value),
        }
    }
}

impl<'a> From<&'a Bound> for NodeRef<'a> {
    fn from(bound: &'a Bound) -> Self {
        bound.as_node()
    }
}

// =============================================================================
// Entry
// =============================================================================

/// An internal node of the namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    name: String,
    attributes: Attributes,
    children: Vec<(String, Bound)>,
}

impl Entry {
    /// Create a childless entry
    pub fn new(name: impl Into<String>, attributes: Attributes) -> Self {
        Entry {
            name: name.into(),
            attributes,
            children: Vec::new(),
        }
    }

    /// Local name relative to the parent; empty for the root
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attributes of this entry
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Direct children in insertion order
    pub fn children(&self) -> impl Iterator<Item = (&str, &Bound)> {
        self.children.iter().map(|(name, bound)| (name.as_str(), bound))
    }

    /// Number of direct children
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Look up a direct child
    pub fn child(&self, name: &str, syntax: &NameSyntax) -> Option<&Bound> {
        self.position(name, syntax).map(|idx| &self.children[idx].1)
    }

    pub(crate) fn slots(&self) -> &[(String, Bound)] {
        &self.children
    }

    pub(crate) fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Fit a detached subtree to a tree before it is attached under `name`.
    ///
    /// Entry names follow their slots and attribute sets are rebuilt with
    /// the tree's id matching. Siblings that collide under `syntax` are a
    /// NameAlreadyBound error.
    pub(crate) fn adopt(
        &mut self,
        name: &str,
        syntax: &NameSyntax,
        ignore_case: bool,
    ) -> DirResult<()> {
        self.name = name.to_string();
        let previous = std::mem::replace(
            &mut self.attributes,
            Attributes::with_ignore_case(ignore_case),
        );
        for attr in previous.iter().cloned() {
            self.attributes.merge(attr);
        }

        let mut seen = HashSet::new();
        for (local, bound) in &mut self.children {
            if local.is_empty() {
                return Err(DirError::invalid_name(format!("{name}: empty child name")));
            }
            if !seen.insert(syntax.key(local.as_str()).into_owned()) {
                return Err(DirError::name_already_bound(format!(
                    "{name}{}{local}",
                    syntax.separator
                )));
            }
            if let Bound::Context(child) = bound {
                child.adopt(local.as_str(), syntax, ignore_case)?;
            }
        }
        Ok(())
    }

    pub(crate) fn child_mut(&mut self, name: &str, syntax: &NameSyntax) -> Option<&mut Bound> {
        match self.position(name, syntax) {
            Some(idx) => Some(&mut self.children[idx].1),
            None => None,
        }
    }

    fn position(&self, name: &str, syntax: &NameSyntax) -> Option<usize> {
        let key = syntax.key(name);
        self.children
            .iter()
            .position(|(child, _)| syntax.key(child) == key)
    }

    /// Append a child. The caller checks for collisions.
    pub(crate) fn push_child(&mut self, name: String, bound: Bound) {
        self.children.push((name, bound));
    }

    /// Replace an existing child in place, or append a new one.
    pub(crate) fn put_child(&mut self, name: String, bound: Bound, syntax: &NameSyntax) {
        match self.position(&name, syntax) {
            Some(idx) => self.children[idx] = (name, bound),
            None => self.children.push((name, bound)),
        }
    }

    pub(crate) fn remove_child(&mut self, name: &str, syntax: &NameSyntax) -> Option<Bound> {
        self.position(name, syntax)
            .map(|idx| self.children.remove(idx).1)
    }

    /// Rename a child without moving it among its siblings.
    pub(crate) fn rename_child(&mut self, old: &str, new: &str, syntax: &NameSyntax) -> bool {
        let Some(idx) = self.position(old, syntax) else {
            return false;
        };
        let slot = &mut self.children[idx];
        slot.0 = new.to_string();
        if let Bound::Context(entry) = &mut slot.1 {
            entry.set_name(new);
        }
        true
    }

    /// Descend one component at a time to the entry named by `path`.
    pub(crate) fn resolve(&self, path: &[String], syntax: &NameSyntax) -> DirResult<&Entry> {
        let Some((head, rest)) = path.split_first() else {
            return Ok(self);
        };
        match self.child(head, syntax) {
            Some(Bound::Context(entry)) => entry.resolve(rest, syntax),
            Some(Bound::Object(_)) => Err(DirError::not_context(head.as_str())),
            None => Err(DirError::name_not_found(head.as_str())),
        }
    }

    /// Mutable counterpart of [`Entry::resolve`].
    pub(crate) fn resolve_mut(
        &mut self,
        path: &[String],
        syntax: &NameSyntax,
    ) -> DirResult<&mut Entry> {
        let Some((head, rest)) = path.split_first() else {
            return Ok(self);
        };
        match self.child_mut(head, syntax) {
            Some(Bound::Context(entry)) => entry.resolve_mut(rest, syntax),
            Some(Bound::Object(_)) => Err(DirError::not_context(head.as_str())),
            None => Err(DirError::name_not_found(head.as_str())),
        }
    }
}
