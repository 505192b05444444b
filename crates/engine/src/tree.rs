//! The namespace tree and its naming operations.
//!
//! Every operation takes a flat string name, parses it with the tree's
//! [`NameParser`] and resolves it one component at a time from the root.
//! Sibling names compare through the parser's [`NameSyntax`].

use std::sync::Arc;

use hiermem_core::{
    Attributes, DirError, DirResult, Environment, ModOp, Modification, Name, NameParser,
    NameSyntax, SyntaxParser,
};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{AccessMode, TreeOptions};
use crate::entry::{BindingKind, Bound, Entry, NodeRef};
use crate::factory::{NoopFactory, ObjectFactory};
use crate::matcher::Materializer;

/// A child as reported by [`NamespaceTree::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameClassPair {
    /// Local name of the child
    pub name: String,
    /// Whether the child is a context or an object
    pub kind: BindingKind,
}

/// A child as reported by [`NamespaceTree::list_bindings`].
#[derive(Debug, Clone, PartialEq)]
pub struct Binding<'a> {
    /// Local name of the child
    pub name: String,
    /// The bound value, materialized when the tree is configured to
    pub object: NodeRef<'a>,
}

/// An in-memory hierarchical namespace.
///
/// # Example
///
/// ```
/// use hiermem_core::{Attributes, ObjectValue};
/// use hiermem_engine::NamespaceTree;
///
/// let mut tree = NamespaceTree::new();
/// tree.create_subcontext("people", None).unwrap();
/// tree.bind("people/printer", ObjectValue::from("lp0"), None).unwrap();
///
/// let names: Vec<_> = tree.list("people").unwrap().into_iter().map(|p| p.name).collect();
/// assert_eq!(names, ["printer"]);
/// ```
pub struct NamespaceTree {
    root: Entry,
    options: TreeOptions,
    env: Environment,
    factory: Arc<dyn ObjectFactory>,
    parser: Arc<dyn NameParser>,
    read_only: Option<DirError>,
}

impl NamespaceTree {
    /// Create an empty tree with default options.
    pub fn new() -> Self {
        Self::with_options(TreeOptions::default())
    }

    /// Create an empty tree.
    pub fn with_options(options: TreeOptions) -> Self {
        let read_only = match options.access_mode {
            AccessMode::ReadWrite => None,
            AccessMode::ReadOnly => Some(DirError::read_only("tree opened read-only")),
        };
        NamespaceTree {
            root: Entry::new("", Attributes::with_ignore_case(options.ignore_case)),
            parser: Arc::new(SyntaxParser::new(options.name_syntax.clone())),
            factory: Arc::new(NoopFactory),
            env: Environment::new(),
            read_only,
            options,
        }
    }

    /// Replace the object factory.
    pub fn with_factory(mut self, factory: Arc<dyn ObjectFactory>) -> Self {
        self.factory = factory;
        self
    }

    /// Replace the name parser.
    pub fn with_parser(mut self, parser: Arc<dyn NameParser>) -> Self {
        self.parser = parser;
        self
    }

    /// Replace the environment.
    pub fn with_environment(mut self, env: Environment) -> Self {
        self.env = env;
        self
    }

    /// Options the tree was created with
    pub fn options(&self) -> &TreeOptions {
        &self.options
    }

    /// Current environment
    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// The root entry
    pub fn root(&self) -> &Entry {
        &self.root
    }

    /// Whether mutations are rejected
    pub fn is_read_only(&self) -> bool {
        self.read_only.is_some()
    }

    pub(crate) fn syntax(&self) -> &NameSyntax {
        self.parser.syntax()
    }

    pub(crate) fn factory(&self) -> &dyn ObjectFactory {
        &*self.factory
    }

    pub(crate) fn parse(&self, name: &str) -> DirResult<Name> {
        self.parser.parse(name)
    }

    // =========================================================================
    // Binding
    // =========================================================================

    /// Bind `value` under a new name.
    ///
    /// Attributes, when given, are added to a bound context. Objects carry no
    /// attributes, so binding one with a non-empty set is a SchemaViolation.
    pub fn bind(
        &mut self,
        name: &str,
        value: impl Into<Bound>,
        attrs: Option<Attributes>,
    ) -> DirResult<()> {
        self.check_writable("bind")?;
        let name = self.parse(name)?;
        let (path, leaf) = split_leaf(&name)?;

        let parent = self.root.resolve(path, self.parser.syntax())?;
        if parent.child(leaf, self.parser.syntax()).is_some() {
            return Err(DirError::name_already_bound(self.syntax().format(&name)));
        }
        let bound = self.prepare_binding(value.into(), attrs, path, leaf)?;
        let kind = bound.kind();

        let parser = Arc::clone(&self.parser);
        self.root
            .resolve_mut(path, parser.syntax())?
            .push_child(leaf.to_string(), bound);

        debug!(target: "hiermem::tree", name = %name, kind = ?kind, "bind");
        Ok(())
    }

    /// Bind `value`, replacing any existing binding of the same name in place.
    pub fn rebind(
        &mut self,
        name: &str,
        value: impl Into<Bound>,
        attrs: Option<Attributes>,
    ) -> DirResult<()> {
        self.check_writable("rebind")?;
        let name = self.parse(name)?;
        let (path, leaf) = split_leaf(&name)?;

        let bound = self.prepare_binding(value.into(), attrs, path, leaf)?;
        let kind = bound.kind();

        let parser = Arc::clone(&self.parser);
        let syntax = parser.syntax();
        self.root
            .resolve_mut(path, syntax)?
            .put_child(leaf.to_string(), bound, syntax);

        debug!(target: "hiermem::tree", name = %name, kind = ?kind, "rebind");
        Ok(())
    }

    /// Remove a binding and everything below it.
    ///
    /// Unbinding a name that is not bound succeeds; a missing intermediate
    /// context is NameNotFound.
    pub fn unbind(&mut self, name: &str) -> DirResult<()> {
        self.check_writable("unbind")?;
        let name = self.parse(name)?;
        let (path, leaf) = split_leaf(&name)?;

        let parser = Arc::clone(&self.parser);
        let syntax = parser.syntax();
        let removed = self
            .root
            .resolve_mut(path, syntax)?
            .remove_child(leaf, syntax)
            .is_some();

        debug!(target: "hiermem::tree", name = %name, removed, "unbind");
        Ok(())
    }

    /// Rename a binding within its parent context.
    ///
    /// The binding keeps its position among its siblings.
    pub fn rename(&mut self, old: &str, new: &str) -> DirResult<()> {
        self.check_writable("rename")?;
        let old_name = self.parse(old)?;
        let new_name = self.parse(new)?;
        let (old_path, old_leaf) = split_leaf(&old_name)?;
        let (new_path, new_leaf) = split_leaf(&new_name)?;

        let parser = Arc::clone(&self.parser);
        let syntax = parser.syntax();
        let same_parent = old_path.len() == new_path.len()
            && old_path
                .iter()
                .zip(new_path)
                .all(|(a, b)| syntax.components_match(a, b));
        if !same_parent {
            return Err(DirError::invalid_name(format!(
                "cannot rename {} to {}: parents differ",
                syntax.format(&old_name),
                syntax.format(&new_name)
            )));
        }

        let parent = self.root.resolve_mut(old_path, syntax)?;
        if parent.child(new_leaf, syntax).is_some() {
            return Err(DirError::name_already_bound(syntax.format(&new_name)));
        }
        if !parent.rename_child(old_leaf, new_leaf, syntax) {
            return Err(DirError::name_not_found(syntax.format(&old_name)));
        }

        debug!(target: "hiermem::tree", old = %old_name, new = %new_name, "rename");
        Ok(())
    }

    /// Create an empty context with the given attributes.
    pub fn create_subcontext(
        &mut self,
        name: &str,
        attrs: Option<Attributes>,
    ) -> DirResult<&Entry> {
        self.check_writable("create_subcontext")?;
        let name = self.parse(name)?;
        let (path, leaf) = split_leaf(&name)?;

        let mut entry = Entry::new(leaf, Attributes::with_ignore_case(self.options.ignore_case));
        if let Some(attrs) = &attrs {
            entry.attributes_mut().apply(&add_all(attrs));
        }

        let parser = Arc::clone(&self.parser);
        let syntax = parser.syntax();
        let parent = self.root.resolve_mut(path, syntax)?;
        if parent.child(leaf, syntax).is_some() {
            return Err(DirError::name_already_bound(syntax.format(&name)));
        }
        parent.push_child(leaf.to_string(), Bound::Context(entry));
        debug!(target: "hiermem::tree", name = %name, "create_subcontext");

        parent
            .child(leaf, syntax)
            .and_then(Bound::as_context)
            .ok_or_else(|| DirError::name_not_found(syntax.format(&name)))
    }

    /// Remove a context and everything below it.
    ///
    /// Behaves like [`NamespaceTree::unbind`] except that a name bound to an
    /// object is NotContext.
    pub fn destroy_subcontext(&mut self, name: &str) -> DirResult<()> {
        self.check_writable("destroy_subcontext")?;
        let name = self.parse(name)?;
        let (path, leaf) = split_leaf(&name)?;

        let parser = Arc::clone(&self.parser);
        let syntax = parser.syntax();
        let parent = self.root.resolve_mut(path, syntax)?;
        if let Some(Bound::Object(_)) = parent.child(leaf, syntax) {
            return Err(DirError::not_context(syntax.format(&name)));
        }
        let removed = parent.remove_child(leaf, syntax).is_some();

        debug!(target: "hiermem::tree", name = %name, removed, "destroy_subcontext");
        Ok(())
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    /// Apply modifications in order to a context's attributes.
    ///
    /// The empty name addresses the root. Objects carry no attributes, so
    /// modifying one is a SchemaViolation.
    pub fn modify_attributes(&mut self, name: &str, mods: &[Modification]) -> DirResult<()> {
        self.check_writable("modify_attributes")?;
        let name = self.parse(name)?;

        let parser = Arc::clone(&self.parser);
        let syntax = parser.syntax();
        let entry = match name.components().split_last() {
            None => &mut self.root,
            Some((leaf, path)) => {
                let parent = self.root.resolve_mut(path, syntax)?;
                match parent.child_mut(leaf, syntax) {
                    Some(Bound::Context(entry)) => entry,
                    Some(Bound::Object(_)) => {
                        return Err(DirError::schema_violation(format!(
                            "{} is bound to an object, which has no attributes",
                            syntax.format(&name)
                        )))
                    }
                    None => return Err(DirError::name_not_found(syntax.format(&name))),
                }
            }
        };
        entry.attributes_mut().apply(mods);

        debug!(
            target: "hiermem::tree",
            name = %name,
            modifications = mods.len(),
            "modify_attributes"
        );
        Ok(())
    }

    /// Apply one operation to every attribute of `attrs`.
    pub fn modify_attributes_op(
        &mut self,
        name: &str,
        op: ModOp,
        attrs: &Attributes,
    ) -> DirResult<()> {
        let mods: Vec<Modification> = attrs
            .iter()
            .map(|attr| Modification::new(op, attr.clone()))
            .collect();
        self.modify_attributes(name, &mods)
    }

    /// Copy of a binding's attributes, restricted to `ids` when given.
    ///
    /// Ids that are not present are ignored. Objects report an empty set.
    pub fn get_attributes(&self, name: &str, ids: Option<&[String]>) -> DirResult<Attributes> {
        let name = self.parse(name)?;
        match self.node_at(&name)? {
            (NodeRef::Context(entry), _) => Ok(entry.attributes().select(ids)),
            (NodeRef::Object(_), _) => Ok(Attributes::with_ignore_case(self.options.ignore_case)),
        }
    }

    // =========================================================================
    // Lookup & listing
    // =========================================================================

    /// The value bound to `name`; the empty name is the root context.
    pub fn lookup(&self, name: &str) -> DirResult<NodeRef<'_>> {
        let name = self.parse(name)?;
        match self.node_at(&name)? {
            (node, Some(parent)) => {
                let leaf = Name::from_components(name.components()[name.len() - 1..].to_vec());
                self.materialize(node, &leaf, parent)
            }
            (node, None) => Ok(node),
        }
    }

    /// Same as [`NamespaceTree::lookup`]; links are not followed specially.
    pub fn lookup_link(&self, name: &str) -> DirResult<NodeRef<'_>> {
        self.lookup(name)
    }

    /// Names and kinds of a context's direct children.
    pub fn list(&self, name: &str) -> DirResult<Vec<NameClassPair>> {
        let entry = self.context_at(name)?;
        Ok(entry
            .children()
            .map(|(local, bound)| NameClassPair {
                name: local.to_string(),
                kind: bound.kind(),
            })
            .collect())
    }

    /// Names and values of a context's direct children.
    pub fn list_bindings(&self, name: &str) -> DirResult<Vec<Binding<'_>>> {
        let entry = self.context_at(name)?;
        entry
            .children()
            .map(|(local, bound)| {
                let object =
                    self.materialize(bound.as_node(), &Name::empty().child(local), entry)?;
                Ok(Binding {
                    name: local.to_string(),
                    object,
                })
            })
            .collect()
    }

    /// Resolve a name to its node and, unless it is the root, its parent.
    fn node_at(&self, name: &Name) -> DirResult<(NodeRef<'_>, Option<&Entry>)> {
        let syntax = self.syntax();
        let Some((leaf, path)) = name.components().split_last() else {
            return Ok((NodeRef::Context(&self.root), None));
        };
        let parent = self.root.resolve(path, syntax)?;
        let bound = parent
            .child(leaf, syntax)
            .ok_or_else(|| DirError::name_not_found(syntax.format(name)))?;
        Ok((bound.as_node(), Some(parent)))
    }

    fn context_at(&self, name: &str) -> DirResult<&Entry> {
        let name = self.parse(name)?;
        match self.node_at(&name)? {
            (NodeRef::Context(entry), _) => Ok(entry),
            (NodeRef::Object(_), _) => Err(DirError::not_context(self.syntax().format(&name))),
        }
    }

    pub(crate) fn materialize<'a>(
        &'a self,
        node: NodeRef<'a>,
        name: &Name,
        parent: &'a Entry,
    ) -> DirResult<NodeRef<'a>> {
        if !self.options.always_materialize {
            return Ok(node);
        }
        self.materializer(parent).materialize(node, name)
    }

    pub(crate) fn materializer<'a>(&'a self, parent: &'a Entry) -> Materializer<'a> {
        Materializer {
            factory: self.factory(),
            parent,
            env: &self.env,
        }
    }

    // =========================================================================
    // Names, schema & environment
    // =========================================================================

    /// Append `name` to `prefix` and render the result.
    pub fn compose_name(&self, name: &str, prefix: &str) -> DirResult<String> {
        let mut composed = self.parse(prefix)?;
        composed.extend(&self.parse(name)?);
        Ok(self.syntax().format(&composed))
    }

    /// The parser this tree reads names with
    pub fn name_parser(&self) -> Arc<dyn NameParser> {
        Arc::clone(&self.parser)
    }

    /// Schema lookup is not supported.
    pub fn schema(&self, name: &str) -> DirResult<&Entry> {
        Err(DirError::not_supported(format!("schema for {name:?}")))
    }

    /// Schema class definitions are not supported.
    pub fn schema_class_definition(&self, name: &str) -> DirResult<&Entry> {
        Err(DirError::not_supported(format!(
            "schema class definition for {name:?}"
        )))
    }

    /// Set an environment property, returning the previous value.
    pub fn add_to_environment(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Option<Value> {
        let key = key.into();
        let previous = self.env.get(&key).cloned();
        self.env = self.env.with_property(key, value);
        previous
    }

    /// Remove an environment property, returning its value.
    pub fn remove_from_environment(&mut self, key: &str) -> Option<Value> {
        let previous = self.env.get(key).cloned();
        self.env = self.env.without_property(key);
        previous
    }

    // =========================================================================
    // Access control
    // =========================================================================

    /// Reject every later mutation with a copy of `err`.
    pub fn set_read_only(&mut self, err: DirError) {
        debug!(target: "hiermem::tree", reason = %err, "tree is now read-only");
        self.read_only = Some(err);
    }

    fn check_writable(&self, operation: &str) -> DirResult<()> {
        match &self.read_only {
            None => Ok(()),
            Some(err) => {
                warn!(
                    target: "hiermem::tree",
                    operation,
                    error = %err,
                    "rejected mutation on read-only tree"
                );
                Err(err.clone())
            }
        }
    }

    /// Run the state hook and attach attributes to the value being bound.
    fn prepare_binding(
        &self,
        value: Bound,
        attrs: Option<Attributes>,
        path: &[String],
        leaf: &str,
    ) -> DirResult<Bound> {
        let (value, attrs) = if self.options.always_materialize {
            let parent = self.root.resolve(path, self.syntax())?;
            self.factory.state_to_bind(
                value,
                attrs,
                &Name::empty().child(leaf),
                parent,
                &self.env,
            )?
        } else {
            (value, attrs)
        };

        match value {
            Bound::Object(_) if attrs.as_ref().is_some_and(|a| !a.is_empty()) => {
                Err(DirError::schema_violation(format!(
                    "{leaf}: objects cannot carry attributes"
                )))
            }
            Bound::Object(obj) => Ok(Bound::Object(obj)),
            Bound::Context(mut entry) => {
                entry.adopt(leaf, self.syntax(), self.options.ignore_case)?;
                if let Some(attrs) = &attrs {
                    entry.attributes_mut().apply(&add_all(attrs));
                }
                Ok(Bound::Context(entry))
            }
        }
    }
}

impl Default for NamespaceTree {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for NamespaceTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamespaceTree")
            .field("root", &self.root)
            .field("options", &self.options)
            .field("env", &self.env)
            .field("read_only", &self.read_only)
            .finish_non_exhaustive()
    }
}

/// Split a name into its parent path and leaf, rejecting empty names and
/// empty components.
fn split_leaf(name: &Name) -> DirResult<(&[String], &str)> {
    if name.components().iter().any(String::is_empty) {
        return Err(DirError::invalid_name(format!(
            "{:?}: empty component",
            name.components()
        )));
    }
    match name.components().split_last() {
        Some((leaf, path)) => Ok((path, leaf.as_str())),
        None => Err(DirError::invalid_name("name must not be empty")),
    }
}

fn add_all(attrs: &Attributes) -> Vec<Modification> {
    attrs.iter().cloned().map(Modification::add).collect()
}
