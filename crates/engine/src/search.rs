//! Search entry points on [`NamespaceTree`].
//!
//! A search resolves its start name, walks the requested scope with a
//! [`SubtreeWalker`] and hands the candidates to a [`LazyMatcher`]. Nothing is
//! evaluated until the caller pulls results.

use hiermem_core::{AttrValue, Attributes, DirError, DirResult};
use hiermem_filter::{ContainmentFilter, Filter, SearchFilter};
use tracing::debug;

use crate::entry::NodeRef;
use crate::matcher::{LazyMatcher, SearchControls};
use crate::tree::NamespaceTree;
use crate::walker::{Scope, SubtreeWalker};

/// Lazy search results over a tree.
pub type Search<'a, F> = LazyMatcher<'a, SubtreeWalker<'a>, F>;

impl NamespaceTree {
    /// Search below `name` with an RFC 2254 style filter.
    ///
    /// Without controls the direct children of `name` are searched and all
    /// their attributes are returned.
    ///
    /// ```
    /// use hiermem_core::Attributes;
    /// use hiermem_engine::NamespaceTree;
    ///
    /// let mut tree = NamespaceTree::new();
    /// tree.create_subcontext("alice", Some(Attributes::new().with("cn", ["Alice"]))).unwrap();
    /// tree.create_subcontext("bob", Some(Attributes::new().with("cn", ["Bob"]))).unwrap();
    ///
    /// let hits: Vec<_> = tree
    ///     .search("", "(cn=a*)", None)
    ///     .unwrap()
    ///     .map(|hit| hit.unwrap().name.to_string())
    ///     .collect();
    /// assert_eq!(hits, ["alice"]);
    /// ```
    pub fn search(
        &self,
        name: &str,
        filter: &str,
        controls: Option<SearchControls>,
    ) -> DirResult<Search<'_, SearchFilter>> {
        let filter = SearchFilter::parse(filter)?;
        debug!(target: "hiermem::search", name, filter = %filter, "search");
        self.search_with(name, filter, controls.unwrap_or_default())
    }

    /// Search below `name` with a filter template; see
    /// [`hiermem_filter::format_template`].
    pub fn search_template(
        &self,
        name: &str,
        template: &str,
        args: &[AttrValue],
        controls: Option<SearchControls>,
    ) -> DirResult<Search<'_, SearchFilter>> {
        let filter = SearchFilter::from_template(template, args)?;
        debug!(target: "hiermem::search", name, filter = %filter, "search_template");
        self.search_with(name, filter, controls.unwrap_or_default())
    }

    /// Direct children of `name` whose attributes contain `matching`.
    ///
    /// `None` (or an empty set) matches every child context. Reported
    /// attributes are restricted to `return_ids` when given.
    pub fn search_attributes(
        &self,
        name: &str,
        matching: Option<&Attributes>,
        return_ids: Option<&[String]>,
    ) -> DirResult<Search<'_, ContainmentFilter>> {
        let filter = ContainmentFilter::new(matching.cloned().unwrap_or_default());
        let controls = SearchControls {
            scope: Scope::OneLevel,
            returning_attributes: return_ids.map(<[String]>::to_vec),
            ..SearchControls::default()
        };
        debug!(
            target: "hiermem::search",
            name,
            pattern_attrs = filter.pattern().len(),
            "search_attributes"
        );
        self.search_with(name, filter, controls)
    }

    /// Search below `name` with any [`Filter`].
    ///
    /// A Base search may start at an object; any other scope needs a context.
    pub fn search_with<F: Filter>(
        &self,
        name: &str,
        filter: F,
        controls: SearchControls,
    ) -> DirResult<Search<'_, F>> {
        let parsed = self.parse(name)?;
        let syntax = self.syntax();

        let (walker, parent) = match parsed.components().split_last() {
            None => (SubtreeWalker::new(self.root(), controls.scope), self.root()),
            Some((leaf, path)) => {
                let parent = self.root().resolve(path, syntax)?;
                let bound = parent
                    .child(leaf, syntax)
                    .ok_or_else(|| DirError::name_not_found(syntax.format(&parsed)))?;
                match bound.as_node() {
                    NodeRef::Context(entry) => (SubtreeWalker::new(entry, controls.scope), entry),
                    node if controls.scope == Scope::Base => (SubtreeWalker::single(node), parent),
                    NodeRef::Object(_) => {
                        return Err(DirError::not_context(syntax.format(&parsed)))
                    }
                }
            }
        };

        debug!(
            target: "hiermem::search",
            start = %parsed,
            scope = ?controls.scope,
            count_limit = controls.count_limit,
            returning_obj = controls.returning_obj,
            "walk"
        );

        let matcher = LazyMatcher::new(walker, filter, controls);
        if self.options().always_materialize {
            Ok(matcher.with_materializer(self.materializer(parent)))
        } else {
            Ok(matcher)
        }
    }
}
