//! Demand-driven filtering of walk candidates.

use hiermem_core::{Attributes, DirResult, Environment, Name};
use hiermem_filter::Filter;
use serde::{Deserialize, Serialize};

use crate::entry::{Entry, NodeRef};
use crate::factory::ObjectFactory;
use crate::walker::Scope;

// =============================================================================
// SearchControls
// =============================================================================

/// Parameters of a search.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchControls {
    /// How far below the start entry to look
    pub scope: Scope,
    /// Stop after this many matches; 0 means no limit
    pub count_limit: usize,
    /// Attribute ids to report per match; `None` reports all
    pub returning_attributes: Option<Vec<String>>,
    /// Report the bound object with each match
    pub returning_obj: bool,
}

impl SearchControls {
    /// Create controls with default settings (one level, no limit).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scope.
    pub fn scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Set the match limit.
    pub fn count_limit(mut self, limit: usize) -> Self {
        self.count_limit = limit;
        self
    }

    /// Restrict the reported attributes.
    pub fn returning_attributes<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.returning_attributes = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Report bound objects.
    pub fn returning_obj(mut self, enabled: bool) -> Self {
        self.returning_obj = enabled;
        self
    }
}

// =============================================================================
// SearchHit
// =============================================================================

/// One search match.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit<'a> {
    /// Name relative to the search start
    pub name: Name,
    /// Bound object, present when the controls ask for it
    pub object: Option<NodeRef<'a>>,
    /// Attributes selected by the controls
    pub attributes: Attributes,
}

/// Object factory context for materializing returned objects.
#[derive(Clone, Copy)]
pub struct Materializer<'a> {
    /// Factory to consult
    pub factory: &'a dyn ObjectFactory,
    /// Entry the candidate names are relative to
    pub parent: &'a Entry,
    /// Environment handed to the factory
    pub env: &'a Environment,
}

impl std::fmt::Debug for Materializer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Materializer")
            .field("parent", &self.parent)
            .field("env", &self.env)
            .finish_non_exhaustive()
    }
}

impl<'a> Materializer<'a> {
    pub(crate) fn materialize(&self, node: NodeRef<'a>, name: &Name) -> DirResult<NodeRef<'a>> {
        let replaced = self
            .factory
            .object_instance(&node, name, self.parent, self.env)?;
        Ok(match replaced {
            Some(value) => NodeRef::Object(std::borrow::Cow::Owned(value)),
            None => node,
        })
    }
}

// =============================================================================
// LazyMatcher
// =============================================================================

/// Pulls candidates one at a time and yields those that pass a filter.
///
/// Nothing is computed ahead of demand: each call to [`LazyMatcher::has_next`]
/// probes candidates only until the next match, which is cached so repeated
/// calls do not consume more input. Object candidates carry no attributes and
/// are skipped. A factory error is reported once and ends the enumeration.
#[derive(Debug)]
pub struct LazyMatcher<'a, I, F> {
    candidates: I,
    filter: F,
    controls: SearchControls,
    materializer: Option<Materializer<'a>>,
    pending: Option<SearchHit<'a>>,
    returned: usize,
    done: bool,
}

impl<'a, I, F> LazyMatcher<'a, I, F>
where
    I: Iterator<Item = (Name, NodeRef<'a>)>,
    F: Filter,
{
    /// Match `candidates` against `filter`.
    pub fn new(candidates: I, filter: F, controls: SearchControls) -> Self {
        LazyMatcher {
            candidates,
            filter,
            controls,
            materializer: None,
            pending: None,
            returned: 0,
            done: false,
        }
    }

    /// Run returned objects through an object factory.
    pub fn with_materializer(mut self, materializer: Materializer<'a>) -> Self {
        self.materializer = Some(materializer);
        self
    }

    /// Controls in effect
    pub fn controls(&self) -> &SearchControls {
        &self.controls
    }

    /// Whether another match exists, probing for it if none is cached.
    pub fn has_next(&mut self) -> DirResult<bool> {
        if self.pending.is_some() {
            return Ok(true);
        }
        if self.done || self.limit_reached() {
            self.done = true;
            return Ok(false);
        }

        for (name, node) in self.candidates.by_ref() {
            let NodeRef::Context(entry) = node else {
                continue;
            };
            if !self.filter.check(entry.attributes()) {
                continue;
            }

            let attributes = self
                .filter
                .select(entry.attributes(), self.controls.returning_attributes.as_deref());
            let object = if self.controls.returning_obj {
                let node = NodeRef::Context(entry);
                match &self.materializer {
                    Some(m) => match m.materialize(node, &name) {
                        Ok(node) => Some(node),
                        Err(e) => {
                            self.done = true;
                            return Err(e);
                        }
                    },
                    None => Some(node),
                }
            } else {
                None
            };

            self.pending = Some(SearchHit {
                name,
                object,
                attributes,
            });
            return Ok(true);
        }

        self.done = true;
        Ok(false)
    }

    /// Take the next match.
    pub fn next_hit(&mut self) -> DirResult<Option<SearchHit<'a>>> {
        if !self.has_next()? {
            return Ok(None);
        }
        let hit = self.pending.take();
        if hit.is_some() {
            self.returned += 1;
        }
        Ok(hit)
    }

    fn limit_reached(&self) -> bool {
        self.controls.count_limit != 0 && self.returned >= self.controls.count_limit
    }
}

impl<'a, I, F> Iterator for LazyMatcher<'a, I, F>
where
    I: Iterator<Item = (Name, NodeRef<'a>)>,
    F: Filter,
{
    type Item = DirResult<SearchHit<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_hit().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Bound;
    use crate::walker::SubtreeWalker;
    use hiermem_core::{DirError, ObjectValue};
    use hiermem_filter::{ContainmentFilter, SearchFilter};
    use std::cell::Cell;

    fn person(name: &str, cn: &str) -> Bound {
        Bound::Context(Entry::new(
            name,
            Attributes::new()
                .with("objectClass", ["person"])
                .with("cn", [cn]),
        ))
    }

    fn tree() -> Entry {
        let mut root = Entry::new("", Attributes::new());
        root.push_child("alice".into(), person("alice", "Alice"));
        root.push_child("obj".into(), Bound::Object("o".into()));
        root.push_child("bob".into(), person("bob", "Bob"));
        root.push_child("albert".into(), person("albert", "Albert"));
        root
    }

    fn filter(text: &str) -> SearchFilter {
        SearchFilter::parse(text).unwrap()
    }

    #[test]
    fn test_matches_in_source_order() {
        let root = tree();
        let walker = SubtreeWalker::new(&root, Scope::OneLevel);
        let hits: Vec<_> = LazyMatcher::new(walker, filter("(cn=al*)"), SearchControls::new())
            .map(|h| h.unwrap().name.to_string())
            .collect();
        assert_eq!(hits, ["alice", "albert"]);
    }

    #[test]
    fn test_has_next_does_not_reprobe() {
        let root = tree();
        let visited = Cell::new(0);
        let source = SubtreeWalker::new(&root, Scope::OneLevel).inspect(|_| {
            visited.set(visited.get() + 1);
        });
        let mut matcher = LazyMatcher::new(source, filter("(cn=bob)"), SearchControls::new());

        assert!(matcher.has_next().unwrap());
        assert_eq!(visited.get(), 3);
        assert!(matcher.has_next().unwrap());
        assert!(matcher.has_next().unwrap());
        assert_eq!(visited.get(), 3);

        let hit = matcher.next_hit().unwrap().unwrap();
        assert_eq!(hit.name.to_string(), "bob");
        assert!(!matcher.has_next().unwrap());
        assert_eq!(visited.get(), 4);
        assert!(matcher.next_hit().unwrap().is_none());
    }

    #[test]
    fn test_each_candidate_visited_once() {
        let root = tree();
        let visited = Cell::new(0);
        let source = SubtreeWalker::new(&root, Scope::Subtree).inspect(|_| {
            visited.set(visited.get() + 1);
        });
        let matcher = LazyMatcher::new(source, filter("(objectClass=*)"), SearchControls::new());
        assert_eq!(matcher.count(), 3);
        assert_eq!(visited.get(), 5);
    }

    #[test]
    fn test_count_limit() {
        let root = tree();
        let walker = SubtreeWalker::new(&root, Scope::OneLevel);
        let controls = SearchControls::new().count_limit(2);
        let matcher = LazyMatcher::new(walker, filter("(objectClass=person)"), controls);
        assert_eq!(matcher.count(), 2);
    }

    #[test]
    fn test_returning_attributes() {
        let root = tree();
        let walker = SubtreeWalker::new(&root, Scope::OneLevel);
        let controls = SearchControls::new().returning_attributes(["cn", "missing"]);
        let hit = LazyMatcher::new(walker, filter("(cn=bob)"), controls)
            .next()
            .unwrap()
            .unwrap();
        assert_eq!(hit.attributes.len(), 1);
        assert!(hit.attributes.get("cn").is_some());
        assert!(hit.object.is_none());
    }

    #[test]
    fn test_containment_filter_source() {
        let root = tree();
        let walker = SubtreeWalker::new(&root, Scope::OneLevel);
        let pattern = Attributes::new().with("cn", ["Bob"]);
        let hits: Vec<_> = LazyMatcher::new(walker, ContainmentFilter::new(pattern), SearchControls::new())
            .collect::<DirResult<_>>()
            .unwrap();
        assert_eq!(hits.len(), 1);
    }

    struct Failing;

    impl ObjectFactory for Failing {
        fn object_instance(
            &self,
            _node: &NodeRef<'_>,
            name: &Name,
            _parent: &Entry,
            _env: &Environment,
        ) -> DirResult<Option<ObjectValue>> {
            Err(DirError::schema_violation(format!("cannot build {name}")))
        }
    }

    #[test]
    fn test_factory_error_ends_enumeration() {
        let root = tree();
        let env = Environment::new();
        let walker = SubtreeWalker::new(&root, Scope::OneLevel);
        let controls = SearchControls::new().returning_obj(true);
        let mut matcher = LazyMatcher::new(walker, filter("(objectClass=person)"), controls)
            .with_materializer(Materializer {
                factory: &Failing,
                parent: &root,
                env: &env,
            });

        assert!(matcher.next().unwrap().is_err());
        assert!(matcher.next().is_none());
    }

    #[test]
    fn test_factory_not_called_without_returning_obj() {
        let root = tree();
        let env = Environment::new();
        let walker = SubtreeWalker::new(&root, Scope::OneLevel);
        let matcher = LazyMatcher::new(walker, filter("(objectClass=person)"), SearchControls::new())
            .with_materializer(Materializer {
                factory: &Failing,
                parent: &root,
                env: &env,
            });
        assert_eq!(matcher.filter_map(Result::ok).count(), 3);
    }
}
