//! Object factory hook.
//!
//! A tree created with `always_materialize` routes values through an
//! [`ObjectFactory`]: bound values pass `state_to_bind` before they are
//! stored, and values handed out by lookups, listings and searches that
//! return objects pass `object_instance`.

use hiermem_core::{Attributes, DirResult, Environment, Name, ObjectValue};

use crate::entry::{Bound, Entry, NodeRef};

/// Converts between stored bindings and the values callers see.
///
/// Both methods default to passing their input through unchanged.
pub trait ObjectFactory: Send + Sync {
    /// Produce the value to hand out for `node`, or `None` to hand out
    /// `node` itself. `name` is relative to `parent`.
    fn object_instance(
        &self,
        node: &NodeRef<'_>,
        name: &Name,
        parent: &Entry,
        env: &Environment,
    ) -> DirResult<Option<ObjectValue>> {
        let _ = (node, name, parent, env);
        Ok(None)
    }

    /// Produce the value and attributes to store for a bind.
    fn state_to_bind(
        &self,
        bound: Bound,
        attrs: Option<Attributes>,
        name: &Name,
        parent: &Entry,
        env: &Environment,
    ) -> DirResult<(Bound, Option<Attributes>)> {
        let _ = (name, parent, env);
        Ok((bound, attrs))
    }
}

/// Factory that changes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFactory;

impl ObjectFactory for NoopFactory {}
