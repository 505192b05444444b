//! Attribute-superset filter.

use hiermem_core::Attributes;

use super::Filter;

/// Matches candidates whose attributes contain every pattern attribute and
/// every pattern value.
///
/// Values compare exactly (no case folding, no wildcards). A pattern
/// attribute without values only requires the candidate to have that id. An
/// empty pattern matches everything.
#[derive(Debug, Clone, Default)]
pub struct ContainmentFilter {
    pattern: Attributes,
}

impl ContainmentFilter {
    /// Create a filter for the given pattern
    pub fn new(pattern: Attributes) -> Self {
        ContainmentFilter { pattern }
    }

    /// The pattern attributes
    pub fn pattern(&self) -> &Attributes {
        &self.pattern
    }

    /// Check whether `superset` contains `subset`.
    pub fn contains(subset: &Attributes, superset: &Attributes) -> bool {
        subset.iter().all(|wanted| match superset.get(wanted.id()) {
            Some(have) => wanted.values().iter().all(|v| have.contains(v)),
            None => false,
        })
    }
}

impl Filter for ContainmentFilter {
    fn check(&self, attrs: &Attributes) -> bool {
        Self::contains(&self.pattern, attrs)
    }
}
