//! Environment property bag.
//!
//! An Environment is immutable once shared: `with_property` and
//! `without_property` build a fresh copy and leave every holder of the
//! original untouched. Cloning only bumps a reference count.

use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Key/value properties handed to object factories.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    props: Arc<BTreeMap<String, Value>>,
}

impl Environment {
    /// Create an empty environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a property
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.props.get(key)
    }

    /// Number of properties
    pub fn len(&self) -> usize {
        self.props.len()
    }

    /// Check if no properties are set
    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    /// Iterate properties in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.props.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Copy with `key` set to `value`
    pub fn with_property(&self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut props = (*self.props).clone();
        props.insert(key.into(), value.into());
        Environment {
            props: Arc::new(props),
        }
    }

    /// Copy with `key` removed
    pub fn without_property(&self, key: &str) -> Self {
        if !self.props.contains_key(key) {
            return self.clone();
        }
        let mut props = (*self.props).clone();
        props.remove(key);
        Environment {
            props: Arc::new(props),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Environment {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let props = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect::<BTreeMap<_, _>>();
        Environment {
            props: Arc::new(props),
        }
    }
}
