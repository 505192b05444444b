//! Object values bound as leaves of the namespace.
//!
//! ObjectValue is a newtype around serde_json::Value: anything the embedding
//! application can express as JSON can be bound under a name, and object
//! factories can swap it for a richer representation on the way out.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

/// An opaque value bound as a namespace leaf.
///
/// # Examples
///
/// ```
/// use hiermem_core::ObjectValue;
///
/// let v = ObjectValue::from("printer-3");
/// assert_eq!(v.as_str(), Some("printer-3"));
///
/// let parsed: ObjectValue = r#"{"host":"db1","port":5432}"#.parse().unwrap();
/// assert!(parsed.is_object());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectValue(serde_json::Value);

impl ObjectValue {
    /// Create a null value
    pub fn null() -> Self {
        ObjectValue(serde_json::Value::Null)
    }

    /// Get the underlying serde_json::Value
    pub fn into_inner(self) -> serde_json::Value {
        self.0
    }

    /// Get a reference to the underlying serde_json::Value
    pub fn as_inner(&self) -> &serde_json::Value {
        &self.0
    }

    /// Serialize to compact JSON string
    pub fn to_json_string(&self) -> String {
        self.0.to_string()
    }
}

impl FromStr for ObjectValue {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s).map(ObjectValue)
    }
}

impl Deref for ObjectValue {
    type Target = serde_json::Value;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for ObjectValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for ObjectValue {
    fn default() -> Self {
        Self::null()
    }
}

impl From<serde_json::Value> for ObjectValue {
    fn from(v: serde_json::Value) -> Self {
        ObjectValue(v)
    }
}

impl From<ObjectValue> for serde_json::Value {
    fn from(v: ObjectValue) -> Self {
        v.0
    }
}

impl From<&str> for ObjectValue {
    fn from(v: &str) -> Self {
        ObjectValue(serde_json::Value::String(v.to_string()))
    }
}

impl From<String> for ObjectValue {
    fn from(v: String) -> Self {
        ObjectValue(serde_json::Value::String(v))
    }
}

impl From<i64> for ObjectValue {
    fn from(v: i64) -> Self {
        ObjectValue(serde_json::Value::Number(v.into()))
    }
}

impl From<bool> for ObjectValue {
    fn from(v: bool) -> Self {
        ObjectValue(serde_json::Value::Bool(v))
    }
}
