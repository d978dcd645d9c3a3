//! The `Tree` and `Scalar` types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A leaf value in a data tree
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Integer(i64),
    /// Only for integers above `i64::MAX`
    UInteger(u64),
    Float(f64),
    String(String),
}

/// An arbitrarily nested key/value structure.
///
/// Object keys are held in a `BTreeMap`, so iteration order (and therefore
/// serialized output) depends only on the keys present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum Tree {
    Object(BTreeMap<String, Tree>),
    Array(Vec<Tree>),
    Scalar(Scalar),
}

impl Default for Tree {
    fn default() -> Self {
        Tree::empty()
    }
}

impl Tree {
    /// An empty object
    pub fn empty() -> Self {
        Tree::Object(BTreeMap::new())
    }

    pub fn null() -> Self {
        Tree::Scalar(Scalar::Null)
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Tree::Object(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Tree::Scalar(Scalar::Null))
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, Tree>> {
        match self {
            Tree::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Tree]> {
        match self {
            Tree::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Tree::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Tree::Scalar(Scalar::Integer(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Tree::Scalar(Scalar::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// Look up a top-level key (objects only)
    pub fn get(&self, key: &str) -> Option<&Tree> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Look up a value by dot-separated path, e.g. `"stats.ac"`
    pub fn get_path(&self, path: &str) -> Option<&Tree> {
        let mut current = self;
        for part in path.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    /// Top-level keys in sorted order; empty for non-objects
    pub fn keys(&self) -> Vec<&str> {
        self.as_object()
            .map(|map| map.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Short, human-readable name for the variant (used in diagnostics)
    pub fn kind_name(&self) -> &'static str {
        match self {
            Tree::Object(_) => "object",
            Tree::Array(_) => "array",
            Tree::Scalar(Scalar::Null) => "null",
            Tree::Scalar(Scalar::Bool(_)) => "boolean",
            Tree::Scalar(Scalar::Integer(_)) | Tree::Scalar(Scalar::UInteger(_)) => "integer",
            Tree::Scalar(Scalar::Float(_)) => "float",
            Tree::Scalar(Scalar::String(_)) => "string",
        }
    }
}

impl From<BTreeMap<String, Tree>> for Tree {
    fn from(map: BTreeMap<String, Tree>) -> Self {
        Tree::Object(map)
    }
}

impl From<Vec<Tree>> for Tree {
    fn from(items: Vec<Tree>) -> Self {
        Tree::Array(items)
    }
}

impl From<&str> for Tree {
    fn from(s: &str) -> Self {
        Tree::Scalar(Scalar::String(s.to_string()))
    }
}

impl From<String> for Tree {
    fn from(s: String) -> Self {
        Tree::Scalar(Scalar::String(s))
    }
}

impl From<i64> for Tree {
    fn from(i: i64) -> Self {
        Tree::Scalar(Scalar::Integer(i))
    }
}

impl From<bool> for Tree {
    fn from(b: bool) -> Self {
        Tree::Scalar(Scalar::Bool(b))
    }
}

impl FromIterator<(String, Tree)> for Tree {
    fn from_iter<I: IntoIterator<Item = (String, Tree)>>(iter: I) -> Self {
        Tree::Object(iter.into_iter().collect())
    }
}
