//! Conversions between `Tree` and the JSON / TOML value types
//!
//! TOML is the authoring format for playkit definitions; JSON is the
//! serialization format for resolved output.

use sha2::{Digest, Sha256};

use crate::tree::{Scalar, Tree};

/// Error computing a tree digest
#[derive(Debug, thiserror::Error)]
#[error("Canonical JSON serialization failed: {0}")]
pub struct DigestError(String);

impl From<serde_json::Value> for Tree {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Tree::Scalar(Scalar::Null),
            serde_json::Value::Bool(b) => Tree::Scalar(Scalar::Bool(b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Tree::Scalar(Scalar::Integer(i))
                } else if let Some(u) = n.as_u64() {
                    Tree::Scalar(Scalar::UInteger(u))
                } else {
                    n.as_f64()
                        .map(|f| Tree::Scalar(Scalar::Float(f)))
                        .unwrap_or(Tree::Scalar(Scalar::Null))
                }
            }
            serde_json::Value::String(s) => Tree::Scalar(Scalar::String(s)),
            serde_json::Value::Array(arr) => Tree::Array(arr.into_iter().map(Tree::from).collect()),
            serde_json::Value::Object(map) => {
                Tree::Object(map.into_iter().map(|(k, v)| (k, Tree::from(v))).collect())
            }
        }
    }
}

impl From<Tree> for serde_json::Value {
    fn from(tree: Tree) -> Self {
        match tree {
            Tree::Scalar(Scalar::Null) => serde_json::Value::Null,
            Tree::Scalar(Scalar::Bool(b)) => serde_json::Value::Bool(b),
            Tree::Scalar(Scalar::Integer(i)) => serde_json::Value::Number(i.into()),
            Tree::Scalar(Scalar::UInteger(u)) => serde_json::Value::Number(u.into()),
            Tree::Scalar(Scalar::Float(f)) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Tree::Scalar(Scalar::String(s)) => serde_json::Value::String(s),
            Tree::Array(items) => {
                serde_json::Value::Array(items.into_iter().map(serde_json::Value::from).collect())
            }
            Tree::Object(map) => serde_json::Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<toml::Value> for Tree {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => Tree::Scalar(Scalar::String(s)),
            toml::Value::Integer(i) => Tree::Scalar(Scalar::Integer(i)),
            toml::Value::Float(f) if f.is_finite() => Tree::Scalar(Scalar::Float(f)),
            toml::Value::Float(_) => Tree::Scalar(Scalar::Null),
            toml::Value::Boolean(b) => Tree::Scalar(Scalar::Bool(b)),
            toml::Value::Datetime(dt) => Tree::Scalar(Scalar::String(dt.to_string())),
            toml::Value::Array(arr) => Tree::Array(arr.into_iter().map(Tree::from).collect()),
            toml::Value::Table(table) => {
                Tree::Object(table.into_iter().map(|(k, v)| (k, Tree::from(v))).collect())
            }
        }
    }
}

impl Tree {
    /// Convert to a `serde_json::Value` (clones)
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::from(self.clone())
    }

    /// Parse a TOML document into a tree
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        let value: toml::Value = toml::from_str(contents)?;
        Ok(Tree::from(value))
    }

    /// SHA-256 hex digest of the RFC 8785 canonical JSON form.
    ///
    /// Two trees have the same digest iff they serialize to the same bytes.
    pub fn digest(&self) -> Result<String, DigestError> {
        let jcs_bytes =
            serde_json_canonicalizer::to_vec(&self.to_json()).map_err(|e| DigestError(e.to_string()))?;

        let mut hasher = Sha256::new();
        hasher.update(&jcs_bytes);
        Ok(hex::encode(hasher.finalize()))
    }
}
