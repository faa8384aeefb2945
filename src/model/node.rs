//! Node in the property graph.

use serde::{Deserialize, Deserializer, Serialize};
use super::{PropertyMap, PropertyValue};

/// Primary type of a node that carries no labels.
pub const UNKNOWN_TYPE: &str = "Unknown";

/// Opaque node identifier assigned by the external store.
///
/// Neo4j element ids are strings (`"4:abc:123"`); legacy ids are integers.
/// Both deserialize into one textual id space: the integer `1` and the
/// string `"1"` are the same id. A payload that uses both for different
/// nodes is rejected with `DuplicateNodeId`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short form used in fallback display names: the last `:` segment,
    /// cut to eight characters.
    pub fn short(&self) -> &str {
        let tail = self.0.rsplit(':').next().unwrap_or(&self.0);
        match tail.char_indices().nth(8) {
            Some((cut, _)) => &tail[..cut],
            None => tail,
        }
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(v: &str) -> Self { Self(v.to_owned()) }
}
impl From<String> for NodeId {
    fn from(v: String) -> Self { Self(v) }
}
impl From<u64> for NodeId {
    fn from(v: u64) -> Self { Self(v.to_string()) }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawId::deserialize(deserializer).map(|raw| Self(raw.into_string()))
    }
}

/// Wire form of an identifier: string or integer.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum RawId {
    Text(String),
    Int(i64),
}

impl RawId {
    pub(crate) fn into_string(self) -> String {
        match self {
            RawId::Text(s) => s,
            RawId::Int(i) => i.to_string(),
        }
    }
}

/// A node in the property graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// Ordered labels; the first one is the primary type.
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub properties: PropertyMap,
}

impl Node {
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            labels: Vec::new(),
            properties: PropertyMap::new(),
        }
    }

    pub fn with_labels(mut self, labels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// First label, or [`UNKNOWN_TYPE`] when the node has none.
    ///
    /// Callers holding a graph should go through `Graph::node_type`.
    pub(crate) fn primary_label(&self) -> &str {
        self.labels.first().map(String::as_str).unwrap_or(UNKNOWN_TYPE)
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }
}
