//! The fetch boundary's data contract.
//!
//! ```text
//! RawGraphPayload {
//!     nodes:         [{ id, labels, properties }],
//!     relationships: [{ id, type, properties, start_node, end_node }],
//! }
//! ```
//!
//! Field names follow what the fetch queries return
//! (`elementId(n)`, `labels(n)`, `properties(n)`, `startNode(r)`, ...).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::model::*;
use crate::LoadError;

/// A node as delivered by the fetch collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    pub id: NodeId,
    pub labels: Vec<String>,
    pub properties: PropertyMap,
}

/// A relationship as delivered by the fetch collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRelationship {
    pub id: EdgeId,
    #[serde(rename = "type")]
    pub rel_type: String,
    pub properties: PropertyMap,
    pub start_node: NodeId,
    pub end_node: NodeId,
}

/// Complete result of one fetch cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawGraphPayload {
    pub nodes: Vec<RawNode>,
    pub relationships: Vec<RawRelationship>,
}

impl RawGraphPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the JSON form. Shape errors become [`LoadError::MalformedPayload`].
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        serde_json::from_str(json).map_err(|e| LoadError::MalformedPayload(e.to_string()))
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, LoadError> {
        serde_json::from_value(value).map_err(|e| LoadError::MalformedPayload(e.to_string()))
    }

    pub fn with_node(
        mut self,
        id: impl Into<NodeId>,
        labels: impl IntoIterator<Item = impl Into<String>>,
        properties: &[(&str, PropertyValue)],
    ) -> Self {
        self.nodes.push(RawNode {
            id: id.into(),
            labels: labels.into_iter().map(Into::into).collect(),
            properties: properties.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
        });
        self
    }

    pub fn with_relationship(
        mut self,
        id: impl Into<EdgeId>,
        rel_type: impl Into<String>,
        start_node: impl Into<NodeId>,
        end_node: impl Into<NodeId>,
    ) -> Self {
        self.relationships.push(RawRelationship {
            id: id.into(),
            rel_type: rel_type.into(),
            properties: PropertyMap::new(),
            start_node: start_node.into(),
            end_node: end_node.into(),
        });
        self
    }

    /// Preview cut: the first `limit` nodes and the relationships whose
    /// endpoints both survive.
    pub fn truncated(&self, limit: usize) -> Self {
        let nodes: Vec<RawNode> = self.nodes.iter().take(limit).cloned().collect();
        let kept: HashSet<&NodeId> = nodes.iter().map(|n| &n.id).collect();
        let relationships = self.relationships.iter()
            .filter(|r| kept.contains(&r.start_node) && kept.contains(&r.end_node))
            .cloned()
            .collect();
        Self { nodes, relationships }
    }

    /// Property values are limited to scalars and lists of scalars.
    pub(crate) fn check_property_shapes(&self) -> Result<(), LoadError> {
        let node_props = self.nodes.iter().map(|n| (n.id.as_str(), &n.properties));
        let rel_props = self.relationships.iter().map(|r| (r.id.as_str(), &r.properties));
        for (owner, props) in node_props.chain(rel_props) {
            for (key, value) in props {
                if let PropertyValue::List(items) = value {
                    if items.iter().any(|v| !v.is_scalar()) {
                        return Err(LoadError::MalformedPayload(format!(
                            "property '{key}' on '{owner}' is a nested list"
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

impl From<RawNode> for Node {
    fn from(raw: RawNode) -> Self {
        Node { id: raw.id, labels: raw.labels, properties: raw.properties }
    }
}

impl From<RawRelationship> for Edge {
    fn from(raw: RawRelationship) -> Self {
        Edge {
            id: raw.id,
            rel_type: raw.rel_type,
            properties: raw.properties,
            source: raw.start_node,
            target: raw.end_node,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let payload = RawGraphPayload::from_json(r#"{
            "nodes": [
                {"id": "4:db:1", "labels": ["Person"], "properties": {"name": "Keanu"}},
                {"id": "4:db:2", "labels": [], "properties": {}}
            ],
            "relationships": [
                {"id": "5:db:9", "type": "KNOWS", "properties": {"since": 1999},
                 "start_node": "4:db:1", "end_node": "4:db:2"}
            ]
        }"#).unwrap();
        assert_eq!(payload.nodes.len(), 2);
        assert_eq!(payload.relationships[0].rel_type, "KNOWS");
        assert_eq!(payload.relationships[0].properties.get("since"), Some(&PropertyValue::Int(1999)));
    }

    #[test]
    fn test_from_value() {
        let value = serde_json::json!({
            "nodes": [{"id": 1, "labels": ["Movie"], "properties": {"rating": 8.0}}],
            "relationships": []
        });
        let payload = RawGraphPayload::from_value(value).unwrap();
        assert_eq!(payload.nodes[0].id, NodeId::new("1"));
        assert_eq!(payload.nodes[0].properties.get("rating"), Some(&PropertyValue::Float(8.0)));

        let err = RawGraphPayload::from_value(serde_json::json!({"nodes": "none"})).unwrap_err();
        assert!(matches!(err, LoadError::MalformedPayload(_)));
    }

    #[test]
    fn test_missing_labels_is_malformed() {
        let err = RawGraphPayload::from_json(r#"{"nodes": [{"id": 1, "properties": {}}], "relationships": []}"#)
            .unwrap_err();
        assert!(matches!(err, LoadError::MalformedPayload(_)));
    }

    #[test]
    fn test_nested_list_is_malformed() {
        let payload = RawGraphPayload::new()
            .with_node("a", ["X"], &[("grid", PropertyValue::from(vec![vec![1, 2]]))]);
        assert!(matches!(payload.check_property_shapes(), Err(LoadError::MalformedPayload(_))));
    }

    #[test]
    fn test_truncated_drops_dangling_relationships() {
        let payload = RawGraphPayload::new()
            .with_node("a", ["X"], &[])
            .with_node("b", ["X"], &[])
            .with_node("c", ["X"], &[])
            .with_relationship("r1", "R", "a", "b")
            .with_relationship("r2", "R", "b", "c");
        let cut = payload.truncated(2);
        assert_eq!(cut.nodes.len(), 2);
        assert_eq!(cut.relationships.len(), 1);
        assert_eq!(cut.relationships[0].id, EdgeId::new("r1"));
    }
}
