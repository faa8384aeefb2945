//! In-memory graph store.
//!
//! The canonical node/edge collections plus adjacency, built once per
//! fetch cycle from a [`RawGraphPayload`].
//!
//! ## Invariants
//!
//! - Every edge endpoint references a node in the same graph.
//! - Node ids and edge ids are unique within their own id space.
//! - `outgoing`/`incoming` hold every edge exactly once per endpoint role,
//!   in payload order. A self-loop sits in both lists of its node.
//!
//! The structural data never changes after `build`; highlight colors and
//! other overlays live in `projection`, not here.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use smallvec::SmallVec;
use tracing::{debug, info};

use crate::model::*;
use crate::LoadError;
use super::payload::RawGraphPayload;

/// Candidate keys for a node's display name, probed in order.
pub const DEFAULT_DISPLAY_NAME_KEYS: &[&str] = &["name", "title", "Series_Title", "Name", "Title"];

type EdgeList = SmallVec<[EdgeId; 4]>;

// ============================================================================
// Graph
// ============================================================================

/// In-memory property graph.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: HashMap<NodeId, Node>,
    edges: HashMap<EdgeId, Edge>,
    /// node_id → relationships leaving it
    outgoing: HashMap<NodeId, EdgeList>,
    /// node_id → relationships arriving at it
    incoming: HashMap<NodeId, EdgeList>,
    /// primary type → node ids
    type_index: BTreeMap<String, BTreeSet<NodeId>>,
    /// relationship type → edge ids
    rel_type_index: BTreeMap<String, BTreeSet<EdgeId>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from one fetch result.
    ///
    /// Fails without producing a partial graph on duplicate ids, dangling
    /// edges, or property values outside the payload contract.
    pub fn build(payload: RawGraphPayload) -> Result<Self, LoadError> {
        payload.check_property_shapes()?;
        let RawGraphPayload { nodes, relationships } = payload;
        let graph = Self::from_parts(
            nodes.into_iter().map(Node::from),
            relationships.into_iter().map(Edge::from),
        )?;

        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "graph built"
        );
        for (node_type, ids) in &graph.type_index {
            debug!(node_type = %node_type, count = ids.len(), "node type");
        }
        for (rel_type, ids) in &graph.rel_type_index {
            debug!(rel_type = %rel_type, count = ids.len(), "relationship type");
        }

        Ok(graph)
    }

    /// Build from already-typed nodes and edges. All nodes are inserted
    /// before any edge, so edge order relative to nodes does not matter.
    pub fn from_parts(
        nodes: impl IntoIterator<Item = Node>,
        edges: impl IntoIterator<Item = Edge>,
    ) -> Result<Self, LoadError> {
        let mut graph = Self::new();
        for node in nodes {
            graph.insert_node(node)?;
        }
        for edge in edges {
            graph.insert_edge(edge)?;
        }
        Ok(graph)
    }

    fn insert_node(&mut self, node: Node) -> Result<(), LoadError> {
        if self.nodes.contains_key(&node.id) {
            return Err(LoadError::DuplicateNodeId(node.id));
        }
        self.index_node(node);
        Ok(())
    }

    fn index_node(&mut self, node: Node) {
        self.type_index
            .entry(node.primary_label().to_owned())
            .or_default()
            .insert(node.id.clone());
        self.outgoing.insert(node.id.clone(), EdgeList::new());
        self.incoming.insert(node.id.clone(), EdgeList::new());
        self.nodes.insert(node.id.clone(), node);
    }

    fn insert_edge(&mut self, edge: Edge) -> Result<(), LoadError> {
        if self.edges.contains_key(&edge.id) {
            return Err(LoadError::DuplicateEdgeId(edge.id));
        }
        for endpoint in [&edge.source, &edge.target] {
            if !self.nodes.contains_key(endpoint) {
                return Err(LoadError::DanglingEdge {
                    edge: edge.id.clone(),
                    node: endpoint.clone(),
                });
            }
        }
        self.index_edge(edge);
        Ok(())
    }

    fn index_edge(&mut self, edge: Edge) {
        self.outgoing.entry(edge.source.clone()).or_default().push(edge.id.clone());
        self.incoming.entry(edge.target.clone()).or_default().push(edge.id.clone());
        self.rel_type_index
            .entry(edge.rel_type.clone())
            .or_default()
            .insert(edge.id.clone());
        self.edges.insert(edge.id.clone(), edge);
    }

    /// Induced subgraph: exactly the listed nodes, and the listed edges whose
    /// endpoints are both listed. Unknown ids are skipped.
    pub fn subgraph(&self, node_ids: &BTreeSet<NodeId>, edge_ids: &BTreeSet<EdgeId>) -> Graph {
        let mut sub = Graph::new();
        for node in node_ids.iter().filter_map(|id| self.nodes.get(id)) {
            sub.index_node(node.clone());
        }
        for edge in edge_ids.iter().filter_map(|id| self.edges.get(id)) {
            if sub.contains_node(&edge.source) && sub.contains_node(&edge.target) {
                sub.index_edge(edge.clone());
            }
        }
        sub
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.edges.get(id)
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes, in no particular order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// All edges, in no particular order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn node_ids(&self) -> BTreeSet<NodeId> {
        self.nodes.keys().cloned().collect()
    }

    pub fn edge_ids(&self) -> BTreeSet<EdgeId> {
        self.edges.keys().cloned().collect()
    }

    // ========================================================================
    // Types
    // ========================================================================

    /// Canonical type of a node: its first label, or `"Unknown"`.
    ///
    /// Every component asks this method for a node's type. An id that is
    /// not in the graph also reports `"Unknown"`.
    pub fn node_type(&self, id: &NodeId) -> &str {
        self.nodes.get(id).map(Node::primary_label).unwrap_or(UNKNOWN_TYPE)
    }

    /// Node ids whose primary type is `node_type`, in id order.
    pub fn nodes_of_type(&self, node_type: &str) -> impl Iterator<Item = &NodeId> {
        self.type_index.get(node_type).into_iter().flatten()
    }

    /// Edge ids of the given relationship type, in id order.
    pub fn edges_of_type(&self, rel_type: &str) -> impl Iterator<Item = &EdgeId> {
        self.rel_type_index.get(rel_type).into_iter().flatten()
    }

    /// Distinct primary types, sorted.
    pub fn node_types(&self) -> impl Iterator<Item = &str> {
        self.type_index.keys().map(String::as_str)
    }

    /// Distinct relationship types, sorted.
    pub fn relationship_types(&self) -> impl Iterator<Item = &str> {
        self.rel_type_index.keys().map(String::as_str)
    }

    // ========================================================================
    // Traversal
    // ========================================================================

    /// Relationships touching `id` in the given direction, in payload order.
    ///
    /// With [`Direction::Both`] a self-loop is reported once.
    pub fn incident_edges(&self, id: &NodeId, dir: Direction) -> Vec<&Edge> {
        let out = self.outgoing.get(id).into_iter().flatten();
        let inc = self.incoming.get(id).into_iter().flatten();
        let ids: Vec<&EdgeId> = match dir {
            Direction::Outgoing => out.collect(),
            Direction::Incoming => inc.collect(),
            Direction::Both => out
                .chain(inc.filter(|eid| {
                    self.edges.get(*eid).is_some_and(|e| !e.is_self_loop())
                }))
                .collect(),
        };
        ids.into_iter().filter_map(|eid| self.edges.get(eid)).collect()
    }

    /// Adjacent node ids, first-seen order, without duplicates.
    ///
    /// Unknown ids and isolated nodes yield an empty list.
    pub fn neighbors(&self, id: &NodeId, dir: Direction) -> Vec<NodeId> {
        let mut seen = HashSet::new();
        self.incident_edges(id, dir)
            .into_iter()
            .filter_map(|e| e.other_node(id))
            .filter(|n| seen.insert(*n))
            .cloned()
            .collect()
    }

    /// Number of incident relationships (both directions), optionally only
    /// counting the listed relationship types.
    pub fn degree(&self, id: &NodeId, rel_types: Option<&BTreeSet<String>>) -> usize {
        self.incident_edges(id, Direction::Both)
            .into_iter()
            .filter(|e| rel_types.is_none_or(|types| types.contains(&e.rel_type)))
            .count()
    }

    // ========================================================================
    // Display
    // ========================================================================

    /// Human-facing name, probing [`DEFAULT_DISPLAY_NAME_KEYS`].
    pub fn primary_display_name(&self, id: &NodeId) -> String {
        self.display_name_with(id, DEFAULT_DISPLAY_NAME_KEYS)
    }

    /// Human-facing name: the first non-empty text value among `keys`,
    /// else `<type>_<short id>`.
    pub fn display_name_with<K: AsRef<str>>(&self, id: &NodeId, keys: &[K]) -> String {
        let found = self.nodes.get(id).and_then(|node| {
            keys.iter()
                .filter_map(|k| node.get(k.as_ref()))
                .find_map(|v| v.as_str().filter(|s| !s.is_empty()))
        });
        match found {
            Some(name) => name.to_owned(),
            None => format!("{}_{}", self.node_type(id), id.short()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
