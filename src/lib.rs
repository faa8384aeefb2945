//! # neo4j-lens: in-memory Property Graph Explorer
//!
//! Loads a property graph snapshot (typically fetched from Neo4j) into
//! memory and answers exploration queries against it: structured filters,
//! typed pattern matches, free-text search, and styled projections for a
//! renderer.
//!
//! ## Design Principles
//!
//! 1. **Immutable snapshots**: a built `Graph` is never mutated; reloads
//!    build a new one and swap it in
//! 2. **Filters are values**: `FilterSpec` in, `MatchResult` out
//! 3. **Fetching is someone else's job**: `GraphSource` is the only I/O seam
//! 4. **Deterministic output**: every result set is ordered by id
//!
//! ## Quick Start
//!
//! ```rust
//! use neo4j_lens::{FilterSpec, GraphSession, RawGraphPayload, StyleRule};
//!
//! # fn example() -> neo4j_lens::Result<()> {
//! let payload = RawGraphPayload::from_json(r#"{
//!     "nodes": [
//!         {"id": 1, "labels": ["Person"], "properties": {"name": "Keanu"}},
//!         {"id": 2, "labels": ["Movie"], "properties": {"title": "The Matrix", "year": 1999}}
//!     ],
//!     "relationships": [
//!         {"id": 10, "type": "ACTED_IN", "properties": {}, "start_node": 1, "end_node": 2}
//!     ]
//! }"#)?;
//!
//! let session = GraphSession::new();
//! session.rebuild(payload)?;
//!
//! let matched = session.apply_all(&[FilterSpec::numeric_range("year", 1990.0, 1999.0)])?;
//! let view = session.project(&matched, &StyleRule::default());
//! assert_eq!(view.matched_nodes, 1);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `storage` | `Graph` store, raw payloads, `GraphSource` |
//! | `accessor` | Property coercion and equality |
//! | `filter` | `FilterSpec` evaluation and composition |
//! | `pattern` | `(A)-[REL]->(B)` triple matching |
//! | `projection` | Styled display records and statistics |
//! | `search` | Free-text and property-equality search |
//! | `facets` | Schema introspection for filter controls |

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod storage;
pub mod accessor;
pub mod filter;
pub mod pattern;
pub mod projection;
pub mod search;
pub mod facets;
pub mod config;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    Node, Edge, PropertyValue, PropertyMap,
    NodeId, EdgeId, Direction,
};

// ============================================================================
// Re-exports: Storage, queries, projection
// ============================================================================

pub use storage::{Graph, GraphSource, RawGraphPayload, StaticSource};
pub use filter::{FilterSpec, MatchResult, TextMode};
pub use pattern::Triple;
pub use projection::{GraphStatistics, NodeStyle, ProjectedView, StyleRule};
pub use config::LensConfig;

// ============================================================================
// GraphSession
// ============================================================================

/// Holder of the currently published graph.
///
/// Readers take a [`snapshot`](Self::snapshot) and keep using it for as
/// long as they like; a concurrent [`rebuild`](Self::rebuild) publishes a
/// new graph without disturbing them.
pub struct GraphSession {
    current: RwLock<Arc<Graph>>,
    config: LensConfig,
}

impl Default for GraphSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphSession {
    /// Session over an empty graph with default configuration.
    pub fn new() -> Self {
        Self::with_config(LensConfig::default())
    }

    pub fn with_config(config: LensConfig) -> Self {
        Self {
            current: RwLock::new(Arc::new(Graph::new())),
            config,
        }
    }

    pub fn config(&self) -> &LensConfig {
        &self.config
    }

    /// The graph published right now.
    pub fn snapshot(&self) -> Arc<Graph> {
        Arc::clone(&self.current.read())
    }

    /// Build a graph from `payload` and publish it.
    ///
    /// The build runs without holding the lock. On error nothing is
    /// published and the previous graph stays current.
    pub fn rebuild(&self, payload: RawGraphPayload) -> std::result::Result<Arc<Graph>, LoadError> {
        let graph = Arc::new(Graph::build(payload)?);
        *self.current.write() = Arc::clone(&graph);
        info!(nodes = graph.node_count(), edges = graph.edge_count(), "graph published");
        Ok(graph)
    }

    /// Fetch from `source` and rebuild.
    pub async fn refresh(&self, source: &dyn GraphSource) -> Result<Arc<Graph>> {
        let payload = source.fetch().await?;
        Ok(self.rebuild(payload)?)
    }

    // ========================================================================
    // Queries against the current snapshot
    // ========================================================================

    pub fn apply_all(&self, filters: &[FilterSpec]) -> std::result::Result<MatchResult, FilterError> {
        filter::apply_all(&self.snapshot(), filters)
    }

    pub fn match_pattern(&self, type_a: &str, rel_type: &str, type_b: &str) -> Vec<Triple> {
        pattern::match_pattern(&self.snapshot(), type_a, rel_type, type_b)
    }

    pub fn project(&self, matched: &MatchResult, rule: &StyleRule) -> ProjectedView {
        projection::project(&self.snapshot(), matched, rule, &self.config)
    }

    /// Free-text search with the configured case sensitivity.
    pub fn search(&self, term: &str) -> MatchResult {
        search::search_nodes(&self.snapshot(), term, self.config.case_sensitive_default)
    }

    /// Property-equality search capped at the configured limit.
    pub fn find_by_property(&self, key: &str, value: &PropertyValue, label: Option<&str>) -> Vec<NodeId> {
        search::find_by_property(&self.snapshot(), key, value, label, self.config.search_limit)
    }

    /// Text filter using the configured case sensitivity.
    pub fn text_filter(&self, property: &str, mode: TextMode, text: &str) -> FilterSpec {
        FilterSpec::text(property, mode, text, self.config.case_sensitive_default)
    }

    pub fn statistics(&self) -> GraphStatistics {
        projection::graph_statistics(&self.snapshot())
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Rejections raised while building a graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("Duplicate node id: {0}")]
    DuplicateNodeId(NodeId),

    #[error("Duplicate relationship id: {0}")]
    DuplicateEdgeId(EdgeId),

    #[error("Relationship {edge} references missing node {node}")]
    DanglingEdge { edge: EdgeId, node: NodeId },

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("Source error: {0}")]
    Source(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> RawGraphPayload {
        RawGraphPayload::new()
            .with_node("a", ["Person"], &[("name", "Ada".into())])
            .with_node("b", ["Movie"], &[("title", "Z".into())])
            .with_relationship("r", "ACTED_IN", "a", "b")
    }

    #[test]
    fn test_failed_rebuild_keeps_previous() {
        let session = GraphSession::new();
        session.rebuild(payload()).unwrap();
        let broken = payload().with_relationship("x", "R", "a", "ghost");
        assert!(session.rebuild(broken).is_err());
        assert_eq!(session.snapshot().node_count(), 2);
        assert_eq!(session.snapshot().edge_count(), 1);
    }

    #[test]
    fn test_snapshot_survives_swap() {
        let session = GraphSession::new();
        session.rebuild(payload()).unwrap();
        let old = session.snapshot();
        session.rebuild(RawGraphPayload::new()).unwrap();
        assert_eq!(old.node_count(), 2);
        assert!(session.snapshot().is_empty());
    }

    #[test]
    fn test_text_filter_uses_config() {
        let cfg = LensConfig { case_sensitive_default: true, ..LensConfig::default() };
        let session = GraphSession::with_config(cfg);
        session.rebuild(payload()).unwrap();
        let filter = session.text_filter("name", TextMode::Equals, "ada");
        assert!(session.apply_all(&[filter]).unwrap().is_empty());
    }

    #[test]
    fn test_error_messages() {
        let err: Error = LoadError::DanglingEdge { edge: "r".into(), node: "n".into() }.into();
        assert_eq!(err.to_string(), "Relationship r references missing node n");
    }
}
