//! # Pattern Matcher
//!
//! Finds `(a:TypeA)-[r:REL]->(b:TypeB)` triples by primary type.
//!
//! Direction is fixed: the relationship must leave a `type_a` node and
//! arrive at a `type_b` node. When `type_a == type_b` a node can play
//! either role. Absent types or relationship names are not errors; they
//! just produce no triples.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::filter::MatchResult;
use crate::model::*;
use crate::storage::Graph;

/// One matched `(source)-[edge]->(target)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Triple {
    pub source: NodeId,
    pub edge: EdgeId,
    pub target: NodeId,
}

/// All triples for the pattern, ordered by edge id.
pub fn match_pattern(graph: &Graph, type_a: &str, rel_type: &str, type_b: &str) -> Vec<Triple> {
    let sources: HashSet<&NodeId> = graph.nodes_of_type(type_a).collect();
    let targets: HashSet<&NodeId> = graph.nodes_of_type(type_b).collect();

    let triples: Vec<Triple> = graph.edges_of_type(rel_type)
        .filter_map(|id| graph.edge(id))
        .filter(|e| sources.contains(&e.source) && targets.contains(&e.target))
        .map(|e| Triple {
            source: e.source.clone(),
            edge: e.id.clone(),
            target: e.target.clone(),
        })
        .collect();

    debug!(
        type_a,
        rel_type,
        type_b,
        triples = triples.len(),
        "pattern matched"
    );
    triples
}

/// Participating nodes (both roles) and the matched edges.
pub fn triples_to_match(triples: &[Triple]) -> MatchResult {
    let mut result = MatchResult::empty();
    for t in triples {
        result.nodes.insert(t.source.clone());
        result.nodes.insert(t.target.clone());
        result.edges.insert(t.edge.clone());
    }
    result
}

/// The subgraph holding exactly the matched nodes and edges.
///
/// Other relationships between matched nodes are left out.
pub fn induced_subgraph(graph: &Graph, matched: &MatchResult) -> Graph {
    graph.subgraph(&matched.nodes, &matched.edges)
}

/// Counts shown next to a pattern view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternSummary {
    /// Distinct nodes per primary type among the participants.
    pub nodes_by_type: BTreeMap<String, usize>,
    pub relationships: usize,
    pub total_nodes: usize,
}

pub fn summarize(graph: &Graph, triples: &[Triple]) -> PatternSummary {
    let matched = triples_to_match(triples);
    let mut nodes_by_type = BTreeMap::new();
    for id in &matched.nodes {
        *nodes_by_type.entry(graph.node_type(id).to_owned()).or_insert(0) += 1;
    }
    PatternSummary {
        nodes_by_type,
        relationships: matched.edges.len(),
        total_nodes: matched.nodes.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::RawGraphPayload;
    use pretty_assertions::assert_eq;

    fn graph() -> Graph {
        let payload = RawGraphPayload::new()
            .with_node("p1", ["Person"], &[])
            .with_node("p2", ["Person"], &[])
            .with_node("m1", ["Movie"], &[])
            .with_node("m2", ["Movie"], &[])
            .with_relationship("r1", "ACTED_IN", "p1", "m1")
            .with_relationship("r2", "DIRECTED", "p2", "m1")
            .with_relationship("r3", "KNOWS", "p1", "p2")
            .with_relationship("r4", "SEQUEL_OF", "m2", "m1");
        Graph::build(payload).unwrap()
    }

    #[test]
    fn test_single_triple() {
        let g = graph();
        let triples = match_pattern(&g, "Person", "ACTED_IN", "Movie");
        assert_eq!(triples, vec![Triple { source: "p1".into(), edge: "r1".into(), target: "m1".into() }]);
    }

    #[test]
    fn test_no_reverse_matching() {
        let g = graph();
        assert!(match_pattern(&g, "Movie", "ACTED_IN", "Person").is_empty());
    }

    #[test]
    fn test_same_type_on_both_ends() {
        let g = graph();
        let knows = match_pattern(&g, "Person", "KNOWS", "Person");
        assert_eq!(knows.len(), 1);
        let sequels = match_pattern(&g, "Movie", "SEQUEL_OF", "Movie");
        assert_eq!(sequels[0].source, NodeId::from("m2"));
    }

    #[test]
    fn test_absent_names_are_empty() {
        let g = graph();
        assert!(match_pattern(&g, "Alien", "ACTED_IN", "Movie").is_empty());
        assert!(match_pattern(&g, "Person", "PRODUCED", "Movie").is_empty());
    }

    #[test]
    fn test_induced_subgraph_has_no_extra_edges() {
        let g = graph();
        // p1 and p2 both act in the pattern below; KNOWS must stay out.
        let payload_extra = RawGraphPayload::new()
            .with_node("p1", ["Person"], &[])
            .with_node("p2", ["Person"], &[])
            .with_node("m1", ["Movie"], &[])
            .with_relationship("a1", "ACTED_IN", "p1", "m1")
            .with_relationship("a2", "ACTED_IN", "p2", "m1")
            .with_relationship("k", "KNOWS", "p1", "p2");
        let g2 = Graph::build(payload_extra).unwrap();
        let matched = triples_to_match(&match_pattern(&g2, "Person", "ACTED_IN", "Movie"));
        let sub = induced_subgraph(&g2, &matched);
        assert_eq!(sub.node_count(), 3);
        assert_eq!(sub.edge_count(), 2);
        assert!(sub.edge(&"k".into()).is_none());

        let single = induced_subgraph(&g, &triples_to_match(&match_pattern(&g, "Person", "ACTED_IN", "Movie")));
        assert_eq!(single.node_ids().len(), 2);
        assert!(!single.contains_node(&"p2".into()));
    }

    #[test]
    fn test_summary() {
        let g = graph();
        let triples = match_pattern(&g, "Person", "ACTED_IN", "Movie");
        let summary = summarize(&g, &triples);
        assert_eq!(summary.total_nodes, 2);
        assert_eq!(summary.relationships, 1);
        assert_eq!(summary.nodes_by_type.get("Person"), Some(&1));
        assert_eq!(summary.nodes_by_type.get("Movie"), Some(&1));
    }
}
