//! # Filter Engine
//!
//! Evaluates [`FilterSpec`] predicates against a [`Graph`].
//!
//! ```text
//! FilterSpec ──apply──▶ MatchResult { nodes, edges }
//! [FilterSpec] ──apply_all──▶ ∩ nodes, edges recomputed from survivors
//! ```
//!
//! Filters are values. Applying one reads the graph and returns a fresh
//! `MatchResult`; nothing is stored on nodes or edges.

pub mod text;

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::accessor::{as_number, as_text};
use crate::model::*;
use crate::pattern;
use crate::storage::Graph;
use crate::FilterError;

pub use text::{TextMatcher, TextMode};

// ============================================================================
// FilterSpec
// ============================================================================

/// One structured filter predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterSpec {
    /// Primary type is one of `types`.
    NodeType { types: BTreeSet<String> },
    /// `property` coerces to a number within `min..=max`.
    NumericRange { property: String, min: f64, max: f64 },
    /// Coerced text of `property` satisfies `mode` against `text`.
    Text {
        property: String,
        mode: TextMode,
        text: String,
        /// Absent in JSON means case-insensitive.
        #[serde(default)]
        case_sensitive: bool,
    },
    /// Incident relationship count (both directions) within `min..=max`,
    /// counting only `rel_types` when given.
    Degree {
        min: usize,
        max: usize,
        rel_types: Option<BTreeSet<String>>,
    },
    /// Participates in a `type_a -[rel_type]-> type_b` triple.
    Pattern {
        type_a: String,
        rel_type: String,
        type_b: String,
    },
}

impl FilterSpec {
    pub fn node_types(types: impl IntoIterator<Item = impl Into<String>>) -> Self {
        FilterSpec::NodeType { types: types.into_iter().map(Into::into).collect() }
    }

    pub fn numeric_range(property: impl Into<String>, min: f64, max: f64) -> Self {
        FilterSpec::NumericRange { property: property.into(), min, max }
    }

    pub fn text(
        property: impl Into<String>,
        mode: TextMode,
        text: impl Into<String>,
        case_sensitive: bool,
    ) -> Self {
        FilterSpec::Text {
            property: property.into(),
            mode,
            text: text.into(),
            case_sensitive,
        }
    }

    pub fn degree(min: usize, max: usize) -> Self {
        FilterSpec::Degree { min, max, rel_types: None }
    }

    pub fn degree_of_types(
        min: usize,
        max: usize,
        rel_types: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        FilterSpec::Degree {
            min,
            max,
            rel_types: Some(rel_types.into_iter().map(Into::into).collect()),
        }
    }

    pub fn pattern(
        type_a: impl Into<String>,
        rel_type: impl Into<String>,
        type_b: impl Into<String>,
    ) -> Self {
        FilterSpec::Pattern {
            type_a: type_a.into(),
            rel_type: rel_type.into(),
            type_b: type_b.into(),
        }
    }
}

/// One-line description, used for active-filter summaries and logs.
impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterSpec::NodeType { types } => {
                let list: Vec<&str> = types.iter().map(String::as_str).collect();
                write!(f, "type in [{}]", list.join(", "))
            }
            FilterSpec::NumericRange { property, min, max } => {
                write!(f, "{min} <= {property} <= {max}")
            }
            FilterSpec::Text { property, mode, text, case_sensitive } => {
                write!(f, "{property} {mode} '{text}'")?;
                if *case_sensitive { write!(f, " (case sensitive)")?; }
                Ok(())
            }
            FilterSpec::Degree { min, max, rel_types } => {
                write!(f, "{min} <= degree <= {max}")?;
                if let Some(types) = rel_types {
                    let list: Vec<&str> = types.iter().map(String::as_str).collect();
                    write!(f, " over [{}]", list.join(", "))?;
                }
                Ok(())
            }
            FilterSpec::Pattern { type_a, rel_type, type_b } => {
                write!(f, "({type_a})-[{rel_type}]->({type_b})")
            }
        }
    }
}

// ============================================================================
// MatchResult
// ============================================================================

/// Ids that satisfied a filter or pattern, ordered by id.
///
/// `nodes` holds the matched node ids and `edges` the matched edge ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub nodes: BTreeSet<NodeId>,
    pub edges: BTreeSet<EdgeId>,
}

impl MatchResult {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every node and edge of `graph`.
    pub fn everything(graph: &Graph) -> Self {
        Self { nodes: graph.node_ids(), edges: graph.edge_ids() }
    }

    pub fn from_nodes(nodes: impl IntoIterator<Item = NodeId>) -> Self {
        Self { nodes: nodes.into_iter().collect(), edges: BTreeSet::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes.contains(id)
    }

    pub fn contains_edge(&self, id: &EdgeId) -> bool {
        self.edges.contains(id)
    }
}

// ============================================================================
// apply
// ============================================================================

/// Evaluate one filter.
///
/// Missing or non-coercible properties are non-matches. The only error is a
/// regex that does not compile.
pub fn apply(graph: &Graph, filter: &FilterSpec) -> Result<MatchResult, FilterError> {
    let result = match filter {
        FilterSpec::NodeType { types } => MatchResult::from_nodes(
            types.iter().flat_map(|t| graph.nodes_of_type(t)).cloned(),
        ),

        FilterSpec::NumericRange { property, min, max } => matching_nodes(graph, |node| {
            node.get(property)
                .and_then(as_number)
                .is_some_and(|v| *min <= v && v <= *max)
        }),

        FilterSpec::Text { property, mode, text, case_sensitive } => {
            let matcher = TextMatcher::compile(*mode, text, *case_sensitive)?;
            matching_nodes(graph, |node| {
                node.get(property).is_some_and(|v| matcher.is_match(&as_text(v)))
            })
        }

        FilterSpec::Degree { min, max, rel_types } => matching_nodes(graph, |node| {
            let degree = graph.degree(&node.id, rel_types.as_ref());
            *min <= degree && degree <= *max
        }),

        FilterSpec::Pattern { type_a, rel_type, type_b } => {
            pattern::triples_to_match(&pattern::match_pattern(graph, type_a, rel_type, type_b))
        }
    };

    debug!(
        filter = %filter,
        nodes = result.nodes.len(),
        edges = result.edges.len(),
        "filter applied"
    );
    Ok(result)
}

fn matching_nodes(graph: &Graph, predicate: impl Fn(&Node) -> bool) -> MatchResult {
    MatchResult::from_nodes(graph.nodes().filter(|n| predicate(n)).map(|n| n.id.clone()))
}

// ============================================================================
// apply_all
// ============================================================================

/// Evaluate filters with AND semantics.
///
/// Node sets are intersected. Edges are then recomputed: an edge survives
/// when both endpoints survive, its type is allowed by every degree filter
/// that names relationship types and by every pattern filter, and it is one
/// of the matched edges of every pattern filter. The order of `filters`
/// does not change the result. An empty list matches the whole graph.
pub fn apply_all(graph: &Graph, filters: &[FilterSpec]) -> Result<MatchResult, FilterError> {
    let mut nodes = graph.node_ids();
    let mut allowed_types: Vec<BTreeSet<String>> = Vec::new();
    let mut pattern_edges: Option<BTreeSet<EdgeId>> = None;

    for filter in filters {
        let matched = apply(graph, filter)?;
        nodes.retain(|id| matched.nodes.contains(id));

        match filter {
            FilterSpec::Degree { rel_types: Some(types), .. } => {
                allowed_types.push(types.clone());
            }
            FilterSpec::Pattern { rel_type, .. } => {
                allowed_types.push(BTreeSet::from([rel_type.clone()]));
                pattern_edges = Some(match pattern_edges {
                    None => matched.edges,
                    Some(prev) => prev.intersection(&matched.edges).cloned().collect(),
                });
            }
            _ => {}
        }
    }

    let edges = graph.edges()
        .filter(|e| nodes.contains(&e.source) && nodes.contains(&e.target))
        .filter(|e| allowed_types.iter().all(|types| types.contains(&e.rel_type)))
        .filter(|e| pattern_edges.as_ref().is_none_or(|p| p.contains(&e.id)))
        .map(|e| e.id.clone())
        .collect();

    let result = MatchResult { nodes, edges };
    debug!(
        filters = filters.len(),
        nodes = result.nodes.len(),
        edges = result.edges.len(),
        "filters composed"
    );
    Ok(result)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::RawGraphPayload;
    use pretty_assertions::assert_eq;

    fn ids(list: &[&str]) -> BTreeSet<NodeId> {
        list.iter().map(|s| NodeId::from(*s)).collect()
    }

    fn graph() -> Graph {
        let payload = RawGraphPayload::new()
            .with_node("A", ["Movie"], &[("year", 1994.into()), ("genre", "Drama".into())])
            .with_node("B", ["Movie"], &[("year", 2005.into()), ("genre", "Action".into())])
            .with_node("C", ["Movie"], &[("year", "n/a".into()), ("genre", PropertyValue::Null)])
            .with_node("D", ["Movie"], &[("year", " 1999 ".into())])
            .with_node("p1", ["Person"], &[("name", "Keanu".into())])
            .with_node("p2", ["Person"], &[("name", "Lana".into())])
            .with_relationship("r1", "ACTED_IN", "p1", "A")
            .with_relationship("r2", "DIRECTED", "p2", "A")
            .with_relationship("r3", "ACTED_IN", "p1", "B");
        Graph::build(payload).unwrap()
    }

    #[test]
    fn test_node_type_filter() {
        let g = graph();
        let r = apply(&g, &FilterSpec::node_types(["Person"])).unwrap();
        assert_eq!(r.nodes, ids(&["p1", "p2"]));
        assert!(r.edges.is_empty());

        let both = apply_all(&g, &[FilterSpec::node_types(["Movie"]), FilterSpec::node_types(["Person"])]).unwrap();
        assert!(both.nodes.is_empty());
    }

    #[test]
    fn test_numeric_range_inclusive() {
        let g = graph();
        let r = apply(&g, &FilterSpec::numeric_range("year", 1990.0, 1999.0)).unwrap();
        assert_eq!(r.nodes, ids(&["A", "D"]));

        let edge = apply(&g, &FilterSpec::numeric_range("year", 2005.0, 2005.0)).unwrap();
        assert_eq!(edge.nodes, ids(&["B"]));

        let inverted = apply(&g, &FilterSpec::numeric_range("year", 2000.0, 1990.0)).unwrap();
        assert!(inverted.nodes.is_empty());
    }

    #[test]
    fn test_text_filter_modes() {
        let g = graph();
        let contains = apply(&g, &FilterSpec::text("genre", TextMode::Contains, "dra", false)).unwrap();
        assert_eq!(contains.nodes, ids(&["A"]));

        let sensitive = apply(&g, &FilterSpec::text("genre", TextMode::Contains, "dra", true)).unwrap();
        assert!(sensitive.nodes.is_empty());

        let equals = apply(&g, &FilterSpec::text("genre", TextMode::Equals, "action", false)).unwrap();
        assert_eq!(equals.nodes, ids(&["B"]));

        let prefix = apply(&g, &FilterSpec::text("name", TextMode::StartsWith, "la", false)).unwrap();
        assert_eq!(prefix.nodes, ids(&["p2"]));
    }

    #[test]
    fn test_null_reads_as_empty_text() {
        let g = graph();
        // C has genre = null; D has no genre at all.
        let empty = apply(&g, &FilterSpec::text("genre", TextMode::Regex, "^$", true)).unwrap();
        assert_eq!(empty.nodes, ids(&["C"]));

        let contains = apply(&g, &FilterSpec::text("genre", TextMode::Contains, "a", false)).unwrap();
        assert!(!contains.nodes.contains(&NodeId::from("C")));
    }

    #[test]
    fn test_invalid_regex_fails_the_call() {
        let g = graph();
        let err = apply(&g, &FilterSpec::text("genre", TextMode::Regex, "(", false)).unwrap_err();
        assert!(matches!(err, FilterError::InvalidPattern { .. }));
        assert!(apply_all(&g, &[FilterSpec::node_types(["Movie"]), FilterSpec::text("genre", TextMode::Regex, "[", false)]).is_err());
    }

    #[test]
    fn test_degree_filter() {
        let g = graph();
        let two = apply(&g, &FilterSpec::degree(2, 2)).unwrap();
        assert_eq!(two.nodes, ids(&["A", "p1"]));

        let acted = apply(&g, &FilterSpec::degree_of_types(1, 1, ["ACTED_IN"])).unwrap();
        assert_eq!(acted.nodes, ids(&["A", "B"]));

        let isolated = apply(&g, &FilterSpec::degree(0, 0)).unwrap();
        assert_eq!(isolated.nodes, ids(&["C", "D"]));
    }

    #[test]
    fn test_pattern_filter() {
        let g = graph();
        let r = apply(&g, &FilterSpec::pattern("Person", "ACTED_IN", "Movie")).unwrap();
        assert_eq!(r.nodes, ids(&["A", "B", "p1"]));
        assert_eq!(r.edges, BTreeSet::from([EdgeId::from("r1"), EdgeId::from("r3")]));
    }

    #[test]
    fn test_apply_all_recomputes_edges() {
        let g = graph();
        let r = apply_all(&g, &[
            FilterSpec::numeric_range("year", 1990.0, 1999.0),
        ]).unwrap();
        assert!(r.edges.is_empty());

        let r = apply_all(&g, &[FilterSpec::degree(1, 10)]).unwrap();
        assert_eq!(r.nodes, ids(&["A", "B", "p1", "p2"]));
        assert_eq!(r.edges.len(), 3);

        let r = apply_all(&g, &[FilterSpec::degree_of_types(1, 10, ["ACTED_IN"])]).unwrap();
        assert_eq!(r.nodes, ids(&["A", "B", "p1"]));
        assert_eq!(r.edges, BTreeSet::from([EdgeId::from("r1"), EdgeId::from("r3")]));
    }

    #[test]
    fn test_apply_all_with_pattern_and_range() {
        let g = graph();
        let filters = [
            FilterSpec::pattern("Person", "ACTED_IN", "Movie"),
            FilterSpec::node_types(["Person", "Movie"]),
            FilterSpec::degree(2, 2),
        ];
        let r = apply_all(&g, &filters).unwrap();
        assert_eq!(r.nodes, ids(&["A", "p1"]));
        assert_eq!(r.edges, BTreeSet::from([EdgeId::from("r1")]));
    }

    #[test]
    fn test_apply_all_empty_is_everything() {
        let g = graph();
        assert_eq!(apply_all(&g, &[]).unwrap(), MatchResult::everything(&g));
    }

    #[test]
    fn test_apply_all_order_independent() {
        let g = graph();
        let f1 = FilterSpec::text("genre", TextMode::Contains, "a", false);
        let f2 = FilterSpec::degree_of_types(0, 1, ["ACTED_IN"]);
        assert_eq!(
            apply_all(&g, &[f1.clone(), f2.clone()]).unwrap(),
            apply_all(&g, &[f2, f1]).unwrap()
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(FilterSpec::numeric_range("year", 1990.0, 1999.0).to_string(), "1990 <= year <= 1999");
        assert_eq!(FilterSpec::pattern("Person", "ACTED_IN", "Movie").to_string(), "(Person)-[ACTED_IN]->(Movie)");
        assert_eq!(
            FilterSpec::text("genre", TextMode::Contains, "dra", true).to_string(),
            "genre contains 'dra' (case sensitive)"
        );
    }

    #[test]
    fn test_spec_serde_tagged() {
        let spec: FilterSpec = serde_json::from_str(
            r#"{"kind": "text", "property": "genre", "mode": "starts_with", "text": "Dr", "case_sensitive": false}"#,
        ).unwrap();
        assert_eq!(spec, FilterSpec::text("genre", TextMode::StartsWith, "Dr", false));
    }

    #[test]
    fn test_text_spec_defaults_to_case_insensitive() {
        let spec: FilterSpec = serde_json::from_str(
            r#"{"kind": "text", "property": "genre", "mode": "equals", "text": "drama"}"#,
        ).unwrap();
        assert_eq!(spec, FilterSpec::text("genre", TextMode::Equals, "drama", false));
        assert_eq!(apply(&graph(), &spec).unwrap().nodes, ids(&["A"]));
    }

    #[test]
    fn test_text_filter_on_whole_float() {
        let payload = RawGraphPayload::new()
            .with_node("m", ["Movie"], &[("rating", 8.0.into())])
            .with_node("n", ["Movie"], &[("rating", 8.into())]);
        let g = Graph::build(payload).unwrap();
        let dotted = apply(&g, &FilterSpec::text("rating", TextMode::Equals, "8.0", false)).unwrap();
        assert_eq!(dotted.nodes, ids(&["m"]));
        let bare = apply(&g, &FilterSpec::text("rating", TextMode::Equals, "8", false)).unwrap();
        assert_eq!(bare.nodes, ids(&["n"]));
    }
}
