//! # Result Projector
//!
//! Turns a graph plus a [`MatchResult`] into display records for the
//! rendering side. Projection is a pure function: the graph is not
//! touched, and every call returns a fresh view keyed by id.
//!
//! ```text
//! (Graph, MatchResult, StyleRule, LensConfig) ──project──▶ ProjectedView
//! ```

use std::collections::{BTreeMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::config::LensConfig;
use crate::filter::MatchResult;
use crate::model::*;
use crate::storage::Graph;

pub const HIGHLIGHT_COLOR: &str = "#FFD700";
pub const DIMMED_COLOR: &str = "#CCCCCC";

// ============================================================================
// Styling
// ============================================================================

/// Fill color and radius of a node glyph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStyle {
    pub color: String,
    pub size: u32,
}

impl NodeStyle {
    pub fn new(color: impl Into<String>, size: u32) -> Self {
        Self { color: color.into(), size }
    }
}

/// Which primary types a style entry applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeSelector {
    Exact(String),
    Prefix(String),
}

impl TypeSelector {
    fn selects(&self, node_type: &str) -> bool {
        match self {
            TypeSelector::Exact(t) => node_type == t,
            TypeSelector::Prefix(p) => node_type.starts_with(p.as_str()),
        }
    }
}

/// Styling as a function of (primary type, match membership).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleRule {
    /// First selector that accepts the type wins.
    pub by_type: Vec<(TypeSelector, NodeStyle)>,
    pub fallback: NodeStyle,
    /// Color of matched nodes; `None` keeps the type color.
    pub matched_color: Option<String>,
    /// Color of unmatched nodes; `None` keeps the type color.
    pub unmatched_color: Option<String>,
}

impl Default for StyleRule {
    /// Movie-graph palette with gold highlights.
    fn default() -> Self {
        Self {
            by_type: vec![
                (TypeSelector::Exact("Movie".into()), NodeStyle::new("#3182bd", 10)),
                (TypeSelector::Exact("Person".into()), NodeStyle::new("#31a354", 8)),
                (TypeSelector::Prefix("Actor".into()), NodeStyle::new("#31a354", 8)),
                (TypeSelector::Exact("Director".into()), NodeStyle::new("#e6550d", 12)),
                (TypeSelector::Exact("Genre".into()), NodeStyle::new("#e6550d", 6)),
            ],
            fallback: NodeStyle::new("#756bb1", 5),
            matched_color: Some(HIGHLIGHT_COLOR.into()),
            unmatched_color: None,
        }
    }
}

impl StyleRule {
    /// Pattern view: `type_a` gold, `type_b` coral, anything else grey.
    pub fn for_pattern(type_a: &str, type_b: &str) -> Self {
        Self {
            by_type: vec![
                (TypeSelector::Exact(type_a.into()), NodeStyle::new(HIGHLIGHT_COLOR, 15)),
                (TypeSelector::Exact(type_b.into()), NodeStyle::new("#FF6B6B", 15)),
            ],
            fallback: NodeStyle::new(DIMMED_COLOR, 10),
            matched_color: None,
            unmatched_color: None,
        }
    }

    pub fn with_matched_color(mut self, color: impl Into<String>) -> Self {
        self.matched_color = Some(color.into());
        self
    }

    /// Grey out everything outside the match.
    pub fn dim_unmatched(mut self) -> Self {
        self.unmatched_color = Some(DIMMED_COLOR.into());
        self
    }

    pub fn style_for(&self, node_type: &str, matched: bool) -> NodeStyle {
        let base = self.by_type.iter()
            .find(|(selector, _)| selector.selects(node_type))
            .map(|(_, style)| style)
            .unwrap_or(&self.fallback);
        let overlay = if matched { &self.matched_color } else { &self.unmatched_color };
        NodeStyle {
            color: overlay.clone().unwrap_or_else(|| base.color.clone()),
            size: base.size,
        }
    }
}

// ============================================================================
// ProjectedView
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeView {
    pub node_type: String,
    pub label: String,
    pub color: String,
    pub size: u32,
    pub matched: bool,
    pub property_summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeView {
    pub rel_type: String,
    pub source: NodeId,
    pub target: NodeId,
    /// Listed in the match, or both endpoints matched.
    pub matched: bool,
}

/// Everything the renderer needs, keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectedView {
    pub nodes: BTreeMap<NodeId, NodeView>,
    pub edges: BTreeMap<EdgeId, EdgeView>,
    pub total_nodes: usize,
    pub total_edges: usize,
    pub type_histogram: BTreeMap<String, usize>,
    pub relationship_histogram: BTreeMap<String, usize>,
    pub matched_nodes: usize,
    pub matched_edges: usize,
}

/// Project every node and edge of `graph`, styled by `rule` and membership
/// in `matched`.
pub fn project(
    graph: &Graph,
    matched: &MatchResult,
    rule: &StyleRule,
    config: &LensConfig,
) -> ProjectedView {
    let mut view = ProjectedView {
        total_nodes: graph.node_count(),
        total_edges: graph.edge_count(),
        ..Default::default()
    };

    for node in graph.nodes() {
        let node_type = graph.node_type(&node.id);
        let is_match = matched.contains_node(&node.id);
        let style = rule.style_for(node_type, is_match);
        *view.type_histogram.entry(node_type.to_owned()).or_insert(0) += 1;
        view.matched_nodes += usize::from(is_match);
        view.nodes.insert(node.id.clone(), NodeView {
            node_type: node_type.to_owned(),
            label: graph.display_name_with(&node.id, &config.display_name_keys),
            color: style.color,
            size: style.size,
            matched: is_match,
            property_summary: property_summary(node, config),
        });
    }

    for edge in graph.edges() {
        let is_match = matched.contains_edge(&edge.id)
            || (matched.contains_node(&edge.source) && matched.contains_node(&edge.target));
        *view.relationship_histogram.entry(edge.rel_type.clone()).or_insert(0) += 1;
        view.matched_edges += usize::from(is_match);
        view.edges.insert(edge.id.clone(), EdgeView {
            rel_type: edge.rel_type.clone(),
            source: edge.source.clone(),
            target: edge.target.clone(),
            matched: is_match,
        });
    }

    view
}

/// `key: value; key: value ... (+N more)` over the properties that are not
/// already shown as the display name. Keys starting with `_` are internal.
pub fn property_summary(node: &Node, config: &LensConfig) -> String {
    let shown: Vec<(&String, &PropertyValue)> = node.properties.iter()
        .filter(|(k, _)| !k.starts_with('_'))
        .filter(|(k, _)| !config.display_name_keys.iter().any(|name| name == *k))
        .collect();

    if shown.is_empty() {
        return "No additional properties".to_owned();
    }

    let parts: Vec<String> = shown.iter()
        .take(config.summary_max_properties)
        .map(|(k, v)| format!("{k}: {}", truncate_value(v, config.summary_truncate_len)))
        .collect();

    let mut summary = parts.join("; ");
    if shown.len() > config.summary_max_properties {
        summary.push_str(&format!(" ... (+{} more)", shown.len() - config.summary_max_properties));
    }
    summary
}

fn truncate_value(value: &PropertyValue, max_chars: usize) -> String {
    match value {
        PropertyValue::Text(s) if s.chars().count() > max_chars => {
            let cut: String = s.chars().take(max_chars).collect();
            format!("{cut}...")
        }
        other => other.to_string(),
    }
}

// ============================================================================
// Graph statistics
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphStatistics {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub node_types: BTreeMap<String, usize>,
    pub edge_types: BTreeMap<String, usize>,
    /// Directed density `E / (N (N - 1))`; 0 below two nodes.
    pub density: f64,
    /// Weakly connected. An empty graph is not connected.
    pub is_connected: bool,
}

pub fn graph_statistics(graph: &Graph) -> GraphStatistics {
    let n = graph.node_count();
    let e = graph.edge_count();

    let node_types = graph.node_types()
        .map(|t| (t.to_owned(), graph.nodes_of_type(t).count()))
        .collect();
    let edge_types = graph.relationship_types()
        .map(|t| (t.to_owned(), graph.edges_of_type(t).count()))
        .collect();

    let density = if n < 2 { 0.0 } else { e as f64 / (n as f64 * (n as f64 - 1.0)) };

    GraphStatistics {
        total_nodes: n,
        total_edges: e,
        node_types,
        edge_types,
        density,
        is_connected: weakly_connected(graph),
    }
}

fn weakly_connected(graph: &Graph) -> bool {
    let Some(start) = graph.nodes().next() else {
        return false;
    };
    let mut seen: HashSet<NodeId> = HashSet::from([start.id.clone()]);
    let mut queue = VecDeque::from([start.id.clone()]);
    while let Some(id) = queue.pop_front() {
        for next in graph.neighbors(&id, Direction::Both) {
            if seen.insert(next.clone()) {
                queue.push_back(next);
            }
        }
    }
    seen.len() == graph.node_count()
}

// ============================================================================
// Tests
// ============================================================================
