//! Free-text and property-equality search.

use tracing::debug;

use crate::accessor::{as_text, fold_case, values_equal};
use crate::filter::MatchResult;
use crate::model::*;
use crate::storage::Graph;

/// Nodes whose primary type or any scalar property contains `term`.
///
/// A blank term matches nothing. Lists are not searched.
pub fn search_nodes(graph: &Graph, term: &str, case_sensitive: bool) -> MatchResult {
    let term = term.trim();
    if term.is_empty() {
        return MatchResult::empty();
    }
    let needle = fold_case(term, case_sensitive);
    let hit = |text: &str| fold_case(text, case_sensitive).contains(&*needle);

    let result = MatchResult::from_nodes(
        graph.nodes()
            .filter(|node| {
                hit(graph.node_type(&node.id))
                    || node.properties.values()
                        .filter(|v| v.is_scalar() && !v.is_null())
                        .any(|v| hit(&*as_text(v)))
            })
            .map(|node| node.id.clone()),
    );
    debug!(term, nodes = result.nodes.len(), "search");
    result
}

/// Nodes where `key` equals `value`, optionally only those carrying `label`.
///
/// Comparison ignores case. At most `limit` ids, in id order.
pub fn find_by_property(
    graph: &Graph,
    key: &str,
    value: &PropertyValue,
    label: Option<&str>,
    limit: usize,
) -> Vec<NodeId> {
    let mut hits: Vec<NodeId> = graph.nodes()
        .filter(|node| label.is_none_or(|l| node.has_label(l)))
        .filter(|node| node.get(key).is_some_and(|v| values_equal(v, value, false)))
        .map(|node| node.id.clone())
        .collect();
    hits.sort();
    hits.truncate(limit);
    hits
}

/// Interpret trimmed user input as an integer, a float, or text.
pub fn parse_probe(text: &str) -> PropertyValue {
    let trimmed = text.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return PropertyValue::Int(i);
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        return PropertyValue::Float(f);
    }
    PropertyValue::Text(trimmed.to_owned())
}
