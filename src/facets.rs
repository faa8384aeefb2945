//! Schema introspection for populating filter controls.

use std::collections::{BTreeMap, BTreeSet};

use crate::accessor::as_number;
use crate::storage::Graph;

/// Sorted distinct primary types.
pub fn node_types(graph: &Graph) -> Vec<String> {
    graph.node_types().map(str::to_owned).collect()
}

/// Sorted distinct relationship types.
pub fn relationship_types(graph: &Graph) -> Vec<String> {
    graph.relationship_types().map(str::to_owned).collect()
}

/// `(min, max)` of every property key with at least one numeric-coercible
/// node value.
pub fn numeric_properties(graph: &Graph) -> BTreeMap<String, (f64, f64)> {
    let mut ranges: BTreeMap<String, (f64, f64)> = BTreeMap::new();
    for node in graph.nodes() {
        for (key, value) in &node.properties {
            let Some(x) = as_number(value) else { continue };
            ranges.entry(key.clone())
                .and_modify(|(lo, hi)| {
                    *lo = lo.min(x);
                    *hi = hi.max(x);
                })
                .or_insert((x, x));
        }
    }
    ranges
}

/// Keys holding at least one text value.
pub fn text_properties(graph: &Graph) -> BTreeSet<String> {
    graph.nodes()
        .flat_map(|n| n.properties.iter())
        .filter(|(_, v)| v.is_text())
        .map(|(k, _)| k.clone())
        .collect()
}

pub fn max_degree(graph: &Graph) -> usize {
    graph.nodes()
        .map(|n| graph.degree(&n.id, None))
        .max()
        .unwrap_or(0)
}

/// Property keys observed on nodes of each primary type.
pub fn properties_by_type(graph: &Graph) -> BTreeMap<String, BTreeSet<String>> {
    let mut out: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for node in graph.nodes() {
        out.entry(graph.node_type(&node.id).to_owned())
            .or_default()
            .extend(node.properties.keys().cloned());
    }
    out
}

/// Types whose lowercase name contains any of `needles`.
pub fn types_containing<S: AsRef<str>>(graph: &Graph, needles: &[S]) -> BTreeSet<String> {
    let needles: Vec<String> = needles.iter().map(|n| n.as_ref().to_lowercase()).collect();
    graph.node_types()
        .filter(|t| {
            let lower = t.to_lowercase();
            needles.iter().any(|n| lower.contains(n.as_str()))
        })
        .map(str::to_owned)
        .collect()
}
