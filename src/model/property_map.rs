//! PropertyMap: the key-value store on nodes and relationships.

use std::collections::BTreeMap;
use super::PropertyValue;

/// A map of property names to values.
///
/// Ordered by key so summaries and scans are deterministic.
pub type PropertyMap = BTreeMap<String, PropertyValue>;
