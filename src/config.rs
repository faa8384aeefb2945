//! Explicit configuration values.
//!
//! Nothing in the crate reads globals or the environment; callers pass a
//! `LensConfig` (or the pieces of it) to the operations that need it.

use serde::{Deserialize, Serialize};

use crate::storage::DEFAULT_DISPLAY_NAME_KEYS;
use crate::{Error, Result};

/// Regex dialect used by text filters: the `regex` crate syntax
/// (RE2-like: no backreferences, no lookaround), searched unanchored.
pub const REGEX_FLAVOR: &str = "rust-regex (RE2 syntax, unanchored search)";

/// Tunables recognized by the filter engine, search and projector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LensConfig {
    /// Characters of a text value kept in a property summary.
    pub summary_truncate_len: usize,
    /// Properties listed in a summary before the `(+N more)` suffix.
    pub summary_max_properties: usize,
    /// Case sensitivity for `GraphSession::text_filter` and
    /// `GraphSession::search`.
    pub case_sensitive_default: bool,
    /// Maximum hits returned by property-equality search.
    pub search_limit: usize,
    /// Ordered candidate keys for a node's display name.
    pub display_name_keys: Vec<String>,
}

impl Default for LensConfig {
    fn default() -> Self {
        Self {
            summary_truncate_len: 50,
            summary_max_properties: 5,
            case_sensitive_default: false,
            search_limit: 100,
            display_name_keys: DEFAULT_DISPLAY_NAME_KEYS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl LensConfig {
    /// Parse from JSON; absent fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }
}
