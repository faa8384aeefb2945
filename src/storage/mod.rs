//! # Graph Store and fetch boundary
//!
//! `Graph` is the in-memory store every query runs against.
//! `GraphSource` is the contract with whatever fetches the data (a Neo4j
//! driver, a file, a fixture); it hands over a complete
//! [`RawGraphPayload`] and nothing else.
//!
//! | Source | Description |
//! |--------|-------------|
//! | `StaticSource` | Payload held in memory (fixtures, pre-fetched JSON) |

pub mod memory;
pub mod payload;

use async_trait::async_trait;

use crate::Result;

pub use memory::{Graph, DEFAULT_DISPLAY_NAME_KEYS};
pub use payload::{RawGraphPayload, RawNode, RawRelationship};

// ============================================================================
// GraphSource
// ============================================================================

/// Producer of raw graph payloads.
///
/// Connection handling, query language and retries are the implementor's
/// business. Timeouts are imposed here too; nothing past this trait waits
/// on I/O.
#[async_trait]
pub trait GraphSource: Send + Sync {
    /// Fetch every node and relationship.
    async fn fetch(&self) -> Result<RawGraphPayload>;

    /// Fetch a preview of at most `limit` nodes.
    ///
    /// The default fetches everything and cuts locally; sources that can
    /// limit on the server side should override it.
    async fn fetch_limited(&self, limit: usize) -> Result<RawGraphPayload> {
        Ok(self.fetch().await?.truncated(limit))
    }
}

// ============================================================================
// StaticSource
// ============================================================================

/// A source that serves one fixed payload.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    payload: RawGraphPayload,
}

impl StaticSource {
    pub fn new(payload: RawGraphPayload) -> Self {
        Self { payload }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(RawGraphPayload::from_json(json)?))
    }
}

#[async_trait]
impl GraphSource for StaticSource {
    async fn fetch(&self) -> Result<RawGraphPayload> {
        Ok(self.payload.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_source_limited() {
        let source = StaticSource::new(
            RawGraphPayload::new()
                .with_node("a", ["X"], &[])
                .with_node("b", ["X"], &[])
                .with_relationship("r", "R", "a", "b"),
        );
        assert_eq!(source.fetch().await.unwrap().nodes.len(), 2);

        let preview = source.fetch_limited(1).await.unwrap();
        assert_eq!(preview.nodes.len(), 1);
        assert!(preview.relationships.is_empty());
    }

    #[test]
    fn test_static_source_bad_json() {
        assert!(matches!(
            StaticSource::from_json("{\"nodes\": 3}"),
            Err(crate::Error::Load(crate::LoadError::MalformedPayload(_)))
        ));
    }
}
