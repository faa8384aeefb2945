//! # Property Graph Model
//!
//! Clean DTOs for the in-memory property graph.
//! These types cross every boundary: payload ↔ store ↔ filters ↔ projector.
//!
//! Design rule: no connection types, no rendering types here.
//! This module is pure data. No I/O, no state, no async.

pub mod node;
pub mod edge;
pub mod value;
pub mod property_map;

pub use node::{Node, NodeId, UNKNOWN_TYPE};
pub use edge::{Edge, EdgeId, Direction};
pub use value::PropertyValue;
pub use property_map::PropertyMap;
