//! Spatial partitioning for the broad phase
//!
//! A bounding-box hierarchy over axis-aligned sub-boxes of the collision
//! world, plus the cache that accelerates repeated narrow-phase queries.

mod cache;
mod tree;

pub use cache::CollisionCache;
pub use tree::{BoundingBoxTree, NodeKey};
