//! Collision cache
//!
//! Remembers the last narrow-phase status computed for a shape pair together
//! with both shapes' mutation revisions. A cached status is only served
//! while neither shape has changed since it was computed; shape mutation
//! invalidates implicitly by bumping the revision counter.

use std::collections::HashMap;

use crate::narrow_phase::ShapePairCollisionStatus;
use crate::shape::{Shape, ShapeId};

#[derive(Debug, Clone)]
struct CacheEntry {
    revision_a: u64,
    revision_b: u64,
    status: ShapePairCollisionStatus,
}

/// Cache of narrow-phase results keyed by unordered shape pair
#[derive(Debug, Default)]
pub struct CollisionCache {
    entries: HashMap<(ShapeId, ShapeId), CacheEntry>,
}

impl CollisionCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    fn key(a: ShapeId, b: ShapeId) -> (ShapeId, ShapeId) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }

    /// Look up the cached status for a pair, if still fresh
    pub fn lookup(&self, shape_a: &Shape, shape_b: &Shape) -> Option<&ShapePairCollisionStatus> {
        let key = Self::key(shape_a.id(), shape_b.id());
        let entry = self.entries.get(&key)?;

        let (revision_a, revision_b) = if key.0 == shape_a.id() {
            (shape_a.revision(), shape_b.revision())
        } else {
            (shape_b.revision(), shape_a.revision())
        };

        if entry.revision_a == revision_a && entry.revision_b == revision_b {
            Some(&entry.status)
        } else {
            None
        }
    }

    /// Store a freshly computed status for a pair
    pub fn store(&mut self, shape_a: &Shape, shape_b: &Shape, status: &ShapePairCollisionStatus) {
        let key = Self::key(shape_a.id(), shape_b.id());
        let (revision_a, revision_b) = if key.0 == shape_a.id() {
            (shape_a.revision(), shape_b.revision())
        } else {
            (shape_b.revision(), shape_a.revision())
        };

        self.entries.insert(
            key,
            CacheEntry {
                revision_a,
                revision_b,
                status: status.clone(),
            },
        );
    }

    /// Drop every entry involving the given shape
    pub fn purge(&mut self, shape_id: ShapeId) {
        self.entries
            .retain(|key, _| key.0 != shape_id && key.1 != shape_id);
    }

    /// Drop all entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Get the number of cached pairs
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
