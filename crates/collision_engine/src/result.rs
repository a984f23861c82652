//! Results: the polymorphic responses to collision queries
//!
//! There is one result kind per query kind, plus an error kind carrying a
//! human-readable message; a failed query flows back through the normal
//! result channel, because no exception channel exists across the task
//! boundary. Result payloads are owned deep copies of worker state.

use crate::foundation::math::{Transform, Vec3};
use crate::geometry::{Aabb, LineSegment};
use crate::narrow_phase::ShapePairCollisionStatus;
use crate::shape::ShapeId;

/// Characteristics of a ray-cast hit against a shape in the collision world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayCastHit {
    /// ID of the shape that was hit; [`ShapeId::NONE`] if nothing was hit
    pub shape_id: ShapeId,
    /// Ray parameter of the hit (distance along the unit-length direction)
    pub alpha: f32,
    /// Point on the shape surface where the ray hit it
    pub surface_point: Vec3,
    /// Unit normal to the shape surface at the hit point
    pub surface_normal: Vec3,
}

impl RayCastHit {
    /// The no-hit sentinel value
    pub fn none() -> Self {
        Self {
            shape_id: ShapeId::NONE,
            alpha: f32::MAX,
            surface_point: Vec3::zeros(),
            surface_normal: Vec3::zeros(),
        }
    }

    /// Check whether the ray hit anything
    pub fn is_hit(&self) -> bool {
        self.shape_id.is_some()
    }
}

/// A world-space line segment with a draw color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderLine {
    /// The line's geometry, in world space coordinates
    pub line: LineSegment,
    /// Color differentiating this line from other collision-world elements
    pub color: Vec3,
}

/// Wire-frame geometry visualizing the collision world
///
/// The renderer is expected to draw each entry as a line primitive; the
/// order is insertion order and carries no further meaning.
#[derive(Debug, Clone, Default)]
pub struct DebugRenderLines {
    lines: Vec<RenderLine>,
}

impl DebugRenderLines {
    /// Create an empty line set
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a single line
    pub fn add_render_line(&mut self, line: LineSegment, color: Vec3) {
        self.lines.push(RenderLine { line, color });
    }

    /// Append the 12 edges of the given AABB
    pub fn add_lines_for_box(&mut self, aabb: &Aabb, color: Vec3) {
        let c = aabb.corners();
        // Corner indexing: bit 0 = +X, bit 1 = +Y, bit 2 = +Z.
        const EDGES: [(usize, usize); 12] = [
            (0, 1),
            (2, 3),
            (4, 5),
            (6, 7),
            (0, 2),
            (1, 3),
            (4, 6),
            (5, 7),
            (0, 4),
            (1, 5),
            (2, 6),
            (3, 7),
        ];
        for (a, b) in EDGES {
            self.add_render_line(LineSegment::new(c[a], c[b]), color);
        }
    }

    /// Get the accumulated lines
    pub fn lines(&self) -> &[RenderLine] {
        &self.lines
    }

    /// Get the number of accumulated lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check whether no lines have been accumulated
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Outcome of an executed query, keyed by the submitting task's ID
///
/// The caller knows, based on the query that was made, which variant to
/// expect; an `Error` variant may substitute for any of them.
#[derive(Debug, Clone)]
pub enum CollisionResult {
    /// The query failed; carries a human-readable message
    Error(String),
    /// Response to a ray-cast query
    RayCast(RayCastHit),
    /// Response to an object-to-world transform query
    Transform(Transform),
    /// Response to a collision query: all pairs found in collision
    Collision(Vec<ShapePairCollisionStatus>),
    /// Response to a debug-render query
    DebugRender(DebugRenderLines),
}
