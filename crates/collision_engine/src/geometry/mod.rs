//! Geometry primitives for the collision system
//!
//! Pure value types with algebraic operations: axis-aligned bounding boxes,
//! rays, and line segments. Everything above the foundation math layer is
//! built on these.

mod aabb;
mod line_segment;
mod ray;

pub use aabb::Aabb;
pub use line_segment::LineSegment;
pub use ray::Ray;
