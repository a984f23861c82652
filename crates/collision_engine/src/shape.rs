//! Collision shapes
//!
//! A [`Shape`] owns a geometric primitive in object space, an object-to-world
//! transform, and a back-reference to the spatial tree node currently holding
//! it. Shapes are identified by process-unique [`ShapeId`]s and live in the
//! worker thread's registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::foundation::math::{Transform, Vec3};
use crate::geometry::{Aabb, LineSegment, Ray};
use crate::spatial::NodeKey;

/// Process-unique identifier for a collision shape
///
/// IDs are assigned from a monotonically increasing counter and are never
/// reused. [`ShapeId::NONE`] (zero) is the no-hit sentinel used by ray-cast
/// results and is never assigned to a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(u64);

static NEXT_SHAPE_ID: AtomicU64 = AtomicU64::new(1);

impl ShapeId {
    /// The no-hit sentinel; never assigned to a shape
    pub const NONE: ShapeId = ShapeId(0);

    fn next() -> Self {
        ShapeId(NEXT_SHAPE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Check whether this ID refers to an actual shape
    pub fn is_some(self) -> bool {
        self != Self::NONE
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Back-reference from a shape to the tree node holding it
///
/// The tree id disambiguates arena keys between trees, so membership in a
/// foreign tree is detectable without pointer identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRef {
    pub(crate) tree_id: u64,
    pub(crate) node: NodeKey,
}

/// Geometric primitive of a collision shape, in object space
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeGeometry {
    /// A sphere with the given center and radius
    Sphere {
        /// Center of the sphere in object space
        center: Vec3,
        /// Radius of the sphere
        radius: f32,
    },
    /// A capsule: a radius swept along a spine segment
    Capsule {
        /// First endpoint of the spine in object space
        vertex_a: Vec3,
        /// Second endpoint of the spine in object space
        vertex_b: Vec3,
        /// Radius swept along the spine
        radius: f32,
    },
    /// A box centered at the object-space origin
    Box {
        /// Half-extents of the box along each object-space axis
        extents: Vec3,
    },
}

impl ShapeGeometry {
    /// Get a short human-readable name for the geometry kind
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Sphere { .. } => "sphere",
            Self::Capsule { .. } => "capsule",
            Self::Box { .. } => "box",
        }
    }
}

/// A collision shape tracked by the collision system
#[derive(Debug, Clone)]
pub struct Shape {
    id: ShapeId,
    geometry: ShapeGeometry,
    object_to_world: Transform,
    revision: u64,
    pub(crate) node: Option<NodeRef>,
}

/// The worker thread's shape registry, keyed by shape ID
pub type ShapeRegistry = HashMap<ShapeId, Shape>;

impl Shape {
    /// Create a new shape with a freshly assigned ID
    pub fn new(geometry: ShapeGeometry, object_to_world: Transform) -> Self {
        Self {
            id: ShapeId::next(),
            geometry,
            object_to_world,
            revision: 0,
            node: None,
        }
    }

    /// Create a sphere shape
    pub fn sphere(center: Vec3, radius: f32, object_to_world: Transform) -> Self {
        Self::new(ShapeGeometry::Sphere { center, radius }, object_to_world)
    }

    /// Create a capsule shape
    pub fn capsule(vertex_a: Vec3, vertex_b: Vec3, radius: f32, object_to_world: Transform) -> Self {
        Self::new(
            ShapeGeometry::Capsule {
                vertex_a,
                vertex_b,
                radius,
            },
            object_to_world,
        )
    }

    /// Create a box shape with the given half-extents
    pub fn cuboid(extents: Vec3, object_to_world: Transform) -> Self {
        Self::new(ShapeGeometry::Box { extents }, object_to_world)
    }

    /// Get this shape's process-unique ID
    pub fn id(&self) -> ShapeId {
        self.id
    }

    /// Get this shape's object-space geometry
    pub fn geometry(&self) -> &ShapeGeometry {
        &self.geometry
    }

    /// Get this shape's object-to-world transform
    pub fn object_to_world(&self) -> &Transform {
        &self.object_to_world
    }

    /// Get this shape's world-to-object transform
    pub fn world_to_object(&self) -> Transform {
        self.object_to_world.inverse()
    }

    /// Replace this shape's transform, bumping the revision counter
    ///
    /// The caller is responsible for re-inserting the shape into its tree;
    /// the tree is none the wiser about bounding-box changes made here.
    pub fn set_object_to_world(&mut self, transform: Transform) {
        self.object_to_world = transform;
        self.revision += 1;
    }

    /// Replace this shape's geometry, bumping the revision counter
    pub fn set_geometry(&mut self, geometry: ShapeGeometry) {
        self.geometry = geometry;
        self.revision += 1;
    }

    /// Get the mutation revision, consumed by the collision cache
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Get the tree node currently holding this shape, if tracked
    pub fn node(&self) -> Option<NodeRef> {
        self.node
    }

    /// Calculate this shape's world-space bounding box
    pub fn bounding_box(&self) -> Aabb {
        match self.geometry {
            ShapeGeometry::Sphere { center, radius } => {
                let world_center = self.object_to_world.transform_point(center);
                Aabb::from_center_extents(world_center, Vec3::new(radius, radius, radius))
            }
            ShapeGeometry::Capsule {
                vertex_a,
                vertex_b,
                radius,
            } => {
                let extent = Vec3::new(radius, radius, radius);
                let world_a = self.object_to_world.transform_point(vertex_a);
                let world_b = self.object_to_world.transform_point(vertex_b);
                let mut aabb = Aabb::from_center_extents(world_a, extent);
                aabb.expand_to_include(world_b - extent);
                aabb.expand_to_include(world_b + extent);
                aabb
            }
            ShapeGeometry::Box { extents } => {
                let object_box = Aabb::from_center_extents(Vec3::zeros(), extents);
                let corners = object_box.corners();
                let first = self.object_to_world.transform_point(corners[0]);
                let mut aabb = Aabb::new(first, first);
                for corner in &corners[1..] {
                    aabb.expand_to_include(self.object_to_world.transform_point(*corner));
                }
                aabb
            }
        }
    }

    /// Check this shape's geometry and transform for validity
    ///
    /// Rejects NaN/Inf components and non-positive radii or extents. Must be
    /// honored before trusting any geometric calculation on the shape.
    pub fn is_valid(&self) -> bool {
        if !self.object_to_world.is_valid() {
            return false;
        }

        match self.geometry {
            ShapeGeometry::Sphere { center, radius } => {
                radius.is_finite() && radius > 0.0 && center.iter().all(|c| c.is_finite())
            }
            ShapeGeometry::Capsule {
                vertex_a,
                vertex_b,
                radius,
            } => {
                radius.is_finite()
                    && radius > 0.0
                    && vertex_a.iter().all(|c| c.is_finite())
                    && vertex_b.iter().all(|c| c.is_finite())
            }
            ShapeGeometry::Box { extents } => {
                extents.iter().all(|c| c.is_finite()) && extents.min() > 0.0
            }
        }
    }

    /// Calculate this shape's volume
    pub fn size(&self) -> f32 {
        use std::f32::consts::PI;
        match self.geometry {
            ShapeGeometry::Sphere { radius, .. } => (4.0 / 3.0) * PI * radius.powi(3),
            ShapeGeometry::Capsule {
                vertex_a,
                vertex_b,
                radius,
            } => {
                let spine_length = (vertex_b - vertex_a).magnitude();
                (4.0 / 3.0) * PI * radius.powi(3) + PI * radius * radius * spine_length
            }
            ShapeGeometry::Box { extents } => 8.0 * extents.x * extents.y * extents.z,
        }
    }

    /// Cast a ray against this shape
    ///
    /// Returns the smallest non-negative ray parameter together with the
    /// unit surface normal at the hit point, or None on a miss (including
    /// rays originating inside capsules and boxes).
    pub fn ray_cast(&self, ray: &Ray) -> Option<(f32, Vec3)> {
        match self.geometry {
            ShapeGeometry::Sphere { center, radius } => {
                let world_center = self.object_to_world.transform_point(center);
                ray_cast_sphere(ray, world_center, radius)
            }
            ShapeGeometry::Capsule {
                vertex_a,
                vertex_b,
                radius,
            } => {
                let spine =
                    LineSegment::new(vertex_a, vertex_b).transformed(&self.object_to_world);
                ray_cast_capsule(ray, &spine, radius)
            }
            ShapeGeometry::Box { extents } => {
                let local_ray = ray.transformed(&self.world_to_object());
                let object_box = Aabb::from_center_extents(Vec3::zeros(), extents);
                let (alpha, local_normal) = ray_cast_box(&local_ray, &object_box)?;
                Some((alpha, self.object_to_world.transform_normal(local_normal)))
            }
        }
    }
}

/// Ray-sphere intersection via the quadratic formula
///
/// Solves |origin + t*direction - center|^2 = radius^2 and returns the
/// closest non-negative root.
fn ray_cast_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<(f32, Vec3)> {
    let oc = ray.origin - center;

    let a = ray.direction.dot(&ray.direction);
    let b = 2.0 * oc.dot(&ray.direction);
    let c = oc.dot(&oc) - radius * radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_discriminant = discriminant.sqrt();
    let t1 = (-b - sqrt_discriminant) / (2.0 * a);
    let t2 = (-b + sqrt_discriminant) / (2.0 * a);

    // Use the closest non-negative intersection.
    let t = if t1 >= 0.0 {
        t1
    } else if t2 >= 0.0 {
        t2
    } else {
        return None;
    };

    let normal = (ray.point_at(t) - center)
        .try_normalize(f32::EPSILON)
        .unwrap_or_else(Vec3::zeros);
    Some((t, normal))
}

/// Ray-capsule intersection: infinite-cylinder quadratic plus end caps
fn ray_cast_capsule(ray: &Ray, spine: &LineSegment, radius: f32) -> Option<(f32, Vec3)> {
    let ba = spine.delta();
    let oa = ray.origin - spine.point_a;

    let baba = ba.magnitude_squared();
    let bard = ba.dot(&ray.direction);
    let baoa = ba.dot(&oa);
    let rdoa = ray.direction.dot(&oa);
    let oaoa = oa.magnitude_squared();

    let a = baba - bard * bard;
    let b = baba * rdoa - baoa * bard;
    let c = baba * oaoa - baoa * baoa - radius * radius * baba;

    if a.abs() > f32::EPSILON {
        let h = b * b - a * c;
        if h < 0.0 {
            return None;
        }
        let t = (-b - h.sqrt()) / a;
        let y = baoa + t * bard;
        if t >= 0.0 && y > 0.0 && y < baba {
            // Cylindrical body hit.
            let axis_point = spine.point_a + ba * (y / baba);
            let normal = (ray.point_at(t) - axis_point)
                .try_normalize(f32::EPSILON)
                .unwrap_or_else(Vec3::zeros);
            return Some((t, normal));
        }
        // Fall through to the end caps.
    }

    // End caps are spheres at the spine endpoints; keep the nearest hit.
    let cap_a = ray_cast_sphere(ray, spine.point_a, radius);
    let cap_b = ray_cast_sphere(ray, spine.point_b, radius);
    match (cap_a, cap_b) {
        (Some(a_hit), Some(b_hit)) => Some(if a_hit.0 <= b_hit.0 { a_hit } else { b_hit }),
        (Some(hit), None) | (None, Some(hit)) => Some(hit),
        (None, None) => None,
    }
}

/// Ray-box intersection in the box's object space, with face normal
fn ray_cast_box(local_ray: &Ray, object_box: &Aabb) -> Option<(f32, Vec3)> {
    let alpha = object_box.intersect_ray(local_ray.origin, local_ray.direction)?;
    if object_box.contains_point(local_ray.origin) {
        // Surface normals are ill-defined for rays starting inside.
        return None;
    }

    // Identify which face the entry point lies on.
    let entry = local_ray.point_at(alpha);
    let mut normal = Vec3::zeros();
    let mut best_distance = f32::MAX;
    for axis in 0..3 {
        let to_min = (entry[axis] - object_box.min[axis]).abs();
        if to_min < best_distance {
            best_distance = to_min;
            normal = Vec3::zeros();
            normal[axis] = -1.0;
        }
        let to_max = (entry[axis] - object_box.max[axis]).abs();
        if to_max < best_distance {
            best_distance = to_max;
            normal = Vec3::zeros();
            normal[axis] = 1.0;
        }
    }

    Some((alpha, normal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Quat;
    use approx::assert_relative_eq;

    #[test]
    fn test_shape_ids_unique_and_nonzero() {
        let a = Shape::sphere(Vec3::zeros(), 1.0, Transform::identity());
        let b = Shape::sphere(Vec3::zeros(), 1.0, Transform::identity());

        assert!(a.id().is_some());
        assert!(b.id().is_some());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_sphere_bounding_box_follows_transform() {
        let shape = Shape::sphere(
            Vec3::new(1.0, 0.0, 0.0),
            2.0,
            Transform::from_position(Vec3::new(10.0, 0.0, 0.0)),
        );

        let aabb = shape.bounding_box();
        assert_relative_eq!(aabb.min.x, 9.0);
        assert_relative_eq!(aabb.max.x, 13.0);
        assert_relative_eq!(aabb.min.y, -2.0);
        assert_relative_eq!(aabb.max.y, 2.0);
    }

    #[test]
    fn test_box_bounding_box_under_rotation() {
        // A unit cube rotated 45 degrees about Y widens to sqrt(2) in X/Z.
        let rotation = Quat::from_axis_angle(&Vec3::y_axis(), std::f32::consts::FRAC_PI_4);
        let shape = Shape::cuboid(
            Vec3::new(1.0, 1.0, 1.0),
            Transform::from_position_rotation(Vec3::zeros(), rotation),
        );

        let aabb = shape.bounding_box();
        let expected = 2.0_f32.sqrt();
        assert_relative_eq!(aabb.max.x, expected, epsilon = 1e-5);
        assert_relative_eq!(aabb.max.z, expected, epsilon = 1e-5);
        assert_relative_eq!(aabb.max.y, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_is_valid_rejects_degenerate_geometry() {
        assert!(!Shape::sphere(Vec3::zeros(), 0.0, Transform::identity()).is_valid());
        assert!(!Shape::sphere(Vec3::zeros(), f32::NAN, Transform::identity()).is_valid());
        assert!(!Shape::cuboid(Vec3::new(1.0, -1.0, 1.0), Transform::identity()).is_valid());
        assert!(Shape::capsule(Vec3::zeros(), Vec3::new(0.0, 2.0, 0.0), 0.5, Transform::identity())
            .is_valid());
    }

    #[test]
    fn test_mutation_bumps_revision() {
        let mut shape = Shape::sphere(Vec3::zeros(), 1.0, Transform::identity());
        assert_eq!(shape.revision(), 0);

        shape.set_object_to_world(Transform::from_position(Vec3::new(1.0, 0.0, 0.0)));
        assert_eq!(shape.revision(), 1);

        shape.set_geometry(ShapeGeometry::Sphere {
            center: Vec3::zeros(),
            radius: 2.0,
        });
        assert_eq!(shape.revision(), 2);
    }

    #[test]
    fn test_ray_cast_sphere_through_center() {
        let shape = Shape::sphere(
            Vec3::zeros(),
            1.5,
            Transform::from_position(Vec3::new(0.0, 0.0, 10.0)),
        );
        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, 1.0));

        let (alpha, normal) = shape.ray_cast(&ray).unwrap();
        assert_relative_eq!(alpha, 8.5, epsilon = 1e-4);
        assert_relative_eq!(normal.z, -1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_ray_cast_capsule_body_and_cap() {
        let shape = Shape::capsule(
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            0.5,
            Transform::identity(),
        );

        // Straight at the cylindrical body.
        let body_ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        let (alpha, normal) = shape.ray_cast(&body_ray).unwrap();
        assert_relative_eq!(alpha, 4.5, epsilon = 1e-4);
        assert_relative_eq!(normal.x, -1.0, epsilon = 1e-4);

        // Straight down onto the top cap.
        let cap_ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        let (alpha, normal) = shape.ray_cast(&cap_ray).unwrap();
        assert_relative_eq!(alpha, 3.5, epsilon = 1e-4);
        assert_relative_eq!(normal.y, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_ray_cast_box_face_normal() {
        let shape = Shape::cuboid(Vec3::new(1.0, 2.0, 3.0), Transform::identity());
        let ray = Ray::new(Vec3::new(-10.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));

        let (alpha, normal) = shape.ray_cast(&ray).unwrap();
        assert_relative_eq!(alpha, 9.0, epsilon = 1e-4);
        assert_relative_eq!(normal.x, -1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_ray_cast_miss() {
        let shape = Shape::sphere(Vec3::zeros(), 1.0, Transform::identity());
        let ray = Ray::new(Vec3::new(-5.0, 3.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(shape.ray_cast(&ray).is_none());
    }

    #[test]
    fn test_capsule_volume() {
        let shape = Shape::capsule(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            1.0,
            Transform::identity(),
        );
        let expected = (4.0 / 3.0) * std::f32::consts::PI + std::f32::consts::PI * 2.0;
        assert_relative_eq!(shape.size(), expected, epsilon = 1e-4);
    }
}
