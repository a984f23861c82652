//! Narrow-phase collision calculators
//!
//! Pure functions computing the pairwise collision status of two shapes:
//! an in-collision flag, a representative contact point, and a separation
//! vector (the minimum translation that eliminates interpenetration, pushing
//! shape B away from shape A). Dispatch is an exhaustive match on the
//! geometry-kind pair, so the set of supported pairs is checkable at compile
//! time; unsupported pairs are errors, not crashes.

use crate::error::CollisionError;
use crate::foundation::math::Vec3;
use crate::geometry::{Aabb, LineSegment};
use crate::shape::{Shape, ShapeGeometry, ShapeId};

/// Distance below which a sphere center counts as lying on a box surface
const BOX_BORDER_THICKNESS: f32 = 1e-4;

/// Collision status of an ordered shape pair
///
/// All fields are owned copies; nothing borrows into worker-thread state, so
/// a status can safely cross the task/result boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapePairCollisionStatus {
    /// ID of the first shape of the pair
    pub shape_a: ShapeId,
    /// ID of the second shape of the pair
    pub shape_b: ShapeId,
    /// Whether the two shapes interpenetrate (boundary contact excluded)
    pub in_collision: bool,
    /// A representative contact point, in world space
    ///
    /// Non-normative for capsule-capsule and sphere-box pairs; only the
    /// in-collision flag and separation delta are load-bearing there.
    pub collision_center: Vec3,
    /// Minimum-translation vector eliminating the interpenetration
    pub separation_delta: Vec3,
}

impl ShapePairCollisionStatus {
    fn new(shape_a: &Shape, shape_b: &Shape) -> Self {
        Self {
            shape_a: shape_a.id(),
            shape_b: shape_b.id(),
            in_collision: false,
            collision_center: Vec3::zeros(),
            separation_delta: Vec3::zeros(),
        }
    }

    /// Get this status as seen from the opposite argument order
    ///
    /// Swaps the pair's roles and flips the separation delta's sense, which
    /// is always "push B away from A". The contact point is symmetric.
    pub fn reversed(&self) -> Self {
        Self {
            shape_a: self.shape_b,
            shape_b: self.shape_a,
            in_collision: self.in_collision,
            collision_center: self.collision_center,
            separation_delta: -self.separation_delta,
        }
    }
}

/// Compute the collision status of the given shape pair
///
/// Returns an error for shape-type pairs with no calculator (box-box and
/// capsule-box).
pub fn calculate(
    shape_a: &Shape,
    shape_b: &Shape,
) -> Result<ShapePairCollisionStatus, CollisionError> {
    use ShapeGeometry as G;
    match (shape_a.geometry(), shape_b.geometry()) {
        (G::Sphere { .. }, G::Sphere { .. }) => Ok(sphere_sphere(shape_a, shape_b)),
        // The direction factor keeps the separation delta's sense (push B
        // away from A) consistent regardless of argument order.
        (G::Sphere { .. }, G::Capsule { .. }) => Ok(sphere_capsule(shape_a, shape_b, shape_a, shape_b, -1.0)),
        (G::Capsule { .. }, G::Sphere { .. }) => Ok(sphere_capsule(shape_a, shape_b, shape_b, shape_a, 1.0)),
        (G::Capsule { .. }, G::Capsule { .. }) => Ok(capsule_capsule(shape_a, shape_b)),
        (G::Sphere { .. }, G::Box { .. }) => Ok(sphere_box(shape_a, shape_b, shape_a, shape_b, 1.0)),
        (G::Box { .. }, G::Sphere { .. }) => Ok(sphere_box(shape_a, shape_b, shape_b, shape_a, -1.0)),
        (a, b) => Err(CollisionError::UnsupportedShapePair(
            a.kind_name(),
            b.kind_name(),
        )),
    }
}

fn sphere_params(shape: &Shape) -> (Vec3, f32) {
    match *shape.geometry() {
        ShapeGeometry::Sphere { center, radius } => {
            (shape.object_to_world().transform_point(center), radius)
        }
        _ => unreachable!("dispatch guarantees a sphere"),
    }
}

fn capsule_params(shape: &Shape) -> (LineSegment, f32) {
    match *shape.geometry() {
        ShapeGeometry::Capsule {
            vertex_a,
            vertex_b,
            radius,
        } => (
            LineSegment::new(vertex_a, vertex_b).transformed(shape.object_to_world()),
            radius,
        ),
        _ => unreachable!("dispatch guarantees a capsule"),
    }
}

/// Sphere-sphere: in collision iff center distance < sum of radii
fn sphere_sphere(shape_a: &Shape, shape_b: &Shape) -> ShapePairCollisionStatus {
    let mut status = ShapePairCollisionStatus::new(shape_a, shape_b);

    let (center_a, radius_a) = sphere_params(shape_a);
    let (center_b, radius_b) = sphere_params(shape_b);

    let center_delta = center_b - center_a;
    let distance = center_delta.magnitude();
    let radii_sum = radius_a + radius_b;

    if distance < radii_sum {
        status.in_collision = true;
        status.collision_center =
            LineSegment::new(center_a, center_b).lerp(radius_a / radii_sum);
        if let Some(direction) = center_delta.try_normalize(f32::EPSILON) {
            status.separation_delta = direction * (distance - radii_sum);
        }
    }

    status
}

/// Sphere-capsule: project the sphere center onto the capsule spine
fn sphere_capsule(
    shape_a: &Shape,
    shape_b: &Shape,
    sphere: &Shape,
    capsule: &Shape,
    direction_factor: f32,
) -> ShapePairCollisionStatus {
    let mut status = ShapePairCollisionStatus::new(shape_a, shape_b);

    let (sphere_center, sphere_radius) = sphere_params(sphere);
    let (spine, capsule_radius) = capsule_params(capsule);

    let closest_point = spine.closest_point_to(sphere_center);
    let delta = sphere_center - closest_point;
    let distance = delta.magnitude();
    let radii_sum = sphere_radius + capsule_radius;

    if distance < radii_sum {
        status.in_collision = true;
        status.collision_center = closest_point + delta * (capsule_radius / radii_sum);
        if let Some(direction) = delta.try_normalize(f32::EPSILON) {
            status.separation_delta = direction * (distance - radii_sum) * direction_factor;
        }
    }

    status
}

/// Capsule-capsule: shortest connecting segment between the two spines
fn capsule_capsule(shape_a: &Shape, shape_b: &Shape) -> ShapePairCollisionStatus {
    let mut status = ShapePairCollisionStatus::new(shape_a, shape_b);

    let (spine_a, radius_a) = capsule_params(shape_a);
    let (spine_b, radius_b) = capsule_params(shape_b);

    if let Some(connector) = LineSegment::shortest_connector(&spine_a, &spine_b) {
        let distance = connector.length();
        let radii_sum = radius_a + radius_b;

        if distance < radii_sum {
            status.in_collision = true;
            status.collision_center = connector.lerp(0.5);
            if let Some(direction) = connector.delta().try_normalize(f32::EPSILON) {
                status.separation_delta = direction * (distance - radii_sum);
            }
        }
    }

    status
}

/// Sphere-box: closest-point test in the box's object space
///
/// Three regimes for the separation direction: a degenerate fallback when
/// the sphere center lies within epsilon of the box surface, a full push-out
/// when the center is interior, and the usual surface push otherwise. The
/// resulting direction is mapped back to world space as a normal.
fn sphere_box(
    shape_a: &Shape,
    shape_b: &Shape,
    sphere: &Shape,
    cuboid: &Shape,
    direction_factor: f32,
) -> ShapePairCollisionStatus {
    let mut status = ShapePairCollisionStatus::new(shape_a, shape_b);

    let extents = match *cuboid.geometry() {
        ShapeGeometry::Box { extents } => extents,
        _ => unreachable!("dispatch guarantees a box"),
    };

    let (world_sphere_center, sphere_radius) = sphere_params(sphere);
    let world_to_box = cuboid.world_to_object();
    let sphere_center = world_to_box.transform_point(world_sphere_center);

    let object_space_box = Aabb::from_center_extents(Vec3::zeros(), extents);
    let closest_box_point = object_space_box.closest_surface_point_to(sphere_center);

    let delta = sphere_center - closest_box_point;
    let distance = delta.magnitude();
    let interior = object_space_box.contains_point(sphere_center);

    if distance < sphere_radius || interior {
        status.in_collision = true;
        status.collision_center = cuboid.object_to_world().transform_point(closest_box_point);

        let separation = if distance < BOX_BORDER_THICKNESS {
            // Degenerate: center effectively on the surface.
            closest_box_point
                .try_normalize(f32::EPSILON)
                .map(|direction| direction * sphere_radius * direction_factor)
        } else if interior {
            delta
                .try_normalize(f32::EPSILON)
                .map(|direction| -direction * (sphere_radius + distance) * direction_factor)
        } else {
            delta
                .try_normalize(f32::EPSILON)
                .map(|direction| direction * (sphere_radius - distance) * direction_factor)
        };

        if let Some(separation) = separation {
            status.separation_delta = cuboid.object_to_world().transform_normal(separation);
        }
    }

    status
}
