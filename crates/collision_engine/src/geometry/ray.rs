//! Ray type for ray casting and picking

use crate::foundation::math::{Transform, Vec3};
use crate::geometry::Aabb;

/// A ray for ray casting and picking
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec3,
    /// The direction of the ray (normalized by the constructor)
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray with the given origin and direction
    ///
    /// The direction is normalized; a zero-length direction is kept as-is
    /// and rejected by [`Ray::is_valid`].
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.try_normalize(f32::EPSILON).unwrap_or(direction),
        }
    }

    /// Check that the ray has finite components and a unit-length direction
    pub fn is_valid(&self) -> bool {
        self.origin.iter().all(|c| c.is_finite())
            && self.direction.iter().all(|c| c.is_finite())
            && (self.direction.magnitude() - 1.0).abs() < 1e-4
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Cast this ray against an AABB, returning the entry parameter if hit
    pub fn cast_against(&self, aabb: &Aabb) -> Option<f32> {
        aabb.intersect_ray(self.origin, self.direction)
    }

    /// Check whether this ray hits the given AABB or originates inside it
    pub fn hits_or_originates_in(&self, aabb: &Aabb) -> bool {
        aabb.contains_point(self.origin) || self.cast_against(aabb).is_some()
    }

    /// Apply a rigid transform to this ray
    pub fn transformed(&self, transform: &Transform) -> Ray {
        Ray {
            origin: transform.transform_point(self.origin),
            direction: transform.transform_vector(self.direction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_point_at() {
        let ray = Ray::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 2.0, 0.0));
        let point = ray.point_at(3.0);

        // Direction is normalized by the constructor.
        assert_relative_eq!(point.x, 1.0);
        assert_relative_eq!(point.y, 3.0);
        assert_relative_eq!(point.z, 0.0);
    }

    #[test]
    fn test_hits_or_originates_in() {
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));

        let from_outside = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        let from_inside = Ray::new(Vec3::zeros(), Vec3::new(0.0, 1.0, 0.0));
        let pointing_away = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));

        assert!(from_outside.hits_or_originates_in(&aabb));
        assert!(from_inside.hits_or_originates_in(&aabb));
        assert!(!pointing_away.hits_or_originates_in(&aabb));
    }
}
