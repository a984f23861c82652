//! Axis-aligned bounding box

use crate::foundation::math::Vec3;

/// Axis-Aligned Bounding Box for spatial queries
///
/// As a point-set the box is closed: corner, edge and face points are
/// members of the set. Operations are left undefined if the stored corners
/// are invalid (see [`Aabb::is_valid`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a point with given extents (half-size)
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the AABB
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Get the side lengths along each axis
    pub fn dimensions(&self) -> Vec3 {
        self.max - self.min
    }

    /// Check that the box is well-formed: finite corners with min <= max
    pub fn is_valid(&self) -> bool {
        self.min.iter().all(|c| c.is_finite())
            && self.max.iter().all(|c| c.is_finite())
            && self.min.x <= self.max.x
            && self.min.y <= self.max.y
            && self.min.z <= self.max.z
    }

    /// Check if this AABB contains a point (boundary included)
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Check if this AABB fully contains another AABB
    pub fn contains_box(&self, other: &Aabb) -> bool {
        self.contains_point(other.min) && self.contains_point(other.max)
    }

    /// Check if this AABB intersects another AABB
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Get the point of this AABB closest to the given point
    ///
    /// For points inside the box this is the point itself; see
    /// [`Aabb::closest_surface_point_to`] when a boundary point is needed.
    pub fn closest_point_to(&self, point: Vec3) -> Vec3 {
        Vec3::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
            point.z.clamp(self.min.z, self.max.z),
        )
    }

    /// Get the point on the surface of this AABB closest to the given point
    ///
    /// Exterior points clamp to the boundary; interior points project onto
    /// the nearest face.
    pub fn closest_surface_point_to(&self, point: Vec3) -> Vec3 {
        let clamped = self.closest_point_to(point);
        if clamped != point {
            return clamped;
        }

        // Interior point: push the coordinate with the smallest distance to
        // a face out to that face.
        let mut surface = point;
        let mut best_distance = f32::MAX;
        let mut best_axis = 0;
        let mut best_value = self.min.x;

        for axis in 0..3 {
            let to_min = point[axis] - self.min[axis];
            if to_min < best_distance {
                best_distance = to_min;
                best_axis = axis;
                best_value = self.min[axis];
            }
            let to_max = self.max[axis] - point[axis];
            if to_max < best_distance {
                best_distance = to_max;
                best_axis = axis;
                best_value = self.max[axis];
            }
        }

        surface[best_axis] = best_value;
        surface
    }

    /// Minimally expand this AABB so that it includes the given point
    pub fn expand_to_include(&mut self, point: Vec3) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    /// Cut this AABB exactly in half along its longest axis
    ///
    /// The cut plane is orthogonal to the longest dimension, so the two
    /// halves are as close to cubical as possible. The halves are disjoint
    /// except on the shared boundary plane and their union is the whole box.
    pub fn split(&self) -> (Aabb, Aabb) {
        let size = self.dimensions();
        let axis = if size.x >= size.y && size.x >= size.z {
            0
        } else if size.y >= size.z {
            1
        } else {
            2
        };

        let middle = (self.min[axis] + self.max[axis]) * 0.5;

        let mut first = *self;
        first.max[axis] = middle;
        let mut second = *self;
        second.min[axis] = middle;

        (first, second)
    }

    /// Get the eight corner points of this AABB
    pub fn corners(&self) -> [Vec3; 8] {
        [
            Vec3::new(self.min.x, self.min.y, self.min.z),
            Vec3::new(self.max.x, self.min.y, self.min.z),
            Vec3::new(self.min.x, self.max.y, self.min.z),
            Vec3::new(self.max.x, self.max.y, self.min.z),
            Vec3::new(self.min.x, self.min.y, self.max.z),
            Vec3::new(self.max.x, self.min.y, self.max.z),
            Vec3::new(self.min.x, self.max.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.max.z),
        ]
    }

    /// Test ray intersection with this AABB using the slab method
    ///
    /// Returns the distance to the entry point if the ray intersects, None
    /// otherwise. Returns 0.0 if the ray originates inside the box.
    pub fn intersect_ray(&self, ray_origin: Vec3, ray_dir: Vec3) -> Option<f32> {
        let inv_dir = Vec3::new(
            if ray_dir.x != 0.0 { 1.0 / ray_dir.x } else { f32::INFINITY },
            if ray_dir.y != 0.0 { 1.0 / ray_dir.y } else { f32::INFINITY },
            if ray_dir.z != 0.0 { 1.0 / ray_dir.z } else { f32::INFINITY },
        );

        let t1 = (self.min.x - ray_origin.x) * inv_dir.x;
        let t2 = (self.max.x - ray_origin.x) * inv_dir.x;
        let t3 = (self.min.y - ray_origin.y) * inv_dir.y;
        let t4 = (self.max.y - ray_origin.y) * inv_dir.y;
        let t5 = (self.min.z - ray_origin.z) * inv_dir.z;
        let t6 = (self.max.z - ray_origin.z) * inv_dir.z;

        let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
        let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

        // Ray intersects if tmax >= tmin and tmax >= 0
        if tmax >= tmin && tmax >= 0.0 {
            // Return entry point distance (or 0 if we're inside the box)
            Some(tmin.max(0.0))
        } else {
            None
        }
    }
}
