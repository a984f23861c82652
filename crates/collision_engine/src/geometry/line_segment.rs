//! Line segment type

use crate::foundation::math::{Transform, Vec3};

/// A line segment between two points in 3D space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    /// First endpoint of the segment
    pub point_a: Vec3,
    /// Second endpoint of the segment
    pub point_b: Vec3,
}

impl LineSegment {
    /// Create a new line segment from two endpoints
    pub fn new(point_a: Vec3, point_b: Vec3) -> Self {
        Self { point_a, point_b }
    }

    /// Get the vector from the first endpoint to the second
    pub fn delta(&self) -> Vec3 {
        self.point_b - self.point_a
    }

    /// Get the length of the segment
    pub fn length(&self) -> f32 {
        self.delta().magnitude()
    }

    /// Linearly interpolate along the segment (t = 0 at the first endpoint)
    pub fn lerp(&self, t: f32) -> Vec3 {
        self.point_a + self.delta() * t
    }

    /// Get the point on this segment closest to the given point
    ///
    /// The projection parameter is clamped to the segment endpoints; a
    /// zero-length segment returns its single point.
    pub fn closest_point_to(&self, point: Vec3) -> Vec3 {
        let delta = self.delta();
        let length_squared = delta.magnitude_squared();
        if length_squared <= f32::EPSILON {
            return self.point_a;
        }

        let t = ((point - self.point_a).dot(&delta) / length_squared).clamp(0.0, 1.0);
        self.point_a + delta * t
    }

    /// Compute the shortest segment connecting two segments
    ///
    /// This is the skew-line closest approach, clamped to the segment
    /// endpoints (Ericson, Real-Time Collision Detection 5.1.9). The
    /// returned segment runs from a point on `segment_a` to a point on
    /// `segment_b`. Returns None if either input has non-finite endpoints.
    pub fn shortest_connector(segment_a: &LineSegment, segment_b: &LineSegment) -> Option<LineSegment> {
        let endpoints = [
            segment_a.point_a,
            segment_a.point_b,
            segment_b.point_a,
            segment_b.point_b,
        ];
        if !endpoints.iter().all(|p| p.iter().all(|c| c.is_finite())) {
            return None;
        }

        let d1 = segment_a.delta();
        let d2 = segment_b.delta();
        let r = segment_a.point_a - segment_b.point_a;
        let a = d1.magnitude_squared();
        let e = d2.magnitude_squared();
        let f = d2.dot(&r);

        let (s, t);
        if a <= f32::EPSILON && e <= f32::EPSILON {
            // Both segments degenerate to points.
            s = 0.0;
            t = 0.0;
        } else if a <= f32::EPSILON {
            s = 0.0;
            t = (f / e).clamp(0.0, 1.0);
        } else {
            let c = d1.dot(&r);
            if e <= f32::EPSILON {
                t = 0.0;
                s = (-c / a).clamp(0.0, 1.0);
            } else {
                let b = d1.dot(&d2);
                let denom = a * e - b * b;

                let mut s_val = if denom > f32::EPSILON {
                    ((b * f - c * e) / denom).clamp(0.0, 1.0)
                } else {
                    // Parallel segments: pick an arbitrary point on A.
                    0.0
                };

                let t_unclamped = (b * s_val + f) / e;
                let t_val = if t_unclamped < 0.0 {
                    s_val = (-c / a).clamp(0.0, 1.0);
                    0.0
                } else if t_unclamped > 1.0 {
                    s_val = ((b - c) / a).clamp(0.0, 1.0);
                    1.0
                } else {
                    t_unclamped
                };

                s = s_val;
                t = t_val;
            }
        }

        Some(LineSegment::new(
            segment_a.point_a + d1 * s,
            segment_b.point_a + d2 * t,
        ))
    }

    /// Apply a rigid transform to both endpoints
    pub fn transformed(&self, transform: &Transform) -> LineSegment {
        LineSegment {
            point_a: transform.transform_point(self.point_a),
            point_b: transform.transform_point(self.point_b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_closest_point_clamps_to_endpoints() {
        let segment = LineSegment::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(4.0, 0.0, 0.0));

        let mid = segment.closest_point_to(Vec3::new(2.0, 5.0, 0.0));
        assert_relative_eq!(mid.x, 2.0);
        assert_relative_eq!(mid.y, 0.0);

        let before = segment.closest_point_to(Vec3::new(-3.0, 1.0, 0.0));
        assert_relative_eq!(before.x, 0.0);

        let after = segment.closest_point_to(Vec3::new(9.0, 1.0, 0.0));
        assert_relative_eq!(after.x, 4.0);
    }

    #[test]
    fn test_shortest_connector_skew_segments() {
        // Two perpendicular segments separated along Z.
        let a = LineSegment::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        let b = LineSegment::new(Vec3::new(0.0, -1.0, 3.0), Vec3::new(0.0, 1.0, 3.0));

        let connector = LineSegment::shortest_connector(&a, &b).unwrap();
        assert_relative_eq!(connector.length(), 3.0, epsilon = 1e-5);
        assert_relative_eq!(connector.point_a.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(connector.point_b.z, 3.0, epsilon = 1e-5);
    }

    #[test]
    fn test_shortest_connector_clamped() {
        // Collinear but disjoint segments: the connector joins the two
        // nearest endpoints.
        let a = LineSegment::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        let b = LineSegment::new(Vec3::new(3.0, 0.0, 0.0), Vec3::new(5.0, 0.0, 0.0));

        let connector = LineSegment::shortest_connector(&a, &b).unwrap();
        assert_relative_eq!(connector.length(), 2.0, epsilon = 1e-5);
    }

    #[test]
    fn test_shortest_connector_degenerate_points() {
        let a = LineSegment::new(Vec3::new(1.0, 1.0, 1.0), Vec3::new(1.0, 1.0, 1.0));
        let b = LineSegment::new(Vec3::new(4.0, 1.0, 1.0), Vec3::new(4.0, 1.0, 1.0));

        let connector = LineSegment::shortest_connector(&a, &b).unwrap();
        assert_relative_eq!(connector.length(), 3.0, epsilon = 1e-5);
    }
}
