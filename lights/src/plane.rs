//! Planes

use pbrt_core::base::*;
use pbrt_core::geometry::*;

/// A plane `n·p + d = 0` with unit normal `n`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Plane {
    /// Unit normal.
    pub normal: Vector3f,

    /// Offset.
    pub d: Float,
}

impl Plane {
    /// Create a new plane through a point.
    ///
    /// * `p`      - A point on the plane.
    /// * `normal` - Unit normal.
    pub fn from_point_normal(p: &Point3f, normal: &Vector3f) -> Self {
        Self {
            normal: *normal,
            d: -normal.dot(&Vector3f::from(*p)),
        }
    }

    /// Returns the signed distance of `p`; positive on the side `normal`
    /// points to.
    ///
    /// * `p` - The point.
    pub fn signed_distance(&self, p: &Point3f) -> Float {
        self.normal.dot(&Vector3f::from(*p)) + self.d
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn signed_distance() {
        let plane = Plane::from_point_normal(&Point3f::new(0.0, 0.0, 2.0), &-Vector3f::Z_AXIS);
        assert!(approx_eq!(Float, plane.signed_distance(&Point3f::ORIGIN), 2.0));
        assert!(approx_eq!(Float, plane.signed_distance(&Point3f::new(5.0, 1.0, 3.0)), -1.0));
        assert!(approx_eq!(Float, plane.signed_distance(&Point3f::new(5.0, 1.0, 2.0)), 0.0));
    }
}
