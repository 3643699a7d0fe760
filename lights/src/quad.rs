//! Quad Area Light Source

use crate::plane::*;
use pbrt_core::base::*;
use pbrt_core::geometry::*;
use shapes::*;

/// A rectangular area light with uniform radiance.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct QuadLight {
    /// Center of the quad.
    pub center: Point3f,

    /// Half extent along the width.
    pub half_u: Vector3f,

    /// Half extent along the height.
    pub half_v: Vector3f,

    /// Emitted radiance.
    pub radiance: Float,

    /// Indicates whether light source 2-sided.
    pub two_sided: bool,

    /// Plane of the quad; its normal `half_u × half_v` is the emitting side.
    pub plane: Plane,
}

impl QuadLight {
    /// Returns a new `QuadLight`.
    ///
    /// * `center`    - Center of the quad.
    /// * `half_u`    - Half extent along the width.
    /// * `half_v`    - Half extent along the height; perpendicular to `half_u`.
    /// * `radiance`  - Emitted radiance.
    /// * `two_sided` - Indicates whether light source 2-sided.
    pub fn new(
        center: Point3f,
        half_u: Vector3f,
        half_v: Vector3f,
        radiance: Float,
        two_sided: bool,
    ) -> Result<Self, String> {
        let n = half_u.cross(&half_v);
        if n.length() < DEGENERATE_EPSILON {
            return Err(format!("Degenerate quad light with axes {} and {}.", half_u, half_v));
        }
        let cos = half_u.dot(&half_v) / (half_u.length() * half_v.length());
        if abs(cos) > 1.0e-3 {
            return Err(format!("Quad light axes {} and {} are not perpendicular.", half_u, half_v));
        }
        if !radiance.is_finite() || radiance < 0.0 {
            return Err(format!("Invalid quad light radiance {}.", radiance));
        }
        Ok(Self {
            center,
            half_u,
            half_v,
            radiance,
            two_sided,
            plane: Plane::from_point_normal(&center, &n.normalize()),
        })
    }

    /// Returns the unit normal of the emitting side.
    pub fn normal(&self) -> Vector3f {
        self.plane.normal
    }

    /// Returns the corners ordered counter-clockwise when seen from the
    /// emitting side looking back through the quad, which is the order the
    /// polygon integrators expect.
    pub fn corners(&self) -> [Point3f; 4] {
        let (c, u, v) = (self.center, self.half_u, self.half_v);
        [c + u + v, c + u - v, c - u - v, c - u + v]
    }

    /// Returns the quad as a world space `Rectangle`.
    pub fn rectangle(&self) -> Rectangle {
        Rectangle::new(&self.center, &self.half_u, &self.half_v)
    }

    /// Returns the area.
    pub fn area(&self) -> Float {
        4.0 * self.half_u.length() * self.half_v.length()
    }

    /// Returns whether `p` can receive light from the quad.
    ///
    /// * `p` - The shading point.
    pub fn illuminates(&self, p: &Point3f) -> bool {
        let distance = self.plane.signed_distance(p);
        if self.two_sided {
            distance != 0.0
        } else {
            distance > 0.0
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pbrt_core::spherical::*;
    use float_cmp::*;

    fn ceiling_light(two_sided: bool) -> QuadLight {
        QuadLight::new(
            Point3f::new(0.0, 0.0, 1.0),
            Vector3f::new(0.0, 0.5, 0.0),
            Vector3f::new(0.5, 0.0, 0.0),
            2.0,
            two_sided,
        )
        .unwrap()
    }

    #[test]
    fn normal_faces_emitting_side() {
        let light = ceiling_light(false);
        assert!(light.normal() == -Vector3f::Z_AXIS);
        assert!(light.illuminates(&Point3f::ORIGIN));
        assert!(!light.illuminates(&Point3f::new(0.0, 0.0, 2.0)));
        assert!(!light.illuminates(&Point3f::new(3.0, 0.0, 1.0)));
        assert!(ceiling_light(true).illuminates(&Point3f::new(0.0, 0.0, 2.0)));
        assert!(approx_eq!(Float, light.area(), 1.0));
    }

    #[test]
    fn corners_wind_around_the_lit_side() {
        let light = ceiling_light(false);
        let corners = light.corners();
        let a = corners[1] - corners[0];
        let b = corners[2] - corners[1];
        assert!(a.cross(&b).dot(&light.normal()) < 0.0);

        // Seen from the lit side the polygon keeps its winding.
        let dirs: Vec<Vector3f> = corners.iter().map(|c| Vector3f::from(*c).normalize()).collect();
        assert!(triple_product(&dirs[0], &dirs[1], &dirs[2]) > 0.0);
        let expected = 4.0 * (0.2 as Float).asin();
        assert!(approx_eq!(Float, SphericalPolygon::new(dirs).solid_angle(), expected, epsilon = 1e-5));
    }

    #[test]
    fn rejects_bad_lights() {
        let c = Point3f::ORIGIN;
        assert!(QuadLight::new(c, Vector3f::new(1.0, 0.0, 0.0), Vector3f::new(2.0, 0.0, 0.0), 1.0, false).is_err());
        assert!(QuadLight::new(c, Vector3f::new(1.0, 0.0, 0.0), Vector3f::new(1.0, 1.0, 0.0), 1.0, false).is_err());
        assert!(QuadLight::new(c, Vector3f::new(1.0, 0.0, 0.0), Vector3f::new(0.0, 1.0, 0.0), -1.0, false).is_err());
    }
}
