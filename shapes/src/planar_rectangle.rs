//! Planar Rectangles

use crate::common::*;
use crate::triangle::*;
use pbrt_core::base::*;
use pbrt_core::geometry::*;
use pbrt_core::rng::*;
use pbrt_core::sh::*;
use pbrt_core::spherical::*;

/// A light quad centrally projected from the shading point onto a plane
/// facing the shading point. The projection subtends the same solid angle as
/// the quad; the choice of plane only changes how evenly area samples spread
/// over that solid angle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlanarRectangle {
    /// The shading point.
    pub origin: Point3f,

    /// Unit normal of the projection plane pointing away from `origin`.
    pub normal: Vector3f,

    /// Distance of the projection plane from `origin`.
    pub distance: Float,

    /// Projected corners.
    pub corners: [Point3f; 4],

    /// The projected quad split into two world space triangles.
    triangles: [Triangle; 2],
}

impl PlanarRectangle {
    /// Projects onto the plane through the quad's barycenter perpendicular to
    /// the direction from `origin` to the barycenter. Returns `None` when a
    /// corner cannot be projected.
    ///
    /// * `origin`  - The shading point.
    /// * `corners` - Light quad corners.
    pub fn init_bary(origin: &Point3f, corners: &[Point3f; 4]) -> Option<Self> {
        let center = Point3f::centroid(corners);
        let (w, r2) = direction_and_distance2(origin, &center)?;
        Self::project(origin, corners, &w, r2.sqrt())
    }

    /// Projects onto the plane tangent to the unit sphere at the normalized
    /// mean of the corner directions. Returns `None` when a corner cannot be
    /// projected.
    ///
    /// * `origin`  - The shading point.
    /// * `corners` - Light quad corners.
    pub fn init_unit(origin: &Point3f, corners: &[Point3f; 4]) -> Option<Self> {
        let mut sum = Vector3f::ZERO;
        for corner in corners.iter() {
            let (d, _) = direction_and_distance2(origin, corner)?;
            sum += d;
        }
        if sum.length_squared() < DEGENERATE_EPSILON {
            return None;
        }
        Self::project(origin, corners, &sum.normalize(), 1.0)
    }

    /// Centrally projects the corners onto the plane `w·(p - origin) = distance`.
    ///
    /// * `origin`   - The shading point.
    /// * `corners`  - Light quad corners.
    /// * `w`        - Unit plane normal.
    /// * `distance` - Plane distance from `origin`.
    fn project(origin: &Point3f, corners: &[Point3f; 4], w: &Vector3f, distance: Float) -> Option<Self> {
        let mut projected = [Point3f::ORIGIN; 4];
        for (p, corner) in projected.iter_mut().zip(corners.iter()) {
            let (d, _) = direction_and_distance2(origin, corner)?;
            let cos_theta = d.dot(w);
            if cos_theta < DEGENERATE_EPSILON {
                debug!("Quad corner {} is not in front of the projection plane", corner);
                return None;
            }
            *p = *origin + d * (distance / cos_theta);
        }

        Some(Self {
            origin: *origin,
            normal: *w,
            distance,
            corners: projected,
            triangles: [
                Triangle::world(&projected[0], &projected[1], &projected[2]),
                Triangle::world(&projected[0], &projected[2], &projected[3]),
            ],
        })
    }

    /// Returns the area of the projected quad.
    pub fn area(&self) -> Float {
        self.triangles[0].area() + self.triangles[1].area()
    }

    /// Returns the solid angle subtended as seen from the shading point.
    pub fn solid_angle(&self) -> Float {
        SphericalPolygon::from_points(&self.origin, &self.corners).solid_angle()
    }

    /// Uniformly samples a point on the projected quad.
    ///
    /// * `u1` - The first uniform random value.
    /// * `u2` - The second uniform random value.
    pub fn sample_point(&self, u1: Float, u2: Float) -> Point3f {
        let a0 = self.triangles[0].area();
        let a1 = self.triangles[1].area();
        let total = a0 + a1;
        if total <= 0.0 {
            return self.corners[0];
        }
        let s = u1 * total;
        if s < a0 {
            self.triangles[0].sample_point(min(s / a0, 1.0), u2)
        } else {
            self.triangles[1].sample_point(min((s - a0) / max(a1, DEGENERATE_EPSILON), 1.0), u2)
        }
    }

    /// Samples a direction towards the projected quad. Returns the direction
    /// and the geometric term `cosθ / r²`.
    ///
    /// * `u1` - The first uniform random value.
    /// * `u2` - The second uniform random value.
    pub fn sample_dir(&self, u1: Float, u2: Float) -> Option<(Vector3f, Float)> {
        let p = self.sample_point(u1, u2);
        direction_and_distance2(&self.origin, &p).map(|(d, r2)| (d, self.normal.abs_dot(&d) / r2))
    }

    /// Monte Carlo estimate from uniform area samples of the projected quad.
    ///
    /// * `n_samples` - Number of samples.
    /// * `rng`       - Random number generator.
    /// * `f`         - The integrand.
    /// * `basis`     - The SH basis evaluator.
    /// * `bands`     - Number of SH bands.
    /// * `coeffs`    - Coefficients to add to.
    pub fn integrate<F>(
        &self,
        n_samples: usize,
        rng: &mut RNG,
        f: F,
        basis: &dyn ShBasis,
        bands: usize,
        coeffs: &mut [Float],
    ) -> Float
    where
        F: Fn(&Vector3f) -> Float,
    {
        if n_samples == 0 {
            return 0.0;
        }
        let mut acc = ShAccumulator::new(basis, bands, coeffs);
        let weight = self.area() / n_samples as Float;
        for _ in 0..n_samples {
            let u = rng.uniform_point2();
            if let Some((d, g)) = self.sample_dir(u[0], u[1]) {
                acc.add(&d, f(&d) * g * weight);
            }
        }
        acc.total()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    fn tilted_quad() -> [Point3f; 4] {
        [
            Point3f::new(-0.6, -0.4, 1.0),
            Point3f::new(0.6, -0.4, 1.3),
            Point3f::new(0.6, 0.4, 1.3),
            Point3f::new(-0.6, 0.4, 1.0),
        ]
    }

    #[test]
    fn projection_preserves_solid_angle() {
        let corners = tilted_quad();
        let origin = Point3f::new(0.1, 0.2, 0.0);
        let expected = SphericalPolygon::from_points(&origin, &corners).solid_angle();
        for planar in [
            PlanarRectangle::init_bary(&origin, &corners).unwrap(),
            PlanarRectangle::init_unit(&origin, &corners).unwrap(),
        ] {
            assert!(approx_eq!(Float, planar.solid_angle(), expected, epsilon = 1e-4));
            for p in planar.corners.iter() {
                assert!(approx_eq!(Float, planar.normal.dot(&(*p - origin)), planar.distance, epsilon = 1e-4));
            }
        }
    }

    #[test]
    fn unit_plane_is_tangent_to_sphere() {
        let planar = PlanarRectangle::init_unit(&Point3f::ORIGIN, &tilted_quad()).unwrap();
        assert!(approx_eq!(Float, planar.distance, 1.0));
        assert!(approx_eq!(Float, planar.normal.length(), 1.0, epsilon = 1e-6));
    }

    #[test]
    fn integrates_solid_angle() {
        let corners = tilted_quad();
        let origin = Point3f::ORIGIN;
        let expected = SphericalPolygon::from_points(&origin, &corners).solid_angle();
        let basis = RealSphericalHarmonics::new();
        let mut rng = RNG::new(11);
        for planar in [
            PlanarRectangle::init_bary(&origin, &corners).unwrap(),
            PlanarRectangle::init_unit(&origin, &corners).unwrap(),
        ] {
            let mut c = vec![0.0; 4];
            let estimate = planar.integrate(20_000, &mut rng, |_| 1.0, &basis, 2, &mut c);
            assert!(abs(estimate - expected) < 0.01 * expected, "{} vs {}", estimate, expected);
        }
    }

    #[test]
    fn quads_behind_the_plane_are_rejected() {
        // Plane z = 0.5 + x with the barycenter straight above the origin.
        let corners = [
            Point3f::new(-2.0, -1.0, -1.5),
            Point3f::new(2.0, -1.0, 2.5),
            Point3f::new(2.0, 1.0, 2.5),
            Point3f::new(-2.0, 1.0, -1.5),
        ];
        assert!(PlanarRectangle::init_bary(&Point3f::ORIGIN, &corners).is_none());
        assert!(PlanarRectangle::init_unit(&corners[0], &corners).is_none());
    }
}
