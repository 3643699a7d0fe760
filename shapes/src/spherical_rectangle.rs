//! Spherical Rectangles
//!
//! Solid angle sampling of rectangles following Ureña, Fajardo and King,
//! "An Area-Preserving Parametrization for Spherical Rectangles" (2013).

use pbrt_core::base::*;
use pbrt_core::geometry::*;
use pbrt_core::rng::*;
use pbrt_core::sh::*;

use crate::common::*;

/// A rectangle seen from a shading point, parameterized so that uniform
/// samples in the unit square map to uniform directions in its solid angle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SphericalRectangle {
    /// The shading point.
    pub origin: Point3f,

    /// Local frame; `z` points from the rectangle plane away from `origin`.
    x: Vector3f,
    y: Vector3f,
    z: Vector3f,

    /// Rectangle extents in the local frame.
    z0: Float,
    x0: Float,
    y0: Float,
    x1: Float,
    y1: Float,

    /// Constants of the parameterization.
    b0: Float,
    b1: Float,
    k: Float,

    /// Solid angle.
    s: Float,
}

impl SphericalRectangle {
    /// Create a new `SphericalRectangle`. Returns `None` when the shading point
    /// lies in the plane of the rectangle or the rectangle is degenerate.
    ///
    /// * `origin` - The shading point.
    /// * `corner` - One corner of the rectangle.
    /// * `ex`     - Edge from `corner` along the width.
    /// * `ey`     - Edge from `corner` along the height; perpendicular to `ex`.
    pub fn new(origin: &Point3f, corner: &Point3f, ex: &Vector3f, ey: &Vector3f) -> Option<Self> {
        let exl = ex.length();
        let eyl = ey.length();
        if exl < DEGENERATE_EPSILON || eyl < DEGENERATE_EPSILON {
            return None;
        }

        let x = *ex / exl;
        let y = *ey / eyl;
        let mut z = x.cross(&y);

        let d = *corner - *origin;
        let mut z0 = d.dot(&z);
        if z0 > 0.0 {
            z = -z;
            z0 = -z0;
        }
        if abs(z0) < DEGENERATE_EPSILON {
            return None;
        }

        let x0 = d.dot(&x);
        let y0 = d.dot(&y);
        let x1 = x0 + exl;
        let y1 = y0 + eyl;

        // Normals of the planes through origin and each edge.
        let n0 = Vector3f::new(0.0, z0, -y0) / (z0 * z0 + y0 * y0).sqrt();
        let n1 = Vector3f::new(-z0, 0.0, x1) / (z0 * z0 + x1 * x1).sqrt();
        let n2 = Vector3f::new(0.0, -z0, y1) / (z0 * z0 + y1 * y1).sqrt();
        let n3 = Vector3f::new(z0, 0.0, -x0) / (z0 * z0 + x0 * x0).sqrt();

        // Internal angles.
        let g0 = safe_acos(-n0.dot(&n1));
        let g1 = safe_acos(-n1.dot(&n2));
        let g2 = safe_acos(-n2.dot(&n3));
        let g3 = safe_acos(-n3.dot(&n0));

        let k = TWO_PI - g2 - g3;
        let s = g0 + g1 - k;

        Some(Self {
            origin: *origin,
            x,
            y,
            z,
            z0,
            x0,
            y0,
            x1,
            y1,
            b0: n0.z,
            b1: n2.z,
            k,
            s: max(0.0, s),
        })
    }

    /// Returns the solid angle.
    pub fn solid_angle(&self) -> Float {
        self.s
    }

    /// Maps a point in the unit square to a point on the rectangle whose
    /// direction is uniformly distributed in the solid angle.
    ///
    /// * `u1` - The first uniform random value.
    /// * `u2` - The second uniform random value.
    pub fn sample_point(&self, u1: Float, u2: Float) -> Point3f {
        // Compute cu.
        let au = u1 * self.s + self.k;
        let fu = (cos(au) * self.b0 - self.b1) / sin(au);
        let cu = clamp(sign(fu) / (fu * fu + self.b0 * self.b0).sqrt(), -1.0, 1.0);

        // Compute xu.
        let xu = -(cu * self.z0) / max(safe_sqrt(1.0 - cu * cu), DEGENERATE_EPSILON);
        let xu = clamp(xu, self.x0, self.x1);

        // Compute yv.
        let d = (xu * xu + self.z0 * self.z0).sqrt();
        let h0 = self.y0 / (d * d + self.y0 * self.y0).sqrt();
        let h1 = self.y1 / (d * d + self.y1 * self.y1).sqrt();
        let hv = h0 + u2 * (h1 - h0);
        let hv2 = hv * hv;
        let yv = if hv2 < 1.0 - DEGENERATE_EPSILON {
            hv * d / (1.0 - hv2).sqrt()
        } else {
            self.y1
        };

        self.origin + self.x * xu + self.y * yv + self.z * self.z0
    }

    /// Samples a direction uniformly within the solid angle. Returns the
    /// direction and its density `1 / Ω`.
    ///
    /// * `u1` - The first uniform random value.
    /// * `u2` - The second uniform random value.
    pub fn sample_dir(&self, u1: Float, u2: Float) -> Option<(Vector3f, Float)> {
        if self.s <= 0.0 {
            return None;
        }
        let p = self.sample_point(u1, u2);
        direction_and_distance2(&self.origin, &p).map(|(d, _)| (d, 1.0 / self.s))
    }

    /// Monte Carlo estimate from directions uniformly distributed in the
    /// solid angle.
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
        if n_samples == 0 || self.s <= 0.0 {
            return 0.0;
        }
        let mut acc = ShAccumulator::new(basis, bands, coeffs);
        for _ in 0..n_samples {
            let u = rng.uniform_point2();
            if let Some((d, pdf)) = self.sample_dir(u[0], u[1]) {
                acc.add(&d, f(&d) / (pdf * n_samples as Float));
            }
        }
        acc.total()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
