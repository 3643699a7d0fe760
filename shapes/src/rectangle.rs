//! Rectangles

use crate::common::*;
use pbrt_core::base::*;
use pbrt_core::geometry::*;
use pbrt_core::rng::*;
use pbrt_core::sampling::*;
use pbrt_core::sh::*;
use pbrt_core::spherical::*;

/// A world space rectangle given by its center and two perpendicular half
/// extent axes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rectangle {
    /// Center of the rectangle.
    pub center: Point3f,

    /// Unit axis along the width.
    pub ex: Vector3f,

    /// Unit axis along the height.
    pub ey: Vector3f,

    /// Half of the width.
    pub half_width: Float,

    /// Half of the height.
    pub half_height: Float,

    /// Unit normal `ex × ey`.
    pub normal: Vector3f,
}

impl Rectangle {
    /// Create a new `Rectangle` from its center and half extent vectors.
    ///
    /// * `center` - Center of the rectangle.
    /// * `half_u` - Half extent along the width.
    /// * `half_v` - Half extent along the height.
    pub fn new(center: &Point3f, half_u: &Vector3f, half_v: &Vector3f) -> Self {
        let half_width = half_u.length();
        let half_height = half_v.length();
        let ex = if half_width > 0.0 { *half_u / half_width } else { Vector3f::ZERO };
        let ey = if half_height > 0.0 { *half_v / half_height } else { Vector3f::ZERO };
        Self {
            center: *center,
            ex,
            ey,
            half_width,
            half_height,
            normal: ex.cross(&ey),
        }
    }

    /// Create a new `Rectangle` from 4 corners in order.
    ///
    /// * `corners` - The corners.
    pub fn from_corners(corners: &[Point3f; 4]) -> Self {
        let center = Point3f::centroid(corners);
        let half_u = (corners[1] - corners[0]) * 0.5;
        let half_v = (corners[3] - corners[0]) * 0.5;
        Self::new(&center, &half_u, &half_v)
    }

    /// Returns the 4 corners in counter-clockwise order around `normal`.
    pub fn corners(&self) -> [Point3f; 4] {
        let u = self.ex * self.half_width;
        let v = self.ey * self.half_height;
        [
            self.center - u - v,
            self.center + u - v,
            self.center + u + v,
            self.center - u + v,
        ]
    }

    /// Returns the area.
    pub fn area(&self) -> Float {
        4.0 * self.half_width * self.half_height
    }

    /// Returns the solid angle subtended as seen from `origin`.
    ///
    /// * `origin` - The shading point.
    pub fn solid_angle(&self, origin: &Point3f) -> Float {
        SphericalPolygon::from_points(origin, &self.corners()).solid_angle()
    }

    /// Uniformly samples a point on the rectangle.
    ///
    /// * `u1` - The first uniform random value.
    /// * `u2` - The second uniform random value.
    pub fn sample_point(&self, u1: Float, u2: Float) -> Point3f {
        self.center
            + self.ex * ((2.0 * u1 - 1.0) * self.half_width)
            + self.ey * ((2.0 * u2 - 1.0) * self.half_height)
    }

    /// Samples a direction towards the rectangle from `origin`. Returns the
    /// direction and the geometric term `|cosθ| / r²`.
    ///
    /// * `origin` - The shading point.
    /// * `u1`     - The first uniform random value.
    /// * `u2`     - The second uniform random value.
    pub fn sample_dir(&self, origin: &Point3f, u1: Float, u2: Float) -> Option<(Vector3f, Float)> {
        let p = self.sample_point(u1, u2);
        direction_and_distance2(origin, &p).map(|(d, r2)| (d, self.normal.abs_dot(&d) / r2))
    }

    /// Estimates the projection from the 4 corners and the center, each
    /// weighted by a fifth of the solid angle.
    ///
    /// * `origin` - The shading point.
    /// * `f`      - The integrand.
    /// * `basis`  - The SH basis evaluator.
    /// * `bands`  - Number of SH bands.
    /// * `coeffs` - Coefficients to add to.
    pub fn integrate_structured<F>(
        &self,
        origin: &Point3f,
        f: F,
        basis: &dyn ShBasis,
        bands: usize,
        coeffs: &mut [Float],
    ) -> Float
    where
        F: Fn(&Vector3f) -> Float,
    {
        let weight = self.solid_angle(origin) / 5.0;
        let mut acc = ShAccumulator::new(basis, bands, coeffs);
        let corners = self.corners();
        for p in corners.iter().chain(std::iter::once(&self.center)) {
            if let Some((d, _)) = direction_and_distance2(origin, p) {
                acc.add(&d, f(&d) * weight);
            }
        }
        acc.total()
    }

    /// Returns the point of the rectangle closest to the ray from `origin`
    /// along `axis`. Rays that miss the plane fall back to the center.
    ///
    /// * `origin` - The shading point.
    /// * `axis`   - Unit lobe axis.
    pub fn representative_point(&self, origin: &Point3f, axis: &Vector3f) -> Point3f {
        let denom = self.normal.dot(axis);
        if abs(denom) < DEGENERATE_EPSILON {
            return self.center;
        }
        let t = self.normal.dot(&(self.center - *origin)) / denom;
        if t <= 0.0 {
            return self.center;
        }
        let local = (*origin + *axis * t) - self.center;
        let x = clamp(local.dot(&self.ex), -self.half_width, self.half_width);
        let y = clamp(local.dot(&self.ey), -self.half_height, self.half_height);
        self.center + self.ex * x + self.ey * y
    }

    /// Single sample estimate through the most representative point for a
    /// lobe around `axis`, weighted by the full solid angle.
    ///
    /// * `origin` - The shading point.
    /// * `axis`   - Unit lobe axis.
    /// * `f`      - The integrand.
    /// * `basis`  - The SH basis evaluator.
    /// * `bands`  - Number of SH bands.
    /// * `coeffs` - Coefficients to add to.
    pub fn integrate_mrp<F>(
        &self,
        origin: &Point3f,
        axis: &Vector3f,
        f: F,
        basis: &dyn ShBasis,
        bands: usize,
        coeffs: &mut [Float],
    ) -> Float
    where
        F: Fn(&Vector3f) -> Float,
    {
        let p = self.representative_point(origin, axis);
        let mut acc = ShAccumulator::new(basis, bands, coeffs);
        if let Some((d, _)) = direction_and_distance2(origin, &p) {
            acc.add(&d, f(&d) * self.solid_angle(origin));
        }
        acc.total()
    }

    /// Deterministic angular stratification. The rectangle is split into
    /// `√N x √N` strata that subtend equal angles along each axis as seen
    /// from `origin` and each stratum is sampled at its center.
    ///
    /// * `origin`    - The shading point.
    /// * `n_samples` - Number of samples; rounded down to a square.
    /// * `f`         - The integrand.
    /// * `basis`     - The SH basis evaluator.
    /// * `bands`     - Number of SH bands.
    /// * `coeffs`    - Coefficients to add to.
    pub fn integrate_angular<F>(
        &self,
        origin: &Point3f,
        n_samples: usize,
        f: F,
        basis: &dyn ShBasis,
        bands: usize,
        coeffs: &mut [Float],
    ) -> Float
    where
        F: Fn(&Vector3f) -> Float,
    {
        let n = max((n_samples as Float).sqrt() as usize, 1);

        // Foot of the perpendicular from origin onto the plane.
        let to_center = self.center - *origin;
        let h = abs(self.normal.dot(&to_center));
        if h < DEGENERATE_EPSILON || self.area() <= 0.0 {
            return 0.0;
        }
        let x0 = to_center.dot(&self.ex);
        let y0 = to_center.dot(&self.ey);
        let (xa, xb) = (x0 - self.half_width, x0 + self.half_width);
        let (ya, yb) = (y0 - self.half_height, y0 + self.half_height);
        let foot = self.center - self.ex * x0 - self.ey * y0;

        let mut acc = ShAccumulator::new(basis, bands, coeffs);
        let weight = 1.0 / (n * n) as Float;
        for i in 0..n {
            let (x, pdf_x) = equi_angular_sample((i as Float + 0.5) / n as Float, xa, xb, h);
            let hy = (h * h + x * x).sqrt();
            for j in 0..n {
                let (y, pdf_y) = equi_angular_sample((j as Float + 0.5) / n as Float, ya, yb, hy);
                let p = foot + self.ex * x + self.ey * y;
                if let Some((d, r2)) = direction_and_distance2(origin, &p) {
                    let g = self.normal.abs_dot(&d) / r2;
                    acc.add(&d, f(&d) * g * weight / (pdf_x * pdf_y));
                }
            }
        }
        acc.total()
    }

    /// Unbiased Monte Carlo estimate from uniform area samples.
    ///
    /// * `origin`    - The shading point.
    /// * `n_samples` - Number of samples.
    /// * `rng`       - Random number generator.
    /// * `f`         - The integrand.
    /// * `basis`     - The SH basis evaluator.
    /// * `bands`     - Number of SH bands.
    /// * `coeffs`    - Coefficients to add to.
    #[allow(clippy::too_many_arguments)]
    pub fn integrate_random<F>(
        &self,
        origin: &Point3f,
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
            if let Some((d, g)) = self.sample_dir(origin, u[0], u[1]) {
                acc.add(&d, f(&d) * g * weight);
            }
        }
        acc.total()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
