//! Common

use pbrt_core::base::*;
use pbrt_core::geometry::*;
use pbrt_core::sh::*;

/// Accumulates weighted integrand samples into a caller supplied SH
/// coefficient buffer while tracking the scalar integral estimate.
pub struct ShAccumulator<'a> {
    /// The SH basis evaluator.
    basis: &'a dyn ShBasis,

    /// Number of SH bands.
    bands: usize,

    /// Coefficients that are added to.
    coeffs: &'a mut [Float],

    /// Scratch space for basis values.
    y: Vec<Float>,

    /// Running sum of the weighted integrand values.
    total: Float,
}

impl<'a> ShAccumulator<'a> {
    /// Create a new `ShAccumulator`.
    ///
    /// * `basis`  - The SH basis evaluator.
    /// * `bands`  - Number of SH bands.
    /// * `coeffs` - Coefficients to add to; at least `bands²` long.
    pub fn new(basis: &'a dyn ShBasis, bands: usize, coeffs: &'a mut [Float]) -> Self {
        debug_assert!(coeffs.len() >= sh_terms(bands));
        Self {
            basis,
            bands,
            coeffs,
            y: vec![0.0; sh_terms(bands)],
            total: 0.0,
        }
    }

    /// Adds `value · Y(d)` to the coefficients.
    ///
    /// * `d`     - Unit direction of the sample.
    /// * `value` - Integrand value already multiplied by its estimator weight.
    pub fn add(&mut self, d: &Vector3f, value: Float) {
        if value == 0.0 || !value.is_finite() {
            return;
        }
        self.basis.evaluate_into(self.bands, d, &mut self.y);
        for (c, y) in self.coeffs.iter_mut().zip(self.y.iter()) {
            *c += value * y;
        }
        self.total += value;
    }

    /// Returns the scalar integral estimate accumulated so far.
    pub fn total(&self) -> Float {
        self.total
    }
}

/// Returns the unit direction from `origin` to `p` and the squared distance,
/// or `None` when they coincide.
///
/// * `origin` - The shading point.
/// * `p`      - The sampled point.
pub fn direction_and_distance2(origin: &Point3f, p: &Point3f) -> Option<(Vector3f, Float)> {
    let v = *p - *origin;
    let r2 = v.length_squared();
    if r2 < DEGENERATE_EPSILON * DEGENERATE_EPSILON {
        None
    } else {
        Some((v / r2.sqrt(), r2))
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
    fn accumulates_weighted_basis_values() {
        let basis = RealSphericalHarmonics::new();
        let mut coeffs = vec![0.0; 4];
        let mut acc = ShAccumulator::new(&basis, 2, &mut coeffs);
        acc.add(&Vector3f::Z_AXIS, 2.0);
        acc.add(&Vector3f::Z_AXIS, Float::NAN);
        assert!(approx_eq!(Float, acc.total(), 2.0));

        let y = basis.evaluate(2, &Vector3f::Z_AXIS);
        for (c, y) in coeffs.iter().zip(y.iter()) {
            assert!(approx_eq!(Float, *c, 2.0 * y));
        }
    }

    #[test]
    fn coincident_points_have_no_direction() {
        let p = Point3f::new(1.0, 2.0, 3.0);
        assert!(direction_and_distance2(&p, &p).is_none());
        let (d, r2) = direction_and_distance2(&Point3f::ORIGIN, &Point3f::new(0.0, 0.0, 2.0)).unwrap();
        assert!(d == Vector3f::Z_AXIS);
        assert!(approx_eq!(Float, r2, 4.0));
    }
}
