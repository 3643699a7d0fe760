//! Real spherical harmonics basis.

use crate::base::*;
use crate::geometry::*;
use std::sync::Arc;

/// Returns the number of coefficients for a given number of bands.
///
/// * `bands` - Number of SH bands.
#[inline]
pub fn sh_terms(bands: usize) -> usize {
    bands * bands
}

/// Returns the flat coefficient index for band `l` and order `m` where
/// `-l <= m <= l`.
///
/// * `l` - Band.
/// * `m` - Order.
#[inline]
pub fn sh_index(l: usize, m: i32) -> usize {
    (l as i32 * (l as i32 + 1) + m) as usize
}

/// Interface to a spherical harmonics basis evaluator.
pub trait ShBasis {
    /// Evaluates all `bands²` basis functions in the given unit direction and
    /// writes them to `out`.
    ///
    /// * `bands` - Number of SH bands.
    /// * `w`     - Unit direction.
    /// * `out`   - Output slice with at least `bands²` elements.
    fn evaluate_into(&self, bands: usize, w: &Vector3f, out: &mut [Float]);

    /// Evaluates all `bands²` basis functions in the given unit direction.
    ///
    /// * `bands` - Number of SH bands.
    /// * `w`     - Unit direction.
    fn evaluate(&self, bands: usize, w: &Vector3f) -> Vec<Float> {
        let mut out = vec![0.0; sh_terms(bands)];
        self.evaluate_into(bands, w, &mut out);
        out
    }
}

/// Atomic reference counted `ShBasis`.
pub type ArcShBasis = Arc<dyn ShBasis + Send + Sync>;

/// Orthonormal real spherical harmonics, including the Condon-Shortley phase,
/// evaluated in closed form for any band count.
#[derive(Copy, Clone, Debug, Default)]
pub struct RealSphericalHarmonics;

impl RealSphericalHarmonics {
    /// Returns a new `RealSphericalHarmonics`.
    pub fn new() -> Self {
        Self
    }
}

/// Associated Legendre polynomial P_l^m(x) for `0 <= m <= l`.
///
/// * `l` - Band.
/// * `m` - Order.
/// * `x` - Argument in [-1, 1].
pub fn associated_legendre(l: usize, m: usize, x: f64) -> f64 {
    let mut pmm = 1.0;
    if m > 0 {
        let somx2 = ((1.0 - x) * (1.0 + x)).max(0.0).sqrt();
        let mut fact = 1.0;
        for _ in 1..=m {
            pmm *= -fact * somx2;
            fact += 2.0;
        }
    }
    if l == m {
        return pmm;
    }

    let mut pmmp1 = x * (2 * m + 1) as f64 * pmm;
    if l == m + 1 {
        return pmmp1;
    }

    let mut pll = 0.0;
    for ll in (m + 2)..=l {
        pll = ((2 * ll - 1) as f64 * x * pmmp1 - (ll + m - 1) as f64 * pmm) / (ll - m) as f64;
        pmm = pmmp1;
        pmmp1 = pll;
    }
    pll
}

/// Normalization constant K_l^m for the real basis.
///
/// * `l` - Band.
/// * `m` - Absolute order.
fn normalization(l: usize, m: usize) -> f64 {
    // (l - m)! / (l + m)! as a running product to stay in range.
    let ratio = ((l - m + 1)..=(l + m)).fold(1.0, |acc, k| acc / k as f64);
    ((2 * l + 1) as f64 * ratio / (4.0 * std::f64::consts::PI)).sqrt()
}

impl ShBasis for RealSphericalHarmonics {
    /// Evaluates all `bands²` basis functions in the given unit direction.
    ///
    /// * `bands` - Number of SH bands.
    /// * `w`     - Unit direction.
    /// * `out`   - Output slice with at least `bands²` elements.
    fn evaluate_into(&self, bands: usize, w: &Vector3f, out: &mut [Float]) {
        debug_assert!(out.len() >= sh_terms(bands));

        let cos_theta = (w.z as f64).clamp(-1.0, 1.0);
        let phi = (w.y as f64).atan2(w.x as f64);
        let sqrt2 = std::f64::consts::SQRT_2;

        for l in 0..bands {
            out[sh_index(l, 0)] = (normalization(l, 0) * associated_legendre(l, 0, cos_theta)) as Float;
            for m in 1..=l {
                let k = sqrt2 * normalization(l, m) * associated_legendre(l, m, cos_theta);
                let mphi = m as f64 * phi;
                out[sh_index(l, m as i32)] = (k * mphi.cos()) as Float;
                out[sh_index(l, -(m as i32))] = (k * mphi.sin()) as Float;
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
