//! Trowbridge-Reitz Distribution

use crate::base::*;
use crate::geometry::*;

/// Smallest alpha allowed; smaller values make the lobe a numerical spike.
const MIN_ALPHA: Float = 1.0e-3;

/// Implements the isotropic Trowbridge-Reitz (GGX) distribution measured
/// around an arbitrary surface normal. Fresnel reflectance is taken as 1.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TrowbridgeReitz {
    /// Width of the lobe; α = sqrt(2) * σ where σ is the RMS slope of
    /// microfacets.
    alpha: Float,
}

impl TrowbridgeReitz {
    /// Create a new `TrowbridgeReitz`.
    ///
    /// * `alpha` - Width of the lobe.
    pub fn new(alpha: Float) -> Self {
        Self {
            alpha: max(MIN_ALPHA, alpha),
        }
    }

    /// Create a new `TrowbridgeReitz` from a perceptual roughness in [0, 1]
    /// using `α = r²`.
    ///
    /// * `roughness` - Roughness parameter value.
    pub fn from_roughness(roughness: Float) -> Self {
        let r = clamp(roughness, 0.0, 1.0);
        Self::new(r * r)
    }

    /// Returns the lobe width.
    pub fn alpha(&self) -> Float {
        self.alpha
    }

    /// Return the differential area of microfacets oriented with `wh`.
    ///
    /// * `n`  - Surface normal.
    /// * `wh` - Microfacet normal.
    pub fn d(&self, n: &Vector3f, wh: &Vector3f) -> Float {
        let cos_theta = n.dot(wh);
        if cos_theta <= 0.0 {
            return 0.0;
        }
        let cos2_theta = cos_theta * cos_theta;
        let tan2_theta = max(0.0, 1.0 - cos2_theta) / cos2_theta;
        let alpha2 = self.alpha * self.alpha;
        let e = 1.0 + tan2_theta / alpha2;
        1.0 / (PI * alpha2 * cos2_theta * cos2_theta * e * e)
    }

    /// Returns the invisible masked microfacet area per visible microfacet area.
    ///
    /// * `n` - Surface normal.
    /// * `w` - Direction.
    pub fn lambda(&self, n: &Vector3f, w: &Vector3f) -> Float {
        let cos_theta = n.abs_dot(w);
        if cos_theta < DEGENERATE_EPSILON {
            return INFINITY;
        }
        let cos2_theta = cos_theta * cos_theta;
        let alpha2_tan2_theta = self.alpha * self.alpha * max(0.0, 1.0 - cos2_theta) / cos2_theta;
        (-1.0 + (1.0 + alpha2_tan2_theta).sqrt()) / 2.0
    }

    /// Returns the fraction of microfacets visible from both `wo` and `wi`.
    ///
    /// * `n`  - Surface normal.
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn g(&self, n: &Vector3f, wo: &Vector3f, wi: &Vector3f) -> Float {
        1.0 / (1.0 + self.lambda(n, wo) + self.lambda(n, wi))
    }

    /// Evaluates the reflection lobe `D G / (4 cosθo cosθi)`. Directions
    /// below the surface give zero.
    ///
    /// * `n`  - Surface normal.
    /// * `wo` - Outgoing (view) direction.
    /// * `wi` - Incident (light) direction.
    pub fn f(&self, n: &Vector3f, wo: &Vector3f, wi: &Vector3f) -> Float {
        let cos_theta_o = n.dot(wo);
        let cos_theta_i = n.dot(wi);
        if cos_theta_o <= 0.0 || cos_theta_i <= 0.0 {
            return 0.0;
        }
        let wh = *wo + *wi;
        if wh.length_squared() == 0.0 {
            return 0.0;
        }
        let wh = wh.normalize();
        self.d(n, &wh) * self.g(n, wo, wi) / (4.0 * cos_theta_o * cos_theta_i)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RNG;
    use crate::sampling::*;
    use float_cmp::*;
    use proptest::prelude::*;

    #[test]
    fn roughness_maps_to_squared_alpha() {
        assert!(approx_eq!(Float, TrowbridgeReitz::from_roughness(0.5).alpha(), 0.25));
        assert!(approx_eq!(Float, TrowbridgeReitz::from_roughness(0.0).alpha(), MIN_ALPHA));
        assert!(approx_eq!(Float, TrowbridgeReitz::from_roughness(2.0).alpha(), 1.0));
    }

    #[test]
    fn projected_microfacet_area_is_one() {
        // ∫ D(h) (n·h) dω = 1
        let distrib = TrowbridgeReitz::new(0.6);
        let n = Vector3f::Z_AXIS;
        let mut rng = RNG::new(3);
        let samples = 200_000;
        let mut sum = 0.0;
        for _ in 0..samples {
            let wh = uniform_sample_sphere(&rng.uniform_point2());
            sum += distrib.d(&n, &wh) * max(0.0, n.dot(&wh)) / uniform_sphere_pdf();
        }
        let estimate = sum / samples as Float;
        assert!(abs(estimate - 1.0) < 0.02, "estimate = {}", estimate);
    }

    #[test]
    fn zero_below_surface() {
        let distrib = TrowbridgeReitz::new(0.3);
        let n = Vector3f::Z_AXIS;
        let wo = Vector3f::new(0.0, 0.6, 0.8);
        let wi = Vector3f::new(0.0, 0.6, -0.8);
        assert_eq!(distrib.f(&n, &wo, &wi), 0.0);
        assert_eq!(distrib.d(&n, &-n), 0.0);
    }

    #[test]
    fn lambda_vanishes_at_normal_incidence() {
        let distrib = TrowbridgeReitz::new(0.5);
        assert!(approx_eq!(Float, distrib.lambda(&Vector3f::Z_AXIS, &Vector3f::Z_AXIS), 0.0));
        assert!(approx_eq!(Float, distrib.g(&Vector3f::Z_AXIS, &Vector3f::Z_AXIS, &Vector3f::Z_AXIS), 1.0));
    }

    prop_unit_vector3!(unit_vector3);

    proptest! {
        #[test]
        fn f_is_reciprocal(
            wo in unit_vector3(),
            wi in unit_vector3(),
            r in 0.05..1.0f32,
        ) {
            let distrib = TrowbridgeReitz::from_roughness(r);
            let n = Vector3f::Z_AXIS;
            let a = distrib.f(&n, &wo, &wi);
            let b = distrib.f(&n, &wi, &wo);
            prop_assert!(approx_eq!(Float, a, b, epsilon = 1e-3 * max(1.0, a)));
            prop_assert!(a >= 0.0);
        }
    }
}
