//! Common sampling functions.

use crate::base::*;
use crate::geometry::*;

/// Uniformly sample a direction from a sphere.
///
/// * `u` - The random sample point.
pub fn uniform_sample_sphere(u: &Point2f) -> Vector3f {
    let z = 1.0 - 2.0 * u[0];
    let r = safe_sqrt(1.0 - z * z);
    let phi = TWO_PI * u[1];
    Vector3f::new(r * cos(phi), r * sin(phi), z)
}

/// Returns the PDF for uniformly sampling a direction from a sphere.
#[inline]
pub fn uniform_sphere_pdf() -> Float {
    INV_FOUR_PI
}

/// Uniformly sample barycentric coordinates `(b0, b1)` on a triangle. The
/// third coordinate is `1 - b0 - b1`.
///
/// * `u` - The random sample point.
pub fn uniform_sample_triangle(u: &Point2f) -> Point2f {
    let su0 = u[0].sqrt();
    Point2f::new(1.0 - su0, su0 * (1.0 - u[1]))
}

/// Equi-angular sampling of a 1-D interval `[a, b]` on a line seen from a point
/// at distance `h` whose foot on the line sits at coordinate `0`. Returns the
/// sampled coordinate and its density with respect to length.
///
/// * `u` - The random sample value.
/// * `a` - Lower end of the interval relative to the foot point.
/// * `b` - Upper end of the interval relative to the foot point.
/// * `h` - Distance of the observer from the line.
pub fn equi_angular_sample(u: Float, a: Float, b: Float, h: Float) -> (Float, Float) {
    let h = max(h, DEGENERATE_EPSILON);
    let theta_a = atan(a / h);
    let theta_b = atan(b / h);
    let span = theta_b - theta_a;
    if abs(span) < DEGENERATE_EPSILON {
        return (0.5 * (a + b), 1.0 / max(b - a, DEGENERATE_EPSILON));
    }

    let t = h * tan(lerp(u, theta_a, theta_b));
    let pdf = h / (span * (h * h + t * t));
    (t, pdf)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    #[test]
    fn equi_angular_pdf_integrates_to_one() {
        let (a, b, h) = (-0.7, 1.3, 0.4);
        let n = 4000;
        let dx = (b - a) / n as Float;
        let total: Float = (0..n)
            .map(|i| {
                let x: Float = a + (i as Float + 0.5) * dx;
                let theta_a = atan(a / h);
                let theta_b = atan(b / h);
                h / ((theta_b - theta_a) * (h * h + x * x)) * dx
            })
            .sum();
        assert!(approx_eq!(Float, total, 1.0, epsilon = 1e-3));
    }

    proptest! {
        #[test]
        fn uniform_sample_sphere_is_unit(u0 in 0.0..1.0f32, u1 in 0.0..1.0f32) {
            let v = uniform_sample_sphere(&Point2f::new(u0, u1));
            prop_assert!(approx_eq!(Float, v.length(), 1.0, epsilon = 1e-5));
        }

        #[test]
        fn uniform_sample_triangle_is_barycentric(u0 in 0.0..1.0f32, u1 in 0.0..1.0f32) {
            let b = uniform_sample_triangle(&Point2f::new(u0, u1));
            prop_assert!(b.x >= 0.0 && b.y >= 0.0);
            prop_assert!(b.x + b.y <= 1.0 + 1e-6);
        }

        #[test]
        fn equi_angular_sample_in_interval(u in 0.0..1.0f32, a in -5.0..-0.1f32, b in 0.1..5.0f32, h in 0.05..3.0f32) {
            let (t, pdf) = equi_angular_sample(u, a, b, h);
            prop_assert!(t >= a - 1e-3 && t <= b + 1e-3);
            prop_assert!(pdf > 0.0);
        }
    }
}
