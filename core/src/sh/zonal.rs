//! Analytic SH projection of spherical polygons through zonal harmonics.
//!
//! Band `l` of the basis is spanned by the `2l+1` zonal lobes `P_l(w_i · d)`
//! for generic unit axes `w_i`. Integrating each lobe over the polygon only
//! needs the axial moments of orders `0..=l` along `w_i`, and the addition
//! theorem `P_l(w·d) = 4π/(2l+1) Σ_m Y_lm(w) Y_lm(d)` turns the lobe integrals
//! back into SH coefficients through a `(2l+1) x (2l+1)` linear solve.

use super::basis::*;
use crate::base::*;
use crate::geometry::*;
use crate::spherical::*;

/// Returns the power series coefficients of the Legendre polynomial `P_l`,
/// lowest power first.
///
/// * `l` - Degree.
pub fn legendre_coefficients(l: usize) -> Vec<f64> {
    let mut p_prev = vec![1.0];
    if l == 0 {
        return p_prev;
    }
    let mut p_curr = vec![0.0, 1.0];

    // (k+1) P_{k+1} = (2k+1) x P_k - k P_{k-1}
    for k in 1..l {
        let mut next = vec![0.0; k + 2];
        for (i, c) in p_curr.iter().enumerate() {
            next[i + 1] += (2 * k + 1) as f64 * c;
        }
        for (i, c) in p_prev.iter().enumerate() {
            next[i] -= k as f64 * c;
        }
        for c in next.iter_mut() {
            *c /= (k + 1) as f64;
        }
        p_prev = p_curr;
        p_curr = next;
    }
    p_curr
}

/// Returns `count` well spread unit directions on a golden-angle spiral over
/// the upper hemisphere. Band `l` functions satisfy `Y(-w) = ±Y(w)`, so
/// keeping every direction on one hemisphere avoids dependent rows.
///
/// * `count` - Number of directions.
pub fn spiral_directions(count: usize) -> Vec<Vector3f> {
    let golden_angle = PI * (3.0 - (5.0 as Float).sqrt());
    (0..count)
        .map(|i| {
            let z = 1.0 - (i as Float + 0.5) / count as Float;
            let r = safe_sqrt(1.0 - z * z);
            let phi = golden_angle * i as Float;
            Vector3f::new(r * cos(phi), r * sin(phi), z)
        })
        .collect()
}

/// Solves `a x = b` by Gaussian elimination with partial pivoting. Returns
/// `None` for singular systems.
///
/// * `a` - Square matrix in row-major order.
/// * `b` - Right hand side.
fn solve_linear_system(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))?;
        if a[pivot][col].abs() < 1.0e-9 {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in (col + 1)..n {
            let f = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= f * a[col][k];
            }
            b[row] -= f * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let s: f64 = ((row + 1)..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - s) / a[row][row];
    }
    Some(x)
}

/// Returns the SH coefficients `∫_P Y_lm(d) dΩ` of the indicator function of
/// a spherical polygon for all `bands²` basis functions.
///
/// * `polygon` - The spherical polygon.
/// * `bands`   - Number of SH bands.
/// * `basis`   - The SH basis evaluator.
pub fn project_polygon(polygon: &SphericalPolygon, bands: usize, basis: &dyn ShBasis) -> Vec<Float> {
    let mut coeffs = vec![0.0; sh_terms(bands)];
    let mut y = vec![0.0; sh_terms(bands)];

    for l in 0..bands {
        let n = 2 * l + 1;
        let directions = spiral_directions(n);
        let moments = polygon.axial_moments(&directions);
        let legendre = legendre_coefficients(l);

        // Integral of each zonal lobe P_l(w_i · d) over the polygon.
        let lobes: Vec<f64> = moments
            .iter()
            .map(|row| {
                legendre
                    .iter()
                    .zip(row.iter())
                    .map(|(p, m)| p * *m as f64)
                    .sum()
            })
            .collect();

        let a: Vec<Vec<f64>> = directions
            .iter()
            .map(|w| {
                basis.evaluate_into(l + 1, w, &mut y);
                (0..n).map(|j| y[l * l + j] as f64).collect()
            })
            .collect();

        match solve_linear_system(a, lobes) {
            Some(x) => {
                let scale = n as f64 / (4.0 * std::f64::consts::PI);
                for (j, v) in x.iter().enumerate() {
                    coeffs[l * l + j] = (v * scale) as Float;
                }
            }
            None => warn!("Singular zonal system for band {l}; leaving its coefficients at zero."),
        }
    }
    coeffs
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RNG;
    use float_cmp::*;

    #[test]
    fn legendre_low_degrees() {
        assert_eq!(legendre_coefficients(0), vec![1.0]);
        assert_eq!(legendre_coefficients(1), vec![0.0, 1.0]);
        let p2 = legendre_coefficients(2);
        assert!((p2[0] + 0.5).abs() < 1e-12 && p2[1].abs() < 1e-12 && (p2[2] - 1.5).abs() < 1e-12);
        let p3 = legendre_coefficients(3);
        assert!((p3[1] + 1.5).abs() < 1e-12 && (p3[3] - 2.5).abs() < 1e-12);
    }

    #[test]
    fn spiral_directions_are_unit() {
        for w in spiral_directions(9) {
            assert!(approx_eq!(Float, w.length(), 1.0, epsilon = 1e-5));
            assert!(w.z > 0.0);
        }
    }

    #[test]
    fn solve_small_system() {
        let a = vec![vec![2.0, 1.0], vec![1.0, 3.0]];
        let x = solve_linear_system(a, vec![3.0, 5.0]).unwrap();
        assert!((x[0] - 0.8).abs() < 1e-12 && (x[1] - 1.4).abs() < 1e-12);
        assert!(solve_linear_system(vec![vec![1.0, 2.0], vec![2.0, 4.0]], vec![1.0, 2.0]).is_none());
    }

    #[test]
    fn projection_matches_monte_carlo() {
        let corners = [
            Point3f::new(-0.5, -0.3, 1.0),
            Point3f::new(0.7, -0.3, 1.0),
            Point3f::new(0.7, 0.6, 1.0),
            Point3f::new(-0.5, 0.6, 1.0),
        ];
        let polygon = SphericalPolygon::from_points(&Point3f::ORIGIN, &corners);
        let basis = RealSphericalHarmonics::new();
        let bands = 3;
        let analytic = project_polygon(&polygon, bands, &basis);

        let mut rng = RNG::new(17);
        let samples = 100_000;
        let mut reference = vec![0.0 as f64; sh_terms(bands)];
        for _ in 0..samples {
            let u = rng.uniform_point2();
            let p = Vector3f::new(-0.5 + 1.2 * u.x, -0.3 + 0.9 * u.y, 1.0);
            let d = p.normalize();
            let weight = 1.08 * d.z / p.length_squared();
            let y = basis.evaluate(bands, &d);
            for (r, v) in reference.iter_mut().zip(y.iter()) {
                *r += (weight * v) as f64 / samples as f64;
            }
        }

        assert!(approx_eq!(Float, analytic[0], polygon.solid_angle() * 0.5 * INV_PI.sqrt(), epsilon = 1e-4));
        for (a, r) in analytic.iter().zip(reference.iter()) {
            assert!((*a as f64 - r).abs() < 5e-3, "{} vs {}", a, r);
        }
    }
}
