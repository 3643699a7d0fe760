//! Axial moments of spherical polygons using Arvo's boundary integral.
//!
//! For a polygon `P` and unit axis `w` the moment of order `n` is
//!
//! ```text
//! τ_n(w) = -1/(n+1) · ( Σ_edges (w·m_e) Σ_k c_e^k ∫ cos^k φ dφ  -  [n even] Ω )
//! ```
//!
//! where `m_e` is the outward unit normal of the great circle through edge
//! `e` and the inner sum runs over the orders `k < n` with the parity of
//! `n - 1`. All orders up to `n` are produced in a single pass.

use crate::base::*;
use crate::geometry::*;

/// Returns, for every order `m` in `0..=n`, the sum
/// `Σ_{k ≡ m-1 (mod 2), k < m} c^k ∫_x^{x+θ} cos^k φ dφ`.
///
/// Differences between the two bounds use half angle identities so short
/// arcs keep their relative precision.
///
/// * `x`     - Lower integration bound.
/// * `theta` - Length of the integration interval.
/// * `c`     - Amplitude of the cosine.
/// * `n`     - Highest order.
pub fn cos_sum_integral(x: Float, theta: Float, c: Float, n: usize) -> Vec<Float> {
    let mut r = vec![0.0; n + 1];
    if n == 0 {
        return r;
    }

    let (sin_x, cos_x) = x.sin_cos();
    let cos_y = (x + theta).cos();
    let sin_half = (0.5 * theta).sin();
    let (sin_mid, cos_mid) = (x + 0.5 * theta).sin_cos();
    let d_sin = 2.0 * cos_mid * sin_half;
    let d_cos = -2.0 * sin_mid * sin_half;

    // ∫ cos^k for the two previous orders, cos^(k-1) of both bounds with
    // their difference, and c^k.
    let mut i_prev = 0.0;
    let mut i_curr = theta;
    let mut pow_cos_x = 1.0;
    let mut pow_cos_y = 1.0;
    let mut d_pow_cos = 0.0;
    let mut pow_c = 1.0;

    for k in 0..n {
        if k == 1 {
            i_prev = i_curr;
            i_curr = d_sin;
        } else if k > 1 {
            d_pow_cos = cos_y * d_pow_cos + pow_cos_x * d_cos;
            pow_cos_x *= cos_x;
            pow_cos_y *= cos_y;

            // cos^(k-1)(y) sin(y) - cos^(k-1)(x) sin(x)
            let d = pow_cos_y * d_sin + sin_x * d_pow_cos;
            let next = d / k as Float + (k - 1) as Float / k as Float * i_prev;
            i_prev = i_curr;
            i_curr = next;
        }

        let m = k + 1;
        r[m] = pow_c * i_curr + if m >= 2 { r[m - 2] } else { 0.0 };
        pow_c *= c;
    }
    r
}

/// Accumulates the contribution of the great-circle edge `a → b` to the
/// boundary integral of every order in `0..=n`. Degenerate edges leave the
/// accumulator unmodified.
///
/// * `a` - Unit start direction.
/// * `b` - Unit end direction.
/// * `w` - Unit axis.
/// * `r` - Accumulator with `n + 1` entries.
pub fn line_integral(a: &Vector3f, b: &Vector3f, w: &Vector3f, r: &mut [Float]) {
    let n = r.len().saturating_sub(1);
    let axb = a.cross(b);
    let sin_theta = axb.length();
    if n == 0 || sin_theta < DEGENERATE_EPSILON {
        return;
    }

    let theta = atan2(sin_theta, a.dot(b));
    let outward = -axb / sin_theta;
    let tangent = axb.cross(a) / sin_theta;

    // w·s(φ) = c cos(φ - φ0) along the arc s(φ) = a cos φ + t sin φ.
    let wa = w.dot(a);
    let wt = w.dot(&tangent);
    let c = (wa * wa + wt * wt).sqrt();
    let phi0 = atan2(wt, wa);

    let weight = w.dot(&outward);
    let sums = cos_sum_integral(-phi0, theta, c, n);
    for (acc, s) in r.iter_mut().zip(sums.iter()) {
        *acc += weight * s;
    }
}

/// Returns the boundary integral of every order in `0..=n` summed over all
/// edges of a closed polygon.
///
/// * `vertices` - Unit vertex directions in counter clockwise order.
/// * `w`        - Unit axis.
/// * `n`        - Highest order.
pub fn boundary_integral(vertices: &[Vector3f], w: &Vector3f, n: usize) -> Vec<Float> {
    let mut r = vec![0.0; n + 1];
    let count = vertices.len();
    for i in 0..count {
        line_integral(&vertices[i], &vertices[(i + 1) % count], w, &mut r);
    }
    r
}

/// Turns a boundary integral vector into axial moments by adding back the
/// solid angle for even orders and scaling every order `k` by `-1/(k+1)`.
///
/// * `boundary`    - Boundary integrals for orders `0..=n`.
/// * `solid_angle` - Solid angle of the polygon.
pub fn moments_from_boundary(boundary: &[Float], solid_angle: Float) -> Vec<Float> {
    boundary
        .iter()
        .enumerate()
        .map(|(k, b)| {
            let even = if k % 2 == 0 { solid_angle } else { 0.0 };
            -(b - even) / (k + 1) as Float
        })
        .collect()
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
