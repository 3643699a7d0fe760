//! LTC Polygon Integration

use crate::base::*;
use crate::geometry::*;

/// Returns the contribution of one spherical polygon edge to the clamped
/// cosine integral around the local z-axis.
///
/// * `v1` - Unit start point of the edge.
/// * `v2` - Unit end point of the edge.
pub fn integrate_edge(v1: &Vector3f, v2: &Vector3f) -> Float {
    let theta = safe_acos(v1.dot(v2));
    let scale = if theta > 0.001 { theta / sin(theta) } else { 1.0 };
    v1.cross(v2).z * scale
}

/// Returns an orthonormal tangent frame `(t1, t2)` around `n` with `t1` in
/// the plane of `n` and `v`.
///
/// * `n` - Unit surface normal.
/// * `v` - Unit view direction.
pub fn ltc_frame(n: &Vector3f, v: &Vector3f) -> (Vector3f, Vector3f) {
    let t = *v - *n * v.dot(n);
    if t.length_squared() < DEGENERATE_EPSILON {
        coordinate_system(n)
    } else {
        let t1 = t.normalize();
        (t1, n.cross(&t1))
    }
}

/// Integrates a linearly transformed cosine lobe over a quad.
///
/// The corners are moved into the tangent frame of `(n, v)`, transformed by
/// `minv` and projected onto the unit sphere where the polygon is integrated
/// edge by edge. The quad is not clipped against the horizon, so quads
/// straddling the tangent plane are slightly overestimated.
///
/// * `n`         - Unit surface normal.
/// * `v`         - Unit view direction.
/// * `p`         - Shading point.
/// * `minv`      - Inverse LTC matrix; identity gives the diffuse form factor.
/// * `corners`   - Quad corners, counter-clockwise when seen from the lit side.
/// * `two_sided` - Whether the back side of the quad also emits.
pub fn ltc_evaluate(
    n: &Vector3f,
    v: &Vector3f,
    p: &Point3f,
    minv: &Matrix3x3,
    corners: &[Point3f; 4],
    two_sided: bool,
) -> Float {
    let (t1, t2) = ltc_frame(n, v);
    let m = *minv * Matrix3x3::from_rows(&t1, &t2, n);

    let mut l = [Vector3f::ZERO; 4];
    for (li, corner) in l.iter_mut().zip(corners.iter()) {
        let d = m * (*corner - *p);
        let len = d.length();
        if len < DEGENERATE_EPSILON {
            debug!("LTC corner coincides with the shading point");
            return 0.0;
        }
        *li = d / len;
    }

    let sum: Float = (0..4).map(|i| integrate_edge(&l[i], &l[(i + 1) % 4])).sum::<Float>() * INV_TWO_PI;

    if two_sided {
        abs(sum)
    } else {
        max(0.0, sum)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
