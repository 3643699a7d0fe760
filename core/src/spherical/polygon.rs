//! Spherical Polygon

use super::moments::*;
use crate::base::*;
use crate::geometry::*;

/// A closed polygon on the unit sphere centred at the evaluation point. Its
/// vertices are unit directions and are kept in counter-clockwise order when
/// viewed from outside the sphere, so that `v[i] · (v[i+1] × v[i+2]) > 0` for
/// convex polygons.
#[derive(Clone, Debug, PartialEq)]
pub struct SphericalPolygon {
    /// Unit vertex directions.
    vertices: Vec<Vector3f>,
}

impl SphericalPolygon {
    /// Create a new spherical polygon from unit vertex directions given in
    /// either winding order.
    ///
    /// * `vertices` - Unit directions. At least 3 are required for a non
    ///                empty polygon.
    pub fn new(vertices: Vec<Vector3f>) -> Self {
        let mut vertices = vertices;
        if winding(&vertices) < 0.0 {
            vertices.reverse();
        }
        Self { vertices }
    }

    /// Create a spherical polygon by projecting world space points onto the
    /// unit sphere centred at `origin`.
    ///
    /// * `origin` - The evaluation point.
    /// * `points` - Polygon corners in world space.
    pub fn from_points(origin: &Point3f, points: &[Point3f]) -> Self {
        Self::new(points.iter().map(|p| origin.direction_to(p)).collect())
    }

    /// Returns the unit vertex directions.
    pub fn vertices(&self) -> &[Vector3f] {
        &self.vertices
    }

    /// Returns the number of edges.
    pub fn edge_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns an iterator over the polygon edges as `(start, end)` pairs.
    pub fn edges(&self) -> impl Iterator<Item = (Vector3f, Vector3f)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Returns the solid angle subtended by the polygon.
    pub fn solid_angle(&self) -> Float {
        match self.vertices.len() {
            0..=2 => 0.0,
            3 => triangle_solid_angle(&self.vertices[0], &self.vertices[1], &self.vertices[2]),
            _ => polygon_solid_angle(&self.vertices),
        }
    }

    /// Returns the axial moments `∫ (w·d)^k dΩ` of the polygon for every
    /// order `k` in `0..=n`.
    ///
    /// * `w` - Unit axis.
    /// * `n` - Highest moment order.
    pub fn axial_moment(&self, w: &Vector3f, n: usize) -> Vec<Float> {
        if self.vertices.len() < 3 {
            return vec![0.0; n + 1];
        }
        moments_from_boundary(&boundary_integral(&self.vertices, w, n), self.solid_angle())
    }

    /// Returns axial moments for a batch of `D` directions. Each row holds the
    /// orders `0..=(D-1)/2` so that the result can be used to reconstruct
    /// zonal harmonics up to band `(D-1)/2`.
    ///
    /// * `directions` - Unit axes.
    pub fn axial_moments(&self, directions: &[Vector3f]) -> Vec<Vec<Float>> {
        let order = directions.len().saturating_sub(1) / 2 + 1;
        if self.vertices.len() < 3 {
            return vec![vec![0.0; order]; directions.len()];
        }

        let solid_angle = self.solid_angle();
        directions
            .iter()
            .map(|w| moments_from_boundary(&boundary_integral(&self.vertices, w, order - 1), solid_angle))
            .collect()
    }
}

/// Returns the sum of the fan triple products which is positive for counter
/// clockwise polygons.
///
/// * `vertices` - Unit vertex directions.
fn winding(vertices: &[Vector3f]) -> Float {
    if vertices.len() < 3 {
        return 0.0;
    }
    let v0 = &vertices[0];
    vertices[1..]
        .windows(2)
        .map(|w| triple_product(v0, &w[0], &w[1]))
        .sum()
}

/// Returns the solid angle of a spherical triangle using the formula of Van
/// Oosterom and Strackee.
///
/// * `a` - First vertex direction.
/// * `b` - Second vertex direction.
/// * `c` - Third vertex direction.
pub fn triangle_solid_angle(a: &Vector3f, b: &Vector3f, c: &Vector3f) -> Float {
    let (la, lb, lc) = (a.length(), b.length(), c.length());
    let numerator = abs(triple_product(a, b, c));
    let denominator = la * lb * lc + a.dot(b) * lc + a.dot(c) * lb + b.dot(c) * la;
    2.0 * clamp(atan2(numerator, denominator), 0.0, PI)
}

/// Returns the solid angle of a convex spherical polygon with counter
/// clockwise unit vertices using Mazonka's polyhedral cone product.
///
/// Each vertex contributes the complex number
/// `(a×b)·(b×c) + i a·(b×c)` for consecutive vertices `a, b, c` whose
/// argument is the exterior angle at `b`. For unit `b` the real part equals
/// `(a·b)(b·c) - (a·c)` but stays accurate when the vertices are close
/// together. The product is accumulated in `f64`.
///
/// * `vertices` - Unit vertex directions.
pub fn polygon_solid_angle(vertices: &[Vector3f]) -> Float {
    let n = vertices.len();
    if n < 3 {
        return 0.0;
    }

    let v: Vec<[f64; 3]> = vertices.iter().map(|v| [v.x as f64, v.y as f64, v.z as f64]).collect();
    let (mut re, mut im) = (1.0_f64, 0.0_f64);
    for j in 0..n {
        let a = &v[(j + n - 1) % n];
        let b = &v[j];
        let c = &v[(j + 1) % n];

        let bc = cross64(b, c);
        let fr = dot64(&cross64(a, b), &bc);
        let fi = dot64(a, &bc);
        let len = (fr * fr + fi * fi).sqrt();
        if len < 1.0e-30 {
            continue;
        }
        let (fr, fi) = (fr / len, fi / len);
        let (r, i) = (re * fr - im * fi, re * fi + im * fr);
        re = r;
        im = i;
    }

    // The product's argument is the total turning 2π - Ω modulo 2π.
    let tau = std::f64::consts::TAU;
    let omega = (tau - im.atan2(re)).rem_euclid(tau);

    // A vanishing polygon can round to just below a full turn.
    if omega > tau - 1.0e-9 {
        0.0
    } else {
        omega as Float
    }
}

fn cross64(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn dot64(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
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

    fn unit_square() -> Vec<Point3f> {
        vec![
            Point3f::new(-0.5, -0.5, 1.0),
            Point3f::new(0.5, -0.5, 1.0),
            Point3f::new(0.5, 0.5, 1.0),
            Point3f::new(-0.5, 0.5, 1.0),
        ]
    }

    /// Monte Carlo estimate of `∫ (w·d)^k dΩ` over the unit square for orders
    /// `0..=n` using uniform area sampling.
    fn monte_carlo_moments(w: &Vector3f, n: usize, samples: usize) -> Vec<Float> {
        let mut rng = RNG::new(11);
        let mut sums = vec![0.0 as f64; n + 1];
        for _ in 0..samples {
            let u = rng.uniform_point2();
            let p = Vector3f::new(u.x - 0.5, u.y - 0.5, 1.0);
            let r2 = p.length_squared();
            let d = p.normalize();
            let weight = d.z / r2;
            let c = w.dot(&d);
            for (k, s) in sums.iter_mut().enumerate() {
                *s += (weight * c.powi(k as i32)) as f64;
            }
        }
        sums.iter().map(|s| (s / samples as f64) as Float).collect()
    }

    #[test]
    fn square_solid_angle_matches_closed_form() {
        let polygon = SphericalPolygon::from_points(&Point3f::ORIGIN, &unit_square());
        let expected = 4.0 * (0.2 as Float).asin();
        assert!(approx_eq!(Float, polygon.solid_angle(), expected, epsilon = 1e-5));
    }

    #[test]
    fn winding_is_normalized() {
        let mut corners = unit_square();
        let ccw = SphericalPolygon::from_points(&Point3f::ORIGIN, &corners);
        corners.reverse();
        let cw = SphericalPolygon::from_points(&Point3f::ORIGIN, &corners);
        assert!(approx_eq!(Float, ccw.solid_angle(), cw.solid_angle(), epsilon = 1e-6));
        assert!(winding(cw.vertices()) > 0.0);
    }

    #[test]
    fn degenerate_polygon_is_empty() {
        let polygon = SphericalPolygon::new(vec![Vector3f::Z_AXIS, Vector3f::new(1.0, 0.0, 0.0)]);
        assert_eq!(polygon.solid_angle(), 0.0);
        assert_eq!(polygon.axial_moment(&Vector3f::Z_AXIS, 2), vec![0.0; 3]);
    }

    #[test]
    fn moments_match_monte_carlo() {
        let polygon = SphericalPolygon::from_points(&Point3f::ORIGIN, &unit_square());
        let axes = [
            Vector3f::new(0.0, 0.0, 1.0),
            Vector3f::new(1.0, 0.0, 0.0),
            Vector3f::new(0.0, 1.0, 0.0),
            Vector3f::new(1.0, 1.0, 1.0).normalize(),
        ];
        for w in axes.iter() {
            let analytic = polygon.axial_moment(w, 3);
            let reference = monte_carlo_moments(w, 3, 100_000);
            for n in 0..=3 {
                let err = (analytic[n] - reference[n]) * (analytic[n] - reference[n]);
                assert!(err <= 1e-2, "order {} axis {}: {} vs {}", n, w, analytic[n], reference[n]);
                assert!(abs(analytic[n] - reference[n]) < 5e-3);
            }
        }
    }

    #[test]
    fn batched_moments_match_single() {
        let polygon = SphericalPolygon::from_points(&Point3f::ORIGIN, &unit_square());
        let mut rng = RNG::new(5);
        let directions: Vec<Vector3f> = (0..7).map(|_| uniform_sample_sphere(&rng.uniform_point2())).collect();
        let batch = polygon.axial_moments(&directions);
        assert_eq!(batch.len(), 7);
        for (w, row) in directions.iter().zip(batch.iter()) {
            assert_eq!(row.len(), 4);
            let single = polygon.axial_moment(w, 3);
            for k in 0..4 {
                assert!(approx_eq!(Float, row[k], single[k], epsilon = 1e-6));
            }
        }
    }

    /// Two triangle Van Oosterom and Strackee sum in `f64`.
    fn quad_fan_solid_angle(v: &[Vector3f]) -> f64 {
        let d: Vec<[f64; 3]> = v.iter().map(|v| [v.x as f64, v.y as f64, v.z as f64]).collect();
        let tri = |a: &[f64; 3], b: &[f64; 3], c: &[f64; 3]| {
            let num = dot64(a, &cross64(b, c)).abs();
            let den = 1.0 + dot64(a, b) + dot64(a, c) + dot64(b, c);
            2.0 * num.atan2(den)
        };
        tri(&d[0], &d[1], &d[2]) + tri(&d[0], &d[2], &d[3])
    }

    fn centred_quad(half: Float, h: Float) -> Vec<Point3f> {
        vec![
            Point3f::new(-half, -half, h),
            Point3f::new(half, -half, h),
            Point3f::new(half, half, h),
            Point3f::new(-half, half, h),
        ]
    }

    #[test]
    fn small_distant_quads() {
        for (half, h) in [(0.05, 20.0), (0.02, 5.0), (0.5, 50.0), (0.5, 100.0)] {
            let polygon = SphericalPolygon::from_points(&Point3f::ORIGIN, &centred_quad(half, h));
            let expected = quad_fan_solid_angle(polygon.vertices()) as Float;
            let omega = polygon.solid_angle();
            assert!(abs(omega - expected) <= 1e-3 * expected, "{} at {}: {} vs {}", half, h, omega, expected);

            // Far away the solid angle approaches area / distance².
            let area_over_h2 = 4.0 * half * half / (h * h);
            assert!(abs(omega - area_over_h2) <= 1e-2 * area_over_h2);

            let moments = polygon.axial_moment(&Vector3f::Z_AXIS, 2);
            assert!(abs(moments[0] - omega) <= 1e-6 * omega);
            assert!(abs(moments[2] - omega) <= 1e-2 * omega, "{:?} vs {}", moments, omega);
        }
    }

    prop_compose! {
        fn cap_vector3()(x in -1.0..1.0f32, y in -1.0..1.0f32) -> Vector3f {
            Vector3f::new(x, y, 1.5).normalize()
        }
    }

    proptest! {
        #[test]
        fn triangle_and_polygon_formulas_agree(
            a in cap_vector3(),
            b in cap_vector3(),
            c in cap_vector3(),
        ) {
            prop_assume!(abs(triple_product(&a, &b, &c)) > 0.02);
            let polygon = SphericalPolygon::new(vec![a, b, c]);
            let v = polygon.vertices();
            let oosterom = triangle_solid_angle(&v[0], &v[1], &v[2]);
            let mazonka = polygon_solid_angle(v);
            prop_assert!(abs(oosterom - mazonka) < 1e-3);
        }

        #[test]
        fn moment_of_order_two_sums_to_solid_angle(
            x in -1.0..1.0f32, y in -1.0..1.0f32, h in 0.2..3.0f32,
        ) {
            // Σ over an orthonormal basis of the 2nd order moments is Ω.
            let corners: Vec<Point3f> = unit_square()
                .iter()
                .map(|p| Point3f::new(p.x + x, p.y + y, h))
                .collect();
            let polygon = SphericalPolygon::from_points(&Point3f::ORIGIN, &corners);
            let sum: Float = [
                Vector3f::new(1.0, 0.0, 0.0),
                Vector3f::new(0.0, 1.0, 0.0),
                Vector3f::new(0.0, 0.0, 1.0),
            ]
            .iter()
            .map(|w| polygon.axial_moment(w, 2)[2])
            .sum();
            prop_assert!(abs(sum - polygon.solid_angle()) < 1e-4);
        }

        #[test]
        fn quad_formula_matches_triangle_fan(
            x in -1.0..1.0f32, y in -1.0..1.0f32,
            half in 0.05..1.0f32, h in 1.0..100.0f32,
        ) {
            let corners: Vec<Point3f> = centred_quad(half, h)
                .iter()
                .map(|p| Point3f::new(p.x + x, p.y + y, p.z))
                .collect();
            let polygon = SphericalPolygon::from_points(&Point3f::ORIGIN, &corners);
            prop_assert_eq!(polygon.vertices().len(), 4);
            let expected = quad_fan_solid_angle(polygon.vertices());
            let omega = polygon_solid_angle(polygon.vertices()) as f64;
            prop_assert!((omega - expected).abs() <= 1e-3 * expected, "{} vs {}", omega, expected);
        }
    }
}
