//! Triangles

use crate::common::*;
use pbrt_core::base::*;
use pbrt_core::geometry::*;
use pbrt_core::rng::*;
use pbrt_core::sampling::*;
use pbrt_core::sh::*;
use pbrt_core::spherical::*;

/// Space in which the triangle vertices are given.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TriangleSpace {
    /// Unit directions from the shading point which sits at the origin.
    Unit,

    /// World space positions.
    World,
}

/// A triangle either projected onto the unit sphere around the shading point
/// or given by its world space vertices.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Triangle {
    /// Space of the vertices.
    pub space: TriangleSpace,

    /// The vertices.
    pub p: [Point3f; 3],

    /// Unit normal of the flat triangle spanned by the vertices.
    pub unit_normal: Vector3f,

    /// Spherical area for unit triangles and flat area for world triangles.
    pub area: Float,
}

impl Triangle {
    /// Create a new unit triangle from directions. The directions are
    /// normalized.
    ///
    /// * `q0` - First direction.
    /// * `q1` - Second direction.
    /// * `q2` - Third direction.
    pub fn unit(q0: &Vector3f, q1: &Vector3f, q2: &Vector3f) -> Self {
        let p = [
            Point3f::from(q0.normalize()),
            Point3f::from(q1.normalize()),
            Point3f::from(q2.normalize()),
        ];
        let area = triangle_solid_angle(
            &Vector3f::from(p[0]),
            &Vector3f::from(p[1]),
            &Vector3f::from(p[2]),
        );
        Self {
            space: TriangleSpace::Unit,
            p,
            unit_normal: flat_normal(&p),
            area,
        }
    }

    /// Create a new world space triangle.
    ///
    /// * `p0` - First vertex.
    /// * `p1` - Second vertex.
    /// * `p2` - Third vertex.
    pub fn world(p0: &Point3f, p1: &Point3f, p2: &Point3f) -> Self {
        let p = [*p0, *p1, *p2];
        Self {
            space: TriangleSpace::World,
            p,
            unit_normal: flat_normal(&p),
            area: flat_area(&p),
        }
    }

    /// Returns the area; spherical for unit triangles, flat otherwise.
    pub fn area(&self) -> Float {
        self.area
    }

    /// Returns the area of the flat triangle spanned by the vertices.
    pub fn flat_area(&self) -> Float {
        flat_area(&self.p)
    }

    /// Returns the unit normal of the flat triangle.
    pub fn unit_normal(&self) -> Vector3f {
        self.unit_normal
    }

    /// Returns the solid angle subtended as seen from `origin`.
    ///
    /// * `origin` - The shading point; unit triangles ignore it.
    pub fn solid_angle(&self, origin: &Point3f) -> Float {
        match self.space {
            TriangleSpace::Unit => self.area,
            TriangleSpace::World => {
                let d: Vec<Vector3f> = self.p.iter().map(|p| (*p - *origin).normalize()).collect();
                triangle_solid_angle(&d[0], &d[1], &d[2])
            }
        }
    }

    /// Returns the distance from `origin` to the plane of the flat triangle.
    /// Small distances mean flat sampling of the patch is poorly conditioned.
    ///
    /// * `origin` - The shading point.
    pub fn distance(&self, origin: &Point3f) -> Float {
        abs(self.unit_normal.dot(&(self.p[0] - *origin)))
    }

    /// Returns the shading point the vertices are relative to.
    ///
    /// * `origin` - The shading point used for world triangles.
    fn eye(&self, origin: &Point3f) -> Point3f {
        match self.space {
            TriangleSpace::Unit => Point3f::ORIGIN,
            TriangleSpace::World => *origin,
        }
    }

    /// Uniformly samples a point on the flat triangle.
    ///
    /// * `u1` - The first uniform random value.
    /// * `u2` - The second uniform random value.
    pub fn sample_point(&self, u1: Float, u2: Float) -> Point3f {
        let b = uniform_sample_triangle(&Point2f::new(u1, u2));
        self.p[0] * b[0] + Vector3f::from(self.p[1]) * b[1] + Vector3f::from(self.p[2]) * (1.0 - b[0] - b[1])
    }

    /// Samples a direction towards the triangle from `origin`. Returns the
    /// direction and the geometric term `|cosθ| / r²`, or `None` if the sample
    /// hits the origin.
    ///
    /// * `origin` - The shading point; unit triangles ignore it.
    /// * `u1`     - The first uniform random value.
    /// * `u2`     - The second uniform random value.
    pub fn sample_dir(&self, origin: &Point3f, u1: Float, u2: Float) -> Option<(Vector3f, Float)> {
        let eye = self.eye(origin);
        let p = self.sample_point(u1, u2);
        direction_and_distance2(&eye, &p).map(|(d, r2)| (d, self.unit_normal.abs_dot(&d) / r2))
    }

    /// Splits the triangle into 4 children through its edge midpoints. Unit
    /// triangles push the midpoints back onto the sphere so the children tile
    /// the parent exactly.
    pub fn subdivide(&self) -> [Triangle; 4] {
        let [a, b, c] = self.p;
        let mid = |p: &Point3f, q: &Point3f| (Vector3f::from(*p) + Vector3f::from(*q)) * 0.5;
        let (ab, bc, ca) = (mid(&a, &b), mid(&b, &c), mid(&c, &a));
        let (a, b, c) = (Vector3f::from(a), Vector3f::from(b), Vector3f::from(c));

        match self.space {
            TriangleSpace::Unit => [
                Self::unit(&a, &ab, &ca),
                Self::unit(&ab, &b, &bc),
                Self::unit(&ca, &bc, &c),
                Self::unit(&ab, &bc, &ca),
            ],
            TriangleSpace::World => {
                let w = |v: &Vector3f| Point3f::from(*v);
                [
                    Self::world(&w(&a), &w(&ab), &w(&ca)),
                    Self::world(&w(&ab), &w(&b), &w(&bc)),
                    Self::world(&w(&ca), &w(&bc), &w(&c)),
                    Self::world(&w(&ab), &w(&bc), &w(&ca)),
                ]
            }
        }
    }

    /// Recursively subdivides while the triangle's plane passes closer than
    /// `threshold` to the shading point.
    ///
    /// * `origin`    - The shading point; unit triangles ignore it.
    /// * `threshold` - Minimum plane distance.
    /// * `max_depth` - Maximum number of subdivision levels.
    pub fn subdivide_until(&self, origin: &Point3f, threshold: Float, max_depth: usize) -> Vec<Triangle> {
        let eye = self.eye(origin);
        let mut done = Vec::new();
        let mut pending = vec![(*self, 0)];
        while let Some((t, depth)) = pending.pop() {
            if depth >= max_depth || t.distance(&eye) >= threshold || t.area <= 0.0 {
                done.push(t);
            } else {
                pending.extend(t.subdivide().iter().map(|c| (*c, depth + 1)));
            }
        }
        done
    }

    /// Monte Carlo estimate of `∫ f(d) Y(d) dω` over the triangle by uniform
    /// sampling of the flat triangle. The SH projection is added to `coeffs`
    /// and the estimate of `∫ f dω` is returned.
    ///
    /// * `origin`    - The shading point; unit triangles ignore it.
    /// * `n_samples` - Number of samples.
    /// * `rng`       - Random number generator.
    /// * `f`         - The integrand.
    /// * `basis`     - The SH basis evaluator.
    /// * `bands`     - Number of SH bands.
    /// * `coeffs`    - Coefficients to add to.
    #[allow(clippy::too_many_arguments)]
    pub fn integrate<F>(
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
        let flat_area = self.flat_area();
        if n_samples == 0 || flat_area < DEGENERATE_EPSILON * DEGENERATE_EPSILON {
            return 0.0;
        }

        let mut acc = ShAccumulator::new(basis, bands, coeffs);
        let weight = flat_area / n_samples as Float;
        for _ in 0..n_samples {
            let u = rng.uniform_point2();
            if let Some((d, g)) = self.sample_dir(origin, u[0], u[1]) {
                acc.add(&d, f(&d) * g * weight);
            }
        }
        acc.total()
    }
}

/// Returns the area of a flat triangle.
///
/// * `p` - The vertices.
fn flat_area(p: &[Point3f; 3]) -> Float {
    0.5 * (p[1] - p[0]).cross(&(p[2] - p[0])).length()
}

/// Returns the unit normal of a flat triangle or zero if it is degenerate.
///
/// * `p` - The vertices.
fn flat_normal(p: &[Point3f; 3]) -> Vector3f {
    let n = (p[1] - p[0]).cross(&(p[2] - p[0]));
    if n.length_squared() == 0.0 {
        Vector3f::ZERO
    } else {
        n.normalize()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
