//! Common

use super::*;
use num_traits::{Num, Zero};
use std::ops::Neg;

/// Dot product trait.
pub trait Dot<V> {
    type Output: Num + Zero + Neg<Output = Self::Output> + PartialOrd + Copy;

    /// Returns the dot product.
    ///
    /// * `other` - The other vector.
    fn dot(&self, other: &V) -> Self::Output;

    /// Returns the absolute value of dot product.
    ///
    /// * `other` - The other vector.
    fn abs_dot(&self, other: &V) -> Self::Output {
        abs(self.dot(other))
    }
}

/// Returns a pair of unit vectors that together with the given unit vector
/// form an orthonormal basis.
///
/// * `v1` - The first unit vector of the basis.
pub fn coordinate_system(v1: &Vector3f) -> (Vector3f, Vector3f) {
    let v2 = if abs(v1.x) > abs(v1.y) {
        Vector3f::new(-v1.z, 0.0, v1.x) / (v1.x * v1.x + v1.z * v1.z).sqrt()
    } else {
        Vector3f::new(0.0, v1.z, -v1.y) / (v1.y * v1.y + v1.z * v1.z).sqrt()
    };
    let v3 = v1.cross(&v2);
    (v2, v3)
}

/// Returns the triple product `a · (b × c)`.
///
/// * `a` - First vector.
/// * `b` - Second vector.
/// * `c` - Third vector.
#[inline]
pub fn triple_product(a: &Vector3f, b: &Vector3f, c: &Vector3f) -> Float {
    a.dot(&b.cross(c))
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn coordinate_system_from_x_axis() {
        let v1 = Vector3f::new(1.0, 0.0, 0.0);
        let (v2, v3) = coordinate_system(&v1);
        assert!(v2 == Vector3f::new(0.0, 0.0, 1.0));
        assert!(v3 == Vector3f::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn coordinate_system_is_orthonormal() {
        let v1 = Vector3f::new(0.2, 0.5, 0.5).normalize();
        let (v2, v3) = coordinate_system(&v1);
        assert!(approx_eq!(Float, v1.dot(&v2), 0.0, epsilon = 1e-6));
        assert!(approx_eq!(Float, v1.dot(&v3), 0.0, epsilon = 1e-6));
        assert!(approx_eq!(Float, v2.dot(&v3), 0.0, epsilon = 1e-6));
        assert!(approx_eq!(Float, v3.length(), 1.0, epsilon = 1e-6));
    }

    #[test]
    fn triple_product_of_axes() {
        let x = Vector3f::new(1.0, 0.0, 0.0);
        let y = Vector3f::new(0.0, 1.0, 0.0);
        let z = Vector3f::new(0.0, 0.0, 1.0);
        assert_eq!(triple_product(&x, &y, &z), 1.0);
        assert_eq!(triple_product(&y, &x, &z), -1.0);
    }
}
