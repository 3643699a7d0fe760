//! 3x3 Matrix

use super::*;
use std::ops::Mul;

/// A 3x3 matrix stored in row-major order.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Matrix3x3 {
    /// Matrix elements `m[row][column]`.
    pub m: [[Float; 3]; 3],
}

/// The identity matrix.
pub const IDENTITY_MATRIX3: Matrix3x3 = Matrix3x3 {
    m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
};

impl Matrix3x3 {
    /// Create a new matrix from row-major elements.
    ///
    /// * `m` - Matrix elements `m[row][column]`.
    pub fn new(m: [[Float; 3]; 3]) -> Self {
        Self { m }
    }

    /// Create a matrix whose rows are the given vectors.
    ///
    /// * `r0` - First row.
    /// * `r1` - Second row.
    /// * `r2` - Third row.
    pub fn from_rows(r0: &Vector3f, r1: &Vector3f, r2: &Vector3f) -> Self {
        Self::new([[r0.x, r0.y, r0.z], [r1.x, r1.y, r1.z], [r2.x, r2.y, r2.z]])
    }
}

impl Mul<Vector3f> for Matrix3x3 {
    type Output = Vector3f;

    /// Transform a vector.
    ///
    /// * `v` - The vector.
    fn mul(self, v: Vector3f) -> Vector3f {
        let m = &self.m;
        Vector3f::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }
}

impl Mul for Matrix3x3 {
    type Output = Self;

    /// Post-multiply the given matrix.
    ///
    /// * `other` - The matrix to post-multiply.
    fn mul(self, other: Self) -> Self {
        let mut r = [[0.0; 3]; 3];
        for (i, row) in r.iter_mut().enumerate() {
            for (j, v) in row.iter_mut().enumerate() {
                *v = self.m[i][0] * other.m[0][j]
                    + self.m[i][1] * other.m[1][j]
                    + self.m[i][2] * other.m[2][j];
            }
        }
        Self::new(r)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn identity_transform() {
        let v = Vector3f::new(1.0, -2.0, 3.0);
        assert!(IDENTITY_MATRIX3 * v == v);
    }

    #[test]
    fn rows_transform_columns() {
        let a = Vector3f::new(1.0, 2.0, 3.0);
        let b = Vector3f::new(4.0, 5.0, 6.0);
        let c = Vector3f::new(7.0, 8.0, 9.0);
        assert!(Matrix3x3::from_rows(&a, &b, &c) * Vector3f::new(1.0, 0.0, 0.0) == Vector3f::new(1.0, 4.0, 7.0));
    }

    proptest! {
        #[test]
        fn identity_is_neutral(a in -10.0..10.0f32, b in -10.0..10.0f32, c in -10.0..10.0f32) {
            let m = Matrix3x3::new([[a, b, c], [c, a, b], [b, c, a]]);
            prop_assert_eq!(m * IDENTITY_MATRIX3, m);
            prop_assert_eq!(IDENTITY_MATRIX3 * m, m);
        }
    }
}
