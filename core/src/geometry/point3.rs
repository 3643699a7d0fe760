//! 3-D Points

use super::*;
use num_traits::Num;
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

/// A 3-D point containing numeric values.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point3<T> {
    /// X-coordinate.
    pub x: T,

    /// Y-coordinate.
    pub y: T,

    /// Z-coordinate.
    pub z: T,
}

/// 3-D point containing `Float` values.
pub type Point3f = Point3<Float>;

impl Point3f {
    /// The origin.
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0, z: 0.0 };
}

impl<T: Num> Point3<T> {
    /// Creates a new 3-D point.
    ///
    /// * `x` - X-coordinate.
    /// * `y` - Y-coordinate.
    /// * `z` - Z-coordinate.
    pub fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }
}

impl Point3f {
    /// Returns the distance to another point.
    ///
    /// * `other` - The other point.
    pub fn distance(&self, other: &Self) -> Float {
        (*self - *other).length()
    }

    /// Returns the unit direction from this point towards another one.
    ///
    /// * `other` - The target point.
    pub fn direction_to(&self, other: &Self) -> Vector3f {
        (*other - *self).normalize()
    }

    /// Returns the centroid of a set of points.
    ///
    /// * `points` - The points.
    pub fn centroid(points: &[Point3f]) -> Self {
        let n = points.len().max(1) as Float;
        let sum = points
            .iter()
            .fold(Vector3f::ZERO, |acc, p| acc + Vector3f::from(*p));
        Self::ORIGIN + sum / n
    }
}

impl<T: Num> Add<Vector3<T>> for Point3<T> {
    type Output = Point3<T>;

    /// Offsets the point by the given vector.
    ///
    /// * `v` - The vector to add.
    fn add(self, v: Vector3<T>) -> Self::Output {
        Point3::new(self.x + v.x, self.y + v.y, self.z + v.z)
    }
}

impl<T: Num + Copy> AddAssign<Vector3<T>> for Point3<T> {
    /// Offsets the point by the given vector.
    ///
    /// * `v` - The vector to add.
    fn add_assign(&mut self, v: Vector3<T>) {
        *self = Point3::new(self.x + v.x, self.y + v.y, self.z + v.z);
    }
}

impl<T: Num> Sub for Point3<T> {
    type Output = Vector3<T>;

    /// Returns the vector between two points.
    ///
    /// * `other` - The point to subtract.
    fn sub(self, other: Self) -> Self::Output {
        Vector3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl<T: Num> Sub<Vector3<T>> for Point3<T> {
    type Output = Point3<T>;

    /// Offsets the point by the negated vector.
    ///
    /// * `v` - The vector to subtract.
    fn sub(self, v: Vector3<T>) -> Self::Output {
        Point3::new(self.x - v.x, self.y - v.y, self.z - v.z)
    }
}

impl<T: Num + Copy> SubAssign<Vector3<T>> for Point3<T> {
    /// Offsets the point by the negated vector.
    ///
    /// * `v` - The vector to subtract.
    fn sub_assign(&mut self, v: Vector3<T>) {
        *self = Point3::new(self.x - v.x, self.y - v.y, self.z - v.z);
    }
}

impl<T: Num + Copy> Mul<T> for Point3<T> {
    type Output = Self;

    /// Scale the point's coordinates.
    ///
    /// * `f` - The scaling factor.
    fn mul(self, f: T) -> Self::Output {
        Self::new(f * self.x, f * self.y, f * self.z)
    }
}

impl<T: Copy> From<Vector3<T>> for Point3<T> {
    /// Convert a 3-D vector to a 3-D point.
    ///
    /// * `v` - 3-D vector.
    fn from(v: Vector3<T>) -> Self {
        Self { x: v.x, y: v.y, z: v.z }
    }
}

impl<T: fmt::Display> fmt::Display for Point3<T> {
    /// Formats the value using the given formatter.
    ///
    /// * `f` - Formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
