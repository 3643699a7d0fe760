//! 2-D Points

use super::*;
use num_traits::{Num, Zero};
use std::fmt;
use std::ops::{Index, IndexMut};

/// A 2-D point containing numeric values. Used for canonical sample values
/// in [0, 1)^2.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point2<T> {
    /// X-coordinate.
    pub x: T,

    /// Y-coordinate.
    pub y: T,
}

/// 2-D point containing `Float` values.
pub type Point2f = Point2<Float>;

impl<T: Num> Point2<T> {
    /// Creates a new 2-D point.
    ///
    /// * `x` - X-coordinate.
    /// * `y` - Y-coordinate.
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    /// Creates a new 2-D zero point.
    pub fn zero() -> Self
    where
        T: Zero,
    {
        Self::new(T::zero(), T::zero())
    }
}

impl<T> Index<usize> for Point2<T> {
    type Output = T;

    /// Index the point by an axis to get the immutable coordinate axis value.
    ///
    /// * `axis` - A 2-D coordinate axis.
    fn index(&self, axis: usize) -> &Self::Output {
        match axis {
            0 => &self.x,
            1 => &self.y,
            _ => panic!("invalid axis value"),
        }
    }
}

impl<T> IndexMut<usize> for Point2<T> {
    /// Index the point by an axis to get a mutable coordinate axis value.
    ///
    /// * `axis` - A 2-D coordinate axis.
    fn index_mut(&mut self, axis: usize) -> &mut Self::Output {
        match axis {
            0 => &mut self.x,
            1 => &mut self.y,
            _ => panic!("invalid axis value"),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Point2<T> {
    /// Formats the value using the given formatter.
    ///
    /// * `f` - Formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_point() {
        assert!(Point2::new(0, 0) == Point2::zero());
        assert!(Point2::new(0.0, 0.0) == Point2::zero());
    }

    #[test]
    fn index() {
        let mut p = Point2f::new(0.25, 0.75);
        assert_eq!(p[0], 0.25);
        assert_eq!(p[1], 0.75);
        p[0] = 0.5;
        assert_eq!(p.x, 0.5);
    }

    #[test]
    #[should_panic]
    fn index_out_of_bounds() {
        let p = Point2f::new(0.25, 0.75);
        let _ = p[2];
    }
}
