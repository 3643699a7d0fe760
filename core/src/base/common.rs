//! Common

use super::clamp::*;
use num_traits::Num;
use std::ops::{Add, Mul, Neg};

/// Use 32-bit precision for floating point numbers.
pub type Float = f32;

/// Infinty (∞)
pub const INFINITY: Float = Float::INFINITY;

/// PI (π)
pub const PI: Float = std::f32::consts::PI;

/// 1/PI (1/π)
pub const INV_PI: Float = 1.0 / PI;

/// PI/2 (π/2)
pub const PI_OVER_TWO: Float = PI * 0.5;

/// 2*PI (2π)
pub const TWO_PI: Float = PI * 2.0;

/// 1/2*PI (1/2π)
pub const INV_TWO_PI: Float = 1.0 / TWO_PI;

/// 4*PI (4π)
pub const FOUR_PI: Float = PI * 4.0;

/// 1/4*PI (1/4π)
pub const INV_FOUR_PI: Float = 1.0 / FOUR_PI;

/// Lengths, areas and denominators below this are treated as degenerate.
pub const DEGENERATE_EPSILON: Float = 1.0e-6;

/// Returns the absolute value of a number.
///
/// * `n` - The number.
#[inline(always)]
pub fn abs<T>(n: T) -> T
where
    T: Num + Neg<Output = T> + PartialOrd + Copy,
{
    if n < T::zero() {
        -n
    } else {
        n
    }
}

/// Returns the minimum of 2 numbers.
///
/// * `a` - First number.
/// * `b` - Second number.
#[inline(always)]
pub fn min<T>(a: T, b: T) -> T
where
    T: Num + PartialOrd + Copy,
{
    if a < b {
        a
    } else {
        b
    }
}

/// Returns the maximum of 2 numbers.
///
/// * `a` - First number.
/// * `b` - Second number.
#[inline(always)]
pub fn max<T>(a: T, b: T) -> T
where
    T: Num + PartialOrd + Copy,
{
    if a > b {
        a
    } else {
        b
    }
}

/// Linearly interpolate between two points for parameters in [0, 1] and
/// extrapolate for parameters outside that interval.
///
/// * `t`  - Parameter.
/// * `p0` - Point at t=0.
/// * `p1` - Point at t=1.
#[inline(always)]
pub fn lerp<P>(t: Float, p0: P, p1: P) -> P
where
    Float: Mul<P, Output = P>,
    P: Add<P, Output = P>,
{
    (1.0 - t) * p0 + t * p1
}

/// Returns the sign of a value as `1.0` or `-1.0`. Zero is treated as positive.
///
/// * `v` - The value.
#[inline(always)]
pub fn sign(v: Float) -> Float {
    if v < 0.0 {
        -1.0
    } else {
        1.0
    }
}

/// Return the cosine of an angle.
///
/// * `theta` - The angle in radians.
#[inline(always)]
pub fn cos(theta: Float) -> Float {
    theta.cos()
}

/// Return the sine of an angle.
///
/// * `theta` - The angle in radians.
#[inline(always)]
pub fn sin(theta: Float) -> Float {
    theta.sin()
}

/// Return the tangent of an angle.
///
/// * `theta` - The angle in radians.
#[inline(always)]
pub fn tan(theta: Float) -> Float {
    theta.tan()
}

/// Return the arctangent of a value.
///
/// * `v` - The value.
#[inline(always)]
pub fn atan(v: Float) -> Float {
    v.atan()
}

/// Returns the arccosine of a value after clamping it to [-1, 1] so that
/// floating point round-off never produces NaN.
///
/// * `v` - The cosine value.
#[inline(always)]
pub fn safe_acos(v: Float) -> Float {
    v.clamp_unit().acos()
}

/// Returns the square root of a value clamped to be non-negative.
///
/// * `v` - The value.
#[inline(always)]
pub fn safe_sqrt(v: Float) -> Float {
    max(0.0, v).sqrt()
}

/// Computes the four quadrant arctangent of `y/x`.
///
/// Return values are in the following ranges based on `y` and `x`:
/// * x = 0, y = 0 => 0
/// * x >= 0       => arctan(y/x) -> [-π/2, π/2]
/// * y >= 0       => arctan(y/x) + π -> (π/2, π]
/// * y < 0        =>  arctan(y/x) - π -> (-π, -π/2)
///
/// * `y` - Proportion of y-coordinate.
/// * `x` - Proportion of x-coordinate.
#[inline(always)]
pub fn atan2(y: Float, x: Float) -> Float {
    y.atan2(x)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
