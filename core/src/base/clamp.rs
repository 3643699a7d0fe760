//! Clamp

use super::Float;
use num_traits::Num;

/// Clamps a value x to [min, max].
///
/// * `x`   - The number to clamp.
/// * `min` - Minimum value.
/// * `max` - Maximum value.
pub fn clamp<T>(x: T, min: T, max: T) -> T
where
    T: Num + PartialOrd + Copy,
{
    if x < min {
        min
    } else if x > max {
        max
    } else {
        x
    }
}

/// Interface for clamping values.
pub trait Clamp<T: Copy> {
    /// Clamps the values to given [low, high] interval.
    ///
    /// * `low`  - Low value.
    /// * `high` - High value.
    fn clamp(&self, low: T, high: T) -> Self;

    /// Clamps the value to the domain of `acos()` and `asin()`, i.e. [-1, 1].
    fn clamp_unit(&self) -> Self;
}

impl Clamp<Float> for Float {
    /// Clamps the values to given [low, high] interval.
    ///
    /// * `low`  - Low value.
    /// * `high` - High value.
    fn clamp(&self, low: Float, high: Float) -> Self {
        clamp(*self, low, high)
    }

    /// Clamps the value to [-1, 1].
    fn clamp_unit(&self) -> Self {
        clamp(*self, -1.0, 1.0)
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
    fn clamp_unit_keeps_round_off_in_domain() {
        assert_eq!((1.0000001 as Float).clamp_unit(), 1.0);
        assert_eq!((-1.0000001 as Float).clamp_unit(), -1.0);
        assert_eq!((0.25 as Float).clamp_unit(), 0.25);
    }

    proptest! {
        #[test]
        fn clamp_is_within_bounds(x in -100.0..100.0f32, lo in -10.0..0.0f32, hi in 0.0..10.0f32) {
            let c = clamp(x, lo, hi);
            prop_assert!(c >= lo && c <= hi);
        }

        #[test]
        fn clamp_i32(x in -100..100i32) {
            prop_assert_eq!(clamp(x, -5, 5), x.max(-5).min(5));
        }
    }
}
