//! Light Handles

use std::fmt;

/// Identifies a light in a registry. Negative values never refer to a light.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct LightHandle(pub i32);

impl LightHandle {
    /// The handle that refers to no light.
    pub const INVALID: Self = Self(-1);

    /// Returns the slot index, or `None` for negative handles.
    pub fn index(&self) -> Option<usize> {
        if self.0 < 0 {
            None
        } else {
            Some(self.0 as usize)
        }
    }
}

impl Default for LightHandle {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for LightHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "light#{}", self.0)
    }
}
