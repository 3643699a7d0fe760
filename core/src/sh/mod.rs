//! Spherical Harmonics

mod basis;
mod zonal;

// Re-export
pub use basis::*;
pub use zonal::*;
