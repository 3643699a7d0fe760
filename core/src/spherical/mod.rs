//! Spherical polygon math: solid angles and axial moments.

mod moments;
mod polygon;

// Re-export
pub use moments::*;
pub use polygon::*;
