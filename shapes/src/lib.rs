//! Shapes

#[macro_use]
extern crate log;

mod common;
mod planar_rectangle;
mod rectangle;
mod spherical_rectangle;
mod triangle;

// Re-export
pub use common::*;
pub use planar_rectangle::*;
pub use rectangle::*;
pub use spherical_rectangle::*;
pub use triangle::*;
