//! Lights

#[macro_use]
extern crate log;

mod handle;
mod plane;
mod quad;
mod registry;

// Re-export.
pub use handle::*;
pub use plane::*;
pub use quad::*;
pub use registry::*;
