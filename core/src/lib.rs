//! Core

#[macro_use]
extern crate hexf;
#[macro_use]
extern crate log;

// Re-export.
pub mod base;
#[macro_use]
pub mod geometry;
pub mod ltc;
pub mod microfacet;
pub mod rng;
pub mod sampling;
pub mod sh;
pub mod spherical;
