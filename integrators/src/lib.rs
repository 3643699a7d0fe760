//! Integrators

#[macro_use]
extern crate log;

pub mod convergence;
mod config;
mod integrand;
mod sh_integrator;
mod visualization;

// Re-export.
pub use config::*;
pub use integrand::*;
pub use sh_integrator::*;
pub use visualization::*;
