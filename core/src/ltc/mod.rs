//! Linearly Transformed Cosines

mod evaluate;
mod table;

// Re-exports
pub use evaluate::*;
pub use table::*;
