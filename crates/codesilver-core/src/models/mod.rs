//! Domain models for the CodeSilver engine.

mod analysis;
mod knowledge;

pub use analysis::*;
pub use knowledge::*;
