//! Utility modules

pub mod amount;
pub mod memory_source;
pub mod validation;

pub use amount::*;
pub use memory_source::*;
pub use validation::*;
