//! Error types shared across the crate, one enum per concern.

pub mod types;
pub use types::*;
