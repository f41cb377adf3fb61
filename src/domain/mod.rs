//! Domain layer types and invariants.

pub mod channel;
pub mod construct;
pub mod error;
pub mod types;
