//! Infrastructure adapters and runtime bootstrap.

pub mod channels;
pub mod error;
pub mod http;
pub mod telemetry;
