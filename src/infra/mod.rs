//! Runtime bootstrap: telemetry and token-store construction.

pub mod error;
pub mod store;
pub mod telemetry;
