//! # Built-in listeners
//!
//! - [`HealthProbe`]: latest status per scope, answers `is_healthy()` for health endpoints.
//! - [`LogReporter`]: logs every change through `tracing` (feature `logging`).

mod health;
#[cfg(feature = "logging")]
mod log;

pub use health::HealthProbe;
#[cfg(feature = "logging")]
pub use log::LogReporter;
