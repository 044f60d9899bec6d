//! # Status listeners.
//!
//! This module provides the [`Listener`] trait, the fan-out set that feeds
//! listeners, and built-in implementations.
//!
//! ## Architecture
//! ```text
//! Aggregator::report ── changed aggregates ──► dispatch channel (ordered)
//!                                                   │
//!                                                   ▼
//!                                             dispatcher task ──► ListenerSet
//!                                                              ┌─────┼──────┐
//!                                                              ▼     ▼      ▼
//!                                                      HealthProbe LogReporter Custom
//! ```

mod embedded;
mod listener;
mod set;

use std::fmt;

pub use embedded::HealthProbe;
#[cfg(feature = "logging")]
pub use embedded::LogReporter;
pub use listener::Listener;
pub(crate) use set::ListenerSet;

/// Handle returned by [`Aggregator::subscribe`](crate::Aggregator::subscribe).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}
