//! # Aggregator configuration.
//!
//! Provides [`Config`] centralized settings for the [`Aggregator`](crate::Aggregator).
//!
//! Per-listener queue sizes are not configured here; each listener declares its
//! own via [`Listener::queue_capacity`](crate::Listener::queue_capacity).

use crate::status::Precedence;

/// Configuration for the aggregator.
///
/// ## Field semantics
/// - `precedence`: severity order used for worst-wins aggregation
/// - `replay_on_subscribe`: send current aggregates to a listener when it subscribes
///
/// ## Notes
/// All fields are public for flexibility.
#[derive(Clone, Debug)]
pub struct Config {
    /// Total order over statuses; the most severe member wins.
    ///
    /// Defaults to
    /// `Starting < Ok < RecoverableError < Stopping < Stopped < PermanentError < FatalError`.
    pub precedence: Precedence,

    /// Whether a new listener immediately receives the current aggregate of
    /// every pipeline and of the process.
    ///
    /// Disable only for listeners that poll [`Aggregator::snapshot`](crate::Aggregator::snapshot)
    /// themselves.
    pub replay_on_subscribe: bool,
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `precedence = Precedence::default()`
    /// - `replay_on_subscribe = true`
    fn default() -> Self {
        Self {
            precedence: Precedence::default(),
            replay_on_subscribe: true,
        }
    }
}
