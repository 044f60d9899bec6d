//! # Status listener trait.
//!
//! Provides [`Listener`] an extension point for observers of aggregate status
//! changes (health endpoints, log reporters, alert hooks).
//!
//! Each listener gets:
//! - **Dedicated worker task** (runs independently)
//! - **Per-listener bounded queue** (capacity via [`Listener::queue_capacity`])
//! - **Panic isolation** (panics are caught and logged)
//!
//! ## Architecture
//! ```text
//! Aggregator::report ──► dispatcher ──► [bounded queue] ──► worker task ──► listener.on_status()
//!                                                                       └─► panic caught → logged
//! ```
//!
//! ## Rules
//! - A slow listener only affects its own queue.
//! - Queue overflow drops the notification **for this listener only**.
//! - Notifications are processed sequentially (FIFO) per listener.
//! - Listeners never block `report()` or each other.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use statusvisor::{AggregateStatus, Listener, Scope, Status};
//!
//! struct Pager;
//!
//! #[async_trait]
//! impl Listener for Pager {
//!     async fn on_status(&self, agg: &AggregateStatus) {
//!         if agg.scope == Scope::Process && agg.status == Status::FatalError {
//!             // page someone
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "pager" }
//!     fn queue_capacity(&self) -> usize { 64 }
//! }
//! ```

use async_trait::async_trait;

use crate::aggregate::AggregateStatus;

/// Observer of aggregate status changes.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Handle errors internally; do not panic.
/// - Slow processing affects only this listener's queue.
#[async_trait]
pub trait Listener: Send + Sync + 'static {
    /// Handles one changed (or replayed) aggregate.
    ///
    /// Called from a dedicated worker task, never from `report()`.
    async fn on_status(&self, status: &AggregateStatus);

    /// Returns the listener name used in logs.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Returns the preferred queue capacity for this listener.
    ///
    /// The runtime clamps capacity to a minimum of 1.
    ///
    /// Default: 1024.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
