//! # Status events reported by components.
//!
//! A [`StatusEvent`] is one health observation for one [`InstanceId`]: the new
//! [`Status`], when it was observed, and optional error detail.
//!
//! ## Ordering guarantees
//! Each event gets a process-wide sequence number (`seq`) that increases
//! monotonically. Events of one instance are ordered by `(at, seq)`, so two
//! events with the same wall-clock timestamp still have a strict order.
//!
//! ## Example
//! ```rust
//! use statusvisor::{ComponentId, InstanceId, Kind, Status, StatusEvent};
//!
//! let id = InstanceId::new(ComponentId::new("otlp"), Kind::Exporter, ["traces".parse().unwrap()]).unwrap();
//! let ev = StatusEvent::new(id.clone(), Status::RecoverableError).with_error("connection refused");
//!
//! assert_eq!(ev.status, Status::RecoverableError);
//! assert_eq!(ev.error.as_deref(), Some("connection refused"));
//!
//! // Error detail is only kept for error states.
//! let ok = StatusEvent::new(id, Status::Ok).with_error("ignored");
//! assert!(ok.error.is_none());
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

use crate::identity::InstanceId;
use crate::status::Status;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(1);

/// Health observation for a single component instance.
#[derive(Clone, Debug)]
pub struct StatusEvent {
    /// Instance the observation is about.
    pub instance: InstanceId,
    /// Observed status.
    pub status: Status,
    /// Wall-clock timestamp of the observation.
    pub at: SystemTime,
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Error detail; only set for error states.
    pub error: Option<Arc<str>>,
}

impl StatusEvent {
    /// Creates an event stamped with the current time and the next sequence number.
    pub fn new(instance: InstanceId, status: Status) -> Self {
        Self {
            instance,
            status,
            at: SystemTime::now(),
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            error: None,
        }
    }

    /// Shorthand for an error-state event with detail.
    pub fn from_error(instance: InstanceId, status: Status, error: impl Into<Arc<str>>) -> Self {
        Self::new(instance, status).with_error(error)
    }

    /// Attaches error detail. Ignored unless the status is an error state.
    #[inline]
    pub fn with_error(mut self, error: impl Into<Arc<str>>) -> Self {
        if self.status.is_error() {
            self.error = Some(error.into());
        }
        self
    }

    /// Overrides the observation timestamp.
    #[inline]
    pub fn with_timestamp(mut self, at: SystemTime) -> Self {
        self.at = at;
        self
    }

    /// Ordering key within one instance's timeline.
    #[inline]
    pub(crate) fn order_key(&self) -> (SystemTime, u64) {
        (self.at, self.seq)
    }
}
