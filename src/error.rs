//! Error types used by identities and status reporting.
//!
//! This module defines three error enums:
//!
//! - [`IdentityError`]: malformed component/pipeline identifiers, returned at construction time.
//! - [`ReportError`]: reasons a [`StatusEvent`](crate::StatusEvent) was discarded by the
//!   aggregator. These are never returned as failures from
//!   [`Aggregator::report`](crate::Aggregator::report); they only travel inside
//!   [`ReportOutcome::Discarded`](crate::ReportOutcome::Discarded) and into logs.
//! - [`ConfigError`]: invalid [`Config`](crate::Config) values.
//!
//! All provide `as_label` for logs/metrics.

use std::time::SystemTime;

use thiserror::Error;

use crate::status::Status;

/// # Errors produced while building identifiers.
///
/// A programming-contract violation on the caller's side: identities are built once,
/// when the pipeline graph is assembled, so these fail fast.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// The component type is empty.
    #[error("component type must not be empty")]
    EmptyComponent,

    /// A type or name contains characters that would break the canonical encoding.
    #[error("invalid {what} {value:?}: must be non-empty and contain no whitespace or '/'")]
    InvalidName {
        /// What was being validated ("component type", "component name", "pipeline name").
        what: &'static str,
        /// The rejected value.
        value: String,
    },

    /// Pipeline signal is not one of `traces`, `metrics`, `logs`, `profiles`.
    #[error("unknown signal {0:?}")]
    UnknownSignal(String),

    /// Component kind is not one of the known categories.
    #[error("unknown component kind {0:?}")]
    InvalidKind(String),
}

impl IdentityError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use statusvisor::IdentityError;
    ///
    /// assert_eq!(IdentityError::EmptyComponent.as_label(), "identity_empty_component");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            IdentityError::EmptyComponent => "identity_empty_component",
            IdentityError::InvalidName { .. } => "identity_invalid_name",
            IdentityError::UnknownSignal(_) => "identity_unknown_signal",
            IdentityError::InvalidKind(_) => "identity_invalid_kind",
        }
    }
}

/// # Reasons a reported status event was discarded.
///
/// Both are expected under concurrent or out-of-order delivery and must not
/// crash the reporting component.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    /// The incoming status is not reachable from the current one.
    #[error("invalid transition {from} -> {to}")]
    InvalidTransition {
        /// Last known status of the instance.
        from: Status,
        /// Rejected incoming status.
        to: Status,
    },

    /// The event is ordered at or before the last event recorded for the instance.
    #[error("stale event (seq {seq}) at or before last recorded (seq {last_seq})")]
    Stale {
        /// Timestamp of the rejected event.
        at: SystemTime,
        /// Sequence of the rejected event.
        seq: u64,
        /// Timestamp of the last applied event.
        last_at: SystemTime,
        /// Sequence of the last applied event.
        last_seq: u64,
    },
}

impl ReportError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use statusvisor::{ReportError, Status};
    ///
    /// let err = ReportError::InvalidTransition { from: Status::Stopped, to: Status::Ok };
    /// assert_eq!(err.as_label(), "report_invalid_transition");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ReportError::InvalidTransition { .. } => "report_invalid_transition",
            ReportError::Stale { .. } => "report_stale",
        }
    }

    /// Returns `true` for stale (out-of-order) events.
    pub fn is_stale(&self) -> bool {
        matches!(self, ReportError::Stale { .. })
    }
}

/// # Errors produced by invalid configuration.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A status appears more than once in a precedence order.
    #[error("status {0} listed more than once in precedence order")]
    DuplicatePrecedence(Status),
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::DuplicatePrecedence(_) => "config_duplicate_precedence",
        }
    }
}
