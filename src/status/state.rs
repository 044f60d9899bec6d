//! # Component health states.
//!
//! Variants are declared in default severity order (least severe first), see
//! [`Precedence`](crate::Precedence) for how severity is actually compared.
//!
//! ```text
//! Starting < Ok < RecoverableError < Stopping < Stopped < PermanentError < FatalError
//! ```
//!
//! `Stopping`/`Stopped` are lifecycle states rather than errors, but a stopped
//! component serves no traffic, so they outrank `RecoverableError`.

use std::fmt;

/// Health state of a component instance or aggregate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Status {
    /// Component is starting up.
    Starting,
    /// Component is running normally.
    Ok,
    /// Component hit an error it may recover from.
    RecoverableError,
    /// Component is shutting down.
    Stopping,
    /// Component has stopped.
    Stopped,
    /// Component hit an error it will not recover from, but the process may continue.
    PermanentError,
    /// Component hit an error that should bring the process down.
    FatalError,
}

impl Status {
    /// All states in default severity order.
    pub const ALL: [Status; 7] = [
        Status::Starting,
        Status::Ok,
        Status::RecoverableError,
        Status::Stopping,
        Status::Stopped,
        Status::PermanentError,
        Status::FatalError,
    ];

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Starting => "starting",
            Status::Ok => "ok",
            Status::RecoverableError => "recoverable_error",
            Status::Stopping => "stopping",
            Status::Stopped => "stopped",
            Status::PermanentError => "permanent_error",
            Status::FatalError => "fatal_error",
        }
    }

    /// Returns `true` for states that may carry error detail.
    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Status::RecoverableError | Status::PermanentError | Status::FatalError
        )
    }

    /// Returns `true` if no further transition is accepted from this state.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Status::Stopped | Status::PermanentError | Status::FatalError
        )
    }

    /// Index in the default severity order.
    #[inline]
    pub(crate) fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
