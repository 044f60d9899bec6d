//! # Severity precedence for worst-wins aggregation.
//!
//! [`Precedence`] is a total order over [`Status`]. Aggregates take the
//! maximum of their members under it.
//!
//! ## Example
//! ```rust
//! use statusvisor::{Precedence, Status};
//!
//! let p = Precedence::default();
//! assert_eq!(p.worst([Status::Ok, Status::Stopped, Status::RecoverableError]), Some(Status::Stopped));
//!
//! // Errors above lifecycle states:
//! let custom = Precedence::from_order([
//!     Status::Starting,
//!     Status::Ok,
//!     Status::Stopping,
//!     Status::Stopped,
//!     Status::RecoverableError,
//!     Status::PermanentError,
//!     Status::FatalError,
//! ]).unwrap();
//! assert_eq!(custom.worst([Status::Stopped, Status::RecoverableError]), Some(Status::RecoverableError));
//! ```

use crate::error::ConfigError;
use crate::status::Status;

/// Total order over statuses; higher rank is more severe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Precedence {
    /// Rank of each status, indexed by [`Status::index`].
    ranks: [u8; 7],
}

impl Precedence {
    /// Builds a precedence from statuses listed least severe first.
    ///
    /// Fails unless `order` is a permutation of all seven statuses.
    pub fn from_order(order: [Status; 7]) -> Result<Self, ConfigError> {
        let mut ranks = [u8::MAX; 7];
        for (rank, status) in order.iter().enumerate() {
            let slot = &mut ranks[status.index()];
            if *slot != u8::MAX {
                return Err(ConfigError::DuplicatePrecedence(*status));
            }
            *slot = rank as u8;
        }
        Ok(Self { ranks })
    }

    /// Rank of `status` (0 = least severe).
    #[inline]
    pub fn rank(&self, status: Status) -> u8 {
        self.ranks[status.index()]
    }

    /// Returns `true` if `a` is strictly more severe than `b`.
    #[inline]
    pub fn is_worse(&self, a: Status, b: Status) -> bool {
        self.rank(a) > self.rank(b)
    }

    /// Most severe status of `statuses`, or `None` if empty.
    pub fn worst(&self, statuses: impl IntoIterator<Item = Status>) -> Option<Status> {
        statuses.into_iter().max_by_key(|s| self.rank(*s))
    }
}

impl Default for Precedence {
    /// `Starting < Ok < RecoverableError < Stopping < Stopped < PermanentError < FatalError`.
    fn default() -> Self {
        // Status::ALL is a permutation by construction.
        let mut ranks = [0u8; 7];
        for (rank, status) in Status::ALL.iter().enumerate() {
            ranks[status.index()] = rank as u8;
        }
        Self { ranks }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_order_is_declaration_order() {
        let p = Precedence::default();
        for pair in Status::ALL.windows(2) {
            assert!(p.is_worse(pair[1], pair[0]), "{} !> {}", pair[1], pair[0]);
        }
    }

    #[test]
    fn test_worst_of_empty_is_none() {
        assert_eq!(Precedence::default().worst([]), None);
    }

    #[test]
    fn test_duplicate_rejected() {
        let err = Precedence::from_order([
            Status::Starting,
            Status::Ok,
            Status::Ok,
            Status::Stopping,
            Status::Stopped,
            Status::PermanentError,
            Status::FatalError,
        ])
        .unwrap_err();
        assert_eq!(err, ConfigError::DuplicatePrecedence(Status::Ok));
    }

    #[test]
    fn test_custom_order_changes_worst() {
        let p = Precedence::from_order([
            Status::Starting,
            Status::Stopping,
            Status::Stopped,
            Status::Ok,
            Status::RecoverableError,
            Status::PermanentError,
            Status::FatalError,
        ])
        .unwrap();
        assert_eq!(p.worst([Status::Stopped, Status::Ok]), Some(Status::Ok));
    }
}
