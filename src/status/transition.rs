//! # Per-instance status state machine.
//!
//! Pure functions deciding whether an instance may move from its last known
//! status to an incoming one.
//!
//! ## Transitions
//! ```text
//! (none)           ──► any                      component has never reported
//! Starting         ──► Ok | RecoverableError | PermanentError | FatalError | Stopping
//! Ok               ──► RecoverableError | PermanentError | FatalError | Stopping
//! RecoverableError ──► Ok | PermanentError | FatalError | Stopping
//! Stopping         ──► Stopped
//! Stopped | PermanentError | FatalError      terminal
//!
//! X ──► X  is always accepted as a no-op (Transition::Unchanged)
//! ```

use crate::error::ReportError;
use crate::status::Status;

/// Result of an accepted transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Status changes to the incoming one.
    Changed,
    /// Incoming status equals the current one.
    Unchanged,
}

/// Validates moving from `current` (if any) to `next`.
///
/// Returns [`ReportError::InvalidTransition`] when `next` is not reachable.
pub fn check(current: Option<Status>, next: Status) -> Result<Transition, ReportError> {
    let Some(from) = current else {
        return Ok(Transition::Changed);
    };
    if from == next {
        return Ok(Transition::Unchanged);
    }

    let allowed = match from {
        Status::Starting => matches!(
            next,
            Status::Ok
                | Status::RecoverableError
                | Status::PermanentError
                | Status::FatalError
                | Status::Stopping
        ),
        Status::Ok => matches!(
            next,
            Status::RecoverableError | Status::PermanentError | Status::FatalError | Status::Stopping
        ),
        Status::RecoverableError => matches!(
            next,
            Status::Ok | Status::PermanentError | Status::FatalError | Status::Stopping
        ),
        Status::Stopping => next == Status::Stopped,
        Status::Stopped | Status::PermanentError | Status::FatalError => false,
    };

    if allowed {
        Ok(Transition::Changed)
    } else {
        Err(ReportError::InvalidTransition { from, to: next })
    }
}

/// Folds a sequence of incoming statuses, skipping invalid transitions.
///
/// This is the reference for what the aggregator's last-known status of an
/// instance must be after replaying the same in-order sequence.
pub fn fold(initial: Option<Status>, statuses: impl IntoIterator<Item = Status>) -> Option<Status> {
    statuses
        .into_iter()
        .fold(initial, |current, next| match check(current, next) {
            Ok(_) => Some(next),
            Err(_) => current,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_observation_accepts_anything() {
        for s in Status::ALL {
            assert_eq!(check(None, s), Ok(Transition::Changed));
        }
    }

    #[test]
    fn test_same_status_is_unchanged() {
        for s in Status::ALL {
            assert_eq!(check(Some(s), s), Ok(Transition::Unchanged));
        }
    }

    #[test]
    fn test_documented_transitions() {
        use Status::*;
        let valid = [
            (Starting, Ok),
            (Starting, RecoverableError),
            (Starting, PermanentError),
            (Starting, FatalError),
            (Starting, Stopping),
            (Ok, RecoverableError),
            (Ok, PermanentError),
            (Ok, FatalError),
            (Ok, Stopping),
            (RecoverableError, Ok),
            (RecoverableError, PermanentError),
            (RecoverableError, FatalError),
            (RecoverableError, Stopping),
            (Stopping, Stopped),
        ];
        for from in Status::ALL {
            for to in Status::ALL {
                if from == to {
                    continue;
                }
                let expected = valid.contains(&(from, to));
                assert_eq!(
                    check(Some(from), to).is_ok(),
                    expected,
                    "{from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn test_terminal_states_reject_everything_else() {
        for from in [Status::Stopped, Status::PermanentError, Status::FatalError] {
            for to in Status::ALL.into_iter().filter(|s| *s != from) {
                assert_eq!(
                    check(Some(from), to),
                    Err(ReportError::InvalidTransition { from, to })
                );
            }
        }
    }

    #[test]
    fn test_fold_skips_invalid() {
        let end = fold(
            None,
            [
                Status::Starting,
                Status::Stopped, // invalid from Starting
                Status::Ok,
                Status::RecoverableError,
                Status::Ok,
                Status::Stopping,
                Status::Ok, // invalid from Stopping
                Status::Stopped,
            ],
        );
        assert_eq!(end, Some(Status::Stopped));
    }

    fn arb_status() -> impl Strategy<Value = Status> {
        prop::sample::select(Status::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_terminal_is_absorbing(seq in prop::collection::vec(arb_status(), 0..20)) {
            for terminal in [Status::PermanentError, Status::FatalError, Status::Stopped] {
                prop_assert_eq!(fold(Some(terminal), seq.clone()), Some(terminal));
            }
        }
    }
}
