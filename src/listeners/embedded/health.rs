//! # HealthProbe – latest status per scope for health endpoints
//!
//! Keeps the most recent [`AggregateStatus`] of every scope it is notified
//! about, so a health-check responder can answer synchronously without
//! touching the aggregator.
//!
//! ## Behavior
//! - Replay on subscribe fills the table right away.
//! - `is_healthy()` looks at the process scope only:
//!   `Starting`/`Ok` → healthy, `RecoverableError` → configurable, anything else → unhealthy.
//! - No process status yet → unhealthy.
//!
//! ## Internal scheme
//! ```text
//! on_status(agg):
//!   └─ latest[agg.scope] = agg
//!
//! snapshot() -> Vec<(Scope, Status)>  (sorted copy of the table)
//! ```

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::aggregate::{AggregateStatus, Scope};
use crate::listeners::Listener;
use crate::status::Status;

/// Tracks the latest status of each scope.
pub struct HealthProbe {
    latest: RwLock<BTreeMap<Scope, AggregateStatus>>,
    recoverable_is_healthy: bool,
    capacity: usize,
}

impl HealthProbe {
    #[must_use]
    pub fn new() -> Self {
        Self {
            latest: RwLock::new(BTreeMap::new()),
            recoverable_is_healthy: false,
            capacity: 2048,
        }
    }

    /// Treat a process in `RecoverableError` as healthy.
    #[must_use]
    pub fn with_recoverable_healthy(mut self, healthy: bool) -> Self {
        self.recoverable_is_healthy = healthy;
        self
    }

    /// Configure the queue capacity for this listener.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    /// Latest known status of `scope`.
    pub fn status_of(&self, scope: &Scope) -> Option<Status> {
        self.latest
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(scope)
            .map(|agg| agg.status)
    }

    /// Latest full aggregate of `scope`.
    pub fn aggregate_of(&self, scope: &Scope) -> Option<AggregateStatus> {
        self.latest
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(scope)
            .cloned()
    }

    /// Whether the process as a whole should be reported healthy.
    pub fn is_healthy(&self) -> bool {
        match self.status_of(&Scope::Process) {
            Some(Status::Starting | Status::Ok) => true,
            Some(Status::RecoverableError) => self.recoverable_is_healthy,
            _ => false,
        }
    }

    /// Sorted copy of every known scope and its status.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(Scope, Status)> {
        self.latest
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(scope, agg)| (scope.clone(), agg.status))
            .collect()
    }
}

impl Default for HealthProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Listener for HealthProbe {
    async fn on_status(&self, agg: &AggregateStatus) {
        self.latest
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(agg.scope.clone(), agg.clone());
    }

    fn name(&self) -> &'static str {
        "HealthProbe"
    }

    fn queue_capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::SystemTime;

    fn agg(scope: Scope, status: Status) -> AggregateStatus {
        AggregateStatus {
            scope,
            status,
            error: None,
            contributors: BTreeMap::new(),
            changed_at: SystemTime::UNIX_EPOCH,
            updated_at: SystemTime::UNIX_EPOCH,
        }
    }

    #[tokio::test]
    async fn test_health_follows_process_scope() {
        let probe = HealthProbe::new();
        assert!(!probe.is_healthy());

        probe.on_status(&agg(Scope::Process, Status::Ok)).await;
        assert!(probe.is_healthy());

        probe
            .on_status(&agg(Scope::Process, Status::RecoverableError))
            .await;
        assert!(!probe.is_healthy());

        let lenient = HealthProbe::new().with_recoverable_healthy(true);
        lenient
            .on_status(&agg(Scope::Process, Status::RecoverableError))
            .await;
        assert!(lenient.is_healthy());
    }

    #[tokio::test]
    async fn test_tracks_latest_per_scope() {
        let probe = HealthProbe::new();
        let traces = Scope::Pipeline("traces".parse().unwrap());

        probe.on_status(&agg(traces.clone(), Status::Starting)).await;
        probe.on_status(&agg(traces.clone(), Status::Stopped)).await;
        probe.on_status(&agg(Scope::Process, Status::Stopped)).await;

        assert_eq!(probe.status_of(&traces), Some(Status::Stopped));
        assert_eq!(
            probe.snapshot(),
            vec![(Scope::Process, Status::Stopped), (traces, Status::Stopped)]
        );
        assert!(!probe.is_healthy());
    }
}
