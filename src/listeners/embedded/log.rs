//! # LogReporter: aggregate changes as log lines
//!
//! A listener that writes every notification through `tracing`, at a level
//! picked from the status severity.
//!
//! ## Example output
//! ```text
//! INFO  scope=pipeline:traces status=ok contributors=2 status changed
//! WARN  scope=pipeline:logs status=recoverable_error error="connection refused" contributors=3 status changed
//! ERROR scope=process status=fatal_error error="disk full" contributors=4 status changed
//! ```

use async_trait::async_trait;

use crate::aggregate::AggregateStatus;
use crate::listeners::Listener;
use crate::status::Status;

/// Log-based status reporter.
#[derive(Default)]
pub struct LogReporter;

impl LogReporter {
    /// Construct a new [`LogReporter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Listener for LogReporter {
    async fn on_status(&self, agg: &AggregateStatus) {
        let contributors = agg.contributors.len();
        let error = agg.error.as_deref().unwrap_or("");
        match agg.status {
            Status::Starting | Status::Ok => {
                tracing::info!(scope = %agg.scope, status = %agg.status, contributors, "status changed");
            }
            Status::RecoverableError | Status::Stopping | Status::Stopped => {
                tracing::warn!(scope = %agg.scope, status = %agg.status, error, contributors, "status changed");
            }
            Status::PermanentError | Status::FatalError => {
                tracing::error!(scope = %agg.scope, status = %agg.status, error, contributors, "status changed");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogReporter"
    }
}
