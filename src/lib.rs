//! # statusvisor
//!
//! **Statusvisor** tracks the health of components wired into telemetry
//! pipelines and folds it into pipeline-level and process-level status.
//!
//! It provides a comparable identity for component instances shared across
//! pipelines, a per-instance status state machine, and a concurrent
//! aggregator that notifies listeners only when an aggregate actually changes.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │ receiver     │   │ processor    │   │ exporter     │
//!     │ InstanceId   │   │ InstanceId   │   │ InstanceId   │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            │ report(StatusEvent)                 │
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Aggregator                                                       │
//! │  - Tables (last known status per InstanceId, sequence ordered)    │
//! │  - transition::check (per-instance state machine)                 │
//! │  - worst-wins recompute: pipelines of the instance, then process  │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   │ Notify(changed aggregate)
//!                                   ▼
//!                       ┌────────────────────────┐
//!                       │   dispatcher task      │
//!                       └───────────┬────────────┘
//!                                   ▼
//!                              ListenerSet
//!                          (per-listener queues)
//!                        ┌──────────┼──────────┐
//!                        ▼          ▼          ▼
//!                   HealthProbe LogReporter  custom
//! ```
//!
//! ### Severity (worst wins)
//! ```text
//! Starting < Ok < RecoverableError < Stopping < Stopped < PermanentError < FatalError
//! ```
//!
//! ## Features
//! | Area           | Description                                                  | Key types / traits                          |
//! |----------------|--------------------------------------------------------------|---------------------------------------------|
//! | **Identity**   | Order-independent instance keys with pipeline membership.    | [`InstanceId`], [`ComponentId`], [`PipelineId`] |
//! | **Status**     | States, severity order, events, transition rules.            | [`Status`], [`Precedence`], [`StatusEvent`] |
//! | **Aggregation**| Concurrent, edge-triggered pipeline/process status.          | [`Aggregator`], [`AggregateStatus`], [`Scope`] |
//! | **Listeners**  | Isolated, non-blocking observers.                            | [`Listener`], [`HealthProbe`]               |
//! | **Errors**     | Typed errors for identities, reports and configuration.      | [`IdentityError`], [`ReportError`]          |
//! | **Configuration** | Precedence order and replay behavior.                     | [`Config`]                                  |
//!
//! ## Optional features
//! - `logging` (default): exports the built-in [`LogReporter`] listener.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use statusvisor::{
//!     Aggregator, ComponentId, Config, HealthProbe, InstanceId, Kind, PipelineId, Scope, Signal,
//!     Status, StatusEvent,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let probe = Arc::new(HealthProbe::new());
//!     let agg = Aggregator::builder(Config::default())
//!         .with_listener(probe.clone())
//!         .build();
//!
//!     let traces = PipelineId::new(Signal::Traces);
//!     let receiver = InstanceId::new(ComponentId::new("otlp"), Kind::Receiver, [traces.clone()])?;
//!     let exporter = InstanceId::new(ComponentId::new("debug"), Kind::Exporter, [traces.clone()])?;
//!
//!     agg.report(StatusEvent::new(receiver.clone(), Status::Ok));
//!     agg.report(StatusEvent::from_error(exporter, Status::RecoverableError, "backend down"));
//!
//!     let pipeline = agg.current_status(&Scope::Pipeline(traces)).unwrap();
//!     assert_eq!(pipeline.status, Status::RecoverableError);
//!     assert_eq!(pipeline.error.as_deref(), Some("backend down"));
//!
//!     agg.shutdown().await;
//!     assert!(!probe.is_healthy());
//!     Ok(())
//! }
//! ```

mod aggregate;
mod config;
mod error;
mod identity;
mod listeners;
mod status;

// ---- Public re-exports ----

pub use aggregate::{AggregateStatus, Aggregator, AggregatorBuilder, ReportOutcome, Scope};
pub use config::Config;
pub use error::{ConfigError, IdentityError, ReportError};
pub use identity::{ComponentId, InstanceId, Kind, PipelineId, Pipelines, Signal};
pub use listeners::{HealthProbe, Listener, ListenerId};
pub use status::{transition, Precedence, Status, StatusEvent, Transition};

// Optional: built-in log reporter listener.
// Enabled by default; disable with `default-features = false`.
#[cfg(feature = "logging")]
pub use listeners::LogReporter;
