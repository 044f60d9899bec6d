//! # Aggregator: folds instance status events into pipeline and process status.
//!
//! The [`Aggregator`] is the single source of truth for instance, pipeline and
//! process status. Components call [`Aggregator::report`] from any thread;
//! observers register through [`Aggregator::subscribe`].
//!
//! ## High-level architecture
//! ```text
//! component ── report(StatusEvent) ──┐
//! component ── report(StatusEvent) ──┼──► [write lock] Tables::apply
//! component ── report(StatusEvent) ──┘         ├─ stale / invalid → logged, discarded
//!                                              ├─ same status     → refresh, no notify
//!                                              └─ changed         → recompute pipelines + process
//!                                                                    └─► Notify(agg) per changed aggregate
//!                                                                         (enqueued before unlock)
//!
//!   dispatcher task ──► ListenerSet ──► per-listener queue ──► Listener::on_status
//! ```
//!
//! ## Rules
//! - `report` never fails and never waits on listeners
//! - Notifications are edge-triggered: one per aggregate whose status changed
//! - `current_status`/`snapshot` take a read lock only
//! - A new listener receives the current aggregate of every pipeline and of the
//!   process before any later change (if `Config::replay_on_subscribe`)
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use statusvisor::{
//!     Aggregator, ComponentId, Config, HealthProbe, InstanceId, Kind, Scope, Status, StatusEvent,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let probe = Arc::new(HealthProbe::new());
//!     let agg = Aggregator::builder(Config::default())
//!         .with_listener(probe.clone())
//!         .build();
//!
//!     let otlp = InstanceId::new(ComponentId::new("otlp"), Kind::Receiver, ["traces".parse().unwrap()]).unwrap();
//!     agg.report(StatusEvent::new(otlp.clone(), Status::Starting));
//!     agg.report(StatusEvent::new(otlp, Status::Ok));
//!
//!     assert_eq!(agg.current_status(&Scope::Process).unwrap().status, Status::Ok);
//!
//!     agg.shutdown().await;
//!     assert!(probe.is_healthy());
//! }
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::builder::AggregatorBuilder;
use super::dispatch::Dispatch;
use super::scope::{AggregateStatus, Scope};
use super::tables::{Applied, Tables};
use crate::config::Config;
use crate::error::ReportError;
use crate::listeners::{Listener, ListenerId};
use crate::status::StatusEvent;

/// What happened to a reported event.
///
/// Purely informational: `report` is fire-and-forget and callers may ignore it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReportOutcome {
    /// Status changed or the component joined a pipeline; `changed` aggregates were notified.
    Applied { changed: usize },
    /// Same status and pipelines as before; timestamps and error detail were refreshed.
    Unchanged,
    /// Event was stale or an invalid transition.
    Discarded(ReportError),
}

/// Concurrent status aggregator.
pub struct Aggregator {
    cfg: Config,
    tables: RwLock<Tables>,
    dispatch: mpsc::UnboundedSender<Dispatch>,
    dispatcher: Mutex<Option<JoinHandle<()>>>,
    next_listener: AtomicU64,
}

impl Aggregator {
    /// Returns a builder for an aggregator with the given configuration.
    pub fn builder(cfg: Config) -> AggregatorBuilder {
        AggregatorBuilder::new(cfg)
    }

    /// Creates an aggregator without initial listeners.
    ///
    /// Must be called within a tokio runtime (spawns the dispatcher task).
    pub fn new(cfg: Config) -> Arc<Self> {
        AggregatorBuilder::new(cfg).build()
    }

    pub(crate) fn new_internal(
        cfg: Config,
        dispatch: mpsc::UnboundedSender<Dispatch>,
        dispatcher: JoinHandle<()>,
    ) -> Self {
        Self {
            cfg,
            tables: RwLock::new(Tables::new()),
            dispatch,
            dispatcher: Mutex::new(Some(dispatcher)),
            next_listener: AtomicU64::new(1),
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Folds one status event.
    ///
    /// Validates ordering and the transition against the component's last
    /// known status (whatever pipeline set it reports under), updates it,
    /// recomputes every pipeline the component serves and the process, and
    /// enqueues one notification per aggregate whose status changed. Stale and invalid events are logged and discarded.
    pub fn report(&self, event: StatusEvent) -> ReportOutcome {
        let mut tables = self.write_tables();
        match tables.apply(&event, &self.cfg.precedence) {
            Ok(Applied::Changed(changed)) => {
                let count = changed.len();
                for agg in changed {
                    tracing::debug!(scope = %agg.scope, status = %agg.status, "aggregate changed");
                    self.send(Dispatch::Notify(Arc::new(agg)));
                }
                ReportOutcome::Applied { changed: count }
            }
            Ok(Applied::Unchanged) => ReportOutcome::Unchanged,
            Err(err) => {
                drop(tables);
                match &err {
                    ReportError::InvalidTransition { from, to } => {
                        tracing::warn!(
                            instance = %event.instance,
                            %from,
                            %to,
                            label = err.as_label(),
                            "invalid status transition discarded"
                        );
                    }
                    ReportError::Stale { .. } => {
                        tracing::debug!(
                            instance = %event.instance,
                            status = %event.status,
                            seq = event.seq,
                            label = err.as_label(),
                            "stale status event discarded"
                        );
                    }
                }
                ReportOutcome::Discarded(err)
            }
        }
    }

    /// Last computed status of `scope`, or `None` if nothing was reported for it.
    pub fn current_status(&self, scope: &Scope) -> Option<AggregateStatus> {
        self.read_tables().get(scope)
    }

    /// Every pipeline aggregate (canonical order) followed by the process aggregate.
    pub fn snapshot(&self) -> Vec<AggregateStatus> {
        self.read_tables().aggregates()
    }

    /// Registers a listener and returns its handle.
    ///
    /// The current aggregates are replayed to it first (see [`Config::replay_on_subscribe`]).
    pub fn subscribe(&self, listener: Arc<dyn Listener>) -> ListenerId {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        let name = listener.name();

        // Snapshot and enqueue under the same lock `report` uses to enqueue.
        let tables = self.read_tables();
        let replay = if self.cfg.replay_on_subscribe {
            tables.aggregates().into_iter().map(Arc::new).collect()
        } else {
            Vec::new()
        };
        let replayed = replay.len();
        self.send(Dispatch::Subscribe {
            id,
            listener,
            replay,
        });
        drop(tables);

        tracing::debug!(listener = name, %id, replayed, "listener subscribed");
        id
    }

    /// Removes a listener. Notifications already queued for it are still delivered.
    pub fn unsubscribe(&self, id: ListenerId) {
        self.send(Dispatch::Unsubscribe(id));
    }

    /// Stops the dispatcher and waits for every listener to drain its queue.
    ///
    /// Reports after shutdown are still folded into the tables, but nothing is delivered.
    pub async fn shutdown(&self) {
        self.send(Dispatch::Shutdown);
        let handle = self
            .dispatcher
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            if let Err(err) = handle.await {
                tracing::error!(error = %err, "dispatcher task failed");
            }
        }
    }

    fn send(&self, msg: Dispatch) {
        if self.dispatch.send(msg).is_err() {
            tracing::trace!("dispatcher stopped; message dropped");
        }
    }

    fn read_tables(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_tables(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }
}
