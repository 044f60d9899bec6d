//! # Non-blocking fan-out to listeners.
//!
//! Provides [`ListenerSet`], which distributes aggregate notifications to listeners
//! without blocking the caller.
//!
//! ## Architecture
//! ```text
//! emit_arc(status)
//!     │
//!     ├──► [queue 1] ──► worker 1 ──► listener1.on_status()
//!     │    (bounded)         └──────► panic → logged
//!     ├──► [queue 2] ──► worker 2 ──► listener2.on_status()
//!     │    (bounded)
//!     └──► [queue N] ──► worker N ──► listenerN.on_status()
//!          (bounded)
//! ```
//!
//! ## Rules
//! - **No cross-listener ordering**: listener A may process change N while B processes N+5
//! - **Overflow**: notification dropped for that listener only, logged at `warn`
//! - **Non-blocking**: `emit_arc()` returns immediately (uses `try_send`)
//! - **Isolation**: slow/panicking listener doesn't affect others
//! - **Per-listener FIFO**: each listener sees notifications in order
//! - **Replay**: handed to the worker at registration and delivered before its queue, never dropped
//!
//! ## Panic handling
//! Workers use `catch_unwind`; the panic is logged and the worker continues
//! with the next notification.
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave shared state inconsistent
//! if a listener uses `Arc<Mutex<T>>` and panics while holding the lock.

use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::aggregate::AggregateStatus;
use crate::listeners::{Listener, ListenerId};

/// Per-listener channel metadata.
struct ListenerChannel {
    id: ListenerId,
    name: &'static str,
    sender: mpsc::Sender<Arc<AggregateStatus>>,
}

/// Fan-out coordinator owned by the aggregator's dispatcher task.
///
/// Mutated only by that task, so it needs no lock of its own.
pub(crate) struct ListenerSet {
    channels: Vec<ListenerChannel>,
    workers: Vec<JoinHandle<()>>,
}

impl ListenerSet {
    pub(crate) fn new() -> Self {
        Self {
            channels: Vec::new(),
            workers: Vec::new(),
        }
    }

    /// Registers a listener and spawns its worker.
    ///
    /// - Bounded mpsc queue (capacity from [`Listener::queue_capacity`], min 1)
    /// - Dedicated worker task (runs until the queue is closed)
    /// - `replay` is moved into the worker and delivered before anything queued,
    ///   so it never competes for queue capacity
    pub(crate) fn add(
        &mut self,
        id: ListenerId,
        listener: Arc<dyn Listener>,
        replay: Vec<Arc<AggregateStatus>>,
    ) {
        self.prune_workers();

        let cap = listener.queue_capacity().max(1);
        let name = listener.name();
        let (tx, mut rx) = mpsc::channel::<Arc<AggregateStatus>>(cap);
        let replayed = replay.len();

        let handle = tokio::spawn(async move {
            for status in replay {
                notify(listener.as_ref(), name, &status).await;
            }
            while let Some(status) = rx.recv().await {
                notify(listener.as_ref(), name, &status).await;
            }
        });
        tracing::debug!(listener = name, id = %id, capacity = cap, replayed, "listener registered");
        self.channels.push(ListenerChannel {
            id,
            name,
            sender: tx,
        });
        self.workers.push(handle);
    }

    /// Unregisters a listener. Its worker drains what is already queued, then exits.
    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        self.prune_workers();

        let before = self.channels.len();
        self.channels.retain(|c| c.id != id);
        let removed = self.channels.len() != before;
        if removed {
            tracing::debug!(id = %id, "listener unregistered");
        }
        removed
    }

    fn prune_workers(&mut self) {
        self.workers.retain(|h| !h.is_finished());
    }

    /// Number of registered listeners.
    pub(crate) fn len(&self) -> usize {
        self.channels.len()
    }

    /// Sends a notification to every listener.
    pub(crate) fn emit_arc(&self, status: Arc<AggregateStatus>) {
        for channel in &self.channels {
            Self::deliver(channel, Arc::clone(&status));
        }
    }

    fn deliver(channel: &ListenerChannel, status: Arc<AggregateStatus>) {
        match channel.sender.try_send(status) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(s)) => {
                tracing::warn!(listener = channel.name, scope = %s.scope, "listener queue full; notification dropped");
            }
            Err(mpsc::error::TrySendError::Closed(s)) => {
                tracing::warn!(listener = channel.name, scope = %s.scope, "listener worker closed; notification dropped");
            }
        }
    }

    /// Gracefully shuts down all listener workers.
    ///
    /// 1. Drops all channel senders (workers see channel closed)
    /// 2. Awaits all worker tasks to finish
    pub(crate) async fn shutdown(self) {
        drop(self.channels);

        for h in self.workers {
            let _ = h.await;
        }
    }
}

/// Runs one `on_status` call; a panic is logged and swallowed.
async fn notify(listener: &dyn Listener, name: &'static str, status: &AggregateStatus) {
    let fut = listener.on_status(status);

    if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
        let info = {
            let any = &*panic_err;
            if let Some(msg) = any.downcast_ref::<&'static str>() {
                (*msg).to_string()
            } else if let Some(msg) = any.downcast_ref::<String>() {
                msg.clone()
            } else {
                "unknown panic".to_string()
            }
        };
        tracing::error!(listener = name, scope = %status.scope, %info, "listener panicked");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::Scope;
    use crate::status::Status;
    use async_trait::async_trait;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, SystemTime};

    fn agg(status: Status) -> Arc<AggregateStatus> {
        Arc::new(AggregateStatus {
            scope: Scope::Process,
            status,
            error: None,
            contributors: BTreeMap::new(),
            changed_at: SystemTime::UNIX_EPOCH,
            updated_at: SystemTime::UNIX_EPOCH,
        })
    }

    #[derive(Default)]
    struct Counter(AtomicUsize);

    #[async_trait]
    impl Listener for Counter {
        async fn on_status(&self, _status: &AggregateStatus) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Panicker;

    #[async_trait]
    impl Listener for Panicker {
        async fn on_status(&self, _status: &AggregateStatus) {
            panic!("boom");
        }
    }

    struct Slow {
        seen: AtomicUsize,
        capacity: usize,
    }

    #[async_trait]
    impl Listener for Slow {
        async fn on_status(&self, _status: &AggregateStatus) {
            tokio::task::yield_now().await;
            self.seen.fetch_add(1, Ordering::SeqCst);
        }

        fn queue_capacity(&self) -> usize {
            self.capacity
        }
    }

    #[tokio::test]
    async fn test_panicking_listener_does_not_affect_others() {
        let counter = Arc::new(Counter::default());
        let mut set = ListenerSet::new();
        set.add(ListenerId(1), Arc::new(Panicker), vec![agg(Status::Starting)]);
        set.add(ListenerId(2), counter.clone(), Vec::new());

        set.emit_arc(agg(Status::Ok));
        set.emit_arc(agg(Status::RecoverableError));
        set.shutdown().await;

        assert_eq!(counter.0.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_replay_and_remove() {
        let a = Arc::new(Counter::default());
        let b = Arc::new(Counter::default());
        let mut set = ListenerSet::new();
        set.add(ListenerId(1), a.clone(), Vec::new());
        set.add(ListenerId(2), b.clone(), vec![agg(Status::Ok), agg(Status::Ok)]);

        assert!(set.remove(ListenerId(1)));
        assert!(!set.remove(ListenerId(1)));
        assert_eq!(set.len(), 1);
        set.emit_arc(agg(Status::Stopping));
        set.shutdown().await;

        assert_eq!(a.0.load(Ordering::SeqCst), 0);
        assert_eq!(b.0.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_replay_larger_than_queue_is_delivered_in_full() {
        let slow = Arc::new(Slow {
            seen: AtomicUsize::new(0),
            capacity: 2,
        });
        let replay = (0..7).map(|_| agg(Status::Ok)).collect();
        let mut set = ListenerSet::new();
        set.add(ListenerId(1), slow.clone(), replay);
        set.emit_arc(agg(Status::RecoverableError));
        set.shutdown().await;

        assert_eq!(slow.seen.load(Ordering::SeqCst), 8);
    }

    #[tokio::test]
    async fn test_remove_prunes_finished_workers() {
        let mut set = ListenerSet::new();
        for n in 1..=10 {
            set.add(ListenerId(n), Arc::new(Counter::default()), Vec::new());
        }
        for n in 1..=10 {
            set.remove(ListenerId(n));
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        // Only the last removed worker may still be tracked.
        assert!(set.workers.len() <= 1, "{} workers left", set.workers.len());
        set.shutdown().await;
    }
}
