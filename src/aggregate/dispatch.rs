//! # Ordered dispatch from the aggregator to listeners.
//!
//! The aggregator pushes [`Dispatch`] messages into an unbounded channel while
//! it still holds its table lock, so their order matches the order in which
//! aggregates changed. A single dispatcher task drains the channel and owns
//! the [`ListenerSet`]; the ingestion path never touches listener queues.
//!
//! ```text
//! report()    ──► Notify(agg)            ─┐
//! subscribe() ──► Subscribe{id, replay}  ─┼──► [unbounded, FIFO] ──► run() ──► ListenerSet
//! unsubscribe ──► Unsubscribe(id)        ─┤
//! shutdown()  ──► Shutdown               ─┘
//! ```
//!
//! Because subscribe snapshots the tables and enqueues under the same lock,
//! a new listener sees its replay first and then exactly the changes made
//! after the snapshot.

use std::sync::Arc;

use tokio::sync::mpsc;

use super::scope::AggregateStatus;
use crate::listeners::{Listener, ListenerId, ListenerSet};

pub(crate) enum Dispatch {
    Notify(Arc<AggregateStatus>),
    Subscribe {
        id: ListenerId,
        listener: Arc<dyn Listener>,
        replay: Vec<Arc<AggregateStatus>>,
    },
    Unsubscribe(ListenerId),
    Shutdown,
}

/// Dispatcher loop; exits on [`Dispatch::Shutdown`] or when every sender is gone.
pub(crate) async fn run(mut rx: mpsc::UnboundedReceiver<Dispatch>, mut set: ListenerSet) {
    while let Some(msg) = rx.recv().await {
        match msg {
            Dispatch::Notify(status) => set.emit_arc(status),
            Dispatch::Subscribe {
                id,
                listener,
                replay,
            } => set.add(id, listener, replay),
            Dispatch::Unsubscribe(id) => {
                set.remove(id);
            }
            Dispatch::Shutdown => break,
        }
    }
    tracing::debug!(listeners = set.len(), "dispatcher stopping");
    set.shutdown().await;
}
