use std::sync::Arc;

use tokio::sync::mpsc;

use super::aggregator::Aggregator;
use super::dispatch;
use crate::config::Config;
use crate::listeners::{Listener, ListenerSet};

/// Builder for constructing an [`Aggregator`] with initial listeners.
pub struct AggregatorBuilder {
    cfg: Config,
    listeners: Vec<Arc<dyn Listener>>,
}

impl AggregatorBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            listeners: Vec::new(),
        }
    }

    /// Sets the listeners registered at startup (replacing any added before).
    pub fn with_listeners(mut self, listeners: Vec<Arc<dyn Listener>>) -> Self {
        self.listeners = listeners;
        self
    }

    /// Adds one listener registered at startup.
    pub fn with_listener(mut self, listener: Arc<dyn Listener>) -> Self {
        self.listeners.push(listener);
        self
    }

    /// Builds the aggregator and spawns its dispatcher task.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime.
    pub fn build(self) -> Arc<Aggregator> {
        let (tx, rx) = mpsc::unbounded_channel();
        let dispatcher = tokio::spawn(dispatch::run(rx, ListenerSet::new()));

        let agg = Arc::new(Aggregator::new_internal(self.cfg, tx, dispatcher));
        for listener in self.listeners {
            agg.subscribe(listener);
        }
        agg
    }
}
