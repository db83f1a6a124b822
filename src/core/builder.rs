//! # AsyncBridgeBuilder: assembles an [`AsyncBridge`].
//!
//! Collects destinations and subscribers, then wires the bridge's [`Bus`] to a
//! [`SubscriberSet`] through a listener task that lives as long as the bridge.
//!
//! ```text
//! Bus ──► listener (select: stop token | recv) ──► SubscriberSet::emit
//!  ▲                                                    │
//!  └── AsyncBridge (holds DropGuard of the stop token)  └─► set.shutdown() on stop
//! ```

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;

use crate::{
    config::Config,
    core::async_bridge::AsyncBridge,
    destinations::DestinationRef,
    events::Bus,
    subscribers::{Subscribe, SubscriberSet},
};

/// Builder for an [`AsyncBridge`] with destinations and optional subscribers.
pub struct AsyncBridgeBuilder {
    cfg: Config,
    destinations: Vec<DestinationRef>,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl AsyncBridgeBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            destinations: Vec::new(),
            subscribers: Vec::new(),
        }
    }

    /// Appends a destination. Order is kept but implies no priority.
    pub fn with_destination(mut self, destination: DestinationRef) -> Self {
        self.destinations.push(destination);
        self
    }

    /// Appends several destinations.
    pub fn with_destinations(mut self, destinations: impl IntoIterator<Item = DestinationRef>) -> Self {
        self.destinations.extend(destinations);
        self
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive lifecycle events through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the bridge.
    ///
    /// With subscribers configured, this spawns the bus listener and subscriber workers,
    /// so it must then be called from within a tokio runtime. The listener stops when
    /// the bridge is dropped.
    pub fn build(self) -> AsyncBridge {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        if self.subscribers.is_empty() {
            return AsyncBridge::from_parts(self.cfg, self.destinations, bus, None);
        }

        let set = SubscriberSet::new(self.subscribers, bus.clone());
        let stop = CancellationToken::new();
        let mut rx = bus.subscribe();
        let listener_stop = stop.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = listener_stop.cancelled() => break,
                    ev = rx.recv() => match ev {
                        Ok(ev) => set.emit(&ev),
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "event listener lagged; events skipped");
                        }
                        Err(RecvError::Closed) => break,
                    },
                }
            }
            set.shutdown().await;
        });

        AsyncBridge::from_parts(self.cfg, self.destinations, bus, Some(stop.drop_guard()))
    }
}
