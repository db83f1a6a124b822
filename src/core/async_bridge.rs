//! # AsyncBridge: concurrent fan-out with per-destination retry.
//!
//! [`AsyncBridge::take`] accepts a [`Message`] and returns an [`Envelope`] immediately.
//! Delivery proceeds in the background: one [`DeliveryActor`] per destination, all
//! running concurrently and independently, plus one coordinator that resolves the
//! envelope once every actor is terminal.
//!
//! ## Architecture
//! ```text
//! take(ctx, message)
//!   ├─► Arc<Message> (shared read-only by every actor)
//!   ├─► token = ctx.child_token()
//!   ├─► publish DispatchAccepted
//!   ├─► spawn DeliveryActor(dest[0]).run(token) ─┐
//!   ├─► spawn DeliveryActor(dest[1]).run(token) ─┤  (independent retry sequences)
//!   ├─► spawn DeliveryActor(dest[N]).run(token) ─┤
//!   │                                            ▼
//!   ├─► spawn coordinator: await all, in destination order
//!   │        └─► publish EnvelopeResolved ─► resolver.resolve(outcome)
//!   └─► return Envelope
//! ```
//!
//! ## Rules
//! - The envelope resolves `Ok(())` iff every destination succeeded; any failure is
//!   reported in [`DispatchError::Undelivered`], never dropped.
//! - The envelope resolves only after the slowest destination is terminal.
//! - Cancelling `ctx` stops every destination of that dispatch; there is no
//!   per-destination cancellation.
//! - No concurrency limit across dispatches is imposed here.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::{
    config::Config,
    core::{
        actor::{DeliveryActor, DeliveryParams, DestinationOutcome},
        builder::AsyncBridgeBuilder,
        envelope::{self, Envelope},
    },
    destinations::DestinationRef,
    error::{DeliveryError, DestinationFailure, DispatchError},
    events::{Bus, Event, EventKind},
    message::Message,
};

/// Delivers messages to a fixed set of destinations concurrently, with retry.
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use std::time::Duration;
/// use tokio_util::sync::CancellationToken;
/// use eventbridge::{AsyncBridge, Config, DeliveryError, DestinationFn, DestinationRef, Message};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let queue: DestinationRef = DestinationFn::arc("queue", |_ctx: CancellationToken, _msg: Arc<Message>| async {
///         Ok::<(), DeliveryError>(())
///     });
///
///     let bridge = AsyncBridge::builder(Config::with_retry(3, Duration::from_millis(100)))
///         .with_destination(queue)
///         .build();
///
///     let envelope = bridge.take(&CancellationToken::new(), Message::new("orders.created")?);
///     envelope.wait().await?;
///     Ok(())
/// }
/// ```
pub struct AsyncBridge {
    cfg: Config,
    destinations: Vec<DestinationRef>,
    bus: Bus,
    _listener: Option<DropGuard>,
}

impl AsyncBridge {
    /// Creates a bridge without subscribers.
    pub fn new(cfg: Config, destinations: Vec<DestinationRef>) -> Self {
        let bus = Bus::new(cfg.bus_capacity_clamped());
        Self::from_parts(cfg, destinations, bus, None)
    }

    /// Returns a builder for a bridge with subscribers.
    pub fn builder(cfg: Config) -> AsyncBridgeBuilder {
        AsyncBridgeBuilder::new(cfg)
    }

    pub(crate) fn from_parts(
        cfg: Config,
        destinations: Vec<DestinationRef>,
        bus: Bus,
        listener: Option<DropGuard>,
    ) -> Self {
        Self {
            cfg,
            destinations,
            bus,
            _listener: listener,
        }
    }

    /// Dispatches `message` to every destination and returns immediately.
    ///
    /// Cancelling `ctx` aborts in-flight attempts and pending retries of this dispatch;
    /// destinations not yet terminal then fail with [`DeliveryError::Canceled`].
    ///
    /// # Panics
    /// Panics if called outside of a tokio runtime.
    pub fn take(&self, ctx: &CancellationToken, message: Message) -> Envelope {
        let message = Arc::new(message);
        let (resolver, envelope) = envelope::channel(message.uuid());
        let token = ctx.child_token();
        let total = self.destinations.len();

        self.bus.publish(
            Event::new(EventKind::DispatchAccepted)
                .with_message(&message)
                .with_attempt(u32::try_from(total).unwrap_or(u32::MAX)),
        );

        let params = DeliveryParams {
            retry: self.cfg.retry,
            timeout: self.cfg.default_attempt_timeout(),
        };
        let actors: Vec<_> = self
            .destinations
            .iter()
            .map(|destination| {
                let actor = DeliveryActor::new(
                    Arc::clone(destination),
                    Arc::clone(&message),
                    params,
                    self.bus.clone(),
                );
                let name = destination.name().to_string();
                (name, tokio::spawn(actor.run(token.clone())))
            })
            .collect();

        let bus = self.bus.clone();
        tokio::spawn(async move {
            let mut failures = Vec::new();
            for (destination, handle) in actors {
                match handle.await {
                    Ok(DestinationOutcome::Delivered { .. }) => {}
                    Ok(DestinationOutcome::Failed(failure)) => failures.push(failure),
                    Err(join_err) => failures.push(DestinationFailure {
                        destination,
                        attempts: 0,
                        error: DeliveryError::Panicked {
                            error: join_err.to_string(),
                        },
                    }),
                }
            }

            let outcome = if failures.is_empty() {
                Ok(())
            } else {
                Err(DispatchError::Undelivered { total, failures })
            };

            let mut resolved = Event::new(EventKind::EnvelopeResolved).with_message(&message);
            if let Err(e) = &outcome {
                resolved = resolved.with_reason(e.to_string());
            }
            bus.publish(resolved);
            resolver.resolve(outcome);
        });

        envelope
    }

    /// Creates a receiver for lifecycle events of every dispatch made from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Configured destinations, in configuration order.
    pub fn destinations(&self) -> &[DestinationRef] {
        &self.destinations
    }

    /// Bridge configuration.
    pub fn config(&self) -> &Config {
        &self.cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::{Scripted, Step};
    use crate::policies::RetryPolicy;
    use crate::subscribers::Subscribe;
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::sync::Notify;

    fn config(max_attempts: u32) -> Config {
        Config {
            retry: RetryPolicy::new(max_attempts, Duration::ZERO),
            ..Config::default()
        }
    }

    fn message() -> Message {
        Message::new("orders.created").unwrap()
    }

    #[tokio::test]
    async fn test_zero_destinations_resolve_ok() {
        let bridge = AsyncBridge::new(config(3), Vec::new());
        let envelope = bridge.take(&CancellationToken::new(), message());
        assert_eq!(envelope.wait().await, Ok(()));
    }

    #[tokio::test]
    async fn test_envelope_carries_message_id() {
        let bridge = AsyncBridge::new(config(1), Vec::new());
        let msg = message();
        let id = msg.uuid();
        assert_eq!(bridge.take(&CancellationToken::new(), msg).message_id(), id);
    }

    #[tokio::test]
    async fn test_failures_are_collected_in_destination_order() {
        let a = Scripted::new("a", (0..3).map(|_| Step::Fail("a down")));
        let b = Scripted::new("b", [Step::Succeed]);
        let c = Scripted::new("c", [Step::Panic]);
        let bridge = AsyncBridge::new(
            config(3),
            vec![
                a.clone() as DestinationRef,
                b.clone() as DestinationRef,
                c.clone() as DestinationRef,
            ],
        );

        let err = bridge
            .take(&CancellationToken::new(), message())
            .await
            .unwrap_err();

        let DispatchError::Undelivered { total, failures } = &err else {
            panic!("expected undelivered, got {err:?}");
        };
        assert_eq!(*total, 3);
        assert_eq!(
            failures.iter().map(|f| f.destination.as_str()).collect::<Vec<_>>(),
            vec!["a", "c"]
        );
        assert_eq!(failures[0].attempts, 3);
        assert!(matches!(failures[1].error, DeliveryError::Panicked { .. }));
        assert_eq!((a.attempts(), b.attempts(), c.attempts()), (3, 1, 1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolves_after_slowest_destination() {
        let fast = Scripted::new("fast", [Step::Succeed]);
        let slow = Scripted::new("slow", [Step::Stall(Duration::from_secs(5))]);
        let bridge = AsyncBridge::new(config(1), vec![fast as DestinationRef, slow as DestinationRef]);

        let start = tokio::time::Instant::now();
        let envelope = bridge.take(&CancellationToken::new(), message());
        assert!(!envelope.is_resolved());

        assert_eq!(envelope.wait().await, Ok(()));
        assert!(start.elapsed() >= Duration::from_secs(5));
        assert_eq!(envelope.try_outcome(), Some(Ok(())));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_every_destination() {
        let a = Scripted::new("a", [Step::AwaitCancel]);
        let b = Scripted::new("b", [Step::Stall(Duration::from_secs(3600))]);
        let bridge = AsyncBridge::new(config(3), vec![a as DestinationRef, b as DestinationRef]);
        let ctx = CancellationToken::new();

        let envelope = bridge.take(&ctx, message());
        tokio::time::sleep(Duration::from_millis(10)).await;
        ctx.cancel();

        let err = envelope.wait().await.unwrap_err();
        assert!(err.all_failed());
        assert!(
            err.failures()
                .iter()
                .all(|f| f.error == DeliveryError::Canceled)
        );
    }

    #[tokio::test]
    async fn test_every_waiter_sees_the_same_outcome() {
        let a = Scripted::new("a", [Step::Fail("nope")]);
        let bridge = AsyncBridge::new(config(1), vec![a as DestinationRef]);
        let envelope = bridge.take(&CancellationToken::new(), message());

        let other = envelope.clone();
        let first = tokio::spawn(async move { other.wait().await });
        let second = envelope.wait().await;

        assert_eq!(first.await.unwrap(), second);
        assert!(second.is_err());
    }

    #[tokio::test]
    async fn test_dispatch_lifecycle_events() {
        let a = Scripted::new("a", [Step::Succeed]);
        let bridge = AsyncBridge::new(config(1), vec![a as DestinationRef]);
        let mut rx = bridge.subscribe();

        bridge
            .take(&CancellationToken::new(), message())
            .wait()
            .await
            .unwrap();

        let mut kinds = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            assert_eq!(ev.message.as_deref(), Some("orders.created"));
            kinds.push(ev.kind);
        }
        assert_eq!(kinds.first(), Some(&EventKind::DispatchAccepted));
        assert_eq!(kinds.last(), Some(&EventKind::EnvelopeResolved));
        assert!(kinds.contains(&EventKind::DeliverySucceeded));
    }

    struct ResolvedProbe(Notify);

    #[async_trait]
    impl Subscribe for ResolvedProbe {
        async fn on_event(&self, event: &Event) {
            if event.kind == EventKind::EnvelopeResolved {
                self.0.notify_one();
            }
        }

        fn name(&self) -> &'static str {
            "probe"
        }
    }

    #[tokio::test]
    async fn test_builder_wires_subscribers() {
        let probe = Arc::new(ResolvedProbe(Notify::new()));
        let bridge = AsyncBridge::builder(config(1))
            .with_destination(Scripted::new("a", [Step::Succeed]))
            .with_subscribers(vec![probe.clone() as Arc<dyn Subscribe>])
            .build();

        bridge
            .take(&CancellationToken::new(), message())
            .wait()
            .await
            .unwrap();

        tokio::time::timeout(Duration::from_secs(5), probe.0.notified())
            .await
            .expect("subscriber saw EnvelopeResolved");
    }
}
