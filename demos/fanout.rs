//! # Example: fanout
//!
//! Publishes one message to three destinations through an [`AsyncBridge`]:
//!
//! - `audit` accepts every message,
//! - `flaky` fails twice, then accepts,
//! - `broken` never accepts.
//!
//! Lifecycle events are rendered by [`LogWriter`] through `tracing`.
//!
//! ## Flow
//! ```text
//! take(ctx, orders.created)
//!   ├─► audit:  attempt 1 → Ok
//!   ├─► flaky:  attempt 1 → Err, wait 200ms, attempt 2 → Err, wait, attempt 3 → Ok
//!   ├─► broken: attempt 1..3 → Err → DestinationExhausted
//!   └─► Envelope → Err(Undelivered { 1 of 3 destination(s) failed })
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=eventbridge=debug cargo run --example fanout --features logging
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use eventbridge::{
    AsyncBridge, Config, DeliveryError, DestinationFn, DestinationRef, Json, LogWriter, Message,
    Subscribe,
};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Serialize, Deserialize)]
struct OrderCreated {
    order_id: u64,
    total_cents: u64,
}

static FLAKY_CALLS: AtomicU32 = AtomicU32::new(0);

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eventbridge=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let audit: DestinationRef =
        DestinationFn::arc("audit", |_ctx: CancellationToken, msg: Arc<Message>| async move {
            let mut order = Json::<OrderCreated>::empty();
            msg.payload(&mut order).map_err(DeliveryError::failed)?;
            tracing::info!(order = ?order.into_inner(), "audit stored");
            Ok::<(), DeliveryError>(())
        });

    let flaky: DestinationRef =
        DestinationFn::arc("flaky", |_ctx: CancellationToken, _msg: Arc<Message>| async move {
            let n = FLAKY_CALLS.fetch_add(1, Ordering::SeqCst) + 1;
            if n < 3 {
                return Err(DeliveryError::failed(format!("upstream busy (call {n})")));
            }
            Ok(())
        });

    let broken: DestinationRef =
        DestinationFn::arc("broken", |_ctx: CancellationToken, _msg: Arc<Message>| async {
            Err::<(), _>(DeliveryError::failed("connection refused"))
        });

    let cfg = Config {
        attempt_timeout: Duration::from_secs(2),
        ..Config::with_retry(3, Duration::from_millis(200))
    };
    let bridge = AsyncBridge::builder(cfg)
        .with_destinations([audit, flaky, broken])
        .with_subscribers(vec![Arc::new(LogWriter::new()) as Arc<dyn Subscribe>])
        .build();

    let message = Message::with_payload(
        "orders.created",
        &Json::new(OrderCreated {
            order_id: 42,
            total_cents: 1999,
        }),
    )?;
    println!("wire: {}", String::from_utf8_lossy(&message.to_wire_bytes()?));

    match bridge.take(&CancellationToken::new(), message).await {
        Ok(()) => println!("delivered everywhere"),
        Err(e) => println!("dispatch finished with failures: {e}"),
    }

    // Let the subscriber drain its queue before exiting.
    tokio::time::sleep(Duration::from_millis(50)).await;
    Ok(())
}
