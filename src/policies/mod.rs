//! Retry policies.
//!
//! This module groups the knobs that control **how many times** a destination is attempted
//! and **how long** to wait between attempts.
//!
//! ## Contents
//! - [`RetryPolicy`] attempt budget + fixed inter-attempt delay
//!
//! ## Quick wiring
//! ```text
//! Config { retry: RetryPolicy, attempt_timeout, bus_capacity }
//!      └─► core::actor::DeliveryActor uses:
//!           - retry.next(attempt) to decide wait-and-retry vs. give up
//! ```
//!
//! ## Defaults
//! - `RetryPolicy::default()` → max_attempts=3, wait_between=500ms.

mod retry;

pub use retry::RetryPolicy;
