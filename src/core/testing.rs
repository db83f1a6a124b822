//! Scripted destination for unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::{destinations::Destination, error::DeliveryError, message::Message};

/// One scripted reaction to a delivery attempt.
pub(crate) enum Step {
    Succeed,
    Fail(&'static str),
    /// Returns the given error as is.
    Reject(DeliveryError),
    /// Sleeps (ignoring cancellation), then succeeds.
    Stall(Duration),
    /// Waits for the attempt token to be cancelled.
    AwaitCancel,
    Panic,
}

/// Pops one [`Step`] per attempt; fails with "no handlers left" when empty.
pub(crate) struct Scripted {
    name: &'static str,
    steps: Mutex<VecDeque<Step>>,
    attempts: AtomicU32,
}

impl Scripted {
    pub(crate) fn new(name: &'static str, steps: impl IntoIterator<Item = Step>) -> Arc<Self> {
        Arc::new(Self {
            name,
            steps: Mutex::new(steps.into_iter().collect()),
            attempts: AtomicU32::new(0),
        })
    }

    pub(crate) fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Destination for Scripted {
    fn name(&self) -> &str {
        self.name
    }

    async fn deliver(
        &self,
        ctx: CancellationToken,
        _message: Arc<Message>,
    ) -> Result<(), DeliveryError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let step = self.steps.lock().unwrap().pop_front();
        match step {
            None => Err(DeliveryError::failed("no handlers left")),
            Some(Step::Succeed) => Ok(()),
            Some(Step::Fail(error)) => Err(DeliveryError::failed(error)),
            Some(Step::Reject(error)) => Err(error),
            Some(Step::Stall(d)) => {
                tokio::time::sleep(d).await;
                Ok(())
            }
            Some(Step::AwaitCancel) => {
                ctx.cancelled().await;
                Err(DeliveryError::Canceled)
            }
            Some(Step::Panic) => panic!("destination exploded"),
        }
    }
}
