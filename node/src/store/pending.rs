//! In-flight operations with an explicit outcome and cancellation.
//!
//! A pending operation waits out the configured latency (the stand-in for the
//! backend round-trip) and then submits its work. Cancelling before submission
//! guarantees the store is never touched. Dropping the handle cancels as well.

use super::{StoreError, StoreResult};
use std::future::Future;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::debug;

#[derive(Debug)]
pub enum PendingOutcome<T> {
    Completed(T),
    Failed(StoreError),
    Cancelled,
}

impl<T> PendingOutcome<T> {
    pub fn into_result(self) -> StoreResult<T> {
        match self {
            Self::Completed(value) => Ok(value),
            Self::Failed(err) => Err(err),
            Self::Cancelled => Err(StoreError::Cancelled),
        }
    }
}

pub struct PendingOperation<T> {
    cancel_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<StoreResult<T>>,
}

impl<T: Send + 'static> PendingOperation<T> {
    pub fn spawn<F, Fut>(latency: Duration, operation: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = StoreResult<T>> + Send + 'static,
    {
        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancel_rx => {
                    debug!("pending operation cancelled before submission");
                    return Err(StoreError::Cancelled);
                }
                _ = tokio::time::sleep(latency) => {}
            }
            operation().await
        });

        Self {
            cancel_tx: Some(cancel_tx),
            task,
        }
    }

    /// Requests cancellation. Returns `false` when the operation was already
    /// submitted (or cancelled), in which case it runs to completion.
    pub fn cancel(&mut self) -> bool {
        self.cancel_tx
            .take()
            .map(|tx| tx.send(()).is_ok())
            .unwrap_or(false)
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the operation to settle.
    pub async fn outcome(mut self) -> PendingOutcome<T> {
        let _keep_alive = self.cancel_tx.take();
        match (&mut self.task).await {
            Ok(Ok(value)) => PendingOutcome::Completed(value),
            Ok(Err(StoreError::Cancelled)) => PendingOutcome::Cancelled,
            Ok(Err(err)) => PendingOutcome::Failed(err),
            Err(join_err) if join_err.is_cancelled() => PendingOutcome::Cancelled,
            Err(_) => PendingOutcome::Failed(StoreError::Unavailable),
        }
    }
}
