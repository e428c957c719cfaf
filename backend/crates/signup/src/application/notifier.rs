//! Notification Queue
//!
//! Mail is handed to a single background worker through a bounded channel.
//! Submitting never waits on the dispatcher, and a failed dispatch never
//! reaches the request that caused it.

use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

use crate::domain::entity::notification::Notification;
use crate::domain::repository::NotificationDispatcher;
use crate::error::DispatchError;

enum Job {
    Send(Notification),
    Flush(oneshot::Sender<()>),
}

/// Handle for submitting notifications; cheap to clone
#[derive(Clone)]
pub struct NotificationQueue {
    tx: mpsc::Sender<Job>,
}

impl NotificationQueue {
    /// Start the worker on the current tokio runtime
    ///
    /// The worker stops once every handle has been dropped and the queue is
    /// drained.
    pub fn spawn<D>(dispatcher: Arc<D>, capacity: usize) -> Self
    where
        D: NotificationDispatcher + Send + Sync + 'static,
    {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        tokio::spawn(run_worker(dispatcher, rx));
        Self { tx }
    }

    /// Submit without waiting
    pub fn enqueue(&self, notification: Notification) -> Result<(), DispatchError> {
        self.tx
            .try_send(Job::Send(notification))
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => DispatchError::QueueFull,
                mpsc::error::TrySendError::Closed(_) => DispatchError::Closed,
            })
    }

    /// Wait until everything submitted before this call has been attempted
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(Job::Flush(done_tx)).await.is_err() {
            return;
        }
        let _ = done_rx.await;
    }
}

async fn run_worker<D>(dispatcher: Arc<D>, mut rx: mpsc::Receiver<Job>)
where
    D: NotificationDispatcher + Send + Sync + 'static,
{
    while let Some(job) = rx.recv().await {
        match job {
            Job::Send(notification) => match dispatcher.send(&notification).await {
                Ok(()) => {
                    tracing::debug!(template = %notification.template, "Notification dispatched");
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        template = %notification.template,
                        recipient = %notification.recipient,
                        "Notification dispatch failed"
                    );
                }
            },
            Job::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    tracing::debug!("Notification worker stopped");
}
