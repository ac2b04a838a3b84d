//! Queue-backed [`Notifier`] and its delivery worker.

use std::time::Duration;

use aduan_core::models::notification::Notification;
use aduan_core::notifier::Notifier;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::NotifyConfig;
use crate::error::NotifyError;
use crate::mailer::Mailer;
use crate::template::render;

/// Log target for notifications that were given up on.
pub const DEAD_LETTER_TARGET: &str = "aduan_notify::dead_letter";

fn dead_letter(notification: &Notification, attempts: u32, reason: &NotifyError) {
    error!(
        target: DEAD_LETTER_TARGET,
        event = notification.kind(),
        recipient = notification.recipient(),
        attempts,
        error = %reason,
        payload = ?notification,
        "Notification dead-lettered"
    );
}

/// Non-blocking front of the notification queue.
///
/// Cloning shares the queue. The worker stops once every clone is dropped.
#[derive(Debug, Clone)]
pub struct NotificationDispatcher {
    tx: mpsc::Sender<Notification>,
}

impl NotificationDispatcher {
    /// Create the queue and spawn its worker on the current runtime.
    pub fn spawn<M: Mailer>(config: NotifyConfig, mailer: M) -> (Self, JoinHandle<()>) {
        let (dispatcher, worker) = Self::new(config, mailer);
        let handle = tokio::spawn(worker.run());
        (dispatcher, handle)
    }

    /// Create the queue without starting the worker.
    pub fn new<M: Mailer>(config: NotifyConfig, mailer: M) -> (Self, NotificationWorker<M>) {
        let (tx, rx) = mpsc::channel(config.queue_capacity.max(1));
        (
            Self { tx },
            NotificationWorker {
                rx,
                mailer,
                config,
            },
        )
    }
}

impl Notifier for NotificationDispatcher {
    fn notify(&self, notification: Notification) {
        match self.tx.try_send(notification) {
            Ok(()) => {}
            Err(TrySendError::Full(notification)) => {
                dead_letter(&notification, 0, &NotifyError::QueueFull);
            }
            Err(TrySendError::Closed(notification)) => {
                dead_letter(&notification, 0, &NotifyError::QueueClosed);
            }
        }
    }
}

/// Drains the queue, one notification at a time.
pub struct NotificationWorker<M: Mailer> {
    rx: mpsc::Receiver<Notification>,
    mailer: M,
    config: NotifyConfig,
}

impl<M: Mailer> NotificationWorker<M> {
    pub async fn run(mut self) {
        info!("Notification worker started");

        while let Some(notification) = self.rx.recv().await {
            self.deliver(notification).await;
        }

        info!("Notification worker stopped (queue closed)");
    }

    async fn deliver(&self, notification: Notification) {
        let message = render(&notification);
        let max_attempts = self.config.max_attempts.max(1);

        let send_timeout = Duration::from_millis(self.config.send_timeout_ms);

        for attempt in 1..=max_attempts {
            let outcome = match tokio::time::timeout(send_timeout, self.mailer.send(&message)).await {
                Ok(result) => result,
                Err(_) => Err(NotifyError::Timeout(self.config.send_timeout_ms)),
            };
            match outcome {
                Ok(()) => {
                    debug!(
                        event = notification.kind(),
                        recipient = %message.to,
                        attempt,
                        "Notification delivered"
                    );
                    return;
                }
                Err(e) if attempt < max_attempts => {
                    warn!(
                        event = notification.kind(),
                        recipient = %message.to,
                        attempt,
                        error = %e,
                        "Notification send failed, retrying"
                    );
                    let backoff = self.config.retry_backoff_ms * u64::from(attempt);
                    tokio::time::sleep(Duration::from_millis(backoff)).await;
                }
                Err(e) => dead_letter(&notification, attempt, &e),
            }
        }
    }
}
