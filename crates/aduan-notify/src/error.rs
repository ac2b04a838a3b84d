//! Notification error types.

use aduan_core::error::AduanError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("mail transport failed: {0}")]
    Transport(String),

    #[error("mail send timed out after {0} ms")]
    Timeout(u64),

    #[error("notification queue is full")]
    QueueFull,

    #[error("notification queue is closed")]
    QueueClosed,
}

impl From<NotifyError> for AduanError {
    fn from(err: NotifyError) -> Self {
        AduanError::Notification(err.to_string())
    }
}
