//! Notification dispatch configuration.

use serde::Deserialize;

/// Queue and retry settings for the notification worker.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Bounded queue depth. Notifications arriving while full are
    /// dead-lettered.
    pub queue_capacity: usize,
    /// Send attempts per notification, including the first.
    pub max_attempts: u32,
    /// Linear backoff step between attempts, in milliseconds.
    pub retry_backoff_ms: u64,
    /// Upper bound on a single send attempt, in milliseconds. A send that
    /// runs longer counts as a failed attempt.
    pub send_timeout_ms: u64,
    /// `From` header of outgoing mail.
    pub from_address: String,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 256,
            max_attempts: 3,
            retry_backoff_ms: 500,
            send_timeout_ms: 10_000,
            from_address: "Aduan <no-reply@aduan.local>".into(),
        }
    }
}
