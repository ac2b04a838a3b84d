//! Mail transports.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tracing::info;

use crate::error::NotifyError;
use crate::template::EmailMessage;

/// Delivers one rendered email.
pub trait Mailer: Send + Sync + 'static {
    fn send(&self, message: &EmailMessage) -> impl Future<Output = Result<(), NotifyError>> + Send;
}

/// Writes each email to the structured log instead of a mail server.
#[derive(Debug, Clone)]
pub struct LogMailer {
    from: String,
}

impl LogMailer {
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }
}

impl Mailer for LogMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotifyError> {
        info!(
            from = %self.from,
            to = %message.to,
            subject = %message.subject,
            html_len = message.html.len(),
            "Email sent"
        );
        Ok(())
    }
}

/// Keeps sent emails in memory. Can be switched into a failing mode.
#[derive(Debug, Clone, Default)]
pub struct MemoryMailer {
    sent: Arc<Mutex<Vec<EmailMessage>>>,
    failing: Arc<AtomicBool>,
    attempts: Arc<AtomicUsize>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent send fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Emails delivered so far.
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Send attempts so far, failed ones included.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl Mailer for MemoryMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotifyError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(NotifyError::Transport("memory mailer set to fail".into()));
        }
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(message.clone());
        Ok(())
    }
}
