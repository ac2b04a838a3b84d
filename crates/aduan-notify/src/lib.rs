//! Aduan Notify: best-effort email notifications.
//!
//! Services hand [`Notification`](aduan_core::models::notification::Notification)s
//! to a [`NotificationDispatcher`], which only enqueues. A single background
//! worker renders each one to an HTML email and passes it to a [`Mailer`],
//! retrying a bounded number of times before recording a dead letter.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod mailer;
pub mod template;

pub use config::NotifyConfig;
pub use dispatcher::{DEAD_LETTER_TARGET, NotificationDispatcher, NotificationWorker};
pub use error::NotifyError;
pub use mailer::{LogMailer, Mailer, MemoryMailer};
pub use template::{EmailMessage, render};
