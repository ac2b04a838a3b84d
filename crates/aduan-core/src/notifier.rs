//! The seam between domain services and outbound notification delivery.

use crate::models::notification::Notification;

/// Accepts notifications for best-effort delivery.
///
/// Implementations must not block on delivery and must not report delivery
/// failures back to the caller: the operation that produced the notification
/// has already succeeded.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

impl<N: Notifier + ?Sized> Notifier for std::sync::Arc<N> {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification);
    }
}
