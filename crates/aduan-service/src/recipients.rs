//! Notification addressing. Lookup failures are logged and swallowed: by the
//! time a notification is addressed, the primary write has committed.

use aduan_core::models::user::{Contact, UserRole};
use aduan_core::repository::UserRepository;
use tracing::warn;
use uuid::Uuid;

/// The owner's contact, if they want email.
pub(crate) async fn owner<U: UserRepository>(users: &U, user_id: Uuid) -> Option<Contact> {
    match users.get_contact(user_id).await {
        Ok(contact) if contact.email_notifications => Some(contact),
        Ok(_) => None,
        Err(e) => {
            warn!(%user_id, error = %e, "Could not resolve notification recipient");
            None
        }
    }
}

/// Every active admin who wants email.
pub(crate) async fn admins<U: UserRepository>(users: &U) -> Vec<Contact> {
    match users.list_contacts_by_role(UserRole::Admin).await {
        Ok(contacts) => contacts
            .into_iter()
            .filter(|c| c.email_notifications)
            .collect(),
        Err(e) => {
            warn!(error = %e, "Could not resolve admin notification recipients");
            Vec::new()
        }
    }
}
