//! Outbound notification events.
//!
//! Each value addresses exactly one recipient; fan-out to several admins
//! produces several notifications so that one failed send never holds up the
//! others.

use serde::{Deserialize, Serialize};

use super::complaint::{ComplaintCategory, ComplaintPriority, ComplaintStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Notification {
    /// A citizen filed a complaint; sent to each admin.
    ComplaintCreated {
        recipient: String,
        title: String,
        description: String,
        category: ComplaintCategory,
        priority: ComplaintPriority,
        location: Option<String>,
        reporter_email: String,
    },
    /// An admin responded; sent to the complaint owner.
    ResponseAdded {
        recipient: String,
        complaint_title: String,
        message: String,
    },
    /// The complaint moved through the lifecycle; sent to the owner.
    StatusChanged {
        recipient: String,
        complaint_title: String,
        old_status: ComplaintStatus,
        new_status: ComplaintStatus,
    },
}

impl Notification {
    pub fn recipient(&self) -> &str {
        match self {
            Notification::ComplaintCreated { recipient, .. }
            | Notification::ResponseAdded { recipient, .. }
            | Notification::StatusChanged { recipient, .. } => recipient,
        }
    }

    /// Short event name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Notification::ComplaintCreated { .. } => "complaint_created",
            Notification::ResponseAdded { .. } => "response_added",
            Notification::StatusChanged { .. } => "status_changed",
        }
    }
}
