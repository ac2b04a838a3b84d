//! Admin response attached to a complaint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplaintResponse {
    pub id: Uuid,
    pub complaint_id: Uuid,
    /// Authoring admin.
    pub admin_id: Uuid,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateResponse {
    pub complaint_id: Uuid,
    pub admin_id: Uuid,
    pub message: String,
}

/// A response joined with its author's display name and email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseWithAuthor {
    #[serde(flatten)]
    pub response: ComplaintResponse,
    pub full_name: String,
    pub email: String,
}
