//! Complaint lifecycle: filing, listing, triage and statistics.

use aduan_core::error::{AduanError, AduanResult};
use aduan_core::models::comment::CreateComment;
use aduan_core::models::complaint::{
    Complaint, ComplaintCategory, ComplaintPriority, CreateComplaint, UpdateComplaint,
};
use aduan_core::models::identity::Identity;
use aduan_core::models::notification::Notification;
use aduan_core::models::response::ResponseWithAuthor;
use aduan_core::models::stats::ComplaintStats;
use aduan_core::notifier::Notifier;
use aduan_core::policy::{AccessPolicy, Action};
use aduan_core::repository::{
    CommentRepository, ComplaintRepository, ResponseRepository, UserRepository,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::recipients;

/// A complaint as filed by a citizen.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewComplaint {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: Option<ComplaintCategory>,
    pub priority: Option<ComplaintPriority>,
    pub location: Option<String>,
    pub image_url: Option<String>,
}

/// A complaint with its responses, oldest first.
#[derive(Debug, Clone, Serialize)]
pub struct ComplaintDetail {
    pub complaint: Complaint,
    pub responses: Vec<ResponseWithAuthor>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub struct ComplaintService<C, R, M, U, N>
where
    C: ComplaintRepository,
    R: ResponseRepository,
    M: CommentRepository,
    U: UserRepository,
    N: Notifier,
{
    complaints: C,
    responses: R,
    comments: M,
    users: U,
    notifier: N,
    policy: AccessPolicy,
}

impl<C, R, M, U, N> ComplaintService<C, R, M, U, N>
where
    C: ComplaintRepository,
    R: ResponseRepository,
    M: CommentRepository,
    U: UserRepository,
    N: Notifier,
{
    pub fn new(
        complaints: C,
        responses: R,
        comments: M,
        users: U,
        notifier: N,
        policy: AccessPolicy,
    ) -> Self {
        Self {
            complaints,
            responses,
            comments,
            users,
            notifier,
            policy,
        }
    }

    /// File a complaint. Every admin is told about it once it is stored.
    pub async fn create(&self, actor: &Identity, input: NewComplaint) -> AduanResult<Complaint> {
        self.policy.authorize(actor, None, Action::CreateComplaint)?;

        let title = input.title.trim();
        let description = input.description.trim();
        if title.is_empty() || description.is_empty() {
            return Err(AduanError::validation("title and description are required"));
        }
        let category = input
            .category
            .ok_or_else(|| AduanError::validation("category is required"))?;

        let complaint = self
            .complaints
            .create(CreateComplaint {
                user_id: actor.user_id,
                title: title.to_string(),
                description: description.to_string(),
                category,
                priority: input.priority.unwrap_or_default(),
                location: non_blank(input.location),
                image_url: non_blank(input.image_url),
            })
            .await?;

        info!(
            complaint_id = %complaint.id,
            user_id = %actor.user_id,
            category = %complaint.category,
            "Complaint filed"
        );

        for admin in recipients::admins(&self.users).await {
            self.notifier.notify(Notification::ComplaintCreated {
                recipient: admin.email,
                title: complaint.title.clone(),
                description: complaint.description.clone(),
                category: complaint.category,
                priority: complaint.priority,
                location: complaint.location.clone(),
                reporter_email: actor.email.clone(),
            });
        }

        Ok(complaint)
    }

    /// Newest first. Citizens see only their own.
    pub async fn list(&self, actor: &Identity) -> AduanResult<Vec<Complaint>> {
        let owner = if actor.is_admin() {
            None
        } else {
            Some(actor.user_id)
        };
        self.complaints.list(owner).await
    }

    pub async fn get(&self, id: Uuid, actor: &Identity) -> AduanResult<ComplaintDetail> {
        let complaint = self.complaints.get_by_id(id).await?;
        self.policy
            .authorize(actor, Some(complaint.user_id), Action::ReadComplaint)?;

        let responses = self.responses.list_by_complaint(id).await?;
        Ok(ComplaintDetail {
            complaint,
            responses,
        })
    }

    /// Apply a status and/or priority change.
    ///
    /// Status only moves forward. Re-setting the current status is a no-op.
    /// The owner is notified of an actual status change after the write.
    pub async fn update(
        &self,
        id: Uuid,
        actor: &Identity,
        mut patch: UpdateComplaint,
    ) -> AduanResult<Complaint> {
        if patch.is_empty() {
            return Err(AduanError::validation(
                "at least one of status or priority is required",
            ));
        }
        if patch.status.is_some() {
            self.policy.authorize(actor, None, Action::UpdateStatus)?;
        }

        let current = self.complaints.get_by_id(id).await?;
        if patch.priority.is_some() {
            self.policy
                .authorize(actor, Some(current.user_id), Action::UpdatePriority)?;
        }

        if let Some(next) = patch.status {
            if !current.status.can_transition_to(next) {
                return Err(AduanError::validation(format!(
                    "status cannot move back from {} to {}",
                    current.status, next
                )));
            }
            if next == current.status {
                patch.status = None;
            }
        }
        if patch.is_empty() {
            return Ok(current);
        }

        let updated = self.complaints.update(id, patch).await?;
        info!(
            complaint_id = %id,
            actor = %actor.user_id,
            status = %updated.status,
            priority = %updated.priority,
            "Complaint updated"
        );

        if updated.status != current.status {
            self.record_status_change(&updated, actor).await;
            if let Some(owner) = recipients::owner(&self.users, updated.user_id).await {
                self.notifier.notify(Notification::StatusChanged {
                    recipient: owner.email,
                    complaint_title: updated.title.clone(),
                    old_status: current.status,
                    new_status: updated.status,
                });
            }
        }

        Ok(updated)
    }

    /// Leave a note in the discussion stream. The status write has already
    /// landed, so a failure here is only logged.
    async fn record_status_change(&self, complaint: &Complaint, actor: &Identity) {
        let note = CreateComment {
            complaint_id: complaint.id,
            user_id: actor.user_id,
            message: format!("Status laporan diubah menjadi \"{}\"", complaint.status),
        };
        if let Err(e) = self.comments.create(note).await {
            warn!(
                complaint_id = %complaint.id,
                error = %e,
                "Failed to record status change in discussion"
            );
        }
    }

    /// Delete a complaint together with its responses and comments.
    pub async fn delete(&self, id: Uuid, actor: &Identity) -> AduanResult<()> {
        self.policy.authorize(actor, None, Action::DeleteComplaint)?;
        self.complaints.delete(id).await?;
        info!(complaint_id = %id, actor = %actor.user_id, "Complaint deleted");
        Ok(())
    }

    pub async fn statistics(&self, actor: &Identity) -> AduanResult<ComplaintStats> {
        self.policy.authorize(actor, None, Action::ViewStatistics)?;
        let complaints = self.complaints.list(None).await?;
        Ok(ComplaintStats::from_complaints(&complaints))
    }
}
