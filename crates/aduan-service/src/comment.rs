//! Discussion stream on a complaint, shared by its owner and the admins.
//! Append-only; comments are not notified.

use aduan_core::error::{AduanError, AduanResult};
use aduan_core::models::comment::{Comment, CommentWithAuthor, CreateComment};
use aduan_core::models::identity::Identity;
use aduan_core::policy::{AccessPolicy, Action};
use aduan_core::repository::{CommentRepository, ComplaintRepository};
use tracing::debug;
use uuid::Uuid;

pub struct CommentService<C: ComplaintRepository, M: CommentRepository> {
    complaints: C,
    comments: M,
    policy: AccessPolicy,
}

impl<C: ComplaintRepository, M: CommentRepository> CommentService<C, M> {
    pub fn new(complaints: C, comments: M, policy: AccessPolicy) -> Self {
        Self {
            complaints,
            comments,
            policy,
        }
    }

    pub async fn add_comment(
        &self,
        complaint_id: Uuid,
        actor: &Identity,
        message: &str,
    ) -> AduanResult<Comment> {
        let message = message.trim();
        if message.is_empty() {
            return Err(AduanError::validation("message is required"));
        }

        let complaint = self.complaints.get_by_id(complaint_id).await?;
        self.policy
            .authorize(actor, Some(complaint.user_id), Action::CreateComment)?;

        let comment = self
            .comments
            .create(CreateComment {
                complaint_id,
                user_id: actor.user_id,
                message: message.to_string(),
            })
            .await?;
        debug!(comment_id = %comment.id, %complaint_id, "Comment added");
        Ok(comment)
    }

    /// Oldest first.
    pub async fn list_comments(
        &self,
        complaint_id: Uuid,
        actor: &Identity,
    ) -> AduanResult<Vec<CommentWithAuthor>> {
        let complaint = self.complaints.get_by_id(complaint_id).await?;
        self.policy
            .authorize(actor, Some(complaint.user_id), Action::ReadComments)?;
        self.comments.list_by_complaint(complaint_id).await
    }
}
