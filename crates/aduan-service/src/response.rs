//! Admin responses to complaints.

use aduan_core::error::{AduanError, AduanResult};
use aduan_core::models::identity::Identity;
use aduan_core::models::notification::Notification;
use aduan_core::models::response::{ComplaintResponse, CreateResponse, ResponseWithAuthor};
use aduan_core::notifier::Notifier;
use aduan_core::policy::{AccessPolicy, Action};
use aduan_core::repository::{ComplaintRepository, ResponseRepository, UserRepository};
use tracing::info;
use uuid::Uuid;

use crate::recipients;

pub struct ResponseService<C, R, U, N>
where
    C: ComplaintRepository,
    R: ResponseRepository,
    U: UserRepository,
    N: Notifier,
{
    complaints: C,
    responses: R,
    users: U,
    notifier: N,
    policy: AccessPolicy,
}

impl<C, R, U, N> ResponseService<C, R, U, N>
where
    C: ComplaintRepository,
    R: ResponseRepository,
    U: UserRepository,
    N: Notifier,
{
    pub fn new(complaints: C, responses: R, users: U, notifier: N, policy: AccessPolicy) -> Self {
        Self {
            complaints,
            responses,
            users,
            notifier,
            policy,
        }
    }

    /// Respond to a complaint and tell its owner.
    pub async fn add_response(
        &self,
        complaint_id: Uuid,
        actor: &Identity,
        message: &str,
    ) -> AduanResult<ComplaintResponse> {
        self.policy.authorize(actor, None, Action::CreateResponse)?;

        let message = message.trim();
        if message.is_empty() {
            return Err(AduanError::validation("message is required"));
        }

        let complaint = self.complaints.get_by_id(complaint_id).await?;
        let response = self
            .responses
            .create(CreateResponse {
                complaint_id,
                admin_id: actor.user_id,
                message: message.to_string(),
            })
            .await?;

        info!(
            response_id = %response.id,
            complaint_id = %complaint_id,
            admin_id = %actor.user_id,
            "Response added"
        );

        if let Some(owner) = recipients::owner(&self.users, complaint.user_id).await {
            self.notifier.notify(Notification::ResponseAdded {
                recipient: owner.email,
                complaint_title: complaint.title,
                message: response.message.clone(),
            });
        }

        Ok(response)
    }

    pub async fn list_responses(
        &self,
        complaint_id: Uuid,
        actor: &Identity,
    ) -> AduanResult<Vec<ResponseWithAuthor>> {
        let complaint = self.complaints.get_by_id(complaint_id).await?;
        self.policy
            .authorize(actor, Some(complaint.user_id), Action::ReadResponses)?;
        self.responses.list_by_complaint(complaint_id).await
    }

    /// Only the authoring admin may delete a response.
    pub async fn delete_response(&self, id: Uuid, actor: &Identity) -> AduanResult<()> {
        let response = self.responses.get_by_id(id).await?;
        self.policy
            .authorize(actor, Some(response.admin_id), Action::DeleteResponse)?;
        self.responses.delete(id).await?;
        info!(response_id = %id, admin_id = %actor.user_id, "Response deleted");
        Ok(())
    }
}
