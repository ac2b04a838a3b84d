//! Centralized authorization policy.
//!
//! Every resource-scoped read and every mutation goes through
//! [`AccessPolicy::authorize`]. The decision itself,
//! [`AccessPolicy::can_access`], is a pure function of the caller's role and
//! id, the id of the user owning the resource (if any), and the action.

use uuid::Uuid;

use crate::error::{AduanError, AduanResult};
use crate::models::identity::Identity;
use crate::models::user::UserRole;

/// Everything a caller can attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    CreateComplaint,
    ReadComplaint,
    UpdateStatus,
    UpdatePriority,
    DeleteComplaint,
    CreateResponse,
    ReadResponses,
    /// Owner is the authoring admin, not the complaint owner.
    DeleteResponse,
    CreateComment,
    ReadComments,
    ReadProfile,
    UpdateProfile,
    ReadSettings,
    UpdateSettings,
    ChangePassword,
    ListUsers,
    ViewStatistics,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::CreateComplaint => "create complaint",
            Action::ReadComplaint => "read complaint",
            Action::UpdateStatus => "update complaint status",
            Action::UpdatePriority => "update complaint priority",
            Action::DeleteComplaint => "delete complaint",
            Action::CreateResponse => "respond to complaint",
            Action::ReadResponses => "read responses",
            Action::DeleteResponse => "delete response",
            Action::CreateComment => "comment on complaint",
            Action::ReadComments => "read comments",
            Action::ReadProfile => "read profile",
            Action::UpdateProfile => "update profile",
            Action::ReadSettings => "read settings",
            Action::UpdateSettings => "update settings",
            Action::ChangePassword => "change password",
            Action::ListUsers => "list users",
            Action::ViewStatistics => "view statistics",
        }
    }
}

/// Tunable parts of the policy.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    /// Whether a citizen may change the priority of their own complaint.
    pub citizen_priority_updates: bool,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self {
            citizen_priority_updates: true,
        }
    }
}

impl AccessPolicy {
    /// Decide whether `actor` may perform `action` on a resource owned by
    /// `owner`. `owner` is `None` for actions with no owned resource
    /// (creating, listing, statistics).
    pub fn can_access(&self, actor: &Identity, owner: Option<Uuid>, action: Action) -> bool {
        let owns = owner == Some(actor.user_id);

        match actor.role {
            UserRole::Admin => match action {
                Action::CreateComplaint => false,
                Action::DeleteResponse => owns,
                Action::ReadComplaint
                | Action::UpdateStatus
                | Action::UpdatePriority
                | Action::DeleteComplaint
                | Action::CreateResponse
                | Action::ReadResponses
                | Action::CreateComment
                | Action::ReadComments
                | Action::ReadProfile
                | Action::UpdateProfile
                | Action::ReadSettings
                | Action::UpdateSettings
                | Action::ChangePassword
                | Action::ListUsers
                | Action::ViewStatistics => true,
            },
            UserRole::Citizen => match action {
                Action::CreateComplaint => true,
                Action::UpdatePriority => self.citizen_priority_updates && owns,
                Action::ReadComplaint
                | Action::ReadResponses
                | Action::CreateComment
                | Action::ReadComments
                | Action::ReadProfile
                | Action::UpdateProfile
                | Action::ReadSettings
                | Action::UpdateSettings
                | Action::ChangePassword => owns,
                Action::UpdateStatus
                | Action::DeleteComplaint
                | Action::CreateResponse
                | Action::DeleteResponse
                | Action::ListUsers
                | Action::ViewStatistics => false,
            },
        }
    }

    /// [`can_access`](Self::can_access) as a `Result`, failing with
    /// [`AduanError::AuthorizationDenied`].
    pub fn authorize(
        &self,
        actor: &Identity,
        owner: Option<Uuid>,
        action: Action,
    ) -> AduanResult<()> {
        if self.can_access(actor, owner, action) {
            Ok(())
        } else {
            Err(AduanError::forbidden(format!(
                "{} may not {}",
                actor.role,
                action.as_str()
            )))
        }
    }
}
