//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Implementations are expected to be
//! cheap to clone (a shared connection handle) so that several services can
//! hold the same repository.

use uuid::Uuid;

use crate::error::AduanResult;
use crate::models::{
    comment::{Comment, CommentWithAuthor, CreateComment},
    complaint::{Complaint, CreateComplaint, UpdateComplaint},
    response::{ComplaintResponse, CreateResponse, ResponseWithAuthor},
    settings::{UpdateSettings, UserSettings},
    user::{Contact, CreateUser, UpdateProfile, User, UserRole},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// Identity store
// ---------------------------------------------------------------------------

pub trait UserRepository: Send + Sync {
    /// Create the user together with its default settings row, atomically.
    fn create(&self, input: CreateUser) -> impl Future<Output = AduanResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = AduanResult<User>> + Send;
    fn get_by_email(&self, email: &str) -> impl Future<Output = AduanResult<User>> + Send;
    fn email_exists(&self, email: &str) -> impl Future<Output = AduanResult<bool>> + Send;
    fn nik_exists(&self, nik: &str) -> impl Future<Output = AduanResult<bool>> + Send;
    fn update_profile(
        &self,
        id: Uuid,
        input: UpdateProfile,
    ) -> impl Future<Output = AduanResult<User>> + Send;
    /// Replace the credential. `password` is raw and hashed by the store.
    fn update_password(
        &self,
        id: Uuid,
        password: &str,
    ) -> impl Future<Output = AduanResult<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = AduanResult<PaginatedResult<User>>> + Send;
    /// Notification contact for one user.
    fn get_contact(&self, id: Uuid) -> impl Future<Output = AduanResult<Contact>> + Send;
    /// Notification contacts for every active user holding `role`.
    fn list_contacts_by_role(
        &self,
        role: UserRole,
    ) -> impl Future<Output = AduanResult<Vec<Contact>>> + Send;
}

pub trait SettingsRepository: Send + Sync {
    fn get(&self, user_id: Uuid) -> impl Future<Output = AduanResult<UserSettings>> + Send;
    fn update(
        &self,
        user_id: Uuid,
        input: UpdateSettings,
    ) -> impl Future<Output = AduanResult<UserSettings>> + Send;
}

// ---------------------------------------------------------------------------
// Complaints and their discussion
// ---------------------------------------------------------------------------

pub trait ComplaintRepository: Send + Sync {
    fn create(&self, input: CreateComplaint)
    -> impl Future<Output = AduanResult<Complaint>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = AduanResult<Complaint>> + Send;
    /// Newest first. `owner = Some(id)` restricts to that user's complaints.
    fn list(
        &self,
        owner: Option<Uuid>,
    ) -> impl Future<Output = AduanResult<Vec<Complaint>>> + Send;
    /// A status change is applied only while the stored status may still
    /// move to it; otherwise nothing is written and `Validation` is returned.
    fn update(
        &self,
        id: Uuid,
        input: UpdateComplaint,
    ) -> impl Future<Output = AduanResult<Complaint>> + Send;
    /// Delete the complaint with its responses and comments.
    fn delete(&self, id: Uuid) -> impl Future<Output = AduanResult<()>> + Send;
}

pub trait ResponseRepository: Send + Sync {
    fn create(
        &self,
        input: CreateResponse,
    ) -> impl Future<Output = AduanResult<ComplaintResponse>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = AduanResult<ComplaintResponse>> + Send;
    /// Oldest first, joined with the author's name and email.
    fn list_by_complaint(
        &self,
        complaint_id: Uuid,
    ) -> impl Future<Output = AduanResult<Vec<ResponseWithAuthor>>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = AduanResult<()>> + Send;
}

pub trait CommentRepository: Send + Sync {
    fn create(&self, input: CreateComment) -> impl Future<Output = AduanResult<Comment>> + Send;
    /// Oldest first, joined with the author's name and role.
    fn list_by_complaint(
        &self,
        complaint_id: Uuid,
    ) -> impl Future<Output = AduanResult<Vec<CommentWithAuthor>>> + Send;
}
