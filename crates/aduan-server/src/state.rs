//! Shared application state: one instance of every service, wired over a
//! single SurrealDB handle and the notification queue.

use std::sync::Arc;

use aduan_auth::{AuthConfig, AuthService};
use aduan_core::policy::AccessPolicy;
use aduan_db::repository::{
    SurrealCommentRepository, SurrealComplaintRepository, SurrealResponseRepository,
    SurrealSettingsRepository, SurrealUserRepository,
};
use aduan_notify::NotificationDispatcher;
use aduan_service::{AccountService, CommentService, ComplaintService, ResponseService};
use surrealdb::Surreal;
use surrealdb::engine::any::Any;

type Users = SurrealUserRepository<Any>;
type Complaints = SurrealComplaintRepository<Any>;
type Responses = SurrealResponseRepository<Any>;
type Comments = SurrealCommentRepository<Any>;

pub type Auth = AuthService<Users>;
pub type ComplaintApi =
    ComplaintService<Complaints, Responses, Comments, Users, NotificationDispatcher>;
pub type ResponseApi = ResponseService<Complaints, Responses, Users, NotificationDispatcher>;
pub type CommentApi = CommentService<Complaints, Comments>;
pub type AccountApi = AccountService<Users, SurrealSettingsRepository<Any>>;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<Auth>,
    pub complaints: Arc<ComplaintApi>,
    pub responses: Arc<ResponseApi>,
    pub comments: Arc<CommentApi>,
    pub accounts: Arc<AccountApi>,
}

impl AppState {
    pub fn new(
        db: Surreal<Any>,
        auth_config: AuthConfig,
        policy: AccessPolicy,
        notifier: NotificationDispatcher,
    ) -> Self {
        let users = match &auth_config.pepper {
            Some(pepper) => SurrealUserRepository::with_pepper(db.clone(), pepper.clone()),
            None => SurrealUserRepository::new(db.clone()),
        };
        let complaints = SurrealComplaintRepository::new(db.clone());
        let responses = SurrealResponseRepository::new(db.clone());
        let comments = SurrealCommentRepository::new(db.clone());

        Self {
            auth: Arc::new(
                AuthService::new(users.clone(), auth_config).with_policy(policy.clone()),
            ),
            complaints: Arc::new(ComplaintService::new(
                complaints.clone(),
                responses.clone(),
                comments.clone(),
                users.clone(),
                notifier.clone(),
                policy.clone(),
            )),
            responses: Arc::new(ResponseService::new(
                complaints.clone(),
                responses,
                users.clone(),
                notifier,
                policy.clone(),
            )),
            comments: Arc::new(CommentService::new(
                complaints,
                comments,
                policy.clone(),
            )),
            accounts: Arc::new(AccountService::new(
                users,
                SurrealSettingsRepository::new(db),
                policy,
            )),
        }
    }
}
