//! Shared fixture: in-memory SurrealDB, two citizens, two admins, and a
//! notifier that records instead of sending.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use aduan_core::models::identity::Identity;
use aduan_core::models::notification::Notification;
use aduan_core::models::user::{CreateUser, UserRole};
use aduan_core::notifier::Notifier;
use aduan_core::policy::AccessPolicy;
use aduan_core::repository::UserRepository;
use aduan_db::repository::{
    SurrealCommentRepository, SurrealComplaintRepository, SurrealResponseRepository,
    SurrealSettingsRepository, SurrealUserRepository,
};
use aduan_service::{AccountService, CommentService, ComplaintService, ResponseService};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

#[derive(Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.sent.lock().unwrap().push(notification);
    }
}

pub type Complaints = ComplaintService<
    SurrealComplaintRepository<Db>,
    SurrealResponseRepository<Db>,
    SurrealCommentRepository<Db>,
    SurrealUserRepository<Db>,
    RecordingNotifier,
>;
pub type Responses = ResponseService<
    SurrealComplaintRepository<Db>,
    SurrealResponseRepository<Db>,
    SurrealUserRepository<Db>,
    RecordingNotifier,
>;
pub type Comments = CommentService<SurrealComplaintRepository<Db>, SurrealCommentRepository<Db>>;
pub type Accounts = AccountService<SurrealUserRepository<Db>, SurrealSettingsRepository<Db>>;

pub struct Fixture {
    pub db: Surreal<Db>,
    pub notifier: RecordingNotifier,
    pub complaints: Complaints,
    pub responses: Responses,
    pub comments: Comments,
    pub accounts: Accounts,
    pub citizen_a: Identity,
    pub citizen_b: Identity,
    pub admin: Identity,
    pub other_admin: Identity,
}

async fn create_user(
    users: &SurrealUserRepository<Db>,
    email: &str,
    nik: &str,
    role: UserRole,
) -> Identity {
    let user = users
        .create(CreateUser {
            email: email.into(),
            password: "rahasia-123".into(),
            full_name: email.split('@').next().unwrap_or(email).into(),
            nik: nik.into(),
            address: "Jl. Merdeka 1".into(),
            phone: None,
            role,
        })
        .await
        .unwrap();
    Identity {
        user_id: user.id,
        email: user.email,
        role: user.role,
    }
}

pub async fn setup() -> Fixture {
    setup_with_policy(AccessPolicy::default()).await
}

pub async fn setup_with_policy(policy: AccessPolicy) -> Fixture {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    aduan_db::run_migrations(&db).await.unwrap();

    let users = SurrealUserRepository::new(db.clone());
    let complaint_repo = SurrealComplaintRepository::new(db.clone());
    let response_repo = SurrealResponseRepository::new(db.clone());
    let comment_repo = SurrealCommentRepository::new(db.clone());
    let notifier = RecordingNotifier::default();

    let citizen_a = create_user(&users, "a@x.com", "1111111111111111", UserRole::Citizen).await;
    let citizen_b = create_user(&users, "b@x.com", "2222222222222222", UserRole::Citizen).await;
    let admin = create_user(&users, "admin@x.com", "9999999999999991", UserRole::Admin).await;
    let other_admin = create_user(&users, "admin2@x.com", "9999999999999992", UserRole::Admin).await;

    Fixture {
        complaints: ComplaintService::new(
            complaint_repo.clone(),
            response_repo.clone(),
            comment_repo.clone(),
            users.clone(),
            notifier.clone(),
            policy.clone(),
        ),
        responses: ResponseService::new(
            complaint_repo.clone(),
            response_repo,
            users.clone(),
            notifier.clone(),
            policy.clone(),
        ),
        comments: CommentService::new(
            complaint_repo,
            comment_repo,
            policy.clone(),
        ),
        accounts: AccountService::new(users, SurrealSettingsRepository::new(db.clone()), policy),
        db,
        notifier,
        citizen_a,
        citizen_b,
        admin,
        other_admin,
    }
}
