//! Integration tests for the user and settings repositories using in-memory
//! SurrealDB.

use aduan_core::error::AduanError;
use aduan_core::models::settings::{Theme, UpdateSettings};
use aduan_core::models::user::{CreateUser, UpdateProfile, UserRole};
use aduan_core::repository::{Pagination, SettingsRepository, UserRepository};
use aduan_db::repository::{SurrealSettingsRepository, SurrealUserRepository};
use argon2::{Argon2, PasswordHash, PasswordVerifier};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

async fn setup() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    aduan_db::run_migrations(&db).await.unwrap();
    db
}

fn hash_matches(password: &str, hash: &str, pepper: &str) -> bool {
    let parsed = PasswordHash::new(hash).unwrap();
    Argon2::default()
        .verify_password(format!("{pepper}{password}").as_bytes(), &parsed)
        .is_ok()
}

fn citizen(email: &str, nik: &str) -> CreateUser {
    CreateUser {
        email: email.into(),
        password: "rahasia-123".into(),
        full_name: "Siti Aminah".into(),
        nik: nik.into(),
        address: "Jl. Merdeka 1, Bandung".into(),
        phone: Some("08123456789".into()),
        role: UserRole::Citizen,
    }
}

#[tokio::test]
async fn create_and_get_user() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo
        .create(citizen("siti@example.com", "3273010101900001"))
        .await
        .unwrap();

    assert_eq!(user.email, "siti@example.com");
    assert_eq!(user.role, UserRole::Citizen);
    assert!(user.is_active);
    assert_ne!(user.password_hash, "rahasia-123");
    assert!(user.password_hash.starts_with("$argon2id$"));

    let fetched = repo.get_by_id(user.id).await.unwrap();
    assert_eq!(fetched.id, user.id);
    assert_eq!(fetched.nik, "3273010101900001");

    let by_email = repo.get_by_email("siti@example.com").await.unwrap();
    assert_eq!(by_email.id, user.id);
}

#[tokio::test]
async fn create_user_also_creates_default_settings() {
    let db = setup().await;
    let users = SurrealUserRepository::new(db.clone());
    let settings = SurrealSettingsRepository::new(db);

    let user = users
        .create(citizen("siti@example.com", "3273010101900001"))
        .await
        .unwrap();

    let s = settings.get(user.id).await.unwrap();
    assert_eq!(s.user_id, user.id);
    assert_eq!(s.theme, Theme::Light);
    assert!(s.email_notifications);
    assert!(!s.sms_notifications);
    assert_eq!(s.language, "id");
    assert_eq!(s.timezone, "Asia/Jakarta");
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db.clone());

    repo.create(citizen("siti@example.com", "3273010101900001"))
        .await
        .unwrap();
    let err = repo
        .create(citizen("siti@example.com", "3273010101900002"))
        .await
        .unwrap_err();

    assert!(
        matches!(err, AduanError::AlreadyExists { ref field, .. } if field == "email"),
        "unexpected error: {err:?}"
    );

    // The failed registration must not leave a settings row behind.
    let mut result = db.query("SELECT * FROM user_settings").await.unwrap();
    let rows: Vec<surrealdb_types::Value> = result.take(0).unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn duplicate_nik_is_rejected() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    repo.create(citizen("siti@example.com", "3273010101900001"))
        .await
        .unwrap();
    let err = repo
        .create(citizen("budi@example.com", "3273010101900001"))
        .await
        .unwrap_err();

    assert!(
        matches!(err, AduanError::AlreadyExists { ref field, .. } if field == "nik"),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn exists_checks() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    repo.create(citizen("siti@example.com", "3273010101900001"))
        .await
        .unwrap();

    assert!(repo.email_exists("siti@example.com").await.unwrap());
    assert!(!repo.email_exists("budi@example.com").await.unwrap());
    assert!(repo.nik_exists("3273010101900001").await.unwrap());
    assert!(!repo.nik_exists("3273010101900009").await.unwrap());
}

#[tokio::test]
async fn get_missing_user_is_not_found() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let err = repo.get_by_id(uuid::Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AduanError::NotFound { .. }));
}

#[tokio::test]
async fn update_profile_changes_only_given_fields() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo
        .create(citizen("siti@example.com", "3273010101900001"))
        .await
        .unwrap();

    let updated = repo
        .update_profile(
            user.id,
            UpdateProfile {
                full_name: Some("Siti A.".into()),
                phone: None,
                avatar_url: Some("https://cdn.example.com/siti.png".into()),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.full_name, "Siti A.");
    assert_eq!(updated.phone.as_deref(), Some("08123456789"));
    assert_eq!(
        updated.avatar_url.as_deref(),
        Some("https://cdn.example.com/siti.png")
    );
    assert_eq!(updated.email, user.email);
}

#[tokio::test]
async fn update_password_rehashes() {
    let db = setup().await;
    let repo = SurrealUserRepository::with_pepper(db, "lada".into());

    let user = repo
        .create(citizen("siti@example.com", "3273010101900001"))
        .await
        .unwrap();
    assert!(hash_matches("rahasia-123", &user.password_hash, "lada"));

    repo.update_password(user.id, "baru-sekali-456").await.unwrap();

    let reloaded = repo.get_by_id(user.id).await.unwrap();
    assert!(!hash_matches("rahasia-123", &reloaded.password_hash, "lada"));
    assert!(hash_matches("baru-sekali-456", &reloaded.password_hash, "lada"));
}

#[tokio::test]
async fn list_users_is_paginated() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    for i in 0..3 {
        repo.create(citizen(
            &format!("warga{i}@example.com"),
            &format!("327301010190000{i}"),
        ))
        .await
        .unwrap();
    }

    let page = repo
        .list(Pagination {
            offset: 0,
            limit: 2,
        })
        .await
        .unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 2);

    let rest = repo
        .list(Pagination {
            offset: 2,
            limit: 2,
        })
        .await
        .unwrap();
    assert_eq!(rest.items.len(), 1);
}

#[tokio::test]
async fn contacts_follow_notification_toggle() {
    let db = setup().await;
    let users = SurrealUserRepository::new(db.clone());
    let settings = SurrealSettingsRepository::new(db);

    let mut admin = citizen("admin@example.com", "3273010101900010");
    admin.role = UserRole::Admin;
    let admin = users.create(admin).await.unwrap();
    let mut quiet = citizen("admin2@example.com", "3273010101900011");
    quiet.role = UserRole::Admin;
    let quiet = users.create(quiet).await.unwrap();
    users
        .create(citizen("siti@example.com", "3273010101900001"))
        .await
        .unwrap();

    settings
        .update(
            quiet.id,
            UpdateSettings {
                email_notifications: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let contacts = users.list_contacts_by_role(UserRole::Admin).await.unwrap();
    assert_eq!(contacts.len(), 2);
    let loud = contacts.iter().find(|c| c.user_id == admin.id).unwrap();
    assert!(loud.email_notifications);
    let muted = contacts.iter().find(|c| c.user_id == quiet.id).unwrap();
    assert!(!muted.email_notifications);

    let single = users.get_contact(quiet.id).await.unwrap();
    assert_eq!(single.email, "admin2@example.com");
    assert!(!single.email_notifications);
}

#[tokio::test]
async fn settings_update_is_partial() {
    let db = setup().await;
    let users = SurrealUserRepository::new(db.clone());
    let settings = SurrealSettingsRepository::new(db);

    let user = users
        .create(citizen("siti@example.com", "3273010101900001"))
        .await
        .unwrap();

    let updated = settings
        .update(
            user.id,
            UpdateSettings {
                theme: Some(Theme::Dark),
                language: Some("en".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.theme, Theme::Dark);
    assert_eq!(updated.language, "en");
    assert!(updated.email_notifications);
    assert_eq!(updated.timezone, "Asia/Jakarta");
}

#[tokio::test]
async fn settings_for_unknown_user_is_not_found() {
    let db = setup().await;
    let settings = SurrealSettingsRepository::new(db);

    let err = settings.get(uuid::Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AduanError::NotFound { .. }));
}
