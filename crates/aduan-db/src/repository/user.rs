//! SurrealDB implementation of [`UserRepository`].
//!
//! The store hashes credentials itself: Argon2id, m=19 MiB, t=2, p=1, a
//! fresh salt per hash, and the optional server pepper prefixed to the
//! password. Verification lives in `aduan-auth`.
//!
//! A user and its settings row are written in one transaction; the settings
//! record shares the user's id.

use std::collections::HashMap;

use aduan_core::error::AduanResult;
use aduan_core::models::user::{Contact, CreateUser, UpdateProfile, User, UserRole};
use aduan_core::repository::{PaginatedResult, Pagination, UserRepository};
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher};
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// Unique indexes on `user`, with the field each protects.
const USER_UNIQUE: &[(&str, &str)] = &[("idx_user_email", "email"), ("idx_user_nik", "nik")];

#[derive(Debug, SurrealValue)]
struct UserRow {
    record_id: String,
    email: String,
    password_hash: String,
    full_name: String,
    nik: String,
    address: String,
    phone: Option<String>,
    role: String,
    avatar_url: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn try_into_user(self) -> Result<User, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Corrupt(format!("invalid UUID: {e}")))?;
        let role = self.role.parse::<UserRole>().map_err(DbError::Corrupt)?;
        Ok(User {
            id,
            email: self.email,
            password_hash: self.password_hash,
            full_name: self.full_name,
            nik: self.nik,
            address: self.address,
            phone: self.phone,
            role,
            avatar_url: self.avatar_url,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct ExistsRow {
    record_id: String,
}

#[derive(Debug, SurrealValue)]
struct NotificationToggleRow {
    user_id: String,
    email_notifications: bool,
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// Hash a password with Argon2id using OWASP-recommended parameters.
///
/// If a pepper is provided, it is prepended to the password before
/// hashing. The salt is randomly generated for each call.
fn hash_password(password: &str, pepper: Option<&str>) -> Result<String, DbError> {
    // OWASP ASVS recommended: m=19456 (19 MiB), t=2, p=1
    let params = argon2::Params::new(19456, 2, 1, None)
        .map_err(|e| DbError::Hashing(format!("argon2 params error: {e}")))?;
    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let peppered: String;
    let input = match pepper {
        Some(p) => {
            peppered = format!("{p}{password}");
            peppered.as_bytes()
        }
        None => password.as_bytes(),
    };

    let salt = SaltString::generate(&mut argon2::password_hash::rand_core::OsRng);
    let hash = argon2
        .hash_password(input, &salt)
        .map_err(|e| DbError::Hashing(format!("password hash error: {e}")))?;

    Ok(hash.to_string())
}

/// SurrealDB implementation of the User repository.
#[derive(Clone)]
pub struct SurrealUserRepository<C: Connection> {
    db: Surreal<C>,
    /// Optional server-side pepper for password hashing.
    pepper: Option<String>,
}

impl<C: Connection> SurrealUserRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db, pepper: None }
    }

    pub fn with_pepper(db: Surreal<C>, pepper: String) -> Self {
        Self {
            db,
            pepper: Some(pepper),
        }
    }

    async fn exists_where(&self, field: &'static str, value: &str) -> Result<bool, DbError> {
        let query = format!(
            "SELECT meta::id(id) AS record_id FROM user WHERE {field} = $value LIMIT 1"
        );
        let mut result = self
            .db
            .query(&query)
            .bind(("value", value.to_string()))
            .await?;
        let rows: Vec<ExistsRow> = result.take(0)?;
        Ok(!rows.is_empty())
    }

    /// Email-notification toggles keyed by user id. Users without a
    /// settings row are absent from the map.
    async fn notification_toggles(
        &self,
        ids: Vec<String>,
    ) -> Result<HashMap<String, bool>, DbError> {
        let mut result = self
            .db
            .query(
                "SELECT user_id, email_notifications FROM user_settings \
                 WHERE user_id IN $ids",
            )
            .bind(("ids", ids))
            .await?;
        let rows: Vec<NotificationToggleRow> = result.take(0)?;
        Ok(rows
            .into_iter()
            .map(|row| (row.user_id, row.email_notifications))
            .collect())
    }
}

impl<C: Connection> UserRepository for SurrealUserRepository<C> {
    async fn create(&self, input: CreateUser) -> AduanResult<User> {
        let id = Uuid::new_v4();
        let password_hash = hash_password(&input.password, self.pepper.as_deref())?;

        let mut response = self
            .db
            .query(
                "BEGIN TRANSACTION; \
                 CREATE type::record('user', $id) SET \
                 email = $email, password_hash = $password_hash, \
                 full_name = $full_name, nik = $nik, address = $address, \
                 phone = $phone, role = $role, avatar_url = NONE, \
                 is_active = true; \
                 CREATE type::record('user_settings', $id) SET \
                 user_id = $id; \
                 COMMIT TRANSACTION;",
            )
            .bind(("id", id.to_string()))
            .bind(("email", input.email))
            .bind(("password_hash", password_hash))
            .bind(("full_name", input.full_name))
            .bind(("nik", input.nik))
            .bind(("address", input.address))
            .bind(("phone", input.phone))
            .bind(("role", input.role.as_str().to_string()))
            .await
            .map_err(DbError::from)?;

        // A failed transaction reports an error for every statement; scan
        // them all so a unique-index violation is recognized wherever it
        // surfaces.
        let errors = response.take_errors();
        if !errors.is_empty() {
            let message = errors
                .values()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(DbError::from_statement("user", USER_UNIQUE, message).into());
        }

        self.get_by_id(id).await
    }

    async fn get_by_id(&self, id: Uuid) -> AduanResult<User> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT meta::id(id) AS record_id, * FROM type::record('user', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.try_into_user()?)
    }

    async fn get_by_email(&self, email: &str) -> AduanResult<User> {
        let mut result = self
            .db
            .query("SELECT meta::id(id) AS record_id, * FROM user WHERE email = $email")
            .bind(("email", email.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: format!("email={email}"),
        })?;

        Ok(row.try_into_user()?)
    }

    async fn email_exists(&self, email: &str) -> AduanResult<bool> {
        Ok(self.exists_where("email", email).await?)
    }

    async fn nik_exists(&self, nik: &str) -> AduanResult<bool> {
        Ok(self.exists_where("nik", nik).await?)
    }

    async fn update_profile(&self, id: Uuid, input: UpdateProfile) -> AduanResult<User> {
        // Surface NotFound before writing; UPDATE on a missing record is a
        // silent no-op.
        self.get_by_id(id).await?;

        let mut sets = Vec::new();
        if input.full_name.is_some() {
            sets.push("full_name = $full_name");
        }
        if input.phone.is_some() {
            sets.push("phone = $phone");
        }
        if input.avatar_url.is_some() {
            sets.push("avatar_url = $avatar_url");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('user', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id.to_string()));

        if let Some(full_name) = input.full_name {
            builder = builder.bind(("full_name", full_name));
        }
        if let Some(phone) = input.phone {
            builder = builder.bind(("phone", phone));
        }
        if let Some(avatar_url) = input.avatar_url {
            builder = builder.bind(("avatar_url", avatar_url));
        }

        builder
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        self.get_by_id(id).await
    }

    async fn update_password(&self, id: Uuid, password: &str) -> AduanResult<()> {
        self.get_by_id(id).await?;
        let password_hash = hash_password(password, self.pepper.as_deref())?;

        self.db
            .query(
                "UPDATE type::record('user', $id) SET \
                 password_hash = $password_hash, updated_at = time::now()",
            )
            .bind(("id", id.to_string()))
            .bind(("password_hash", password_hash))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        Ok(())
    }

    async fn list(&self, pagination: Pagination) -> AduanResult<PaginatedResult<User>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM user GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_user())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn get_contact(&self, id: Uuid) -> AduanResult<Contact> {
        let user = self.get_by_id(id).await?;
        let toggles = self.notification_toggles(vec![id.to_string()]).await?;

        Ok(Contact {
            user_id: user.id,
            email_notifications: toggles.get(&id.to_string()).copied().unwrap_or(true),
            email: user.email,
            full_name: user.full_name,
        })
    }

    async fn list_contacts_by_role(&self, role: UserRole) -> AduanResult<Vec<Contact>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user \
                 WHERE role = $role AND is_active = true \
                 ORDER BY created_at ASC",
            )
            .bind(("role", role.as_str().to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let users = rows
            .into_iter()
            .map(|row| row.try_into_user())
            .collect::<Result<Vec<_>, DbError>>()?;

        let ids = users.iter().map(|u| u.id.to_string()).collect();
        let toggles = self.notification_toggles(ids).await?;

        Ok(users
            .into_iter()
            .map(|user| Contact {
                email_notifications: toggles
                    .get(&user.id.to_string())
                    .copied()
                    .unwrap_or(true),
                user_id: user.id,
                email: user.email,
                full_name: user.full_name,
            })
            .collect())
    }
}
