//! Authentication service: registration, login and session resolution.

use aduan_core::error::{AduanError, AduanResult};
use aduan_core::models::identity::Identity;
use aduan_core::models::user::{CreateUser, UserProfile, UserRole, is_valid_nik};
use aduan_core::policy::{AccessPolicy, Action};
use aduan_core::repository::UserRepository;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;
use crate::token;

/// Input for citizen self-registration.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub nik: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Input for the login flow.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Successful login result.
#[derive(Debug)]
pub struct LoginOutput {
    /// Signed session token.
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: u64,
    pub user: UserProfile,
}

/// Administrator account created at startup when missing.
#[derive(Debug, Clone, Deserialize)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub nik: String,
    #[serde(default)]
    pub address: String,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn required<'a>(value: &'a str, field: &str) -> AduanResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AduanError::validation(format!("{field} is required")));
    }
    Ok(trimmed)
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Authentication service.
///
/// Generic over the user repository so that the auth layer has no
/// dependency on the database crate.
pub struct AuthService<U: UserRepository> {
    user_repo: U,
    config: AuthConfig,
    policy: AccessPolicy,
}

impl<U: UserRepository> AuthService<U> {
    pub fn new(user_repo: U, config: AuthConfig) -> Self {
        Self {
            user_repo,
            config,
            policy: AccessPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: AccessPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Validate a candidate account and build the store input. Touches no
    /// store.
    fn validate_account(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
        nik: &str,
    ) -> AduanResult<(String, String, String)> {
        let email = normalize_email(required(email, "email")?);
        if !email.contains('@') {
            return Err(AduanError::validation("email is not valid"));
        }
        required(password, "password")?;
        password::check_strength(password, self.config.min_password_length)?;
        let full_name = required(full_name, "full_name")?.to_string();
        let nik = required(nik, "nik")?.to_string();
        if !is_valid_nik(&nik) {
            return Err(AduanError::validation("nik must be exactly 16 digits"));
        }
        Ok((email, full_name, nik))
    }

    /// Probe uniqueness, email first, so the conflict names the field a
    /// user would fix first. The store's unique indexes back this up.
    async fn ensure_unique(&self, email: &str, nik: &str) -> AduanResult<()> {
        if self.user_repo.email_exists(email).await? {
            return Err(AduanError::AlreadyExists {
                entity: "user".into(),
                field: "email".into(),
            });
        }
        if self.user_repo.nik_exists(nik).await? {
            return Err(AduanError::AlreadyExists {
                entity: "user".into(),
                field: "nik".into(),
            });
        }
        Ok(())
    }

    /// Register a citizen account. The user and its default settings are
    /// written in one store transaction.
    pub async fn register(&self, input: RegisterInput) -> AduanResult<Uuid> {
        let (email, full_name, nik) =
            self.validate_account(&input.email, &input.password, &input.full_name, &input.nik)?;
        self.ensure_unique(&email, &nik).await?;

        let user = self
            .user_repo
            .create(CreateUser {
                email,
                password: input.password,
                full_name,
                nik,
                address: input.address.trim().to_string(),
                phone: optional(input.phone),
                role: UserRole::Citizen,
            })
            .await?;

        info!(user_id = %user.id, "Citizen registered");
        Ok(user.id)
    }

    /// Authenticate with email + password and issue a session token.
    ///
    /// Unknown email, wrong password and inactive accounts are
    /// indistinguishable to the caller.
    pub async fn login(&self, input: LoginInput) -> AduanResult<LoginOutput> {
        let email = normalize_email(&input.email);
        if email.is_empty() || input.password.is_empty() {
            return Err(AduanError::validation("email and password are required"));
        }

        let user = match self.user_repo.get_by_email(&email).await {
            Ok(user) => user,
            Err(AduanError::NotFound { .. }) => return Err(AuthError::InvalidCredentials.into()),
            Err(e) => return Err(e),
        };

        let valid = password::verify_password(
            &input.password,
            &user.password_hash,
            self.config.pepper.as_deref(),
        )?;
        if !valid || !user.is_active {
            warn!(user_id = %user.id, "Login rejected");
            return Err(AuthError::InvalidCredentials.into());
        }

        let identity = Identity {
            user_id: user.id,
            email: user.email.clone(),
            role: user.role,
        };
        let token = token::issue_session_token(&identity, &self.config)?;

        info!(user_id = %user.id, role = %user.role, "Login succeeded");
        Ok(LoginOutput {
            token,
            expires_in: self.config.session_lifetime_secs,
            user: user.into(),
        })
    }

    /// Resolve a bearer token to the caller it was issued to.
    pub fn resolve_session(&self, token: &str) -> AduanResult<Identity> {
        Ok(token::validate_session_token(token, &self.config)?)
    }

    /// Public profile of the caller.
    pub async fn me(&self, identity: &Identity) -> AduanResult<UserProfile> {
        Ok(self.user_repo.get_by_id(identity.user_id).await?.into())
    }

    /// Replace `user_id`'s password after checking the current one.
    pub async fn change_password(
        &self,
        actor: &Identity,
        user_id: Uuid,
        current: &str,
        new: &str,
    ) -> AduanResult<()> {
        self.policy
            .authorize(actor, Some(user_id), Action::ChangePassword)?;
        if current.is_empty() || new.is_empty() {
            return Err(AduanError::validation(
                "current_password and new_password are required",
            ));
        }
        password::check_strength(new, self.config.min_password_length)?;

        let user = self.user_repo.get_by_id(user_id).await?;
        let valid =
            password::verify_password(current, &user.password_hash, self.config.pepper.as_deref())?;
        if !valid {
            return Err(AuthError::WrongCurrentPassword.into());
        }

        self.user_repo.update_password(user_id, new).await?;
        info!(user_id = %user_id, actor = %actor.user_id, "Password changed");
        Ok(())
    }

    /// Create the configured administrator unless its email is already
    /// registered. Returns the id of the account holding that email.
    pub async fn ensure_admin(&self, admin: BootstrapAdmin) -> AduanResult<Uuid> {
        let (email, full_name, nik) =
            self.validate_account(&admin.email, &admin.password, &admin.full_name, &admin.nik)?;

        match self.user_repo.get_by_email(&email).await {
            Ok(existing) => {
                if existing.role != UserRole::Admin {
                    warn!(
                        user_id = %existing.id,
                        "Bootstrap admin email belongs to a citizen account"
                    );
                }
                return Ok(existing.id);
            }
            Err(AduanError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        self.ensure_unique(&email, &nik).await?;
        let user = self
            .user_repo
            .create(CreateUser {
                email,
                password: admin.password,
                full_name,
                nik,
                address: admin.address.trim().to_string(),
                phone: None,
                role: UserRole::Admin,
            })
            .await?;

        info!(user_id = %user.id, "Bootstrap administrator created");
        Ok(user.id)
    }
}
