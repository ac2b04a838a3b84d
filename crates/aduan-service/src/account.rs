//! Profiles, settings and the admin user directory.

use aduan_core::error::{AduanError, AduanResult};
use aduan_core::models::identity::Identity;
use aduan_core::models::settings::{UpdateSettings, UserSettings};
use aduan_core::models::user::{UpdateProfile, UserProfile};
use aduan_core::policy::{AccessPolicy, Action};
use aduan_core::repository::{Pagination, SettingsRepository, UserRepository};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

const USER_PAGE: u64 = 100;

/// A user's public profile with their settings.
#[derive(Debug, Clone, Serialize)]
pub struct AccountProfile {
    pub user: UserProfile,
    pub settings: UserSettings,
}

fn trimmed(value: Option<String>, field: &str, allow_empty: bool) -> AduanResult<Option<String>> {
    match value {
        None => Ok(None),
        Some(v) => {
            let v = v.trim().to_string();
            if v.is_empty() && !allow_empty {
                return Err(AduanError::validation(format!("{field} must not be empty")));
            }
            Ok(Some(v))
        }
    }
}

pub struct AccountService<U: UserRepository, S: SettingsRepository> {
    users: U,
    settings: S,
    policy: AccessPolicy,
}

impl<U: UserRepository, S: SettingsRepository> AccountService<U, S> {
    pub fn new(users: U, settings: S, policy: AccessPolicy) -> Self {
        Self {
            users,
            settings,
            policy,
        }
    }

    pub async fn get_profile(&self, user_id: Uuid, actor: &Identity) -> AduanResult<AccountProfile> {
        let user = self.users.get_by_id(user_id).await?;
        self.policy
            .authorize(actor, Some(user_id), Action::ReadProfile)?;
        let settings = self.settings.get(user_id).await?;
        Ok(AccountProfile {
            user: user.into(),
            settings,
        })
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        actor: &Identity,
        patch: UpdateProfile,
    ) -> AduanResult<UserProfile> {
        self.policy
            .authorize(actor, Some(user_id), Action::UpdateProfile)?;
        if patch.is_empty() {
            return Err(AduanError::validation(
                "at least one of full_name, phone or avatar_url is required",
            ));
        }
        let patch = UpdateProfile {
            full_name: trimmed(patch.full_name, "full_name", false)?,
            phone: trimmed(patch.phone, "phone", true)?,
            avatar_url: trimmed(patch.avatar_url, "avatar_url", true)?,
        };

        let user = self.users.update_profile(user_id, patch).await?;
        info!(%user_id, actor = %actor.user_id, "Profile updated");
        Ok(user.into())
    }

    pub async fn get_settings(&self, user_id: Uuid, actor: &Identity) -> AduanResult<UserSettings> {
        self.policy
            .authorize(actor, Some(user_id), Action::ReadSettings)?;
        self.settings.get(user_id).await
    }

    pub async fn update_settings(
        &self,
        user_id: Uuid,
        actor: &Identity,
        patch: UpdateSettings,
    ) -> AduanResult<UserSettings> {
        self.policy
            .authorize(actor, Some(user_id), Action::UpdateSettings)?;
        if patch.is_empty() {
            return Err(AduanError::validation("no settings to update"));
        }
        let UpdateSettings {
            theme,
            email_notifications,
            sms_notifications,
            language,
            timezone,
        } = patch;
        let patch = UpdateSettings {
            theme,
            email_notifications,
            sms_notifications,
            language: trimmed(language, "language", false)?,
            timezone: trimmed(timezone, "timezone", false)?,
        };

        let settings = self.settings.update(user_id, patch).await?;
        info!(%user_id, actor = %actor.user_id, "Settings updated");
        Ok(settings)
    }

    /// Every user, oldest account first.
    pub async fn list_users(&self, actor: &Identity) -> AduanResult<Vec<UserProfile>> {
        self.policy.authorize(actor, None, Action::ListUsers)?;

        let mut all = Vec::new();
        let mut offset = 0;
        loop {
            let page = self
                .users
                .list(Pagination {
                    offset,
                    limit: USER_PAGE,
                })
                .await?;
            let fetched = page.items.len() as u64;
            all.extend(page.items.into_iter().map(UserProfile::from));
            offset += fetched;
            if fetched < USER_PAGE || offset >= page.total {
                break;
            }
        }
        Ok(all)
    }
}
