//! SurrealDB implementation of [`SettingsRepository`].
//!
//! Settings rows are created by the user repository inside the registration
//! transaction; this repository only reads and patches them.

use aduan_core::error::AduanResult;
use aduan_core::models::settings::{Theme, UpdateSettings, UserSettings};
use aduan_core::repository::SettingsRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct SettingsRow {
    theme: String,
    email_notifications: bool,
    sms_notifications: bool,
    language: String,
    timezone: String,
    updated_at: DateTime<Utc>,
}

impl SettingsRow {
    fn into_settings(self, user_id: Uuid) -> Result<UserSettings, DbError> {
        Ok(UserSettings {
            user_id,
            theme: self.theme.parse::<Theme>().map_err(DbError::Corrupt)?,
            email_notifications: self.email_notifications,
            sms_notifications: self.sms_notifications,
            language: self.language,
            timezone: self.timezone,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the settings repository.
#[derive(Clone)]
pub struct SurrealSettingsRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealSettingsRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> SettingsRepository for SurrealSettingsRepository<C> {
    async fn get(&self, user_id: Uuid) -> AduanResult<UserSettings> {
        let id_str = user_id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('user_settings', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<SettingsRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user_settings".into(),
            id: id_str,
        })?;

        Ok(row.into_settings(user_id)?)
    }

    async fn update(&self, user_id: Uuid, input: UpdateSettings) -> AduanResult<UserSettings> {
        self.get(user_id).await?;

        let mut sets = Vec::new();
        if input.theme.is_some() {
            sets.push("theme = $theme");
        }
        if input.email_notifications.is_some() {
            sets.push("email_notifications = $email_notifications");
        }
        if input.sms_notifications.is_some() {
            sets.push("sms_notifications = $sms_notifications");
        }
        if input.language.is_some() {
            sets.push("language = $language");
        }
        if input.timezone.is_some() {
            sets.push("timezone = $timezone");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('user_settings', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", user_id.to_string()));

        if let Some(theme) = input.theme {
            builder = builder.bind(("theme", theme.as_str().to_string()));
        }
        if let Some(email_notifications) = input.email_notifications {
            builder = builder.bind(("email_notifications", email_notifications));
        }
        if let Some(sms_notifications) = input.sms_notifications {
            builder = builder.bind(("sms_notifications", sms_notifications));
        }
        if let Some(language) = input.language {
            builder = builder.bind(("language", language));
        }
        if let Some(timezone) = input.timezone {
            builder = builder.bind(("timezone", timezone));
        }

        builder
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        self.get(user_id).await
    }
}
