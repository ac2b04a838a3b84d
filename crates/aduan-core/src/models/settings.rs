//! Per-user settings, one-to-one with [`User`](super::user::User).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

pub const DEFAULT_LANGUAGE: &str = "id";
pub const DEFAULT_TIMEZONE: &str = "Asia/Jakarta";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSettings {
    pub user_id: Uuid,
    pub theme: Theme,
    pub email_notifications: bool,
    pub sms_notifications: bool,
    pub language: String,
    pub timezone: String,
    pub updated_at: DateTime<Utc>,
}

/// Partial settings update. `None` leaves the field unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateSettings {
    pub theme: Option<Theme>,
    pub email_notifications: Option<bool>,
    pub sms_notifications: Option<bool>,
    pub language: Option<String>,
    pub timezone: Option<String>,
}

impl UpdateSettings {
    pub fn is_empty(&self) -> bool {
        self.theme.is_none()
            && self.email_notifications.is_none()
            && self.sms_notifications.is_none()
            && self.language.is_none()
            && self.timezone.is_none()
    }
}
