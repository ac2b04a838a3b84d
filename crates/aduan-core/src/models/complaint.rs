//! Complaint domain model and its fixed label sets.
//!
//! Category, priority and status travel on the wire as the Indonesian labels
//! the portal has always used (`Infrastruktur`, `Sedang`, `In Progress`, ...).
//! English names are accepted as aliases on input, case-insensitively.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Generates `as_str`, `Display`, `FromStr` and string serde impls for a
/// label enum. The first string is the canonical label, the rest are aliases.
macro_rules! label_enum {
    ($name:ident, $what:literal, { $($variant:ident => [$label:literal $(, $alias:literal)*]),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                $(
                    if s.eq_ignore_ascii_case($label) $(|| s.eq_ignore_ascii_case($alias))* {
                        return Ok($name::$variant);
                    }
                )+
                Err(format!(concat!("unknown ", $what, ": {}"), s))
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComplaintCategory {
    Infrastructure,
    Social,
    Cleanliness,
    Security,
    PublicService,
}

label_enum!(ComplaintCategory, "category", {
    Infrastructure => ["Infrastruktur", "Infrastructure"],
    Social => ["Sosial", "Social"],
    Cleanliness => ["Kebersihan", "Cleanliness"],
    Security => ["Keamanan", "Security"],
    PublicService => ["Pelayanan Publik", "Public Service", "PublicService"],
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ComplaintPriority {
    High,
    #[default]
    Medium,
    Low,
}

label_enum!(ComplaintPriority, "priority", {
    High => ["Tinggi", "High"],
    Medium => ["Sedang", "Medium"],
    Low => ["Rendah", "Low"],
});

/// Lifecycle state. Declaration order is lifecycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum ComplaintStatus {
    #[default]
    Pending,
    InProgress,
    Solved,
}

label_enum!(ComplaintStatus, "status", {
    Pending => ["Pending"],
    InProgress => ["In Progress", "InProgress", "in_progress"],
    Solved => ["Solved"],
});

impl ComplaintStatus {
    /// Whether moving from `self` to `next` keeps the lifecycle monotonic.
    ///
    /// Skipping a stage (`Pending → Solved`) is allowed; going back is not.
    /// Staying in place is allowed and treated as a no-op by callers.
    pub fn can_transition_to(self, next: ComplaintStatus) -> bool {
        next >= self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Complaint {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: ComplaintCategory,
    pub priority: ComplaintPriority,
    pub status: ComplaintStatus,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateComplaint {
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: ComplaintCategory,
    pub priority: ComplaintPriority,
    pub location: Option<String>,
    pub image_url: Option<String>,
}

/// Status/priority patch. At least one field must be set.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateComplaint {
    pub status: Option<ComplaintStatus>,
    pub priority: Option<ComplaintPriority>,
}

impl UpdateComplaint {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.priority.is_none()
    }
}
