use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Class {
    pub id: String,
    pub name: String,
    pub schedule_text: String,
    pub duration_minutes: i64,
    pub online_until: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Class {
    /// The online flag is ephemeral: set by a ping, it expires
    /// `duration_minutes - 15` minutes later. `online_until` stores the
    /// expiry; being online is just a clock comparison.
    pub fn is_online_at(&self, now: DateTime<Utc>) -> bool {
        self.online_until
            .as_deref()
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
            .map(|until| until.with_timezone(&Utc) > now)
            .unwrap_or(false)
    }

    pub fn into_view(self, now: DateTime<Utc>) -> ClassView {
        let is_online = self.is_online_at(now);
        ClassView {
            id: self.id,
            name: self.name,
            schedule_text: self.schedule_text,
            duration_minutes: self.duration_minutes,
            is_online,
            online_until: self.online_until,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Wire shape of a class, with the computed online flag.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassView {
    pub id: String,
    pub name: String,
    pub schedule_text: String,
    pub duration_minutes: i64,
    pub is_online: bool,
    pub online_until: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

fn default_duration() -> i64 {
    60
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClassRequest {
    pub name: String,
    #[serde(default)]
    pub schedule_text: String,
    #[serde(default = "default_duration")]
    pub duration_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClassRequest {
    pub name: Option<String>,
    pub schedule_text: Option<String>,
    pub duration_minutes: Option<i64>,
}
