use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::new_id;

/// Daily cap for one app.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenTimeLimit {
    pub id: String,
    pub app_id: String,
    pub app_name: String,
    pub icon_name: String,
    pub daily_limit_minutes: u32,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ScreenTimeLimit {
    pub fn new(
        app_id: impl Into<String>,
        app_name: impl Into<String>,
        icon_name: impl Into<String>,
        daily_limit_minutes: u32,
        user_id: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            app_id: app_id.into(),
            app_name: app_name.into(),
            icon_name: icon_name.into(),
            daily_limit_minutes,
            user_id: user_id.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Minutes spent in one app on one day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenTimeUsage {
    pub id: String,
    pub app_id: String,
    pub app_name: String,
    pub minutes_used: u32,
    pub date: DateTime<Utc>,
    pub user_id: String,
}

impl ScreenTimeUsage {
    pub fn new(
        app_id: impl Into<String>,
        app_name: impl Into<String>,
        minutes_used: u32,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            id: new_id(),
            app_id: app_id.into(),
            app_name: app_name.into(),
            minutes_used,
            date: Utc::now(),
            user_id: user_id.into(),
        }
    }
}
