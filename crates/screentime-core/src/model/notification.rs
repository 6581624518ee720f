use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::new_id;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationItem {
    pub id: String,
    pub title: String,
    pub body: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub related_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub is_read: bool,
    pub user_id: String,
}

impl NotificationItem {
    /// An unread notification created now.
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        kind: NotificationType,
        related_id: Option<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            body: body.into(),
            kind,
            related_id,
            created_at: Utc::now(),
            is_read: false,
            user_id: user_id.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    ExtensionRequest,
    ExtensionApproved,
    ExtensionDenied,
    GroupInvite,
    GroupJoined,
    DailySummary,
}

impl NotificationType {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationType::ExtensionRequest => "extension_request",
            NotificationType::ExtensionApproved => "extension_approved",
            NotificationType::ExtensionDenied => "extension_denied",
            NotificationType::GroupInvite => "group_invite",
            NotificationType::GroupJoined => "group_joined",
            NotificationType::DailySummary => "daily_summary",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "extension_request" => Some(NotificationType::ExtensionRequest),
            "extension_approved" => Some(NotificationType::ExtensionApproved),
            "extension_denied" => Some(NotificationType::ExtensionDenied),
            "group_invite" => Some(NotificationType::GroupInvite),
            "group_joined" => Some(NotificationType::GroupJoined),
            "daily_summary" => Some(NotificationType::DailySummary),
            _ => None,
        }
    }
}
