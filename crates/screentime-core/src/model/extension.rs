use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::new_id;

/// A user's ask for more minutes on one app, routed to their group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtensionRequest {
    pub id: String,
    pub app_id: String,
    pub app_name: String,
    pub requested_minutes: u32,
    pub reason: String,
    pub user_id: String,
    pub group_id: String,
    pub status: ExtensionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub responses: Vec<ExtensionResponse>,
}

impl ExtensionRequest {
    pub fn approvals(&self) -> usize {
        self.responses.iter().filter(|r| r.approved).count()
    }

    pub fn denials(&self) -> usize {
        self.responses.iter().filter(|r| !r.approved).count()
    }

    pub fn has_response_from(&self, user_id: &str) -> bool {
        self.responses.iter().any(|r| r.user_id == user_id)
    }

    pub fn is_pending(&self) -> bool {
        self.status == ExtensionStatus::Pending
    }

    pub(crate) fn pending(
        app_id: String,
        app_name: String,
        requested_minutes: u32,
        reason: String,
        user_id: String,
        group_id: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            app_id,
            app_name,
            requested_minutes,
            reason,
            user_id,
            group_id,
            status: ExtensionStatus::Pending,
            created_at: now,
            updated_at: now,
            responses: Vec::new(),
        }
    }
}

/// One member's decision on a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtensionResponse {
    pub id: String,
    pub request_id: String,
    pub user_id: String,
    pub approved: bool,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ExtensionResponse {
    pub fn new(
        request_id: impl Into<String>,
        user_id: impl Into<String>,
        approved: bool,
        comment: Option<String>,
    ) -> Self {
        Self {
            id: new_id(),
            request_id: request_id.into(),
            user_id: user_id.into(),
            approved,
            comment,
            created_at: Utc::now(),
        }
    }
}

/// `Pending` moves to exactly one of `Approved` or `Denied`, then stays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtensionStatus {
    #[default]
    Pending,
    Approved,
    Denied,
}

impl ExtensionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ExtensionStatus::Pending => "pending",
            ExtensionStatus::Approved => "approved",
            ExtensionStatus::Denied => "denied",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ExtensionStatus::Pending),
            "approved" => Some(ExtensionStatus::Approved),
            "denied" => Some(ExtensionStatus::Denied),
            _ => None,
        }
    }
}

impl fmt::Display for ExtensionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
