use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ExtensionStatus;

/// Every state change in the system produces an Event.
/// The front end prints them; the notification center fans them out.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    UserSignedIn {
        user_id: String,
        at: DateTime<Utc>,
    },
    UserSignedOut {
        user_id: Option<String>,
        at: DateTime<Utc>,
    },
    LimitUpdated {
        app_id: String,
        daily_limit_minutes: u32,
        at: DateTime<Utc>,
    },
    UsageRecorded {
        app_id: String,
        minutes_added: u32,
        minutes_used: u32,
        at: DateTime<Utc>,
    },
    UsageReset {
        at: DateTime<Utc>,
    },
    GroupCreated {
        group_id: String,
        admin_user_id: String,
        at: DateTime<Utc>,
    },
    GroupUpdated {
        group_id: String,
        name: String,
        at: DateTime<Utc>,
    },
    GroupDeleted {
        group_id: String,
        at: DateTime<Utc>,
    },
    MemberInvited {
        group_id: String,
        group_name: String,
        member_id: String,
        user_id: String,
        invited_by: String,
        invited_by_name: String,
        at: DateTime<Utc>,
    },
    MemberJoined {
        group_id: String,
        group_name: String,
        user_id: String,
        username: String,
        at: DateTime<Utc>,
    },
    MemberDeclined {
        group_id: String,
        user_id: String,
        at: DateTime<Utc>,
    },
    MemberRemoved {
        group_id: String,
        member_id: String,
        user_id: String,
        at: DateTime<Utc>,
    },
    MemberLeft {
        group_id: String,
        user_id: String,
        at: DateTime<Utc>,
    },
    ExtensionRequested {
        request_id: String,
        group_id: String,
        requester_id: String,
        requester_name: String,
        app_name: String,
        minutes: u32,
        at: DateTime<Utc>,
    },
    ExtensionResponded {
        request_id: String,
        responder_id: String,
        approved: bool,
        at: DateTime<Utc>,
    },
    /// Terminal transition of a request; `status` is never `Pending`.
    ExtensionResolved {
        request_id: String,
        requester_id: String,
        app_id: String,
        app_name: String,
        minutes: u32,
        status: ExtensionStatus,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::UserSignedIn { at, .. }
            | Event::UserSignedOut { at, .. }
            | Event::LimitUpdated { at, .. }
            | Event::UsageRecorded { at, .. }
            | Event::UsageReset { at }
            | Event::GroupCreated { at, .. }
            | Event::GroupUpdated { at, .. }
            | Event::GroupDeleted { at, .. }
            | Event::MemberInvited { at, .. }
            | Event::MemberJoined { at, .. }
            | Event::MemberDeclined { at, .. }
            | Event::MemberRemoved { at, .. }
            | Event::MemberLeft { at, .. }
            | Event::ExtensionRequested { at, .. }
            | Event::ExtensionResponded { at, .. }
            | Event::ExtensionResolved { at, .. } => *at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tag() {
        let event = Event::UsageReset { at: Utc::now() };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "UsageReset");
    }

    #[test]
    fn resolved_status_serializes_lowercase() {
        let event = Event::ExtensionResolved {
            request_id: "r1".into(),
            requester_id: "user-1".into(),
            app_id: "com.instagram.ios".into(),
            app_name: "Instagram".into(),
            minutes: 15,
            status: ExtensionStatus::Approved,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["status"], "approved");
    }
}
