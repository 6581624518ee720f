use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::new_id;

/// An accountability group. Exactly one admin, who is also a member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub admin_user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub members: Vec<GroupMember>,
}

impl Group {
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        admin_user_id: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            name: name.into(),
            description,
            admin_user_id: admin_user_id.into(),
            created_at: now,
            updated_at: now,
            members: Vec::new(),
        }
    }

    pub fn member_by_user(&self, user_id: &str) -> Option<&GroupMember> {
        self.members.iter().find(|m| m.user_id == user_id)
    }

    pub fn is_active_member(&self, user_id: &str) -> bool {
        self.member_by_user(user_id)
            .is_some_and(|m| m.status == MembershipStatus::Active)
    }

    pub fn active_members(&self) -> impl Iterator<Item = &GroupMember> {
        self.members
            .iter()
            .filter(|m| m.status == MembershipStatus::Active)
    }
}

/// Membership of one user in one group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupMember {
    pub id: String,
    pub user_id: String,
    pub group_id: String,
    pub username: String,
    pub email: String,
    pub status: MembershipStatus,
    pub joined_at: Option<DateTime<Utc>>,
    pub invited_at: DateTime<Utc>,
}

impl GroupMember {
    /// A pending invitation.
    pub fn invite(
        user_id: impl Into<String>,
        group_id: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: new_id(),
            user_id: user_id.into(),
            group_id: group_id.into(),
            username: username.into(),
            email: email.into(),
            status: MembershipStatus::Pending,
            joined_at: None,
            invited_at: Utc::now(),
        }
    }

    /// Marks the membership active as of now.
    pub fn activate(mut self) -> Self {
        let now = Utc::now();
        self.status = MembershipStatus::Active;
        self.joined_at = Some(now);
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipStatus {
    #[default]
    Pending,
    Active,
    Declined,
    Removed,
}

impl MembershipStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MembershipStatus::Pending => "pending",
            MembershipStatus::Active => "active",
            MembershipStatus::Declined => "declined",
            MembershipStatus::Removed => "removed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(MembershipStatus::Pending),
            "active" => Some(MembershipStatus::Active),
            "declined" => Some(MembershipStatus::Declined),
            "removed" => Some(MembershipStatus::Removed),
            _ => None,
        }
    }
}
