//! Demo data used by `seed` and by tests.
//!
//! Ids are fixed so scripts can refer to them (`group-1`, `member-3`,
//! `user-4`, ...). Timestamps are relative to the call.

use chrono::{Duration, Utc};

use crate::model::{
    Group, GroupMember, MembershipStatus, NotificationItem, NotificationType, ScreenTimeLimit,
    ScreenTimeUsage, User,
};
use crate::storage::Snapshot;

pub const CURRENT_USER_ID: &str = "user-1";
pub const GROUP_ID: &str = "group-1";

/// (app id, app name, icon, daily limit, minutes used)
const APPS: [(&str, &str, &str, u32, u32); 3] = [
    ("com.instagram.ios", "Instagram", "camera", 30, 15),
    ("com.tiktok.ios", "TikTok", "play.rectangle", 45, 25),
    ("com.google.ios.youtube", "YouTube", "play.tv", 60, 40),
];

/// The user the mock provider signs in as.
pub fn current_user() -> User {
    User::new(CURRENT_USER_ID, "john@example.com", "johndoe")
}

/// Group members plus the users only reachable through search.
pub fn directory() -> Vec<User> {
    vec![
        current_user(),
        User::new("user-2", "jane@example.com", "janedoe"),
        User::new("user-3", "bob@example.com", "bobsmith"),
        User::new("user-4", "alex@example.com", "alex123"),
        User::new("user-5", "sam@example.com", "samsmith"),
        User::new("user-6", "taylor@example.com", "taylor"),
    ]
}

pub fn group() -> Group {
    let mut group = Group::new(
        "Focus Friends",
        Some("A group to help each other stay focused".into()),
        CURRENT_USER_ID,
    );
    group.id = GROUP_ID.into();

    let members = [
        ("member-1", "user-1", "johndoe", "john@example.com", MembershipStatus::Active),
        ("member-2", "user-2", "janedoe", "jane@example.com", MembershipStatus::Active),
        ("member-3", "user-3", "bobsmith", "bob@example.com", MembershipStatus::Pending),
    ];
    for (id, user_id, username, email, status) in members {
        let mut member = GroupMember::invite(user_id, GROUP_ID, username, email);
        if status == MembershipStatus::Active {
            member = member.activate();
        }
        member.id = id.into();
        group.members.push(member);
    }
    group
}

pub fn limits() -> Vec<ScreenTimeLimit> {
    APPS.iter()
        .enumerate()
        .map(|(i, (app_id, name, icon, limit, _))| {
            let mut l = ScreenTimeLimit::new(*app_id, *name, *icon, *limit, CURRENT_USER_ID);
            l.id = format!("limit-{}", i + 1);
            l
        })
        .collect()
}

pub fn usage() -> Vec<ScreenTimeUsage> {
    APPS.iter()
        .enumerate()
        .map(|(i, (app_id, name, _, _, used))| {
            let mut u = ScreenTimeUsage::new(*app_id, *name, *used, CURRENT_USER_ID);
            u.id = format!("usage-{}", i + 1);
            u
        })
        .collect()
}

pub fn notifications() -> Vec<NotificationItem> {
    let now = Utc::now();
    let items = [
        (
            "Time Extension Request",
            "John requested 30 more minutes for Instagram",
            NotificationType::ExtensionRequest,
            Some("request-1"),
            Duration::hours(1),
        ),
        (
            "Extension Approved",
            "Your request for 15 more minutes on TikTok was approved",
            NotificationType::ExtensionApproved,
            Some("request-2"),
            Duration::hours(2),
        ),
        (
            "Group Invitation",
            "Jane invited you to join 'Focus Friends'",
            NotificationType::GroupInvite,
            Some(GROUP_ID),
            Duration::days(1),
        ),
        (
            "Daily Summary",
            "You used 45 minutes of screen time today (75% of your limit)",
            NotificationType::DailySummary,
            None,
            Duration::days(2),
        ),
    ];

    items
        .into_iter()
        .enumerate()
        .map(|(i, (title, body, kind, related, age))| {
            let related = related.map(str::to_string);
            let mut item = NotificationItem::new(title, body, kind, related, CURRENT_USER_ID);
            item.id = format!("notification-{}", i + 1);
            item.created_at = now - age;
            item
        })
        .collect()
}

/// Everything above, signed out, with no extension requests yet.
pub fn snapshot() -> Snapshot {
    Snapshot {
        users: directory(),
        group: Some(group()),
        limits: limits(),
        usage: usage(),
        notifications: notifications(),
        ..Snapshot::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_has_one_active_admin() {
        let g = group();
        assert_eq!(g.admin_user_id, CURRENT_USER_ID);
        assert!(g.is_active_member(CURRENT_USER_ID));
        assert_eq!(g.active_members().count(), 2);
        assert!(g.members.iter().all(|m| m.group_id == GROUP_ID));
    }

    #[test]
    fn notifications_are_ordered_newest_first() {
        let items = notifications();
        assert_eq!(items.len(), 4);
        assert!(items.windows(2).all(|w| w[0].created_at > w[1].created_at));
        assert!(items.iter().all(|n| !n.is_read));
    }

    #[test]
    fn every_usage_record_has_a_limit() {
        let limits = limits();
        for u in usage() {
            assert!(limits.iter().any(|l| l.app_id == u.app_id));
        }
    }
}
