//! Local notification inbox.
//!
//! Items are created either directly ([`NotificationCenter::push`]) or by
//! fanning out domain [`Event`]s to the users they concern.

use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::limits::UserLimits;
use crate::model::{ExtensionStatus, Group, NotificationItem, NotificationType};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationCenter {
    notifications: Vec<NotificationItem>,
    enabled: bool,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(Vec::new(), true)
    }
}

impl NotificationCenter {
    pub fn new(notifications: Vec<NotificationItem>, enabled: bool) -> Self {
        Self {
            notifications,
            enabled,
        }
    }

    pub fn notifications(&self) -> &[NotificationItem] {
        &self.notifications
    }

    /// Newest first.
    pub fn for_user(&self, user_id: &str) -> Vec<&NotificationItem> {
        let mut items: Vec<_> = self
            .notifications
            .iter()
            .rev()
            .filter(|n| n.user_id == user_id)
            .collect();
        // Stable: equal timestamps keep the newest push first.
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        items
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.is_read).count()
    }

    pub fn unread_count_for(&self, user_id: &str) -> usize {
        self.notifications
            .iter()
            .filter(|n| n.user_id == user_id && !n.is_read)
            .count()
    }

    pub fn push(&mut self, item: NotificationItem) {
        if self.enabled {
            self.notifications.push(item);
        }
    }

    /// Unknown ids are ignored. Returns whether anything changed.
    pub fn mark_as_read(&mut self, notification_id: &str) -> bool {
        match self.notifications.iter_mut().find(|n| n.id == notification_id) {
            Some(item) if !item.is_read => {
                item.is_read = true;
                true
            }
            _ => false,
        }
    }

    pub fn mark_all_as_read(&mut self) {
        for item in &mut self.notifications {
            item.is_read = true;
        }
    }

    pub fn delete(&mut self, notification_id: &str) -> bool {
        let before = self.notifications.len();
        self.notifications.retain(|n| n.id != notification_id);
        self.notifications.len() != before
    }

    pub fn clear_all(&mut self) {
        self.notifications.clear();
    }

    /// Turns an event into notifications for the users it concerns.
    /// Returns how many were created.
    pub fn notify(&mut self, event: &Event, group: Option<&Group>) -> usize {
        if !self.enabled {
            return 0;
        }
        let items = fan_out(event, group);
        let count = items.len();
        if count > 0 {
            tracing::debug!(count, "notifications created");
        }
        self.notifications.extend(items);
        count
    }

    /// Appends the end-of-day usage summary for the owner of `limits`.
    pub fn daily_summary(&mut self, limits: UserLimits<'_>) -> Option<&NotificationItem> {
        if !self.enabled {
            return None;
        }
        let percent = (limits.usage_percentage() * 100.0).round() as u64;
        self.notifications.push(NotificationItem::new(
            "Daily Summary",
            format!(
                "You used {} minutes of screen time today ({percent}% of your limit)",
                limits.total_minutes_used()
            ),
            NotificationType::DailySummary,
            None,
            limits.user_id(),
        ));
        self.notifications.last()
    }
}

fn fan_out(event: &Event, group: Option<&Group>) -> Vec<NotificationItem> {
    match event {
        Event::ExtensionRequested {
            request_id,
            requester_id,
            requester_name,
            app_name,
            minutes,
            ..
        } => group
            .into_iter()
            .flat_map(|g| g.active_members())
            .filter(|m| &m.user_id != requester_id)
            .map(|m| {
                NotificationItem::new(
                    "Time Extension Request",
                    format!("{requester_name} requested {minutes} more minutes for {app_name}"),
                    NotificationType::ExtensionRequest,
                    Some(request_id.clone()),
                    m.user_id.clone(),
                )
            })
            .collect(),
        Event::ExtensionResolved {
            request_id,
            requester_id,
            app_name,
            minutes,
            status,
            ..
        } => {
            let (title, verb, kind) = match status {
                ExtensionStatus::Approved => (
                    "Extension Approved",
                    "approved",
                    NotificationType::ExtensionApproved,
                ),
                ExtensionStatus::Denied => {
                    ("Extension Denied", "denied", NotificationType::ExtensionDenied)
                }
                ExtensionStatus::Pending => return Vec::new(),
            };
            vec![NotificationItem::new(
                title,
                format!("Your request for {minutes} more minutes on {app_name} was {verb}"),
                kind,
                Some(request_id.clone()),
                requester_id.clone(),
            )]
        }
        Event::MemberInvited {
            group_id,
            group_name,
            user_id,
            invited_by_name,
            ..
        } => vec![NotificationItem::new(
            "Group Invitation",
            format!("{invited_by_name} invited you to join '{group_name}'"),
            NotificationType::GroupInvite,
            Some(group_id.clone()),
            user_id.clone(),
        )],
        Event::MemberJoined {
            group_id,
            group_name,
            username,
            ..
        } => group
            .map(|g| {
                vec![NotificationItem::new(
                    "New Group Member",
                    format!("{username} joined '{group_name}'"),
                    NotificationType::GroupJoined,
                    Some(group_id.clone()),
                    g.admin_user_id.clone(),
                )]
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}
