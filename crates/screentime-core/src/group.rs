//! Accountability group membership.
//!
//! A user belongs to at most one group. The tracker holds that group plus
//! the user directory used for invitations. Pending invitations are
//! derived from member status, so removing or answering an invitation can
//! never leave a stale entry behind.
//!
//! ## Membership transitions
//!
//! ```text
//! (invite) -> Pending -> Active -> (remove | leave)
//!                    \-> Declined
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::GroupError;
use crate::events::Event;
use crate::model::{Group, GroupMember, MembershipStatus, User};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupTracker {
    current_group: Option<Group>,
    directory: Vec<User>,
}

impl GroupTracker {
    pub fn new(current_group: Option<Group>, directory: Vec<User>) -> Self {
        Self {
            current_group,
            directory,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn current_group(&self) -> Option<&Group> {
        self.current_group.as_ref()
    }

    pub fn directory(&self) -> &[User] {
        &self.directory
    }

    pub fn find_user(&self, user_id: &str) -> Option<&User> {
        self.directory.iter().find(|u| u.id == user_id)
    }

    pub fn find_user_by_email(&self, email: &str) -> Option<&User> {
        let email = email.trim();
        self.directory.iter().find(|u| {
            u.email
                .as_deref()
                .is_some_and(|e| e.eq_ignore_ascii_case(email))
        })
    }

    pub fn pending_invitations(&self) -> Vec<&GroupMember> {
        self.current_group
            .iter()
            .flat_map(|g| g.members.iter())
            .filter(|m| m.status == MembershipStatus::Pending)
            .collect()
    }

    pub fn active_members(&self) -> Vec<&GroupMember> {
        self.current_group
            .iter()
            .flat_map(|g| g.active_members())
            .collect()
    }

    pub fn is_user_admin(&self, user_id: &str) -> bool {
        self.current_group
            .as_ref()
            .is_some_and(|g| g.admin_user_id == user_id)
    }

    pub fn has_active_group(&self, user_id: &str) -> bool {
        self.current_group
            .as_ref()
            .is_some_and(|g| g.is_active_member(user_id))
    }

    pub fn has_pending_invitation(&self, user_id: &str) -> bool {
        self.pending_invitations()
            .iter()
            .any(|m| m.user_id == user_id)
    }

    /// Directory users whose username contains `query` (lower-cased).
    /// An empty query matches nobody.
    pub fn search_users(&self, query: &str) -> Vec<&User> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        self.directory
            .iter()
            .filter(|u| u.username().is_some_and(|name| name.contains(&query)))
            .collect()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Adds a user to the directory. Fails if the email is already known.
    pub fn register_user(&mut self, user: User) -> Result<(), crate::error::AuthError> {
        if let Some(email) = user.email.as_deref() {
            if self.find_user_by_email(email).is_some() {
                return Err(crate::error::AuthError::EmailTaken(email.to_string()));
            }
        }
        self.directory.push(user);
        Ok(())
    }

    /// Replaces the current group wholesale.
    pub fn load(&mut self, group: Option<Group>) {
        self.current_group = group;
    }

    pub fn create_group(
        &mut self,
        name: &str,
        description: Option<String>,
        creator: &User,
    ) -> Result<Event, GroupError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GroupError::EmptyName);
        }
        if self.has_active_group(&creator.id) {
            return Err(GroupError::AlreadyInGroup(creator.id.clone()));
        }

        let description = description.filter(|d| !d.trim().is_empty());
        let mut group = Group::new(name, description, creator.id.clone());
        let admin = GroupMember::invite(
            creator.id.clone(),
            group.id.clone(),
            creator.display_name(),
            creator.email.clone().unwrap_or_default(),
        )
        .activate();
        group.members.push(admin);

        tracing::info!(group_id = %group.id, admin = %creator.id, "group created");
        let event = Event::GroupCreated {
            group_id: group.id.clone(),
            admin_user_id: creator.id.clone(),
            at: Utc::now(),
        };
        self.current_group = Some(group);
        Ok(event)
    }

    pub fn invite_user(&mut self, user: &User, invited_by: &User) -> Result<Event, GroupError> {
        let group = self.current_group.as_mut().ok_or(GroupError::NoGroup)?;
        if !group.is_active_member(&invited_by.id) {
            return Err(GroupError::MemberNotFound(invited_by.id.clone()));
        }

        // Declined or removed users may be invited again.
        if let Some(existing) = group.member_by_user(&user.id) {
            if matches!(
                existing.status,
                MembershipStatus::Pending | MembershipStatus::Active
            ) {
                return Err(GroupError::AlreadyMember(user.id.clone()));
            }
        }
        group.members.retain(|m| m.user_id != user.id);

        let member = GroupMember::invite(
            user.id.clone(),
            group.id.clone(),
            user.username().unwrap_or("unknown"),
            user.email.as_deref().unwrap_or("unknown@example.com"),
        );
        let event = Event::MemberInvited {
            group_id: group.id.clone(),
            group_name: group.name.clone(),
            member_id: member.id.clone(),
            user_id: user.id.clone(),
            invited_by: invited_by.id.clone(),
            invited_by_name: invited_by.display_name().to_string(),
            at: Utc::now(),
        };
        tracing::debug!(group_id = %group.id, user_id = %user.id, "member invited");
        group.members.push(member);
        group.updated_at = Utc::now();
        Ok(event)
    }

    pub fn accept_invitation(&mut self, user_id: &str) -> Result<Event, GroupError> {
        let group = self.current_group.as_mut().ok_or(GroupError::NoGroup)?;
        let member = pending_member(group, user_id)?;
        member.status = MembershipStatus::Active;
        member.joined_at = Some(Utc::now());
        let username = member.username.clone();
        group.updated_at = Utc::now();

        tracing::info!(group_id = %group.id, user_id, "invitation accepted");
        Ok(Event::MemberJoined {
            group_id: group.id.clone(),
            group_name: group.name.clone(),
            user_id: user_id.to_string(),
            username,
            at: Utc::now(),
        })
    }

    pub fn decline_invitation(&mut self, user_id: &str) -> Result<Event, GroupError> {
        let group = self.current_group.as_mut().ok_or(GroupError::NoGroup)?;
        let member = pending_member(group, user_id)?;
        member.status = MembershipStatus::Declined;
        group.updated_at = Utc::now();

        Ok(Event::MemberDeclined {
            group_id: group.id.clone(),
            user_id: user_id.to_string(),
            at: Utc::now(),
        })
    }

    /// Admin-only. Works on pending invitations as well as active members.
    pub fn remove_member(
        &mut self,
        member_id: &str,
        acting_user_id: &str,
    ) -> Result<Event, GroupError> {
        let group = self.current_group.as_mut().ok_or(GroupError::NoGroup)?;
        if group.admin_user_id != acting_user_id {
            return Err(GroupError::NotAdmin("remove members"));
        }
        let index = group
            .members
            .iter()
            .position(|m| m.id == member_id)
            .ok_or_else(|| GroupError::MemberNotFound(member_id.to_string()))?;
        if group.members[index].user_id == group.admin_user_id {
            return Err(GroupError::CannotRemoveAdmin);
        }

        let removed = group.members.remove(index);
        group.updated_at = Utc::now();
        tracing::info!(group_id = %group.id, member_id, "member removed");
        Ok(Event::MemberRemoved {
            group_id: group.id.clone(),
            member_id: removed.id,
            user_id: removed.user_id,
            at: Utc::now(),
        })
    }

    /// A member leaves. When the admin leaves, the group is deleted.
    pub fn leave_group(&mut self, user_id: &str) -> Result<Event, GroupError> {
        if self.is_user_admin(user_id) {
            return self.delete_group(user_id);
        }
        let group = self.current_group.as_mut().ok_or(GroupError::NoGroup)?;
        let index = group
            .members
            .iter()
            .position(|m| m.user_id == user_id && m.status == MembershipStatus::Active)
            .ok_or_else(|| GroupError::MemberNotFound(user_id.to_string()))?;
        group.members.remove(index);
        group.updated_at = Utc::now();

        Ok(Event::MemberLeft {
            group_id: group.id.clone(),
            user_id: user_id.to_string(),
            at: Utc::now(),
        })
    }

    pub fn update_group(
        &mut self,
        name: &str,
        description: Option<String>,
        acting_user_id: &str,
    ) -> Result<Event, GroupError> {
        let group = self.current_group.as_mut().ok_or(GroupError::NoGroup)?;
        if group.admin_user_id != acting_user_id {
            return Err(GroupError::NotAdmin("edit the group"));
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(GroupError::EmptyName);
        }
        group.name = name.to_string();
        group.description = description.filter(|d| !d.trim().is_empty());
        group.updated_at = Utc::now();

        Ok(Event::GroupUpdated {
            group_id: group.id.clone(),
            name: group.name.clone(),
            at: Utc::now(),
        })
    }

    pub fn delete_group(&mut self, acting_user_id: &str) -> Result<Event, GroupError> {
        let group = self.current_group.as_ref().ok_or(GroupError::NoGroup)?;
        if group.admin_user_id != acting_user_id {
            return Err(GroupError::NotAdmin("delete the group"));
        }
        let group_id = group.id.clone();
        self.current_group = None;
        tracing::info!(group_id = %group_id, "group deleted");
        Ok(Event::GroupDeleted {
            group_id,
            at: Utc::now(),
        })
    }
}

fn pending_member<'a>(
    group: &'a mut Group,
    user_id: &str,
) -> Result<&'a mut GroupMember, GroupError> {
    group
        .members
        .iter_mut()
        .find(|m| m.user_id == user_id && m.status == MembershipStatus::Pending)
        .ok_or_else(|| GroupError::NoPendingInvitation(user_id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> User {
        User::new("user-1", "john@example.com", "johndoe")
    }

    fn tracker_with_group() -> GroupTracker {
        let mut tracker = GroupTracker::new(
            None,
            vec![
                admin(),
                User::new("user-4", "alex@example.com", "alex123"),
                User::new("user-5", "sam@example.com", "samsmith"),
                User::new("user-6", "taylor@example.com", "taylor"),
            ],
        );
        tracker.create_group("Focus Friends", None, &admin()).unwrap();
        tracker
    }

    fn user(tracker: &GroupTracker, id: &str) -> User {
        tracker.find_user(id).cloned().unwrap()
    }

    #[test]
    fn creator_becomes_active_admin() {
        let tracker = tracker_with_group();
        let group = tracker.current_group().unwrap();
        assert_eq!(group.members.len(), 1);
        assert_eq!(group.members[0].group_id, group.id);
        assert!(tracker.is_user_admin("user-1"));
        assert!(tracker.has_active_group("user-1"));
    }

    #[test]
    fn create_rejects_second_group_and_empty_name() {
        let mut tracker = tracker_with_group();
        assert_eq!(
            tracker.create_group("Other", None, &admin()).unwrap_err(),
            GroupError::AlreadyInGroup("user-1".into())
        );
        let mut empty = GroupTracker::default();
        assert_eq!(
            empty.create_group("  ", None, &admin()).unwrap_err(),
            GroupError::EmptyName
        );
    }

    #[test]
    fn search_matches_lowercased_substring() {
        let tracker = tracker_with_group();
        let names: Vec<_> = tracker
            .search_users("SAM")
            .iter()
            .filter_map(|u| u.username())
            .collect();
        assert_eq!(names, vec!["samsmith"]);
        assert!(tracker.search_users("").is_empty());
    }

    #[test]
    fn invite_then_accept() {
        let mut tracker = tracker_with_group();
        let alex = user(&tracker, "user-4");
        tracker.invite_user(&alex, &admin()).unwrap();
        assert!(tracker.has_pending_invitation("user-4"));
        assert!(!tracker.has_active_group("user-4"));

        tracker.accept_invitation("user-4").unwrap();
        assert!(!tracker.has_pending_invitation("user-4"));
        assert!(tracker.has_active_group("user-4"));
        assert_eq!(tracker.active_members().len(), 2);
    }

    #[test]
    fn duplicate_invite_is_rejected() {
        let mut tracker = tracker_with_group();
        let alex = user(&tracker, "user-4");
        tracker.invite_user(&alex, &admin()).unwrap();
        assert_eq!(
            tracker.invite_user(&alex, &admin()).unwrap_err(),
            GroupError::AlreadyMember("user-4".into())
        );
    }

    #[test]
    fn declined_user_can_be_invited_again() {
        let mut tracker = tracker_with_group();
        let alex = user(&tracker, "user-4");
        tracker.invite_user(&alex, &admin()).unwrap();
        tracker.decline_invitation("user-4").unwrap();
        assert!(tracker.pending_invitations().is_empty());

        tracker.invite_user(&alex, &admin()).unwrap();
        assert!(tracker.has_pending_invitation("user-4"));
        assert_eq!(tracker.current_group().unwrap().members.len(), 2);
    }

    #[test]
    fn removing_pending_invitation_clears_pending_list() {
        let mut tracker = tracker_with_group();
        let sam = user(&tracker, "user-5");
        tracker.invite_user(&sam, &admin()).unwrap();
        let member_id = tracker.pending_invitations()[0].id.clone();

        tracker.remove_member(&member_id, "user-1").unwrap();
        assert!(tracker.pending_invitations().is_empty());
        assert!(!tracker.has_pending_invitation("user-5"));
    }

    #[test]
    fn only_admin_removes_and_admin_is_not_removable() {
        let mut tracker = tracker_with_group();
        let sam = user(&tracker, "user-5");
        tracker.invite_user(&sam, &admin()).unwrap();
        tracker.accept_invitation("user-5").unwrap();

        let admin_member = tracker.current_group().unwrap().members[0].id.clone();
        assert_eq!(
            tracker.remove_member(&admin_member, "user-5").unwrap_err(),
            GroupError::NotAdmin("remove members")
        );
        assert_eq!(
            tracker.remove_member(&admin_member, "user-1").unwrap_err(),
            GroupError::CannotRemoveAdmin
        );
    }

    #[test]
    fn member_leaves_but_admin_leaving_deletes() {
        let mut tracker = tracker_with_group();
        let sam = user(&tracker, "user-5");
        tracker.invite_user(&sam, &admin()).unwrap();
        tracker.accept_invitation("user-5").unwrap();

        tracker.leave_group("user-5").unwrap();
        assert!(!tracker.has_active_group("user-5"));
        assert!(tracker.current_group().is_some());

        let event = tracker.leave_group("user-1").unwrap();
        assert!(matches!(event, Event::GroupDeleted { .. }));
        assert!(tracker.current_group().is_none());
    }

    #[test]
    fn rename_is_admin_only() {
        let mut tracker = tracker_with_group();
        tracker
            .update_group("Deep Work", Some("no doomscrolling".into()), "user-1")
            .unwrap();
        let group = tracker.current_group().unwrap();
        assert_eq!(group.name, "Deep Work");
        assert_eq!(group.description.as_deref(), Some("no doomscrolling"));

        assert!(tracker.update_group("Nope", None, "user-4").is_err());
        assert!(tracker.delete_group("user-4").is_err());
        assert!(tracker.delete_group("user-1").is_ok());
        assert!(tracker.pending_invitations().is_empty());
    }
}
