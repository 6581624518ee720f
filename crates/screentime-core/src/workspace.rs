//! One process worth of state: the auth session plus every tracker.
//!
//! The workspace is the only place where trackers meet. Each command
//! resolves the signed-in user, mutates one tracker, and publishes the
//! resulting events to the notification center. An approved extension is
//! also applied to the requester's limits.

use crate::auth::{AuthMode, AuthProvider, AuthState};
use crate::error::{AuthError, ConfigError, GroupError, Result, ValidationError};
use crate::events::Event;
use crate::extension::{ApprovalPolicy, ExtensionTracker};
use crate::fixtures;
use crate::group::GroupTracker;
use crate::limits::{LimitsTracker, UserLimits};
use crate::model::{ExtensionStatus, NotificationItem, ScreenTimeLimit, User};
use crate::notifications::NotificationCenter;
use crate::storage::{Config, Snapshot};

pub struct Workspace {
    mode: AuthMode,
    auth: Box<dyn AuthProvider>,
    limits: LimitsTracker,
    groups: GroupTracker,
    extensions: ExtensionTracker,
    notifications: NotificationCenter,
    daily_summary: bool,
}

impl Workspace {
    /// Empty workspace configured from `config`.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Self::from_snapshot(Snapshot::default(), config)
    }

    /// Demo data with the default configuration. Nobody is signed in.
    pub fn seeded() -> Self {
        Self::assemble(fixtures::snapshot(), ApprovalPolicy::default(), &Config::default())
    }

    /// Demo data under `config`.
    pub fn seeded_with(config: &Config) -> Result<Self, ConfigError> {
        Self::from_snapshot(fixtures::snapshot(), config)
    }

    pub fn from_snapshot(snapshot: Snapshot, config: &Config) -> Result<Self, ConfigError> {
        let policy = config.approval_policy()?;
        Ok(Self::assemble(snapshot, policy, config))
    }

    fn assemble(snapshot: Snapshot, policy: ApprovalPolicy, config: &Config) -> Self {
        let mode = config.auth.mode;
        let mut auth = mode.provider(snapshot.credentials);
        if let Some(session) = snapshot.session {
            auth.restore(session);
        }
        Self {
            mode,
            auth,
            limits: LimitsTracker::new(snapshot.limits, snapshot.usage),
            groups: GroupTracker::new(snapshot.group, snapshot.users),
            extensions: ExtensionTracker::new(
                snapshot.requests,
                policy,
                config.extension.max_minutes,
            ),
            notifications: NotificationCenter::new(
                snapshot.notifications,
                config.notifications.enabled,
            ),
            daily_summary: config.notifications.daily_summary,
        }
    }

    pub fn to_snapshot(&self) -> Snapshot {
        let state = self.auth.state();
        let session = (state.is_authenticated || state.requires_password_creation)
            .then(|| state.clone());
        Snapshot {
            users: self.groups.directory().to_vec(),
            group: self.groups.current_group().cloned(),
            limits: self.limits.limits().to_vec(),
            usage: self.limits.usage().to_vec(),
            requests: self.extensions.requests().to_vec(),
            notifications: self.notifications.notifications().to_vec(),
            credentials: self.auth.credentials(),
            session,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn auth_state(&self) -> &AuthState {
        self.auth.state()
    }

    pub fn auth_provider(&self) -> &str {
        self.auth.name()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.auth.current_user()
    }

    pub fn limits(&self) -> &LimitsTracker {
        &self.limits
    }

    pub fn groups(&self) -> &GroupTracker {
        &self.groups
    }

    pub fn extensions(&self) -> &ExtensionTracker {
        &self.extensions
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    /// Finds a directory user by id, username or email.
    pub fn lookup_user(&self, key: &str) -> Option<&User> {
        let key = key.trim();
        self.groups.find_user(key).or_else(|| self.groups.find_user_by_email(key)).or_else(|| {
            self.groups
                .directory()
                .iter()
                .find(|u| u.username().is_some_and(|name| name.eq_ignore_ascii_case(key)))
        })
    }

    fn require_user(&self) -> Result<User, AuthError> {
        self.auth.current_user().cloned().ok_or(AuthError::NotAuthenticated)
    }

    // ── Auth ─────────────────────────────────────────────────────────

    /// Creates an account. Does not sign in.
    pub fn sign_up(&mut self, email: &str, username: &str, password: &str) -> Result<User> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AuthError::EmptyEmail.into());
        }
        if password.is_empty() {
            return Err(AuthError::EmptyPassword.into());
        }
        if self.groups.find_user_by_email(email).is_some() {
            return Err(AuthError::EmailTaken(email.to_string()).into());
        }
        let username = match username.trim() {
            "" => email.split('@').next().unwrap_or(email).to_lowercase(),
            name => name.to_string(),
        };

        let user = User::new(crate::model::new_id(), email, username);
        self.auth.sign_up(&user, password)?;
        self.groups.register_user(user.clone())?;
        tracing::info!(user_id = %user.id, "account created");
        Ok(user)
    }

    pub fn sign_in(&mut self, email: &str, password: &str) -> Result<Event> {
        if email.trim().is_empty() {
            return Err(AuthError::EmptyEmail.into());
        }
        if password.is_empty() {
            return Err(AuthError::EmptyPassword.into());
        }
        let user = match self.groups.find_user_by_email(email) {
            Some(user) => user.clone(),
            // The mock provider lets anyone in as the demo user.
            None if self.mode == AuthMode::Mock => fixtures::current_user(),
            None => return Err(AuthError::UserNotFound.into()),
        };
        Ok(self.auth.sign_in(&user, password)?)
    }

    /// Sets a password for the user whose sign-in asked for one.
    pub fn create_password(&mut self, password: &str) -> Result<Event> {
        let state = self.auth.state();
        let user = match (&state.current_user, state.requires_password_creation) {
            (Some(user), true) => user.clone(),
            _ => return Err(AuthError::NoPasswordPending.into()),
        };
        Ok(self.auth.create_password(&user, password)?)
    }

    /// Returns whether the email belongs to a known account. Stored
    /// passwords are left alone.
    pub fn reset_password(&self, email: &str) -> bool {
        let known = self.groups.find_user_by_email(email).is_some();
        tracing::info!(known, "password reset requested");
        known
    }

    pub fn sign_out(&mut self) -> Event {
        self.auth.sign_out()
    }

    // ── Limits ───────────────────────────────────────────────────────

    /// The signed-in user's limits and usage.
    pub fn my_limits(&self) -> Result<UserLimits<'_>> {
        let user = self.auth.current_user().ok_or(AuthError::NotAuthenticated)?;
        Ok(self.limits.for_user(&user.id))
    }

    /// Limits and usage of a fellow active group member, found by id,
    /// username or email.
    pub fn member_limits(&self, user_key: &str) -> Result<UserLimits<'_>> {
        let viewer = self.auth.current_user().ok_or(AuthError::NotAuthenticated)?;
        let member = self
            .lookup_user(user_key)
            .ok_or_else(|| GroupError::MemberNotFound(user_key.to_string()))?;
        let same_group =
            self.groups.has_active_group(&viewer.id) && self.groups.has_active_group(&member.id);
        if member.id != viewer.id && !same_group {
            return Err(GroupError::MemberNotFound(user_key.to_string()).into());
        }
        Ok(self.limits.for_user(&member.id))
    }

    pub fn set_limit(
        &mut self,
        app_id: &str,
        app_name: &str,
        icon_name: &str,
        minutes: u32,
    ) -> Result<Event> {
        let user = self.require_user()?;
        if app_id.trim().is_empty() {
            return Err(ValidationError::Empty("app_id").into());
        }
        let name = if app_name.trim().is_empty() { app_id } else { app_name };
        let limit = ScreenTimeLimit::new(app_id.trim(), name.trim(), icon_name, minutes, user.id);
        Ok(self.limits.upsert_limit(limit))
    }

    pub fn update_limit(&mut self, app_id: &str, minutes: u32) -> Result<Event> {
        let user = self.require_user()?;
        Ok(self.limits.update_limit(&user.id, app_id, minutes)?)
    }

    pub fn add_usage(&mut self, app_id: &str, minutes: u32) -> Result<Event> {
        let user = self.require_user()?;
        Ok(self.limits.add_usage_time(&user.id, app_id, minutes)?)
    }

    pub fn reset_usage(&mut self) -> Result<Event> {
        let user = self.require_user()?;
        Ok(self.limits.reset_usage(&user.id))
    }

    // ── Group ────────────────────────────────────────────────────────

    pub fn create_group(&mut self, name: &str, description: Option<String>) -> Result<Event> {
        let user = self.require_user()?;
        let event = self.groups.create_group(name, description, &user)?;
        Ok(self.publish(event))
    }

    /// Invites a directory user, found by id, username or email.
    pub fn invite(&mut self, user_key: &str) -> Result<Event> {
        let inviter = self.require_user()?;
        let invitee = self
            .lookup_user(user_key)
            .cloned()
            .ok_or_else(|| GroupError::MemberNotFound(user_key.to_string()))?;
        let event = self.groups.invite_user(&invitee, &inviter)?;
        Ok(self.publish(event))
    }

    pub fn accept_invitation(&mut self) -> Result<Event> {
        let user = self.require_user()?;
        let event = self.groups.accept_invitation(&user.id)?;
        Ok(self.publish(event))
    }

    pub fn decline_invitation(&mut self) -> Result<Event> {
        let user = self.require_user()?;
        let event = self.groups.decline_invitation(&user.id)?;
        Ok(self.publish(event))
    }

    pub fn remove_member(&mut self, member_id: &str) -> Result<Event> {
        let user = self.require_user()?;
        let event = self.groups.remove_member(member_id, &user.id)?;
        Ok(self.publish(event))
    }

    pub fn leave_group(&mut self) -> Result<Event> {
        let user = self.require_user()?;
        let event = self.groups.leave_group(&user.id)?;
        Ok(self.publish(event))
    }

    pub fn update_group(&mut self, name: &str, description: Option<String>) -> Result<Event> {
        let user = self.require_user()?;
        let event = self.groups.update_group(name, description, &user.id)?;
        Ok(self.publish(event))
    }

    pub fn delete_group(&mut self) -> Result<Event> {
        let user = self.require_user()?;
        let event = self.groups.delete_group(&user.id)?;
        Ok(self.publish(event))
    }

    // ── Extensions ───────────────────────────────────────────────────

    pub fn request_extension(&mut self, app_id: &str, minutes: u32, reason: &str) -> Result<Event> {
        let user = self.require_user()?;
        let group = self.groups.current_group().ok_or(GroupError::NoGroup)?;
        let app = self.limits.for_user(&user.id).limit_for(app_id);
        if app.is_none() && !app_id.trim().is_empty() {
            return Err(ValidationError::UnknownApp(app_id.to_string()).into());
        }
        let event = self.extensions.create(app, minutes, reason, &user, group)?;
        Ok(self.publish(event))
    }

    /// Records the signed-in user's decision. The returned events include
    /// the resolution and any limit change it caused.
    pub fn respond(
        &mut self,
        request_id: &str,
        approved: bool,
        comment: Option<&str>,
    ) -> Result<Vec<Event>> {
        let user = self.require_user()?;
        let group = self.groups.current_group().ok_or(GroupError::NoGroup)?;
        let events = self
            .extensions
            .respond(request_id, &user, approved, comment, group)?;
        self.settle(events)
    }

    /// Re-applies the approval policy, e.g. after membership changed.
    /// Empty while the request stays pending.
    pub fn resolve(&mut self, request_id: &str) -> Result<Vec<Event>> {
        self.require_user()?;
        let group = self.groups.current_group().ok_or(GroupError::NoGroup)?;
        let events = self.extensions.resolve(request_id, group)?.into_iter().collect();
        self.settle(events)
    }

    /// Applies approved extensions to the requester's limits, then
    /// publishes everything.
    fn settle(&mut self, mut events: Vec<Event>) -> Result<Vec<Event>> {
        let grants: Vec<(String, String, u32)> = events
            .iter()
            .filter_map(|event| match event {
                Event::ExtensionResolved {
                    requester_id,
                    app_id,
                    minutes,
                    status: ExtensionStatus::Approved,
                    ..
                } => Some((requester_id.clone(), app_id.clone(), *minutes)),
                _ => None,
            })
            .collect();
        for (user_id, app_id, minutes) in grants {
            if self.limits.for_user(&user_id).limit_for(&app_id).is_none() {
                tracing::warn!(%user_id, %app_id, "approved extension has no limit to raise");
                continue;
            }
            events.push(self.limits.grant_extension(&user_id, &app_id, minutes)?);
        }

        Ok(events.into_iter().map(|e| self.publish(e)).collect())
    }

    // ── Notifications ────────────────────────────────────────────────

    /// The signed-in user's notifications, newest first.
    pub fn my_notifications(&self) -> Result<Vec<&NotificationItem>> {
        let user = self.auth.current_user().ok_or(AuthError::NotAuthenticated)?;
        Ok(self.notifications.for_user(&user.id))
    }

    pub fn mark_as_read(&mut self, notification_id: &str) -> bool {
        self.notifications.mark_as_read(notification_id)
    }

    pub fn mark_all_as_read(&mut self) {
        self.notifications.mark_all_as_read();
    }

    pub fn delete_notification(&mut self, notification_id: &str) -> bool {
        self.notifications.delete(notification_id)
    }

    pub fn clear_notifications(&mut self) {
        self.notifications.clear_all();
    }

    /// Appends today's usage summary for the signed-in user. `None` when
    /// summaries or notifications are turned off.
    pub fn daily_summary(&mut self) -> Result<Option<NotificationItem>> {
        let user = self.require_user()?;
        if !self.daily_summary {
            return Ok(None);
        }
        let limits = self.limits.for_user(&user.id);
        Ok(self.notifications.daily_summary(limits).cloned())
    }

    fn publish(&mut self, event: Event) -> Event {
        self.notifications.notify(&event, self.groups.current_group());
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::model::NotificationType;

    fn signed_in_as(email: &str) -> Workspace {
        let mut ws = Workspace::seeded();
        ws.sign_in(email, "password").unwrap();
        ws
    }

    fn switch_user(ws: &mut Workspace, email: &str) {
        ws.sign_out();
        ws.sign_in(email, "password").unwrap();
    }

    fn request(ws: &mut Workspace, app_id: &str, minutes: u32) -> String {
        match ws.request_extension(app_id, minutes, "group chat").unwrap() {
            Event::ExtensionRequested { request_id, .. } => request_id,
            other => panic!("unexpected event: {other:?}"),
        }
    }

    fn limit_of(ws: &Workspace, user_id: &str, app_id: &str) -> u32 {
        let limits = ws.limits().for_user(user_id);
        limits.limit_for(app_id).map(|l| l.daily_limit_minutes).unwrap_or(0)
    }

    #[test]
    fn seeded_workspace_matches_demo_data() {
        let ws = Workspace::seeded();
        assert!(ws.current_user().is_none());
        let john = ws.limits().for_user("user-1");
        assert_eq!(john.total_daily_limit(), 135);
        assert_eq!(john.total_minutes_used(), 80);
        assert_eq!(john.remaining_minutes(), 55);
        assert!(!john.is_over_limit());
        assert_eq!(ws.notifications().unread_count(), 4);
        assert_eq!(ws.groups().pending_invitations().len(), 1);
    }

    #[test]
    fn commands_require_sign_in() {
        let mut ws = Workspace::seeded();
        assert!(matches!(
            ws.request_extension("com.instagram.ios", 15, "chat"),
            Err(CoreError::Auth(AuthError::NotAuthenticated))
        ));
        assert!(matches!(
            ws.leave_group(),
            Err(CoreError::Auth(AuthError::NotAuthenticated))
        ));
        assert!(matches!(
            ws.add_usage("com.instagram.ios", 5),
            Err(CoreError::Auth(AuthError::NotAuthenticated))
        ));
        assert!(ws.update_limit("com.instagram.ios", 5).is_err());
        assert!(ws.reset_usage().is_err());
        assert!(ws.my_limits().is_err());
    }

    #[test]
    fn mock_sign_in_with_unknown_email_uses_demo_user() {
        let ws = signed_in_as("nobody@example.com");
        assert_eq!(ws.current_user().map(|u| u.id.as_str()), Some("user-1"));
    }

    #[test]
    fn approved_extension_raises_requesters_limit() {
        let mut ws = signed_in_as("john@example.com");
        let request_id = request(&mut ws, "com.instagram.ios", 15);

        // Jane is the only other active member, so one approval decides it.
        switch_user(&mut ws, "jane@example.com");
        let requests = ws.notifications().for_user("user-2");
        assert_eq!(requests[0].kind, NotificationType::ExtensionRequest);

        let events = ws.respond(&request_id, true, None).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(limit_of(&ws, "user-1", "com.instagram.ios"), 45);
        assert_eq!(ws.extensions().get(&request_id).unwrap().status, ExtensionStatus::Approved);

        let inbox = ws.notifications().for_user("user-1");
        assert_eq!(inbox[0].kind, NotificationType::ExtensionApproved);
    }

    #[test]
    fn denial_leaves_limit_alone() {
        let mut ws = signed_in_as("john@example.com");
        ws.request_extension("com.tiktok.ios", 30, "movie").unwrap();
        let request_id = ws.extensions().requests()[0].id.clone();

        switch_user(&mut ws, "jane@example.com");
        assert!(matches!(
            ws.respond(&request_id, false, None),
            Err(CoreError::Extension(_))
        ));
        ws.respond(&request_id, false, Some("not today")).unwrap();
        assert_eq!(limit_of(&ws, "user-1", "com.tiktok.ios"), 45);
        assert_eq!(ws.extensions().get(&request_id).unwrap().status, ExtensionStatus::Denied);
    }

    #[test]
    fn unknown_app_is_rejected() {
        let mut ws = signed_in_as("john@example.com");
        assert!(matches!(
            ws.request_extension("com.example.unknown", 5, "why not"),
            Err(CoreError::Validation(ValidationError::UnknownApp(_)))
        ));
        assert!(matches!(
            ws.request_extension("", 5, "why not"),
            Err(CoreError::Validation(ValidationError::Empty("app")))
        ));
        assert!(ws.extensions().requests().is_empty());
    }

    #[test]
    fn invite_and_join_notify_the_right_people() {
        let mut ws = signed_in_as("john@example.com");
        ws.invite("alex123").unwrap();
        assert!(ws.groups().has_pending_invitation("user-4"));

        switch_user(&mut ws, "alex@example.com");
        assert_eq!(ws.my_notifications().unwrap()[0].kind, NotificationType::GroupInvite);
        ws.accept_invitation().unwrap();
        assert!(ws.groups().has_active_group("user-4"));

        let admin_inbox = ws.notifications().for_user("user-1");
        assert_eq!(admin_inbox[0].kind, NotificationType::GroupJoined);
    }

    #[test]
    fn snapshot_restores_session_and_state() {
        let mut ws = signed_in_as("john@example.com");
        ws.add_usage("com.instagram.ios", 5).unwrap();
        let snapshot = ws.to_snapshot();

        let restored = Workspace::from_snapshot(snapshot, &Config::default()).unwrap();
        assert_eq!(restored.current_user().map(|u| u.id.as_str()), Some("user-1"));
        let usage = restored.my_limits().unwrap().usage_for("com.instagram.ios").cloned();
        assert_eq!(usage.map(|u| u.minutes_used), Some(20));
    }

    #[test]
    fn password_mode_asks_for_a_password_first() {
        let mut config = Config::default();
        config.set("auth.mode", "password").unwrap();
        let mut ws = Workspace::seeded_with(&config).unwrap();

        assert!(matches!(
            ws.sign_in("john@example.com", "secret"),
            Err(CoreError::Auth(AuthError::PasswordRequired))
        ));
        assert!(ws.auth_state().requires_password_creation);
        ws.create_password("secret").unwrap();
        ws.sign_out();

        assert!(matches!(
            ws.sign_in("john@example.com", "wrong"),
            Err(CoreError::Auth(AuthError::IncorrectPassword))
        ));
        ws.sign_in("john@example.com", "secret").unwrap();
        assert!(ws.reset_password("john@example.com"));
        assert!(!ws.reset_password("ghost@example.com"));
    }

    #[test]
    fn reset_password_keeps_the_stored_password() {
        let mut config = Config::default();
        config.set("auth.mode", "password").unwrap();
        let mut ws = Workspace::seeded_with(&config).unwrap();
        assert!(ws.sign_in("john@example.com", "secret").is_err());
        ws.create_password("secret").unwrap();
        ws.sign_out();

        assert!(ws.reset_password("john@example.com"));
        assert!(matches!(
            ws.sign_in("john@example.com", "whatever"),
            Err(CoreError::Auth(AuthError::IncorrectPassword))
        ));
        assert!(matches!(
            ws.create_password("taken-over"),
            Err(CoreError::Auth(AuthError::NoPasswordPending))
        ));
        assert!(ws.current_user().is_none());
        ws.sign_in("john@example.com", "secret").unwrap();
        assert_eq!(ws.current_user().map(|u| u.id.as_str()), Some("user-1"));

        // Signed in already: nothing to create.
        assert!(ws.create_password("again").is_err());
    }

    #[test]
    fn limits_belong_to_the_signed_in_user() {
        let mut ws = signed_in_as("jane@example.com");
        ws.set_limit("com.instagram.ios", "Instagram", "camera", 5).unwrap();
        ws.add_usage("com.instagram.ios", 7).unwrap();
        assert!(matches!(
            ws.add_usage("com.tiktok.ios", 100),
            Err(CoreError::Validation(ValidationError::UnknownApp(_)))
        ));

        assert_eq!(limit_of(&ws, "user-1", "com.instagram.ios"), 30);
        assert_eq!(limit_of(&ws, "user-2", "com.instagram.ios"), 5);
        assert_eq!(ws.limits().for_user("user-1").total_minutes_used(), 80);
        assert_eq!(ws.my_limits().unwrap().total_minutes_used(), 7);

        ws.reset_usage().unwrap();
        assert_eq!(ws.limits().for_user("user-1").total_minutes_used(), 80);
    }

    #[test]
    fn member_limits_are_visible_within_the_group() {
        let ws = signed_in_as("jane@example.com");
        let john = ws.member_limits("johndoe").unwrap();
        assert_eq!(john.user_id(), "user-1");
        assert_eq!(john.total_daily_limit(), 135);
        assert_eq!(ws.member_limits("user-2").unwrap().user_id(), "user-2");

        // Bob is only invited; Alex is not in the group.
        assert!(matches!(
            ws.member_limits("bobsmith"),
            Err(CoreError::Group(GroupError::MemberNotFound(_)))
        ));
        assert!(ws.member_limits("alex@example.com").is_err());
        assert!(ws.member_limits("nobody").is_err());
    }

    #[test]
    fn resolve_grants_extension_after_member_leaves() {
        let mut ws = signed_in_as("john@example.com");
        ws.invite("alex123").unwrap();
        switch_user(&mut ws, "alex@example.com");
        ws.accept_invitation().unwrap();

        // Jane and Alex are eligible; a majority of two needs both.
        switch_user(&mut ws, "john@example.com");
        let request_id = request(&mut ws, "com.instagram.ios", 15);
        switch_user(&mut ws, "jane@example.com");
        assert_eq!(ws.respond(&request_id, true, None).unwrap().len(), 1);
        assert!(ws.resolve(&request_id).unwrap().is_empty());

        switch_user(&mut ws, "alex@example.com");
        ws.leave_group().unwrap();

        switch_user(&mut ws, "john@example.com");
        let events = ws.resolve(&request_id).unwrap();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[1], Event::LimitUpdated { daily_limit_minutes: 45, .. }));
        assert_eq!(ws.extensions().get(&request_id).unwrap().status, ExtensionStatus::Approved);
        assert_eq!(limit_of(&ws, "user-1", "com.instagram.ios"), 45);

        let inbox = ws.notifications().for_user("user-1");
        assert_eq!(inbox[0].kind, NotificationType::ExtensionApproved);
        assert!(ws.resolve(&request_id).is_err());
    }

    #[test]
    fn sign_up_registers_user_once() {
        let mut ws = Workspace::seeded();
        let user = ws.sign_up("new@example.com", "", "pw").unwrap();
        assert_eq!(user.username(), Some("new"));
        assert!(ws.current_user().is_none());
        assert!(matches!(
            ws.sign_up("NEW@example.com", "other", "pw"),
            Err(CoreError::Auth(AuthError::EmailTaken(_)))
        ));
    }

    #[test]
    fn daily_summary_respects_config() {
        let mut ws = signed_in_as("john@example.com");
        let item = ws.daily_summary().unwrap().unwrap();
        assert_eq!(item.body, "You used 80 minutes of screen time today (59% of your limit)");

        let mut config = Config::default();
        config.set("notifications.daily_summary", "false").unwrap();
        let mut quiet = Workspace::from_snapshot(ws.to_snapshot(), &config).unwrap();
        assert!(quiet.daily_summary().unwrap().is_none());
    }
}
