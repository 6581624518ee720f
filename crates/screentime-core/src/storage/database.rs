//! SQLite snapshot store.
//!
//! The trackers live in memory; between CLI invocations their state is
//! written here as a whole [`Snapshot`] and read back on the next start.
//! Provides persistent storage for:
//! - Profiles and local credentials
//! - The current group and its memberships
//! - Limits, usage, extension requests and responses
//! - Notifications, push device tokens, and the signed-in session

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use super::data_dir;
use super::migrations;
use crate::auth::{AuthState, Credential};
use crate::error::{CoreError, DatabaseError};
use crate::model::{
    ExtensionRequest, ExtensionResponse, ExtensionStatus, Group, GroupMember, MembershipStatus,
    NotificationItem, NotificationType, ScreenTimeLimit, ScreenTimeUsage, User,
};

const SESSION_KEY: &str = "session";
const INITIALIZED_KEY: &str = "initialized";

/// Everything a workspace needs to resume.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub users: Vec<User>,
    pub group: Option<Group>,
    pub limits: Vec<ScreenTimeLimit>,
    pub usage: Vec<ScreenTimeUsage>,
    pub requests: Vec<ExtensionRequest>,
    pub notifications: Vec<NotificationItem>,
    pub credentials: Vec<Credential>,
    pub session: Option<AuthState>,
}

// === Helper Functions ===

/// Parse datetime from RFC3339 string with fallback to current time
fn parse_datetime_fallback(dt_str: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(dt_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn row_to_user(row: &Row) -> Result<User, rusqlite::Error> {
    let metadata: Option<String> = row.get(2)?;
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        user_metadata: metadata
            .and_then(|m| serde_json::from_str::<HashMap<String, String>>(&m).ok()),
        profile_picture_url: row.get(3)?,
    })
}

fn row_to_group(row: &Row) -> Result<Group, rusqlite::Error> {
    Ok(Group {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        admin_user_id: row.get(3)?,
        created_at: parse_datetime_fallback(&row.get::<_, String>(4)?),
        updated_at: parse_datetime_fallback(&row.get::<_, String>(5)?),
        members: Vec::new(),
    })
}

fn row_to_member(row: &Row) -> Result<GroupMember, rusqlite::Error> {
    let status: String = row.get(5)?;
    let joined_at: Option<String> = row.get(6)?;
    Ok(GroupMember {
        id: row.get(0)?,
        user_id: row.get(1)?,
        group_id: row.get(2)?,
        username: row.get(3)?,
        email: row.get(4)?,
        status: MembershipStatus::parse(&status).unwrap_or_default(),
        joined_at: joined_at.as_deref().map(parse_datetime_fallback),
        invited_at: parse_datetime_fallback(&row.get::<_, String>(7)?),
    })
}

fn row_to_limit(row: &Row) -> Result<ScreenTimeLimit, rusqlite::Error> {
    Ok(ScreenTimeLimit {
        id: row.get(0)?,
        app_id: row.get(1)?,
        app_name: row.get(2)?,
        icon_name: row.get(3)?,
        daily_limit_minutes: row.get(4)?,
        user_id: row.get(5)?,
        created_at: parse_datetime_fallback(&row.get::<_, String>(6)?),
        updated_at: parse_datetime_fallback(&row.get::<_, String>(7)?),
    })
}

fn row_to_usage(row: &Row) -> Result<ScreenTimeUsage, rusqlite::Error> {
    Ok(ScreenTimeUsage {
        id: row.get(0)?,
        app_id: row.get(1)?,
        app_name: row.get(2)?,
        minutes_used: row.get(3)?,
        date: parse_datetime_fallback(&row.get::<_, String>(4)?),
        user_id: row.get(5)?,
    })
}

fn row_to_request(row: &Row) -> Result<ExtensionRequest, rusqlite::Error> {
    let status: String = row.get(7)?;
    Ok(ExtensionRequest {
        id: row.get(0)?,
        app_id: row.get(1)?,
        app_name: row.get(2)?,
        requested_minutes: row.get(3)?,
        reason: row.get(4)?,
        user_id: row.get(5)?,
        group_id: row.get(6)?,
        status: ExtensionStatus::parse(&status).unwrap_or_default(),
        created_at: parse_datetime_fallback(&row.get::<_, String>(8)?),
        updated_at: parse_datetime_fallback(&row.get::<_, String>(9)?),
        responses: Vec::new(),
    })
}

fn row_to_response(row: &Row) -> Result<ExtensionResponse, rusqlite::Error> {
    Ok(ExtensionResponse {
        id: row.get(0)?,
        request_id: row.get(1)?,
        user_id: row.get(2)?,
        approved: row.get(3)?,
        comment: row.get(4)?,
        created_at: parse_datetime_fallback(&row.get::<_, String>(5)?),
    })
}

fn row_to_notification(row: &Row) -> Result<Option<NotificationItem>, rusqlite::Error> {
    let kind: String = row.get(3)?;
    let Some(kind) = NotificationType::parse(&kind) else {
        tracing::warn!(kind = %kind, "skipping notification with unknown type");
        return Ok(None);
    };
    Ok(Some(NotificationItem {
        id: row.get(0)?,
        title: row.get(1)?,
        body: row.get(2)?,
        kind,
        related_id: row.get(4)?,
        created_at: parse_datetime_fallback(&row.get::<_, String>(5)?),
        is_read: row.get(6)?,
        user_id: row.get(7)?,
    }))
}

/// SQLite database holding the workspace snapshot.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/screentime/screentime.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join("screentime.db");
        Ok(Self::open_at(&path)?)
    }

    pub fn open_at(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::with_connection(conn)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, DatabaseError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, DatabaseError> {
        migrations::migrate(&conn).map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    // === Key-value ===

    pub fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        Ok(self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| row.get(0))
            .optional()?)
    }

    /// Whether a snapshot has ever been saved.
    pub fn is_initialized(&self) -> Result<bool, DatabaseError> {
        Ok(self.kv_get(INITIALIZED_KEY)?.is_some())
    }

    // === Device tokens ===

    /// Stores a push token, hex-encoded. Returns the stored string.
    pub fn register_device_token(
        &self,
        user_id: &str,
        token: &[u8],
    ) -> Result<String, DatabaseError> {
        let token = hex::encode(token);
        self.conn.execute(
            "INSERT INTO device_tokens (token, user_id, created_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(token) DO UPDATE SET user_id = excluded.user_id",
            params![token, user_id, Utc::now().to_rfc3339()],
        )?;
        tracing::debug!(user_id, "device token registered");
        Ok(token)
    }

    pub fn device_tokens(&self, user_id: &str) -> Result<Vec<String>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare("SELECT token FROM device_tokens WHERE user_id = ?1 ORDER BY created_at")?;
        let tokens = stmt
            .query_map(params![user_id], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(tokens)
    }

    // === Snapshot ===

    pub fn load_snapshot(&self) -> Result<Snapshot, DatabaseError> {
        let users = self.query_all(
            "SELECT id, email, user_metadata, profile_picture_url FROM profiles ORDER BY rowid",
            row_to_user,
        )?;

        let group = self
            .conn
            .query_row(
                r#"SELECT id, name, description, admin_user_id, created_at, updated_at
                   FROM "groups" ORDER BY updated_at DESC LIMIT 1"#,
                [],
                row_to_group,
            )
            .optional()?;
        let group = match group {
            Some(mut g) => {
                let mut stmt = self.conn.prepare(
                    "SELECT id, user_id, group_id, username, email, status, joined_at, invited_at
                     FROM memberships WHERE group_id = ?1 ORDER BY rowid",
                )?;
                g.members = stmt
                    .query_map(params![g.id], row_to_member)?
                    .collect::<Result<Vec<_>, _>>()?;
                Some(g)
            }
            None => None,
        };

        let limits = self.query_all(
            "SELECT id, app_id, app_name, icon_name, daily_limit_minutes, user_id, created_at, updated_at
             FROM screen_time_limits ORDER BY rowid",
            row_to_limit,
        )?;
        let usage = self.query_all(
            "SELECT id, app_id, app_name, minutes_used, date, user_id
             FROM screen_time_usage ORDER BY rowid",
            row_to_usage,
        )?;

        let mut requests = self.query_all(
            "SELECT id, app_id, app_name, requested_minutes, reason, user_id, group_id, status,
                    created_at, updated_at
             FROM extension_requests ORDER BY created_at, rowid",
            row_to_request,
        )?;
        let responses = self.query_all(
            "SELECT id, request_id, user_id, approved, comment, created_at
             FROM extension_responses ORDER BY created_at, rowid",
            row_to_response,
        )?;
        for response in responses {
            if let Some(request) = requests.iter_mut().find(|r| r.id == response.request_id) {
                request.responses.push(response);
            }
        }

        let notifications = self
            .query_all(
                "SELECT id, title, body, type, related_id, created_at, is_read, user_id
                 FROM notifications ORDER BY created_at, rowid",
                row_to_notification,
            )?
            .into_iter()
            .flatten()
            .collect();

        let credentials = self.query_all(
            "SELECT email, salt, digest FROM credentials ORDER BY email",
            |row| {
                Ok(Credential {
                    email: row.get(0)?,
                    salt: row.get(1)?,
                    digest: row.get(2)?,
                })
            },
        )?;

        let session = match self.kv_get(SESSION_KEY)? {
            Some(json) => match serde_json::from_str::<AuthState>(&json) {
                Ok(state) => Some(state),
                Err(e) => {
                    tracing::warn!(error = %e, "discarding unreadable session");
                    None
                }
            },
            None => None,
        };

        Ok(Snapshot {
            users,
            group,
            limits,
            usage,
            requests,
            notifications,
            credentials,
            session,
        })
    }

    /// Replaces the stored state with `snapshot` in one transaction.
    pub fn save_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), DatabaseError> {
        let tx = self.conn.transaction()?;
        tx.execute_batch(
            r#"DELETE FROM profiles;
               DELETE FROM "groups";
               DELETE FROM memberships;
               DELETE FROM screen_time_limits;
               DELETE FROM screen_time_usage;
               DELETE FROM extension_requests;
               DELETE FROM extension_responses;
               DELETE FROM notifications;
               DELETE FROM credentials;"#,
        )?;

        for user in &snapshot.users {
            let metadata = user
                .user_metadata
                .as_ref()
                .and_then(|m| serde_json::to_string(m).ok());
            tx.execute(
                "INSERT INTO profiles (id, email, user_metadata, profile_picture_url)
                 VALUES (?1, ?2, ?3, ?4)",
                params![user.id, user.email, metadata, user.profile_picture_url],
            )?;
        }

        if let Some(group) = &snapshot.group {
            tx.execute(
                r#"INSERT INTO "groups" (id, name, description, admin_user_id, created_at, updated_at)
                   VALUES (?1, ?2, ?3, ?4, ?5, ?6)"#,
                params![
                    group.id,
                    group.name,
                    group.description,
                    group.admin_user_id,
                    group.created_at.to_rfc3339(),
                    group.updated_at.to_rfc3339(),
                ],
            )?;
            for m in &group.members {
                tx.execute(
                    "INSERT INTO memberships
                     (id, user_id, group_id, username, email, status, joined_at, invited_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    params![
                        m.id,
                        m.user_id,
                        m.group_id,
                        m.username,
                        m.email,
                        m.status.as_str(),
                        m.joined_at.map(|t| t.to_rfc3339()),
                        m.invited_at.to_rfc3339(),
                    ],
                )?;
            }
        }

        for l in &snapshot.limits {
            tx.execute(
                "INSERT INTO screen_time_limits
                 (id, app_id, app_name, icon_name, daily_limit_minutes, user_id, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    l.id,
                    l.app_id,
                    l.app_name,
                    l.icon_name,
                    l.daily_limit_minutes,
                    l.user_id,
                    l.created_at.to_rfc3339(),
                    l.updated_at.to_rfc3339(),
                ],
            )?;
        }

        for u in &snapshot.usage {
            tx.execute(
                "INSERT INTO screen_time_usage (id, app_id, app_name, minutes_used, date, user_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![u.id, u.app_id, u.app_name, u.minutes_used, u.date.to_rfc3339(), u.user_id],
            )?;
        }

        for r in &snapshot.requests {
            tx.execute(
                "INSERT INTO extension_requests
                 (id, app_id, app_name, requested_minutes, reason, user_id, group_id, status,
                  created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    r.id,
                    r.app_id,
                    r.app_name,
                    r.requested_minutes,
                    r.reason,
                    r.user_id,
                    r.group_id,
                    r.status.as_str(),
                    r.created_at.to_rfc3339(),
                    r.updated_at.to_rfc3339(),
                ],
            )?;
            for resp in &r.responses {
                tx.execute(
                    "INSERT INTO extension_responses
                     (id, request_id, user_id, approved, comment, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        resp.id,
                        resp.request_id,
                        resp.user_id,
                        resp.approved,
                        resp.comment,
                        resp.created_at.to_rfc3339(),
                    ],
                )?;
            }
        }

        for n in &snapshot.notifications {
            tx.execute(
                "INSERT INTO notifications
                 (id, title, body, type, related_id, created_at, is_read, user_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    n.id,
                    n.title,
                    n.body,
                    n.kind.as_str(),
                    n.related_id,
                    n.created_at.to_rfc3339(),
                    n.is_read,
                    n.user_id,
                ],
            )?;
        }

        for c in &snapshot.credentials {
            tx.execute(
                "INSERT INTO credentials (email, salt, digest) VALUES (?1, ?2, ?3)",
                params![c.email, c.salt, c.digest],
            )?;
        }

        match &snapshot.session {
            Some(session) => {
                let json = serde_json::to_string(session)
                    .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
                tx.execute(
                    "INSERT INTO kv (key, value) VALUES (?1, ?2)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                    params![SESSION_KEY, json],
                )?;
            }
            None => {
                tx.execute("DELETE FROM kv WHERE key = ?1", params![SESSION_KEY])?;
            }
        }
        tx.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![INITIALIZED_KEY, Utc::now().to_rfc3339()],
        )?;

        tx.commit()?;
        tracing::debug!(
            users = snapshot.users.len(),
            requests = snapshot.requests.len(),
            notifications = snapshot.notifications.len(),
            "snapshot saved"
        );
        Ok(())
    }

    fn query_all<T, F>(&self, sql: &str, f: F) -> Result<Vec<T>, DatabaseError>
    where
        F: FnMut(&Row) -> Result<T, rusqlite::Error>,
    {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], f)?.collect::<Result<Vec<T>, _>>()?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Snapshot {
        let admin = User::new("user-1", "john@example.com", "johndoe");
        let mut group = Group::new("Focus Friends", Some("stay focused".into()), "user-1");
        group.members.push(
            GroupMember::invite("user-1", group.id.clone(), "johndoe", "john@example.com")
                .activate(),
        );
        group
            .members
            .push(GroupMember::invite("user-2", group.id.clone(), "janedoe", "jane@example.com"));

        let mut request = ExtensionRequest::pending(
            "com.instagram.ios".into(),
            "Instagram".into(),
            15,
            "group chat".into(),
            "user-1".into(),
            group.id.clone(),
        );
        request
            .responses
            .push(ExtensionResponse::new(request.id.clone(), "user-2", false, Some("no".into())));

        Snapshot {
            users: vec![admin.clone()],
            group: Some(group),
            limits: vec![ScreenTimeLimit::new(
                "com.instagram.ios",
                "Instagram",
                "camera",
                30,
                "user-1",
            )],
            usage: vec![ScreenTimeUsage::new("com.instagram.ios", "Instagram", 15, "user-1")],
            requests: vec![request],
            notifications: vec![NotificationItem::new(
                "Daily Summary",
                "body",
                NotificationType::DailySummary,
                None,
                "user-1",
            )],
            credentials: Vec::new(),
            session: Some(AuthState {
                is_authenticated: true,
                current_user: Some(admin),
                requires_password_creation: false,
            }),
        }
    }

    #[test]
    fn fresh_database_is_uninitialized_and_empty() {
        let db = Database::open_memory().unwrap();
        assert!(!db.is_initialized().unwrap());
        let snapshot = db.load_snapshot().unwrap();
        assert!(snapshot.users.is_empty());
        assert!(snapshot.group.is_none());
        assert!(snapshot.session.is_none());
    }

    #[test]
    fn snapshot_survives_save_and_load() {
        let mut db = Database::open_memory().unwrap();
        let original = sample();
        db.save_snapshot(&original).unwrap();
        assert!(db.is_initialized().unwrap());

        let loaded = db.load_snapshot().unwrap();
        let group = loaded.group.unwrap();
        assert_eq!(group.name, "Focus Friends");
        assert_eq!(group.members.len(), 2);
        assert_eq!(group.members[1].status, MembershipStatus::Pending);
        assert_eq!(loaded.users[0].username(), Some("johndoe"));
        assert_eq!(loaded.limits[0].daily_limit_minutes, 30);
        assert_eq!(loaded.usage[0].minutes_used, 15);
        assert_eq!(loaded.requests[0].responses.len(), 1);
        assert_eq!(loaded.requests[0].responses[0].comment.as_deref(), Some("no"));
        assert_eq!(loaded.notifications[0].kind, NotificationType::DailySummary);
        assert!(loaded.session.unwrap().is_authenticated);
    }

    #[test]
    fn saving_twice_replaces_rather_than_appends() {
        let mut db = Database::open_memory().unwrap();
        let mut snapshot = sample();
        db.save_snapshot(&snapshot).unwrap();
        snapshot.notifications.clear();
        snapshot.session = None;
        db.save_snapshot(&snapshot).unwrap();

        let loaded = db.load_snapshot().unwrap();
        assert!(loaded.notifications.is_empty());
        assert_eq!(loaded.limits.len(), 1);
        assert!(loaded.session.is_none());
    }

    #[test]
    fn device_tokens_are_hex_encoded() {
        let db = Database::open_memory().unwrap();
        let token = db.register_device_token("user-1", &[0xde, 0xad, 0xbe, 0xef]).unwrap();
        assert_eq!(token, "deadbeef");
        assert_eq!(db.device_tokens("user-1").unwrap(), vec!["deadbeef".to_string()]);
        assert!(db.device_tokens("user-2").unwrap().is_empty());
    }
}
