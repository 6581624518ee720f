//! Database schema migrations for screentime.
//!
//! Migrations are versioned and applied automatically when opening the database.
//! The `schema_version` table tracks the current migration version.
//!
//! Table names match the hosted backend the app was designed against, so a
//! snapshot can be exported table by table.

use rusqlite::{Connection, Result as SqliteResult};

/// Current schema version.
///
/// Increment this when adding new migrations.
pub const SCHEMA_VERSION: i32 = 2;

/// Apply all pending migrations to bring the database to the current schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }

    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (initial database).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or_else(|e| {
        if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
            tracing::warn!(error = %e, "failed to read schema_version");
        }
        0
    })
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// v1: core tables.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        r#"CREATE TABLE IF NOT EXISTS profiles (
            id                  TEXT PRIMARY KEY,
            email               TEXT,
            user_metadata       TEXT,
            profile_picture_url TEXT
        );

        CREATE TABLE IF NOT EXISTS "groups" (
            id            TEXT PRIMARY KEY,
            name          TEXT NOT NULL,
            description   TEXT,
            admin_user_id TEXT NOT NULL,
            created_at    TEXT NOT NULL,
            updated_at    TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS memberships (
            id         TEXT PRIMARY KEY,
            user_id    TEXT NOT NULL,
            group_id   TEXT NOT NULL,
            username   TEXT NOT NULL,
            email      TEXT NOT NULL,
            status     TEXT NOT NULL,
            joined_at  TEXT,
            invited_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS screen_time_limits (
            id                  TEXT PRIMARY KEY,
            app_id              TEXT NOT NULL UNIQUE,
            app_name            TEXT NOT NULL,
            icon_name           TEXT NOT NULL DEFAULT '',
            daily_limit_minutes INTEGER NOT NULL,
            user_id             TEXT NOT NULL,
            created_at          TEXT NOT NULL,
            updated_at          TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS screen_time_usage (
            id           TEXT PRIMARY KEY,
            app_id       TEXT NOT NULL,
            app_name     TEXT NOT NULL,
            minutes_used INTEGER NOT NULL,
            date         TEXT NOT NULL,
            user_id      TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS extension_requests (
            id                TEXT PRIMARY KEY,
            app_id            TEXT NOT NULL,
            app_name          TEXT NOT NULL,
            requested_minutes INTEGER NOT NULL,
            reason            TEXT NOT NULL,
            user_id           TEXT NOT NULL,
            group_id          TEXT NOT NULL,
            status            TEXT NOT NULL DEFAULT 'pending',
            created_at        TEXT NOT NULL,
            updated_at        TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS extension_responses (
            id         TEXT PRIMARY KEY,
            request_id TEXT NOT NULL,
            user_id    TEXT NOT NULL,
            approved   INTEGER NOT NULL,
            comment    TEXT,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS notifications (
            id         TEXT PRIMARY KEY,
            title      TEXT NOT NULL,
            body       TEXT NOT NULL,
            type       TEXT NOT NULL,
            related_id TEXT,
            created_at TEXT NOT NULL,
            is_read    INTEGER NOT NULL DEFAULT 0,
            user_id    TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS kv (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_memberships_group ON memberships(group_id);
        CREATE INDEX IF NOT EXISTS idx_extension_responses_request ON extension_responses(request_id);
        CREATE INDEX IF NOT EXISTS idx_notifications_user ON notifications(user_id, is_read);"#,
    )?;
    set_schema_version(conn, 1)
}

/// v2: local credentials and push device tokens.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS credentials (
            email  TEXT PRIMARY KEY,
            salt   TEXT NOT NULL,
            digest TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS device_tokens (
            token      TEXT PRIMARY KEY,
            user_id    TEXT NOT NULL,
            created_at TEXT NOT NULL
        );",
    )?;
    set_schema_version(conn, 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrate_fresh_database_reaches_current_version() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), SCHEMA_VERSION);
    }

    #[test]
    fn migrate_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), SCHEMA_VERSION);

        for table in crate::storage::TABLES {
            let found: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(found, 1, "missing table {table}");
        }
    }
}
