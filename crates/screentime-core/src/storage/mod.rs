mod config;
pub mod database;
pub mod migrations;

pub use config::{
    ApprovalConfig, AuthConfig, BackendConfig, Config, ExtensionConfig, NotificationsConfig,
};
pub use database::{Database, Snapshot};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Table names shared with the hosted backend schema.
pub const TABLES: [&str; 9] = [
    "profiles",
    "groups",
    "memberships",
    "screen_time_limits",
    "screen_time_usage",
    "extension_requests",
    "extension_responses",
    "notifications",
    "device_tokens",
];

/// Realtime channels the app subscribes to.
pub const CHANNELS: [&str; 2] = ["extension_requests", "extension_responses"];

/// Returns `~/.config/screentime[-dev]/` based on SCREENTIME_ENV.
///
/// Set SCREENTIME_ENV=dev to use the development data directory, or
/// SCREENTIME_HOME to point somewhere else entirely (tests do this).
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("SCREENTIME_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("SCREENTIME_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("screentime-dev")
            } else {
                base_dir.join("screentime")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
