//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Extension approval policy
//! - Extension request bounds and suggested minute options
//! - Notification preferences
//! - Auth provider selection
//! - Backend connection stub (never contacted)
//!
//! Configuration is stored at `~/.config/screentime/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::auth::AuthMode;
use crate::error::ConfigError;
use crate::extension::ApprovalPolicy;

/// Extension approval configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalConfig {
    /// `majority`, `unanimous`, `any_one` or `at_least:N`.
    #[serde(default = "default_policy")]
    pub policy: String,
}

/// Extension request configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtensionConfig {
    #[serde(default = "default_minute_options")]
    pub minute_options: Vec<u32>,
    #[serde(default = "default_max_minutes")]
    pub max_minutes: u32,
}

/// Notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub daily_summary: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub mode: AuthMode,
}

/// Hosted backend the app was designed against. Kept for reference; no
/// code path talks to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_backend_url")]
    pub url: String,
    #[serde(default = "default_anon_key")]
    pub anon_key: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/screentime/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub approval: ApprovalConfig,
    #[serde(default)]
    pub extension: ExtensionConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub backend: BackendConfig,
}

// Default functions
fn default_policy() -> String {
    ApprovalPolicy::Majority.to_string()
}
fn default_minute_options() -> Vec<u32> {
    vec![1, 5, 15, 30]
}
fn default_max_minutes() -> u32 {
    crate::extension::DEFAULT_MAX_MINUTES
}
fn default_true() -> bool {
    true
}
fn default_backend_url() -> String {
    "https://your-project-id.supabase.co".into()
}
fn default_anon_key() -> String {
    "your-supabase-anon-key".into()
}

impl Default for ApprovalConfig {
    fn default() -> Self {
        Self {
            policy: default_policy(),
        }
    }
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            minute_options: default_minute_options(),
            max_minutes: default_max_minutes(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            daily_summary: true,
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            anon_key: default_anon_key(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => serde_json::Value::Number(
                        value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?
                            .into(),
                    ),
                    serde_json::Value::Array(_) => {
                        let items: Result<Vec<u64>, _> = value
                            .split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(str::parse)
                            .collect();
                        let items = items.map_err(|_| {
                            invalid(format!("expected comma-separated numbers, got '{value}'"))
                        })?;
                        serde_json::to_value(items).map_err(|e| invalid(e.to_string()))?
                    }
                    serde_json::Value::Object(_) => return Err(unknown()),
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the data directory, writing defaults on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the data directory.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key, in memory only.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit
    /// the field.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.approval_policy()?;
        if self.extension.max_minutes == 0 {
            return Err(ConfigError::InvalidValue {
                key: "extension.max_minutes".into(),
                message: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    pub fn approval_policy(&self) -> Result<ApprovalPolicy, ConfigError> {
        self.approval
            .policy
            .parse()
            .map_err(|message| ConfigError::InvalidValue {
                key: "approval.policy".into(),
                message,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.approval.policy, "majority");
        assert_eq!(parsed.extension.minute_options, vec![1, 5, 15, 30]);
        assert_eq!(parsed.auth.mode, AuthMode::Mock);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[approval]\npolicy = \"unanimous\"\n").unwrap();
        assert_eq!(parsed.approval_policy().unwrap(), ApprovalPolicy::Unanimous);
        assert!(parsed.notifications.enabled);
        assert_eq!(parsed.extension.max_minutes, 120);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("notifications.enabled").as_deref(), Some("true"));
        assert_eq!(cfg.get("extension.max_minutes").as_deref(), Some("120"));
        assert_eq!(cfg.get("auth.mode").as_deref(), Some("mock"));
        assert!(cfg.get("ui.missing_key").is_none());
    }

    #[test]
    fn set_updates_nested_values() {
        let mut cfg = Config::default();
        cfg.set("notifications.enabled", "false").unwrap();
        cfg.set("extension.max_minutes", "60").unwrap();
        cfg.set("extension.minute_options", "5, 10, 20").unwrap();
        cfg.set("approval.policy", "at_least:2").unwrap();
        cfg.set("auth.mode", "password").unwrap();

        assert!(!cfg.notifications.enabled);
        assert_eq!(cfg.extension.max_minutes, 60);
        assert_eq!(cfg.extension.minute_options, vec![5, 10, 20]);
        assert_eq!(cfg.approval_policy().unwrap(), ApprovalPolicy::AtLeast(2));
        assert_eq!(cfg.auth.mode, AuthMode::Password);
    }

    #[test]
    fn set_rejects_unknown_key_and_bad_values() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("approval.nonexistent", "x"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(cfg.set("notifications.enabled", "not_a_bool").is_err());
        assert!(cfg.set("approval.policy", "quorum").is_err());
        assert!(cfg.set("auth.mode", "oauth").is_err());
        assert!(cfg.set("extension.max_minutes", "0").is_err());
        // Failed sets leave the config untouched.
        assert_eq!(cfg.approval.policy, "majority");
    }

    #[test]
    fn load_from_writes_defaults_on_first_use() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.approval.policy, "majority");

        let mut changed = cfg.clone();
        changed.set("approval.policy", "any_one").unwrap();
        changed.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().approval.policy, "any_one");
    }
}
