//! Core error types for screentime-core.
//!
//! This module defines the error hierarchy using thiserror. Each tracker
//! has its own error enum; [`CoreError`] wraps them all so callers that
//! drive several trackers (the [`Workspace`](crate::Workspace), the CLI)
//! can use a single `?`.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for screentime-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Authentication errors
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Group membership errors
    #[error("Group error: {0}")]
    Group(#[from] GroupError),

    /// Extension request errors
    #[error("Extension error: {0}")]
    Extension(#[from] ExtensionError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Authentication errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Incorrect password")]
    IncorrectPassword,

    #[error("Password required. Please create a password.")]
    PasswordRequired,

    #[error("Password must not be empty")]
    EmptyPassword,

    #[error("Email must not be empty")]
    EmptyEmail,

    #[error("User not found")]
    UserNotFound,

    #[error("An account with email {0} already exists")]
    EmailTaken(String),

    #[error("Not signed in")]
    NotAuthenticated,

    #[error("No password creation pending. Sign in first.")]
    NoPasswordPending,
}

/// Group tracker errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GroupError {
    #[error("No current group")]
    NoGroup,

    #[error("Group name must not be empty")]
    EmptyName,

    #[error("User {0} already belongs to a group")]
    AlreadyInGroup(String),

    #[error("User {0} is already a member or has a pending invitation")]
    AlreadyMember(String),

    #[error("Member not found: {0}")]
    MemberNotFound(String),

    #[error("No pending invitation for user {0}")]
    NoPendingInvitation(String),

    #[error("Only the group admin can {0}")]
    NotAdmin(&'static str),

    #[error("The group admin cannot be removed")]
    CannotRemoveAdmin,
}

/// Extension request errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtensionError {
    #[error("Extension request not found: {0}")]
    NotFound(String),

    #[error("Extension request {id} is already {status}")]
    AlreadyResolved { id: String, status: String },

    #[error("User {0} is not an active member of the group")]
    NotActiveMember(String),

    #[error("Requesters cannot respond to their own request")]
    SelfResponse,

    #[error("User {0} has already responded to this request")]
    DuplicateResponse(String),

    #[error("A comment is required when denying a request")]
    CommentRequired,
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required text field is empty
    #[error("'{0}' must not be empty")]
    Empty(&'static str),

    /// Unknown app identifier
    #[error("No screen time limit configured for app '{0}'")]
    UnknownApp(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg)
                if e.code == rusqlite::ErrorCode::DatabaseLocked =>
            {
                DatabaseError::Locked
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
