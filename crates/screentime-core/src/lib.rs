//! # Screentime Core Library
//!
//! This library provides the business logic for a screen time
//! accountability app: per-app daily limits, accountability groups, and
//! extension requests that group members approve or deny. The
//! `screentime-cli` binary is a thin front end over the same library.
//!
//! ## Architecture
//!
//! - **Trackers**: in-memory state machines for auth, limits, groups,
//!   extension requests and notifications. Every mutation returns an
//!   [`Event`].
//! - **Workspace**: bundles the trackers for one process and routes events
//!   into the notification inbox
//! - **Storage**: TOML configuration and a SQLite snapshot store
//!
//! ## Key Components
//!
//! - [`Workspace`]: the command surface used by the CLI
//! - [`ExtensionTracker`]: extension approval state machine
//! - [`ApprovalPolicy`]: how many approvals a request needs
//! - [`Database`]: snapshot persistence
//! - [`Config`]: application configuration management

pub mod auth;
pub mod error;
pub mod events;
pub mod extension;
pub mod fixtures;
pub mod group;
pub mod limits;
pub mod model;
pub mod notifications;
pub mod storage;
mod workspace;

pub use auth::{AuthMode, AuthProvider, AuthState, MockAuth, PasswordAuth};
pub use error::{
    AuthError, ConfigError, CoreError, DatabaseError, ExtensionError, GroupError, Result,
    ValidationError,
};
pub use events::Event;
pub use extension::{ApprovalPolicy, ExtensionTracker, Tally};
pub use group::GroupTracker;
pub use limits::{AppStatus, LimitsSummary, LimitsTracker, UserLimits};
pub use model::{
    ExtensionRequest, ExtensionResponse, ExtensionStatus, Group, GroupMember, MembershipStatus,
    NotificationItem, NotificationType, ScreenTimeLimit, ScreenTimeUsage, User,
};
pub use notifications::NotificationCenter;
pub use storage::{Config, Database, Snapshot};
pub use workspace::Workspace;
