//! Domain types for users, groups, limits, extension requests and
//! notifications.
//!
//! Every entity carries a string `id` (UUID v4 unless created from a
//! fixture) and compares equal by that id alone.

mod extension;
mod group;
mod limits;
mod notification;
mod user;

pub use extension::{ExtensionRequest, ExtensionResponse, ExtensionStatus};
pub use group::{Group, GroupMember, MembershipStatus};
pub use limits::{ScreenTimeLimit, ScreenTimeUsage};
pub use notification::{NotificationItem, NotificationType};
pub use user::User;

/// Fresh identifier for a new entity.
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

macro_rules! eq_by_id {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl PartialEq for $ty {
                fn eq(&self, other: &Self) -> bool {
                    self.id == other.id
                }
            }
            impl Eq for $ty {}
        )+
    };
}

eq_by_id!(
    User,
    Group,
    GroupMember,
    ScreenTimeLimit,
    ScreenTimeUsage,
    ExtensionRequest,
    ExtensionResponse,
    NotificationItem,
);
