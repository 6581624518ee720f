use clap::Subcommand;
use screentime_core::GroupError;

use super::{print_json, CmdResult, Session};

#[derive(Subcommand)]
pub enum GroupAction {
    /// Show the current group
    Show,
    /// Create a group with yourself as admin
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Search the directory by username
    Search { query: String },
    /// Invite a user by id, username or email
    Invite { user: String },
    /// List pending invitations
    Invitations,
    /// Accept your pending invitation
    Accept,
    /// Decline your pending invitation
    Decline,
    /// Remove a member (admin only)
    Remove { member_id: String },
    /// Leave the group (the admin leaving deletes it)
    Leave,
    /// Rename the group (admin only)
    Update {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete the group (admin only)
    Delete,
}

pub fn run(action: GroupAction) -> CmdResult {
    let mut session = Session::open()?;
    let ws = &mut session.workspace;

    let event = match action {
        GroupAction::Show => {
            let group = ws.groups().current_group().ok_or(GroupError::NoGroup)?;
            return print_json(group);
        }
        GroupAction::Search { query } => return print_json(&ws.groups().search_users(&query)),
        GroupAction::Invitations => return print_json(&ws.groups().pending_invitations()),
        GroupAction::Create { name, description } => ws.create_group(&name, description)?,
        GroupAction::Invite { user } => ws.invite(&user)?,
        GroupAction::Accept => ws.accept_invitation()?,
        GroupAction::Decline => ws.decline_invitation()?,
        GroupAction::Remove { member_id } => ws.remove_member(&member_id)?,
        GroupAction::Leave => ws.leave_group()?,
        GroupAction::Update { name, description } => ws.update_group(&name, description)?,
        GroupAction::Delete => ws.delete_group()?,
    };

    session.save()?;
    print_json(&event)
}
