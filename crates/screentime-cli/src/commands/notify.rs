use clap::Subcommand;
use serde_json::json;

use super::{print_json, CmdResult, Session};

#[derive(Subcommand)]
pub enum NotifyAction {
    /// Your notifications, newest first
    List {
        /// Every user's notifications
        #[arg(long)]
        all: bool,
    },
    /// Unread counts
    Unread,
    /// Mark one notification as read
    Read { id: String },
    /// Mark every notification as read
    ReadAll,
    /// Delete one notification
    Delete { id: String },
    /// Delete every notification
    Clear,
    /// Append today's usage summary
    Summary,
}

pub fn run(action: NotifyAction) -> CmdResult {
    let mut session = Session::open()?;

    match action {
        NotifyAction::List { all } => {
            if all {
                print_json(session.workspace.notifications().notifications())?;
            } else {
                print_json(&session.workspace.my_notifications()?)?;
            }
        }
        NotifyAction::Unread => {
            let ws = &session.workspace;
            let mine = ws
                .current_user()
                .map(|u| ws.notifications().unread_count_for(&u.id));
            print_json(&json!({
                "total": ws.notifications().unread_count(),
                "mine": mine,
            }))?;
        }
        NotifyAction::Read { id } => {
            // Unknown ids are a no-op.
            let changed = session.workspace.mark_as_read(&id);
            session.save()?;
            println!("{}", if changed { "ok" } else { "unchanged" });
        }
        NotifyAction::ReadAll => {
            session.workspace.mark_all_as_read();
            session.save()?;
            println!("ok");
        }
        NotifyAction::Delete { id } => {
            let changed = session.workspace.delete_notification(&id);
            session.save()?;
            println!("{}", if changed { "ok" } else { "unchanged" });
        }
        NotifyAction::Clear => {
            session.workspace.clear_notifications();
            session.save()?;
            println!("ok");
        }
        NotifyAction::Summary => {
            let item = session.workspace.daily_summary()?;
            session.save()?;
            match item {
                Some(item) => print_json(&item)?,
                None => println!("daily summary is disabled"),
            }
        }
    }
    Ok(())
}
