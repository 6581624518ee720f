use clap::Subcommand;
use serde_json::json;

use super::{print_json, CmdResult, Session};

#[derive(Subcommand)]
pub enum LimitsAction {
    /// Totals and per-app status
    Show {
        /// Another active group member (id, username or email)
        #[arg(long)]
        member: Option<String>,
    },
    /// Add or replace the daily limit for an app
    Set {
        app_id: String,
        minutes: u32,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "app")]
        icon: String,
    },
    /// Change the daily limit of a known app
    Update { app_id: String, minutes: u32 },
    /// Record minutes spent in an app
    AddUsage { app_id: String, minutes: u32 },
    /// Zero your usage
    ResetUsage,
    /// Check whether one app is blocked
    Blocked { app_id: String },
}

pub fn run(action: LimitsAction) -> CmdResult {
    let mut session = Session::open()?;

    match action {
        LimitsAction::Show { member } => {
            let limits = match member {
                Some(key) => session.workspace.member_limits(&key)?,
                None => session.workspace.my_limits()?,
            };
            print_json(&json!({
                "user_id": limits.user_id(),
                "summary": limits.summary(),
                "apps": limits.per_app_status(),
            }))?;
        }
        LimitsAction::Set {
            app_id,
            minutes,
            name,
            icon,
        } => {
            let event = session.workspace.set_limit(&app_id, &name, &icon, minutes)?;
            session.save()?;
            print_json(&event)?;
        }
        LimitsAction::Update { app_id, minutes } => {
            let event = session.workspace.update_limit(&app_id, minutes)?;
            session.save()?;
            print_json(&event)?;
        }
        LimitsAction::AddUsage { app_id, minutes } => {
            let event = session.workspace.add_usage(&app_id, minutes)?;
            session.save()?;
            print_json(&event)?;
        }
        LimitsAction::ResetUsage => {
            let event = session.workspace.reset_usage()?;
            session.save()?;
            print_json(&event)?;
        }
        LimitsAction::Blocked { app_id } => {
            let blocked = session.workspace.my_limits()?.is_app_blocked(&app_id);
            println!("{blocked}");
        }
    }
    Ok(())
}
