//! Time extension request commands for CLI.

use clap::Subcommand;
use screentime_core::{AuthError, Config, ExtensionError, GroupError};
use serde_json::json;

use super::{print_json, CmdResult, Session};

#[derive(Subcommand)]
pub enum ExtensionAction {
    /// Ask your group for more minutes on an app
    Request {
        app_id: String,
        minutes: u32,
        #[arg(long)]
        reason: String,
    },
    /// Approve a request
    Approve {
        request_id: String,
        #[arg(long)]
        comment: Option<String>,
    },
    /// Deny a request (a comment is required)
    Deny {
        request_id: String,
        #[arg(long)]
        comment: Option<String>,
    },
    /// Re-check a pending request against the current group
    Resolve { request_id: String },
    /// List requests
    List {
        /// Only your own requests
        #[arg(long)]
        mine: bool,
    },
    /// Requests waiting for your answer
    Pending,
    /// One request with its current tally
    Show { request_id: String },
    /// Suggested minute options and the approval policy
    Options,
}

pub fn run(action: ExtensionAction) -> CmdResult {
    let mut session = Session::open()?;
    let ws = &mut session.workspace;

    match action {
        ExtensionAction::Request {
            app_id,
            minutes,
            reason,
        } => {
            let event = ws.request_extension(&app_id, minutes, &reason)?;
            session.save()?;
            print_json(&event)?;
        }
        ExtensionAction::Approve { request_id, comment } => {
            let events = ws.respond(&request_id, true, comment.as_deref())?;
            session.save()?;
            print_json(&events)?;
        }
        ExtensionAction::Deny { request_id, comment } => {
            let events = ws.respond(&request_id, false, comment.as_deref())?;
            session.save()?;
            print_json(&events)?;
        }
        ExtensionAction::Resolve { request_id } => {
            let events = ws.resolve(&request_id)?;
            session.save()?;
            if events.is_empty() {
                println!("still pending");
            } else {
                print_json(&events)?;
            }
        }
        ExtensionAction::List { mine } => {
            if mine {
                let user = ws.current_user().ok_or(AuthError::NotAuthenticated)?;
                print_json(&ws.extensions().requests_by(&user.id))?;
            } else {
                print_json(ws.extensions().requests())?;
            }
        }
        ExtensionAction::Pending => {
            let user = ws.current_user().ok_or(AuthError::NotAuthenticated)?;
            let group = ws.groups().current_group().ok_or(GroupError::NoGroup)?;
            print_json(&ws.extensions().awaiting_response_from(&user.id, group))?;
        }
        ExtensionAction::Show { request_id } => {
            let request = ws
                .extensions()
                .get(&request_id)
                .ok_or_else(|| ExtensionError::NotFound(request_id.clone()))?;
            let tally = ws
                .groups()
                .current_group()
                .map(|g| ws.extensions().tally(request, g));
            print_json(&json!({ "request": request, "tally": tally }))?;
        }
        ExtensionAction::Options => {
            let config = Config::load()?;
            print_json(&json!({
                "minute_options": config.extension.minute_options,
                "max_minutes": config.extension.max_minutes,
                "policy": ws.extensions().policy().to_string(),
            }))?;
        }
    }
    Ok(())
}
