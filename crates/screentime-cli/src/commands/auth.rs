use clap::Subcommand;
use serde_json::json;

use super::{print_json, CmdResult, Session};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Create an account (does not sign in)
    SignUp {
        email: String,
        #[arg(long, default_value = "")]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Sign in with email and password
    SignIn {
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Set a password after a sign-in asked for one
    CreatePassword {
        #[arg(long)]
        password: String,
    },
    /// Check whether an account exists for a password reset
    ResetPassword { email: String },
    /// Sign out
    SignOut,
    /// Show the current session
    Status,
    /// Register a push device token for the signed-in user
    RegisterDevice { token: String },
}

pub fn run(action: AuthAction) -> CmdResult {
    let mut session = Session::open()?;

    match action {
        AuthAction::SignUp {
            email,
            username,
            password,
        } => {
            let user = session.workspace.sign_up(&email, &username, &password)?;
            session.save()?;
            println!("Account created: {}", user.id);
        }
        AuthAction::SignIn { email, password } => {
            // A "password required" failure still changes the session.
            let result = session.workspace.sign_in(&email, &password);
            session.save()?;
            print_json(&result?)?;
        }
        AuthAction::CreatePassword { password } => {
            let event = session.workspace.create_password(&password)?;
            session.save()?;
            print_json(&event)?;
        }
        AuthAction::ResetPassword { email } => {
            if session.workspace.reset_password(&email) {
                println!("password reset requested for {email}");
            } else {
                println!("no account for {email}");
            }
        }
        AuthAction::SignOut => {
            let event = session.workspace.sign_out();
            session.save()?;
            print_json(&event)?;
        }
        AuthAction::Status => {
            let ws = &session.workspace;
            let user = ws.current_user();
            print_json(&json!({
                "provider": ws.auth_provider(),
                "is_authenticated": ws.auth_state().is_authenticated,
                "requires_password_creation": ws.auth_state().requires_password_creation,
                "user": user,
                "display_name": user.map(|u| u.display_name()),
            }))?;
        }
        AuthAction::RegisterDevice { token } => {
            let user_id = session
                .workspace
                .current_user()
                .map(|u| u.id.clone())
                .ok_or(screentime_core::AuthError::NotAuthenticated)?;
            let stored = session.db().register_device_token(&user_id, token.as_bytes())?;
            println!("{stored}");
        }
    }
    Ok(())
}
