//! Sign-in providers.
//!
//! There is no real credential backend. [`MockAuth`] accepts anything;
//! [`PasswordAuth`] keeps salted password digests in memory (and in the
//! snapshot store, via [`AuthProvider::credentials`]).
//!
//! Providers never look users up themselves: the caller resolves the
//! [`User`] from the directory and hands it in.

mod mock;
mod password;

pub use mock::MockAuth;
pub use password::{Credential, PasswordAuth};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::events::Event;
use crate::model::User;

/// Which provider a workspace runs with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    #[default]
    Mock,
    Password,
}

impl AuthMode {
    pub fn provider(self, credentials: Vec<Credential>) -> Box<dyn AuthProvider> {
        match self {
            AuthMode::Mock => Box::new(MockAuth::new()),
            AuthMode::Password => Box::new(PasswordAuth::with_credentials(credentials)),
        }
    }
}

/// Observable session state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthState {
    pub is_authenticated: bool,
    pub current_user: Option<User>,
    /// Set when a known user signs in before ever choosing a password.
    #[serde(default)]
    pub requires_password_creation: bool,
}

pub trait AuthProvider {
    /// Unique identifier ("mock", "password").
    fn name(&self) -> &'static str;

    fn state(&self) -> &AuthState;

    fn state_mut(&mut self) -> &mut AuthState;

    /// Register a password for a freshly created account. Does not sign in.
    fn sign_up(&mut self, user: &User, password: &str) -> Result<(), AuthError>;

    fn sign_in(&mut self, user: &User, password: &str) -> Result<Event, AuthError>;

    /// Store a password and sign the user in. Never replaces an existing one.
    fn create_password(&mut self, user: &User, password: &str) -> Result<Event, AuthError>;

    /// Persistable credential records.
    fn credentials(&self) -> Vec<Credential> {
        Vec::new()
    }

    fn sign_out(&mut self) -> Event {
        let state = self.state_mut();
        let user_id = state.current_user.take().map(|u| u.id);
        state.is_authenticated = false;
        state.requires_password_creation = false;
        tracing::info!(user_id = ?user_id, "signed out");
        Event::UserSignedOut {
            user_id,
            at: Utc::now(),
        }
    }

    fn is_authenticated(&self) -> bool {
        self.state().is_authenticated
    }

    /// The signed-in user, if any.
    fn current_user(&self) -> Option<&User> {
        let state = self.state();
        if state.is_authenticated {
            state.current_user.as_ref()
        } else {
            None
        }
    }

    /// Re-establish a session loaded from storage.
    fn restore(&mut self, state: AuthState) {
        *self.state_mut() = state;
    }
}

pub(crate) fn signed_in(state: &mut AuthState, user: &User) -> Event {
    state.is_authenticated = true;
    state.current_user = Some(user.clone());
    state.requires_password_creation = false;
    tracing::info!(user_id = %user.id, "signed in");
    Event::UserSignedIn {
        user_id: user.id.clone(),
        at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_out_clears_state() {
        let mut auth = AuthMode::Mock.provider(Vec::new());
        let user = User::new("user-1", "john@example.com", "johndoe");
        auth.sign_in(&user, "anything").unwrap();
        assert_eq!(auth.current_user().map(|u| u.id.as_str()), Some("user-1"));

        match auth.sign_out() {
            Event::UserSignedOut { user_id, .. } => assert_eq!(user_id.as_deref(), Some("user-1")),
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(!auth.is_authenticated());
        assert!(auth.current_user().is_none());
    }

    #[test]
    fn mode_selects_provider() {
        assert_eq!(AuthMode::Mock.provider(Vec::new()).name(), "mock");
        assert_eq!(AuthMode::Password.provider(Vec::new()).name(), "password");
    }
}
