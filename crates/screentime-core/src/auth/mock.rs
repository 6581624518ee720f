use super::{signed_in, AuthProvider, AuthState};
use crate::error::AuthError;
use crate::events::Event;
use crate::model::User;

/// Development provider: every sign-in succeeds.
#[derive(Debug, Default)]
pub struct MockAuth {
    state: AuthState,
}

impl MockAuth {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuthProvider for MockAuth {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn state(&self) -> &AuthState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut AuthState {
        &mut self.state
    }

    fn sign_up(&mut self, _user: &User, _password: &str) -> Result<(), AuthError> {
        Ok(())
    }

    fn sign_in(&mut self, user: &User, _password: &str) -> Result<Event, AuthError> {
        Ok(signed_in(&mut self.state, user))
    }

    fn create_password(&mut self, user: &User, _password: &str) -> Result<Event, AuthError> {
        Ok(signed_in(&mut self.state, user))
    }
}
