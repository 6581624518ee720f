use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

use super::{signed_in, AuthProvider, AuthState};
use crate::error::AuthError;
use crate::events::Event;
use crate::model::User;

/// Salted SHA-256 digest of one account's password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    pub email: String,
    pub salt: String,
    pub digest: String,
}

impl Credential {
    fn new(email: &str, password: &str) -> Self {
        let mut salt = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut salt);
        let salt = hex::encode(salt);
        let digest = digest(&salt, password);
        Self {
            email: normalize(email),
            salt,
            digest,
        }
    }

    fn verify(&self, password: &str) -> bool {
        digest(&self.salt, password) == self.digest
    }
}

/// Local password storage. No password reset mail, no lockout.
#[derive(Debug, Default)]
pub struct PasswordAuth {
    state: AuthState,
    credentials: HashMap<String, Credential>,
}

impl PasswordAuth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(credentials: Vec<Credential>) -> Self {
        Self {
            state: AuthState::default(),
            credentials: credentials
                .into_iter()
                .map(|c| (c.email.clone(), c))
                .collect(),
        }
    }

    pub fn has_password(&self, email: &str) -> bool {
        self.credentials.contains_key(&normalize(email))
    }

    fn store(&mut self, user: &User, password: &str) -> Result<(), AuthError> {
        let email = user.email.as_deref().ok_or(AuthError::EmptyEmail)?;
        if email.trim().is_empty() {
            return Err(AuthError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(AuthError::EmptyPassword);
        }
        let credential = Credential::new(email, password);
        self.credentials.insert(credential.email.clone(), credential);
        Ok(())
    }
}

impl AuthProvider for PasswordAuth {
    fn name(&self) -> &'static str {
        "password"
    }

    fn state(&self) -> &AuthState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut AuthState {
        &mut self.state
    }

    fn sign_up(&mut self, user: &User, password: &str) -> Result<(), AuthError> {
        self.store(user, password)
    }

    fn sign_in(&mut self, user: &User, password: &str) -> Result<Event, AuthError> {
        let email = user.email.as_deref().ok_or(AuthError::EmptyEmail)?;
        match self.credentials.get(&normalize(email)) {
            Some(credential) if credential.verify(password) => Ok(signed_in(&mut self.state, user)),
            Some(_) => {
                tracing::warn!(user_id = %user.id, "incorrect password");
                Err(AuthError::IncorrectPassword)
            }
            None => {
                self.state.is_authenticated = false;
                self.state.requires_password_creation = true;
                self.state.current_user = Some(user.clone());
                Err(AuthError::PasswordRequired)
            }
        }
    }

    fn create_password(&mut self, user: &User, password: &str) -> Result<Event, AuthError> {
        if user.email.as_deref().is_some_and(|email| self.has_password(email)) {
            tracing::warn!(user_id = %user.id, "password already set");
            return Err(AuthError::NoPasswordPending);
        }
        self.store(user, password)?;
        Ok(signed_in(&mut self.state, user))
    }

    fn credentials(&self) -> Vec<Credential> {
        let mut all: Vec<_> = self.credentials.values().cloned().collect();
        all.sort_by(|a, b| a.email.cmp(&b.email));
        all
    }
}

fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User::new("user-1", "test@example.com", "testuser")
    }

    #[test]
    fn first_sign_in_requires_password_creation() {
        let mut auth = PasswordAuth::new();
        let err = auth.sign_in(&user(), "secret").unwrap_err();
        assert_eq!(err, AuthError::PasswordRequired);
        assert!(auth.state().requires_password_creation);
        assert!(!auth.is_authenticated());
        assert_eq!(err.to_string(), "Password required. Please create a password.");
    }

    #[test]
    fn create_password_then_sign_in() {
        let mut auth = PasswordAuth::new();
        auth.create_password(&user(), "secret").unwrap();
        assert!(auth.is_authenticated());
        assert!(!auth.state().requires_password_creation);

        auth.sign_out();
        assert_eq!(
            auth.sign_in(&user(), "wrong").unwrap_err(),
            AuthError::IncorrectPassword
        );
        assert!(auth.sign_in(&user(), "secret").is_ok());
    }

    #[test]
    fn credentials_survive_reload_without_plaintext() {
        let mut auth = PasswordAuth::new();
        auth.sign_up(&user(), "secret").unwrap();
        let stored = auth.credentials();
        assert_eq!(stored.len(), 1);
        assert_ne!(stored[0].digest, "secret");

        let mut reloaded = PasswordAuth::with_credentials(stored);
        assert!(reloaded.sign_in(&user(), "secret").is_ok());
    }

    #[test]
    fn create_password_never_replaces_existing() {
        let mut auth = PasswordAuth::new();
        auth.sign_up(&user(), "secret").unwrap();
        assert!(auth.has_password("TEST@example.com"));
        assert_eq!(
            auth.create_password(&user(), "other").unwrap_err(),
            AuthError::NoPasswordPending
        );
        assert!(!auth.is_authenticated());
        assert!(auth.sign_in(&user(), "secret").is_ok());
    }

    #[test]
    fn empty_password_is_rejected() {
        let mut auth = PasswordAuth::new();
        assert_eq!(
            auth.create_password(&user(), "").unwrap_err(),
            AuthError::EmptyPassword
        );
        assert!(!auth.is_authenticated());
    }
}
