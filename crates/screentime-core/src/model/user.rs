use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An account as the auth backend reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: Option<HashMap<String, String>>,
    #[serde(default)]
    pub profile_picture_url: Option<String>,
}

impl User {
    pub fn new(
        id: impl Into<String>,
        email: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        let mut metadata = HashMap::new();
        metadata.insert("username".to_string(), username.into());
        Self {
            id: id.into(),
            email: Some(email.into()),
            user_metadata: Some(metadata),
            profile_picture_url: None,
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.user_metadata
            .as_ref()
            .and_then(|m| m.get("username"))
            .map(String::as_str)
    }

    /// Username, falling back to email, then to `"User"`.
    pub fn display_name(&self) -> &str {
        self.username()
            .or(self.email.as_deref())
            .unwrap_or("User")
    }

    pub fn profile_initial(&self) -> String {
        self.display_name()
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_prefers_username() {
        let user = User::new("u1", "john@example.com", "johndoe");
        assert_eq!(user.display_name(), "johndoe");
        assert_eq!(user.profile_initial(), "J");
    }

    #[test]
    fn display_name_falls_back_to_email_then_default() {
        let mut user = User {
            id: "u2".into(),
            email: Some("sam@example.com".into()),
            user_metadata: None,
            profile_picture_url: None,
        };
        assert_eq!(user.display_name(), "sam@example.com");

        user.email = None;
        assert_eq!(user.display_name(), "User");
        assert_eq!(user.profile_initial(), "U");
    }
}
