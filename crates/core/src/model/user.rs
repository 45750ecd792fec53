use serde::{Deserialize, Serialize};

use crate::model::ids::UserId;

/// Identity owned by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub email: Option<String>,
}

impl User {
    #[must_use]
    pub fn new(id: UserId, email: impl Into<String>) -> Self {
        Self {
            id,
            email: Some(email.into()),
        }
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}

/// An authenticated session as handed out by sign-in (or sign-up when no
/// email confirmation is required).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: User,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

/// Row of the `profiles` table, one-to-one with `User`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    #[serde(default)]
    pub full_name: Option<String>,
}

impl Profile {
    #[must_use]
    pub fn new(id: UserId, full_name: impl Into<String>) -> Self {
        Self {
            id,
            full_name: Some(full_name.into()),
        }
    }

    /// Name to greet the user with, falling back to the email local part.
    #[must_use]
    pub fn display_name<'a>(&'a self, user: &'a User) -> &'a str {
        match self.full_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => Self::fallback_name(user),
        }
    }

    /// Greeting name for a user without a profile row.
    #[must_use]
    pub fn fallback_name(user: &User) -> &str {
        user.email()
            .and_then(|email| email.split('@').next())
            .filter(|local| !local.is_empty())
            .unwrap_or("Learner")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_debug_hides_token() {
        let session = Session {
            access_token: "secret-token".into(),
            refresh_token: None,
            user: User::new(UserId::random(), "a@b.c"),
        };
        let debug = format!("{session:?}");
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("a@b.c"));
    }

    #[test]
    fn display_name_falls_back_to_email() {
        let user = User::new(UserId::random(), "rina@example.com");
        let profile = Profile {
            id: user.id,
            full_name: Some("  ".into()),
        };
        assert_eq!(profile.display_name(&user), "rina");

        let named = Profile::new(user.id, "Rina Putri");
        assert_eq!(named.display_name(&user), "Rina Putri");
    }
}
