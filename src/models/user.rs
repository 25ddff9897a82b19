//! User model
//!
//! The User entity and the input value objects for the identity lifecycle:
//! signup, login and partial profile update.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::{Validate, Violations};

/// User entity. Username and email are globally unique; the password is
/// stored only as a hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: Uuid,
    /// Username (unique)
    pub username: String,
    /// Email address (unique)
    pub email: String,
    /// Password hash (argon2, PHC string)
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Short profile bio
    pub bio: Option<String>,
    /// Profile image URL
    pub image: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a candidate user with a generated id.
    ///
    /// `password_hash` holds whatever the caller passes; the signup path
    /// validates with the plaintext in place and swaps in the argon2 hash
    /// before persisting.
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            bio: None,
            image: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Validate for User {
    fn check(&self, errors: &mut Violations) {
        errors.not_blank("username", &self.username);
        errors.max_len("username", &self.username, 50);
        errors.not_blank("email", &self.email);
        errors.email("email", &self.email);
        errors.not_blank("password", &self.password_hash);
    }
}

/// Input for user signup
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    pub username: String,
    pub email: String,
    /// Plaintext password, hashed before storage
    pub password: String,
}

impl CreateUserInput {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Input for login
#[derive(Debug, Clone)]
pub struct LoginUserInput {
    pub email: String,
    pub password: String,
}

impl LoginUserInput {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Input for partial profile update.
///
/// A field is applied only when present and non-empty; absent fields leave
/// the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserInput {
    pub id: Uuid,
    pub username: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
}

impl UpdateUserInput {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = Some(bio.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate;

    #[test]
    fn test_user_new_generates_distinct_ids() {
        let a = User::new(
            "alice".to_string(),
            "alice@example.com".to_string(),
            "hash".to_string(),
        );
        let b = User::new(
            "bob".to_string(),
            "bob@example.com".to_string(),
            "hash".to_string(),
        );

        assert_ne!(a.id, b.id);
        assert!(a.bio.is_none());
        assert!(a.image.is_none());
    }

    #[test]
    fn test_user_validation_accepts_well_formed_user() {
        let user = User::new(
            "alice".to_string(),
            "alice@example.com".to_string(),
            "hash".to_string(),
        );

        assert!(validate(user).is_ok());
    }

    #[test]
    fn test_user_validation_collects_all_violations() {
        let user = User::new(String::new(), "not-an-email".to_string(), String::new());

        let err = validate(user).expect_err("should be invalid");
        assert_eq!(err.messages.len(), 3);
        assert!(err.messages[0].contains("username"));
    }

    #[test]
    fn test_update_input_builder() {
        let id = Uuid::new_v4();
        let input = UpdateUserInput::new(id).with_bio("hello").with_image("http://x/y.png");

        assert_eq!(input.id, id);
        assert!(input.username.is_none());
        assert_eq!(input.bio.as_deref(), Some("hello"));
    }
}
