//! User service
//!
//! Identity lifecycle: signup, login and partial profile update. Uniqueness
//! is checked before every write, with the user's own row excluded on
//! update so an unchanged username or email does not conflict with itself.

use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;

use crate::db::repositories::UserRepository;
use crate::error::DomainError;
use crate::models::{CreateUserInput, LoginUserInput, UpdateUserInput, User};
use crate::services::password;
use crate::validation::validate;

/// User lifecycle operations
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Register a new user.
    ///
    /// The candidate is validated with the plaintext password still in
    /// place, then the username and email probes run in that order, and
    /// only then is the password hashed and the row persisted.
    pub async fn create(&self, input: CreateUserInput) -> Result<User, DomainError> {
        let candidate = User::new(input.username, input.email, input.password);
        let mut user = validate(candidate)?;

        if self
            .users
            .exists_username(None, &user.username)
            .await
            .context("Failed to check username")?
        {
            return Err(DomainError::UsernameAlreadyExists);
        }

        if self
            .users
            .exists_email(None, &user.email)
            .await
            .context("Failed to check email")?
        {
            return Err(DomainError::EmailAlreadyExists);
        }

        user.password_hash = password::hash_password(&user.password_hash)?;
        self.users
            .create(&user)
            .await
            .context("Failed to create user")?;

        tracing::info!(username = %user.username, "user registered");
        Ok(user)
    }

    /// Authenticate by email and password.
    pub async fn login(&self, input: LoginUserInput) -> Result<User, DomainError> {
        let user = self
            .users
            .find_by_email(&input.email)
            .await
            .context("Failed to find user by email")?
            .ok_or(DomainError::UserNotFound)?;

        if !password::verify_password(&input.password, &user.password_hash)? {
            return Err(DomainError::InvalidPassword);
        }

        Ok(user)
    }

    /// Apply a partial profile update.
    ///
    /// Empty and absent fields are ignored. Changed username or email is
    /// re-checked for uniqueness excluding the user's own row before any
    /// field is applied.
    pub async fn update(&self, input: UpdateUserInput) -> Result<User, DomainError> {
        let mut user = self.find_by_id(input.id).await?;

        if let Some(username) = present(&input.username) {
            if self
                .users
                .exists_username(Some(input.id), username)
                .await
                .context("Failed to check username")?
            {
                return Err(DomainError::UsernameAlreadyExists);
            }
        }

        if let Some(email) = present(&input.email) {
            if self
                .users
                .exists_email(Some(input.id), email)
                .await
                .context("Failed to check email")?
            {
                return Err(DomainError::EmailAlreadyExists);
            }
        }

        if let Some(username) = present(&input.username) {
            user.username = username.to_string();
        }
        if let Some(email) = present(&input.email) {
            user.email = email.to_string();
        }
        if let Some(bio) = present(&input.bio) {
            user.bio = Some(bio.to_string());
        }
        if let Some(image) = present(&input.image) {
            user.image = Some(image.to_string());
        }

        user.updated_at = Utc::now();
        let user = validate(user)?;
        self.users
            .update(&user)
            .await
            .context("Failed to update user")?;

        Ok(user)
    }

    pub async fn find_by_id(&self, id: uuid::Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await
            .context("Failed to find user by id")?
            .ok_or(DomainError::UserNotFound)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<User, DomainError> {
        self.users
            .find_by_username(username)
            .await
            .context("Failed to find user by username")?
            .ok_or(DomainError::UserNotFound)
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}
