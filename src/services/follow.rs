//! Follow service
//!
//! Directed follow relationships between users. Both endpoints are
//! resolved before any write, so an unknown username fails with
//! `UserNotFound` rather than a dangling row. Unfollowing a user that was
//! never followed surfaces as an explicit `FollowNotFound`.

use std::sync::Arc;

use anyhow::Context;
use uuid::Uuid;

use crate::db::repositories::FollowRepository;
use crate::error::DomainError;
use crate::models::FollowRelationship;
use crate::services::user::UserService;

/// Follow relationship operations
#[derive(Clone)]
pub struct FollowService {
    follows: Arc<dyn FollowRepository>,
    users: UserService,
}

impl FollowService {
    pub fn new(follows: Arc<dyn FollowRepository>, users: UserService) -> Self {
        Self { follows, users }
    }

    /// Make `follower_id` follow the user named `username`.
    pub async fn follow_user_by_username(
        &self,
        follower_id: Uuid,
        username: &str,
    ) -> Result<FollowRelationship, DomainError> {
        let follower = self.users.find_by_id(follower_id).await?;
        let followed = self.users.find_by_username(username).await?;

        let follow = FollowRelationship::new(follower.id, followed.id);
        self.follows
            .create(&follow)
            .await
            .context("Failed to create follow")?;

        Ok(follow)
    }

    /// Remove the follow relationship; its absence is an error.
    pub async fn unfollow_user_by_username(
        &self,
        follower_id: Uuid,
        username: &str,
    ) -> Result<(), DomainError> {
        let follower = self.users.find_by_id(follower_id).await?;
        let followed = self.users.find_by_username(username).await?;

        let removed = self
            .follows
            .delete(follower.id, followed.id)
            .await
            .context("Failed to delete follow")?;
        if !removed {
            return Err(DomainError::FollowNotFound);
        }

        Ok(())
    }

    pub async fn is_following_user(
        &self,
        follower_id: Uuid,
        followed_id: Uuid,
    ) -> Result<bool, DomainError> {
        self.follows
            .is_following(follower_id, followed_id)
            .await
            .context("Failed to check follow")
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxFollowRepository, SqlxUserRepository};
    use crate::db::{create_test_pool, migrations};
    use crate::models::{CreateUserInput, User};

    async fn setup() -> (FollowService, UserService) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let users = UserService::new(SqlxUserRepository::boxed(pool.clone()));
        (
            FollowService::new(SqlxFollowRepository::boxed(pool), users.clone()),
            users,
        )
    }

    async fn signup(users: &UserService, username: &str) -> User {
        users
            .create(CreateUserInput::new(
                username,
                format!("{username}@example.com"),
                "s3cret-pass",
            ))
            .await
            .expect("Failed to create user")
    }

    #[tokio::test]
    async fn test_follow_and_check() {
        let (service, users) = setup().await;
        let alice = signup(&users, "alice").await;
        let bob = signup(&users, "bob").await;

        let follow = service
            .follow_user_by_username(alice.id, "bob")
            .await
            .expect("Failed to follow");

        assert_eq!(follow.follower_id, alice.id);
        assert_eq!(follow.followed_id, bob.id);
        assert!(service
            .is_following_user(alice.id, bob.id)
            .await
            .expect("Failed to check"));
        // Direction matters
        assert!(!service
            .is_following_user(bob.id, alice.id)
            .await
            .expect("Failed to check"));
    }

    #[tokio::test]
    async fn test_follow_unknown_username() {
        let (service, users) = setup().await;
        let alice = signup(&users, "alice").await;

        let result = service.follow_user_by_username(alice.id, "nobody").await;
        assert!(matches!(result, Err(DomainError::UserNotFound)));
    }

    #[tokio::test]
    async fn test_unfollow_roundtrip() {
        let (service, users) = setup().await;
        let alice = signup(&users, "alice").await;
        signup(&users, "bob").await;

        service
            .follow_user_by_username(alice.id, "bob")
            .await
            .expect("Failed to follow");
        service
            .unfollow_user_by_username(alice.id, "bob")
            .await
            .expect("Failed to unfollow");

        let bob = users.find_by_username("bob").await.expect("User not found");
        assert!(!service
            .is_following_user(alice.id, bob.id)
            .await
            .expect("Failed to check"));
    }

    #[tokio::test]
    async fn test_unfollow_absent_relationship_is_an_error() {
        let (service, users) = setup().await;
        let alice = signup(&users, "alice").await;
        signup(&users, "bob").await;

        let result = service.unfollow_user_by_username(alice.id, "bob").await;
        assert!(matches!(result, Err(DomainError::FollowNotFound)));
    }
}
