//! Follow repository
//!
//! The follows table keys on the (follower, followed) pair. Deletes report
//! whether a row was removed so the service layer can distinguish an
//! unfollow of a relationship that never existed.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::FollowRelationship;

/// Follow data-access contract
#[async_trait]
pub trait FollowRepository: Send + Sync {
    async fn create(&self, follow: &FollowRelationship) -> Result<()>;

    async fn find_by_users(
        &self,
        follower_id: Uuid,
        followed_id: Uuid,
    ) -> Result<Option<FollowRelationship>>;

    /// Removes the pair if present. Returns whether a row was deleted.
    async fn delete(&self, follower_id: Uuid, followed_id: Uuid) -> Result<bool>;

    async fn is_following(&self, follower_id: Uuid, followed_id: Uuid) -> Result<bool>;
}

/// SQLx-backed follow repository
pub struct SqlxFollowRepository {
    pool: SqlitePool,
}

impl SqlxFollowRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: SqlitePool) -> Arc<dyn FollowRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl FollowRepository for SqlxFollowRepository {
    async fn create(&self, follow: &FollowRelationship) -> Result<()> {
        sqlx::query(
            "INSERT INTO follows (follower_id, followed_id, created_at) VALUES (?, ?, ?)",
        )
        .bind(follow.follower_id)
        .bind(follow.followed_id)
        .bind(follow.created_at)
        .execute(&self.pool)
        .await
        .context("Failed to create follow")?;

        Ok(())
    }

    async fn find_by_users(
        &self,
        follower_id: Uuid,
        followed_id: Uuid,
    ) -> Result<Option<FollowRelationship>> {
        let row = sqlx::query(
            "SELECT follower_id, followed_id, created_at FROM follows \
             WHERE follower_id = ? AND followed_id = ?",
        )
        .bind(follower_id)
        .bind(followed_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to find follow")?;

        Ok(row.map(|row| FollowRelationship {
            follower_id: row.get("follower_id"),
            followed_id: row.get("followed_id"),
            created_at: row.get("created_at"),
        }))
    }

    async fn delete(&self, follower_id: Uuid, followed_id: Uuid) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM follows WHERE follower_id = ? AND followed_id = ?")
                .bind(follower_id)
                .bind(followed_id)
                .execute(&self.pool)
                .await
                .context("Failed to delete follow")?;

        Ok(result.rows_affected() > 0)
    }

    async fn is_following(&self, follower_id: Uuid, followed_id: Uuid) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM follows WHERE follower_id = ? AND followed_id = ?",
        )
        .bind(follower_id)
        .bind(followed_id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to check follow")?;

        Ok(count > 0)
    }
}
