//! Favorite repository
//!
//! The favorites table keys on the (user, article) pair, so a relationship
//! exists at most once per pair. The service layer checks for an existing
//! row before inserting to keep favoriting idempotent.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::FavoriteRelationship;

/// Favorite data-access contract
#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    async fn create(&self, favorite: &FavoriteRelationship) -> Result<()>;

    async fn find_by_article_and_user(
        &self,
        article_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<FavoriteRelationship>>;

    /// Removes the pair if present. Returns whether a row was deleted.
    async fn delete(&self, article_id: Uuid, user_id: Uuid) -> Result<bool>;

    async fn count_by_article(&self, article_id: Uuid) -> Result<i64>;

    async fn is_favorited(&self, article_id: Uuid, user_id: Uuid) -> Result<bool>;
}

/// SQLx-backed favorite repository
pub struct SqlxFavoriteRepository {
    pool: SqlitePool,
}

impl SqlxFavoriteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: SqlitePool) -> Arc<dyn FavoriteRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl FavoriteRepository for SqlxFavoriteRepository {
    async fn create(&self, favorite: &FavoriteRelationship) -> Result<()> {
        sqlx::query("INSERT INTO favorites (user_id, article_id, created_at) VALUES (?, ?, ?)")
            .bind(favorite.user_id)
            .bind(favorite.article_id)
            .bind(favorite.created_at)
            .execute(&self.pool)
            .await
            .context("Failed to create favorite")?;

        Ok(())
    }

    async fn find_by_article_and_user(
        &self,
        article_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<FavoriteRelationship>> {
        let row = sqlx::query(
            "SELECT user_id, article_id, created_at FROM favorites \
             WHERE article_id = ? AND user_id = ?",
        )
        .bind(article_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to find favorite")?;

        Ok(row.map(|row| FavoriteRelationship {
            user_id: row.get("user_id"),
            article_id: row.get("article_id"),
            created_at: row.get("created_at"),
        }))
    }

    async fn delete(&self, article_id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM favorites WHERE article_id = ? AND user_id = ?")
            .bind(article_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .context("Failed to delete favorite")?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_by_article(&self, article_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM favorites WHERE article_id = ?")
            .bind(article_id)
            .fetch_one(&self.pool)
            .await
            .context("Failed to count favorites")?;

        Ok(count)
    }

    async fn is_favorited(&self, article_id: Uuid, user_id: Uuid) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM favorites WHERE article_id = ? AND user_id = ?",
        )
        .bind(article_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to check favorite")?;

        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{ArticleRepository, SqlxArticleRepository, SqlxUserRepository, UserRepository};
    use crate::db::{create_test_pool, migrations};
    use crate::models::{Article, User};

    struct Fixture {
        repo: SqlxFavoriteRepository,
        reader: User,
        article: Article,
    }

    async fn setup() -> Fixture {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let users = SqlxUserRepository::new(pool.clone());
        let articles = SqlxArticleRepository::new(pool.clone());

        let author = User::new(
            "alice".to_string(),
            "alice@example.com".to_string(),
            "hash".to_string(),
        );
        let reader = User::new(
            "bob".to_string(),
            "bob@example.com".to_string(),
            "hash".to_string(),
        );
        users.create(&author).await.expect("Failed to create user");
        users.create(&reader).await.expect("Failed to create user");

        let article = Article::new(
            "hello-world".to_string(),
            "Hello World".to_string(),
            "d".to_string(),
            "b".to_string(),
            author.id,
        );
        articles.create(&article).await.expect("Failed to create article");

        Fixture {
            repo: SqlxFavoriteRepository::new(pool),
            reader,
            article,
        }
    }

    #[tokio::test]
    async fn test_create_and_count() {
        let fx = setup().await;

        assert_eq!(
            fx.repo
                .count_by_article(fx.article.id)
                .await
                .expect("Failed to count"),
            0
        );

        fx.repo
            .create(&FavoriteRelationship::new(fx.reader.id, fx.article.id))
            .await
            .expect("Failed to favorite");

        assert_eq!(
            fx.repo
                .count_by_article(fx.article.id)
                .await
                .expect("Failed to count"),
            1
        );
        assert!(fx
            .repo
            .is_favorited(fx.article.id, fx.reader.id)
            .await
            .expect("Failed to check"));
    }

    #[tokio::test]
    async fn test_duplicate_pair_rejected_by_storage() {
        let fx = setup().await;
        let favorite = FavoriteRelationship::new(fx.reader.id, fx.article.id);

        fx.repo.create(&favorite).await.expect("Failed to favorite");
        assert!(fx.repo.create(&favorite).await.is_err());
    }

    #[tokio::test]
    async fn test_find_and_delete() {
        let fx = setup().await;
        fx.repo
            .create(&FavoriteRelationship::new(fx.reader.id, fx.article.id))
            .await
            .expect("Failed to favorite");

        let found = fx
            .repo
            .find_by_article_and_user(fx.article.id, fx.reader.id)
            .await
            .expect("Failed to find")
            .expect("Favorite not found");
        assert_eq!(found.user_id, fx.reader.id);
        assert_eq!(found.article_id, fx.article.id);

        assert!(fx
            .repo
            .delete(fx.article.id, fx.reader.id)
            .await
            .expect("Failed to delete"));
        // Second delete finds nothing
        assert!(!fx
            .repo
            .delete(fx.article.id, fx.reader.id)
            .await
            .expect("Failed to delete"));
        assert!(!fx
            .repo
            .is_favorited(fx.article.id, fx.reader.id)
            .await
            .expect("Failed to check"));
    }
}
