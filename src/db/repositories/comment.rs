//! Comment repository

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::Comment;

/// Comment data-access contract
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, comment: &Comment) -> Result<()>;

    /// Scoped lookup so delete can only reach the caller's own comments.
    async fn find_by_id_and_author(
        &self,
        comment_id: Uuid,
        author_id: Uuid,
    ) -> Result<Option<Comment>>;

    async fn delete(&self, comment_id: Uuid) -> Result<()>;

    /// Comments on an article, oldest first.
    async fn find_by_article(&self, article_id: Uuid) -> Result<Vec<Comment>>;
}

/// SQLx-backed comment repository
pub struct SqlxCommentRepository {
    pool: SqlitePool,
}

impl SqlxCommentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: SqlitePool) -> Arc<dyn CommentRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl CommentRepository for SqlxCommentRepository {
    async fn create(&self, comment: &Comment) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO comments (id, body, author_id, article_id, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(comment.id)
        .bind(&comment.body)
        .bind(comment.author_id)
        .bind(comment.article_id)
        .bind(comment.created_at)
        .execute(&self.pool)
        .await
        .context("Failed to create comment")?;

        Ok(())
    }

    async fn find_by_id_and_author(
        &self,
        comment_id: Uuid,
        author_id: Uuid,
    ) -> Result<Option<Comment>> {
        let row = sqlx::query(
            "SELECT id, body, author_id, article_id, created_at FROM comments \
             WHERE id = ? AND author_id = ?",
        )
        .bind(comment_id)
        .bind(author_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to find comment")?;

        row.map(|row| row_to_comment(&row)).transpose()
    }

    async fn delete(&self, comment_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(comment_id)
            .execute(&self.pool)
            .await
            .context("Failed to delete comment")?;

        Ok(())
    }

    async fn find_by_article(&self, article_id: Uuid) -> Result<Vec<Comment>> {
        let rows = sqlx::query(
            "SELECT id, body, author_id, article_id, created_at FROM comments \
             WHERE article_id = ? ORDER BY created_at ASC",
        )
        .bind(article_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to find comments")?;

        rows.iter().map(row_to_comment).collect()
    }
}

fn row_to_comment(row: &sqlx::sqlite::SqliteRow) -> Result<Comment> {
    Ok(Comment {
        id: row.get("id"),
        body: row.get("body"),
        author_id: row.get("author_id"),
        article_id: row.get("article_id"),
        created_at: row.get("created_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{ArticleRepository, SqlxArticleRepository, SqlxUserRepository, UserRepository};
    use crate::db::{create_test_pool, migrations};
    use crate::models::{Article, User};

    struct Fixture {
        repo: SqlxCommentRepository,
        author: User,
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
            repo: SqlxCommentRepository::new(pool),
            author,
            reader,
            article,
        }
    }

    #[tokio::test]
    async fn test_create_and_list_oldest_first() {
        let fx = setup().await;

        let first = Comment::new("first".to_string(), fx.reader.id, fx.article.id);
        let second = Comment::new("second".to_string(), fx.author.id, fx.article.id);
        fx.repo.create(&first).await.expect("Failed to create comment");
        fx.repo.create(&second).await.expect("Failed to create comment");

        let comments = fx
            .repo
            .find_by_article(fx.article.id)
            .await
            .expect("Failed to list comments");

        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].body, "first");
        assert_eq!(comments[1].body, "second");
    }

    #[tokio::test]
    async fn test_find_by_id_and_author_scopes_to_author() {
        let fx = setup().await;
        let comment = Comment::new("mine".to_string(), fx.reader.id, fx.article.id);
        fx.repo.create(&comment).await.expect("Failed to create comment");

        assert!(fx
            .repo
            .find_by_id_and_author(comment.id, fx.reader.id)
            .await
            .expect("Failed to find")
            .is_some());
        assert!(fx
            .repo
            .find_by_id_and_author(comment.id, fx.author.id)
            .await
            .expect("Failed to find")
            .is_none());
    }

    #[tokio::test]
    async fn test_delete_removes_comment() {
        let fx = setup().await;
        let comment = Comment::new("gone soon".to_string(), fx.reader.id, fx.article.id);
        fx.repo.create(&comment).await.expect("Failed to create comment");

        fx.repo.delete(comment.id).await.expect("Failed to delete");

        let comments = fx
            .repo
            .find_by_article(fx.article.id)
            .await
            .expect("Failed to list comments");
        assert!(comments.is_empty());
    }
}
