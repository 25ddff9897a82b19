//! Tag and tag-relationship repositories
//!
//! Tag names are matched case-insensitively at the storage boundary: the
//! `name` column carries `COLLATE NOCASE`, so `find_by_names` and the
//! unique index both ignore case without ad-hoc comparisons on read.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::{Tag, TagRelationship};

/// Tag data-access contract
#[async_trait]
pub trait TagRepository: Send + Sync {
    async fn create(&self, tag: &Tag) -> Result<()>;

    /// Tags whose name matches any of `names`, ignoring case.
    async fn find_by_names(&self, names: &[String]) -> Result<Vec<Tag>>;

    async fn find_all(&self) -> Result<Vec<Tag>>;
}

/// Article-tag association data-access contract
#[async_trait]
pub trait TagRelationshipRepository: Send + Sync {
    async fn create(&self, relationship: &TagRelationship) -> Result<()>;

    /// Tags attached to an article, ordered by name.
    async fn find_article_tags(&self, article_id: Uuid) -> Result<Vec<Tag>>;
}

/// SQLx-backed tag repository
pub struct SqlxTagRepository {
    pool: SqlitePool,
}

impl SqlxTagRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: SqlitePool) -> Arc<dyn TagRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl TagRepository for SqlxTagRepository {
    async fn create(&self, tag: &Tag) -> Result<()> {
        sqlx::query("INSERT INTO tags (id, name, created_at) VALUES (?, ?, ?)")
            .bind(tag.id)
            .bind(&tag.name)
            .bind(tag.created_at)
            .execute(&self.pool)
            .await
            .context("Failed to create tag")?;

        Ok(())
    }

    async fn find_by_names(&self, names: &[String]) -> Result<Vec<Tag>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; names.len()].join(", ");
        let sql = format!(
            "SELECT id, name, created_at FROM tags WHERE name IN ({placeholders})"
        );

        let mut query = sqlx::query(&sql);
        for name in names {
            query = query.bind(name);
        }
        let rows = query
            .fetch_all(&self.pool)
            .await
            .context("Failed to find tags by names")?;

        rows.iter().map(row_to_tag).collect()
    }

    async fn find_all(&self) -> Result<Vec<Tag>> {
        let rows = sqlx::query("SELECT id, name, created_at FROM tags ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list tags")?;

        rows.iter().map(row_to_tag).collect()
    }
}

/// SQLx-backed article-tag association repository
pub struct SqlxTagRelationshipRepository {
    pool: SqlitePool,
}

impl SqlxTagRelationshipRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: SqlitePool) -> Arc<dyn TagRelationshipRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl TagRelationshipRepository for SqlxTagRelationshipRepository {
    async fn create(&self, relationship: &TagRelationship) -> Result<()> {
        sqlx::query("INSERT INTO article_tags (article_id, tag_id) VALUES (?, ?)")
            .bind(relationship.article_id)
            .bind(relationship.tag_id)
            .execute(&self.pool)
            .await
            .context("Failed to create tag relationship")?;

        Ok(())
    }

    async fn find_article_tags(&self, article_id: Uuid) -> Result<Vec<Tag>> {
        let rows = sqlx::query(
            r#"
            SELECT t.id, t.name, t.created_at
            FROM tags t
            JOIN article_tags at ON at.tag_id = t.id
            WHERE at.article_id = ?
            ORDER BY t.name
            "#,
        )
        .bind(article_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to find article tags")?;

        rows.iter().map(row_to_tag).collect()
    }
}

fn row_to_tag(row: &sqlx::sqlite::SqliteRow) -> Result<Tag> {
    Ok(Tag {
        id: row.get("id"),
        name: row.get("name"),
        created_at: row.get("created_at"),
    })
}
