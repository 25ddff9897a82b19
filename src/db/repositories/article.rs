//! Article repository
//!
//! Data access for articles, including the two filtered list queries. Both
//! list variants page most-recent-first; the feed variant selects articles
//! authored by users the viewer follows, the general variant narrows by
//! tag / author / favorited-by name lists.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::{Article, ArticleFilter, PageResult};

/// Article data-access contract
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    async fn create(&self, article: &Article) -> Result<()>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Article>>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Article>>;

    /// Ownership-scoped lookup: `None` when the slug exists but belongs to
    /// a different author.
    async fn find_by_author_and_slug(&self, author_id: Uuid, slug: &str)
        -> Result<Option<Article>>;

    async fn exists_by_slug(&self, slug: &str) -> Result<bool>;

    async fn update(&self, article: &Article) -> Result<()>;

    async fn delete(&self, id: Uuid) -> Result<()>;

    /// General filtered view, most recent first.
    async fn find_by_filter(&self, filter: &ArticleFilter) -> Result<PageResult<Article>>;

    /// Feed view: articles by authors the viewer follows, most recent
    /// first.
    async fn find_most_recent_by_filter(
        &self,
        filter: &ArticleFilter,
    ) -> Result<PageResult<Article>>;
}

/// SQLx-backed article repository
pub struct SqlxArticleRepository {
    pool: SqlitePool,
}

impl SqlxArticleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: SqlitePool) -> Arc<dyn ArticleRepository> {
        Arc::new(Self::new(pool))
    }
}

const ARTICLE_COLUMNS: &str =
    "a.id, a.slug, a.title, a.description, a.body, a.author_id, a.created_at, a.updated_at";

#[async_trait]
impl ArticleRepository for SqlxArticleRepository {
    async fn create(&self, article: &Article) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO articles (id, slug, title, description, body, author_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(article.id)
        .bind(&article.slug)
        .bind(&article.title)
        .bind(&article.description)
        .bind(&article.body)
        .bind(article.author_id)
        .bind(article.created_at)
        .bind(article.updated_at)
        .execute(&self.pool)
        .await
        .context("Failed to create article")?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Article>> {
        let row = sqlx::query(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles a WHERE a.id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to find article by id")?;

        row.map(|row| row_to_article(&row)).transpose()
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Article>> {
        let row = sqlx::query(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles a WHERE a.slug = ?"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to find article by slug")?;

        row.map(|row| row_to_article(&row)).transpose()
    }

    async fn find_by_author_and_slug(
        &self,
        author_id: Uuid,
        slug: &str,
    ) -> Result<Option<Article>> {
        let row = sqlx::query(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles a WHERE a.author_id = ? AND a.slug = ?"
        ))
        .bind(author_id)
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to find article by author and slug")?;

        row.map(|row| row_to_article(&row)).transpose()
    }

    async fn exists_by_slug(&self, slug: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM articles WHERE slug = ?")
            .bind(slug)
            .fetch_one(&self.pool)
            .await
            .context("Failed to check slug")?;

        Ok(count > 0)
    }

    async fn update(&self, article: &Article) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE articles
            SET slug = ?, title = ?, description = ?, body = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&article.slug)
        .bind(&article.title)
        .bind(&article.description)
        .bind(&article.body)
        .bind(article.updated_at)
        .bind(article.id)
        .execute(&self.pool)
        .await
        .context("Failed to update article")?;

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM articles WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete article")?;

        Ok(())
    }

    async fn find_by_filter(&self, filter: &ArticleFilter) -> Result<PageResult<Article>> {
        query_page(&self.pool, filter, false).await
    }

    async fn find_most_recent_by_filter(
        &self,
        filter: &ArticleFilter,
    ) -> Result<PageResult<Article>> {
        query_page(&self.pool, filter, true).await
    }
}

/// Build the WHERE clause shared by the page and count queries.
fn build_where(filter: &ArticleFilter, feed: bool) -> String {
    let mut clauses = Vec::new();

    if feed {
        clauses.push(
            "a.author_id IN (SELECT followed_id FROM follows WHERE follower_id = ?)".to_string(),
        );
    }
    if !filter.tags.is_empty() {
        clauses.push(format!(
            "a.id IN (SELECT at.article_id FROM article_tags at \
             JOIN tags t ON t.id = at.tag_id WHERE t.name IN ({}))",
            placeholders(filter.tags.len())
        ));
    }
    if !filter.authors.is_empty() {
        clauses.push(format!(
            "a.author_id IN (SELECT id FROM users WHERE username IN ({}))",
            placeholders(filter.authors.len())
        ));
    }
    if !filter.favorited_by.is_empty() {
        clauses.push(format!(
            "a.id IN (SELECT f.article_id FROM favorites f \
             JOIN users u ON u.id = f.user_id WHERE u.username IN ({}))",
            placeholders(filter.favorited_by.len())
        ));
    }

    if clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", clauses.join(" AND "))
    }
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

async fn query_page(
    pool: &SqlitePool,
    filter: &ArticleFilter,
    feed: bool,
) -> Result<PageResult<Article>> {
    let where_sql = build_where(filter, feed);

    let page_sql = format!(
        "SELECT {ARTICLE_COLUMNS} FROM articles a {where_sql} \
         ORDER BY a.created_at DESC LIMIT ? OFFSET ?"
    );
    let mut query = sqlx::query(&page_sql);
    if feed {
        query = query.bind(filter.viewer_id);
    }
    for name in &filter.tags {
        query = query.bind(name);
    }
    for name in &filter.authors {
        query = query.bind(name);
    }
    for name in &filter.favorited_by {
        query = query.bind(name);
    }
    let rows = query
        .bind(filter.limit)
        .bind(filter.offset)
        .fetch_all(pool)
        .await
        .context("Failed to query articles")?;

    let mut items = Vec::with_capacity(rows.len());
    for row in &rows {
        items.push(row_to_article(row)?);
    }

    let count_sql = format!("SELECT COUNT(*) FROM articles a {where_sql}");
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    if feed {
        count_query = count_query.bind(filter.viewer_id);
    }
    for name in &filter.tags {
        count_query = count_query.bind(name);
    }
    for name in &filter.authors {
        count_query = count_query.bind(name);
    }
    for name in &filter.favorited_by {
        count_query = count_query.bind(name);
    }
    let total = count_query
        .fetch_one(pool)
        .await
        .context("Failed to count articles")?;

    Ok(PageResult::new(items, total))
}

fn row_to_article(row: &sqlx::sqlite::SqliteRow) -> Result<Article> {
    Ok(Article {
        id: row.get("id"),
        slug: row.get("slug"),
        title: row.get("title"),
        description: row.get("description"),
        body: row.get("body"),
        author_id: row.get("author_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
