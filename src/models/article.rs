//! Article model
//!
//! This module provides:
//! - `Article` entity
//! - Input types for creating and updating articles
//! - `ArticleFilter` for list queries and the `PageResult` container

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::{Validate, Violations};

/// Page size applied when a caller supplies a non-positive limit.
pub const DEFAULT_PAGE_LIMIT: i64 = 20;

/// Article entity. The slug is globally unique; the author never changes
/// after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Unique identifier
    pub id: Uuid,
    /// URL-safe slug derived from the title
    pub slug: String,
    /// Article title
    pub title: String,
    /// Short description
    pub description: String,
    /// Article body
    pub body: String,
    /// Owning author
    pub author_id: Uuid,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Article {
    /// Build a candidate article with a generated id.
    pub fn new(
        slug: String,
        title: String,
        description: String,
        body: String,
        author_id: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            slug,
            title,
            description,
            body,
            author_id,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Validate for Article {
    fn check(&self, errors: &mut Violations) {
        errors.not_blank("slug", &self.slug);
        errors.not_blank("title", &self.title);
        errors.max_len("title", &self.title, 255);
        errors.not_blank("description", &self.description);
        errors.not_blank("body", &self.body);
    }
}

/// Input for creating an article
#[derive(Debug, Clone)]
pub struct NewArticleInput {
    pub author_id: Uuid,
    pub title: String,
    pub description: String,
    pub body: String,
    pub tag_list: Vec<String>,
}

impl NewArticleInput {
    pub fn new(
        author_id: Uuid,
        title: impl Into<String>,
        description: impl Into<String>,
        body: impl Into<String>,
        tag_list: Vec<String>,
    ) -> Self {
        Self {
            author_id,
            title: title.into(),
            description: description.into(),
            body: body.into(),
            tag_list,
        }
    }
}

/// Input for updating an article by slug.
///
/// Blank fields are ignored; a changed title regenerates the slug. When all
/// three fields are blank the update is a no-op.
#[derive(Debug, Clone, Default)]
pub struct UpdateArticleInput {
    pub slug: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub body: Option<String>,
}

impl UpdateArticleInput {
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Filter for article list queries.
///
/// `viewer_id` scopes the feed variant to the viewer's followed authors;
/// the name lists narrow the general variant.
#[derive(Debug, Clone, Default)]
pub struct ArticleFilter {
    pub offset: i64,
    pub limit: i64,
    pub viewer_id: Option<Uuid>,
    pub tags: Vec<String>,
    pub authors: Vec<String>,
    pub favorited_by: Vec<String>,
}

impl ArticleFilter {
    /// Normalize caller-supplied paging: negative offsets are clamped to
    /// zero and a non-positive limit falls back to [`DEFAULT_PAGE_LIMIT`].
    pub fn new(offset: i64, limit: i64) -> Self {
        Self {
            offset: offset.max(0),
            limit: if limit <= 0 { DEFAULT_PAGE_LIMIT } else { limit },
            ..Self::default()
        }
    }

    pub fn with_viewer(mut self, viewer_id: Uuid) -> Self {
        self.viewer_id = Some(viewer_id);
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_authors(mut self, authors: Vec<String>) -> Self {
        self.authors = authors;
        self
    }

    pub fn with_favorited_by(mut self, favorited_by: Vec<String>) -> Self {
        self.favorited_by = favorited_by;
        self
    }
}

/// A bounded slice of matches plus the total match count ignoring
/// pagination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub total: i64,
}

impl<T> PageResult<T> {
    pub fn new(items: Vec<T>, total: i64) -> Self {
        Self { items, total }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl<T> Default for PageResult<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}
