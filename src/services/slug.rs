//! Slug service
//!
//! Derives URL-safe slugs from article titles. Uniqueness is resolved at
//! generation time: when the slugified title is already taken, a random
//! UUID suffix is appended instead of failing the create.

use std::sync::Arc;

use anyhow::Context;
use uuid::Uuid;

use crate::db::repositories::ArticleRepository;
use crate::error::DomainError;

/// Generates unique article slugs
#[derive(Clone)]
pub struct SlugService {
    articles: Arc<dyn ArticleRepository>,
}

impl SlugService {
    pub fn new(articles: Arc<dyn ArticleRepository>) -> Self {
        Self { articles }
    }

    /// Slugify `title`, appending a UUID suffix when the plain slug is
    /// already in use.
    pub async fn create_by_title(&self, title: &str) -> Result<String, DomainError> {
        let base = slug::slugify(title);
        let taken = self
            .articles
            .exists_by_slug(&base)
            .await
            .context("Failed to check slug")?;

        if !taken {
            return Ok(base);
        }

        Ok(format!("{}-{}", base, Uuid::new_v4()))
    }
}
