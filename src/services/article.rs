//! Article service
//!
//! Publishing lifecycle plus the favorite relationship. Creation resolves
//! the author, derives a unique slug, persists the article and then
//! attaches its tags. Updates ignore blank fields and skip the write
//! entirely when every field is blank; a changed title regenerates the
//! slug. Deletion is scoped to the author, so deleting someone else's
//! article surfaces as `ArticleNotFound`.

use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use uuid::Uuid;

use crate::db::repositories::{ArticleRepository, FavoriteRepository};
use crate::error::DomainError;
use crate::models::{
    Article, ArticleFilter, FavoriteRelationship, NewArticleInput, PageResult, UpdateArticleInput,
};
use crate::services::slug::SlugService;
use crate::services::tag::{TagRelationshipService, TagService};
use crate::services::user::UserService;
use crate::validation::validate;

/// Article lifecycle and favorite operations
#[derive(Clone)]
pub struct ArticleService {
    articles: Arc<dyn ArticleRepository>,
    favorites: Arc<dyn FavoriteRepository>,
    users: UserService,
    slugs: SlugService,
    tags: TagService,
    tag_relationships: TagRelationshipService,
}

impl ArticleService {
    pub fn new(
        articles: Arc<dyn ArticleRepository>,
        favorites: Arc<dyn FavoriteRepository>,
        users: UserService,
        slugs: SlugService,
        tags: TagService,
        tag_relationships: TagRelationshipService,
    ) -> Self {
        Self {
            articles,
            favorites,
            users,
            slugs,
            tags,
            tag_relationships,
        }
    }

    /// Publish an article and attach its tags.
    pub async fn create(&self, input: NewArticleInput) -> Result<Article, DomainError> {
        let author = self.users.find_by_id(input.author_id).await?;
        let slug = self.slugs.create_by_title(&input.title).await?;

        let article = validate(Article::new(
            slug,
            input.title,
            input.description,
            input.body,
            author.id,
        ))?;
        self.articles
            .create(&article)
            .await
            .context("Failed to create article")?;

        let tags = self
            .tags
            .find_by_name_create_if_not_exists(&input.tag_list)
            .await?;
        self.tag_relationships
            .create_tag_relationships(&article, &tags)
            .await?;

        tracing::info!(slug = %article.slug, "article published");
        Ok(article)
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Article, DomainError> {
        self.articles
            .find_by_slug(slug)
            .await
            .context("Failed to find article by slug")?
            .ok_or(DomainError::ArticleNotFound)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Article, DomainError> {
        self.articles
            .find_by_id(id)
            .await
            .context("Failed to find article by id")?
            .ok_or(DomainError::ArticleNotFound)
    }

    pub async fn find_by_author_and_slug(
        &self,
        author_id: Uuid,
        slug: &str,
    ) -> Result<Article, DomainError> {
        self.articles
            .find_by_author_and_slug(author_id, slug)
            .await
            .context("Failed to find article by author and slug")?
            .ok_or(DomainError::ArticleNotFound)
    }

    /// Apply a partial update addressed by slug.
    ///
    /// Blank fields are ignored. When all fields are blank the stored
    /// article is returned untouched without a write. A non-blank title
    /// regenerates the slug through the usual uniqueness path.
    pub async fn update_by_slug(&self, input: UpdateArticleInput) -> Result<Article, DomainError> {
        let mut article = self.find_by_slug(&input.slug).await?;

        let title = non_blank(&input.title);
        let description = non_blank(&input.description);
        let body = non_blank(&input.body);

        if title.is_none() && description.is_none() && body.is_none() {
            return Ok(article);
        }

        if let Some(title) = title {
            article.slug = self.slugs.create_by_title(title).await?;
            article.title = title.to_string();
        }
        if let Some(description) = description {
            article.description = description.to_string();
        }
        if let Some(body) = body {
            article.body = body.to_string();
        }

        article.updated_at = Utc::now();
        let article = validate(article)?;
        self.articles
            .update(&article)
            .await
            .context("Failed to update article")?;

        Ok(article)
    }

    /// Delete the author's article. Someone else's slug is indistinguishable
    /// from a missing one.
    pub async fn delete_by_slug(&self, author_id: Uuid, slug: &str) -> Result<(), DomainError> {
        let article = self.find_by_author_and_slug(author_id, slug).await?;
        self.articles
            .delete(article.id)
            .await
            .context("Failed to delete article")?;

        tracing::info!(slug, "article deleted");
        Ok(())
    }

    /// Mark the article as a favorite of `user_id`.
    ///
    /// Favoriting twice returns the existing relationship unchanged.
    pub async fn favorite(
        &self,
        article_slug: &str,
        user_id: Uuid,
    ) -> Result<FavoriteRelationship, DomainError> {
        let article = self.find_by_slug(article_slug).await?;

        if let Some(existing) = self
            .favorites
            .find_by_article_and_user(article.id, user_id)
            .await
            .context("Failed to find favorite")?
        {
            return Ok(existing);
        }

        let user = self.users.find_by_id(user_id).await?;
        let favorite = FavoriteRelationship::new(user.id, article.id);
        self.favorites
            .create(&favorite)
            .await
            .context("Failed to create favorite")?;

        Ok(favorite)
    }

    /// Remove the favorite if present; absence is a no-op.
    pub async fn unfavorite(&self, article_slug: &str, user_id: Uuid) -> Result<(), DomainError> {
        let article = self.find_by_slug(article_slug).await?;
        self.favorites
            .delete(article.id, user_id)
            .await
            .context("Failed to delete favorite")?;

        Ok(())
    }

    /// Number of users that favorited the article.
    pub async fn favorites_count(&self, article_id: Uuid) -> Result<i64, DomainError> {
        let article = self.find_by_id(article_id).await?;
        self.favorites
            .count_by_article(article.id)
            .await
            .context("Failed to count favorites")
            .map_err(Into::into)
    }

    pub async fn is_article_favorited(
        &self,
        article: &Article,
        user_id: Uuid,
    ) -> Result<bool, DomainError> {
        self.favorites
            .is_favorited(article.id, user_id)
            .await
            .context("Failed to check favorite")
            .map_err(Into::into)
    }

    /// Articles matching the tag, author and favorited-by name filters,
    /// most recent first.
    pub async fn find_by_filter(
        &self,
        filter: ArticleFilter,
    ) -> Result<PageResult<Article>, DomainError> {
        self.articles
            .find_by_filter(&filter)
            .await
            .context("Failed to query articles")
            .map_err(Into::into)
    }

    /// Feed: articles authored by users the viewer follows, most recent
    /// first.
    pub async fn find_most_recent_by_filter(
        &self,
        filter: ArticleFilter,
    ) -> Result<PageResult<Article>, DomainError> {
        self.articles
            .find_most_recent_by_filter(&filter)
            .await
            .context("Failed to query feed")
            .map_err(Into::into)
    }
}

fn non_blank(field: &Option<String>) -> Option<&str> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
