//! Tag services
//!
//! `TagService` resolves tag names to tag rows, creating the missing ones
//! lazily. Name matching ignores case, so "Rust" and "rust" resolve to the
//! same row. `TagRelationshipService` attaches resolved tags to articles.

use std::sync::Arc;

use anyhow::Context;

use crate::db::repositories::{TagRelationshipRepository, TagRepository};
use crate::error::DomainError;
use crate::models::{Article, Tag, TagRelationship};
use crate::validation::validate;

/// Tag lookup and lazy creation
#[derive(Clone)]
pub struct TagService {
    tags: Arc<dyn TagRepository>,
    relationships: Arc<dyn TagRelationshipRepository>,
}

impl TagService {
    pub fn new(
        tags: Arc<dyn TagRepository>,
        relationships: Arc<dyn TagRelationshipRepository>,
    ) -> Self {
        Self {
            tags,
            relationships,
        }
    }

    /// Resolve `names` to tags, creating the ones that do not exist yet.
    ///
    /// Returns the full resolved set: existing rows keep their stored
    /// spelling, new rows take the caller's spelling. Duplicate names in
    /// one request, case variants included, resolve to a single tag.
    pub async fn find_by_name_create_if_not_exists(
        &self,
        names: &[String],
    ) -> Result<Vec<Tag>, DomainError> {
        let mut tags = self
            .tags
            .find_by_names(names)
            .await
            .context("Failed to look up tags")?;

        for name in names {
            // Checked against the set so far, so a later duplicate of a
            // just-created name is not created again
            if tags.iter().any(|tag| tag.name.eq_ignore_ascii_case(name)) {
                continue;
            }
            tags.push(self.create(name).await?);
        }

        Ok(tags)
    }

    /// Create a tag after running the validator gate.
    pub async fn create(&self, name: &str) -> Result<Tag, DomainError> {
        let tag = validate(Tag::new(name.to_string()))?;
        self.tags
            .create(&tag)
            .await
            .context("Failed to create tag")?;

        Ok(tag)
    }

    /// Tags attached to an article, ordered by name.
    pub async fn find_article_tags(&self, article: &Article) -> Result<Vec<Tag>, DomainError> {
        self.relationships
            .find_article_tags(article.id)
            .await
            .context("Failed to find article tags")
            .map_err(Into::into)
    }

    /// All known tags, ordered by name.
    pub async fn find_all(&self) -> Result<Vec<Tag>, DomainError> {
        self.tags
            .find_all()
            .await
            .context("Failed to list tags")
            .map_err(Into::into)
    }
}

/// Article-tag association writes
#[derive(Clone)]
pub struct TagRelationshipService {
    relationships: Arc<dyn TagRelationshipRepository>,
}

impl TagRelationshipService {
    pub fn new(relationships: Arc<dyn TagRelationshipRepository>) -> Self {
        Self { relationships }
    }

    /// Attach each tag to the article. Pair uniqueness is enforced by the
    /// storage layer.
    pub async fn create_tag_relationships(
        &self,
        article: &Article,
        tags: &[Tag],
    ) -> Result<(), DomainError> {
        for tag in tags {
            self.relationships
                .create(&TagRelationship::new(article.id, tag.id))
                .await
                .context("Failed to create tag relationship")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{
        ArticleRepository, SqlxArticleRepository, SqlxTagRelationshipRepository, SqlxTagRepository,
        SqlxUserRepository, UserRepository,
    };
    use crate::db::{create_test_pool, migrations};
    use crate::models::User;
    use sqlx::SqlitePool;

    async fn setup() -> (SqlitePool, TagService, TagRelationshipService) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let tags = SqlxTagRepository::boxed(pool.clone());
        let relationships = SqlxTagRelationshipRepository::boxed(pool.clone());
        (
            pool,
            TagService::new(tags, relationships.clone()),
            TagRelationshipService::new(relationships),
        )
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let (_pool, service, _rels) = setup().await;
        let result = service.create("   ").await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_find_or_create_creates_missing_tags() {
        let (_pool, service, _rels) = setup().await;

        let tags = service
            .find_by_name_create_if_not_exists(&["go".to_string(), "systems".to_string()])
            .await
            .expect("Failed to resolve tags");

        assert_eq!(tags.len(), 2);
        let all = service.find_all().await.expect("Failed to list tags");
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_find_or_create_reuses_existing_any_case() {
        let (_pool, service, _rels) = setup().await;

        let first = service.create("Rust").await.expect("Failed to create tag");

        let resolved = service
            .find_by_name_create_if_not_exists(&["rust".to_string(), "RUST".to_string()])
            .await
            .expect("Failed to resolve tags");

        // Both spellings resolve to the one existing row
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].id, first.id);
        assert_eq!(resolved[0].name, "Rust");

        let all = service.find_all().await.expect("Failed to list tags");
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_find_or_create_dedupes_names_within_one_request() {
        let (_pool, service, _rels) = setup().await;

        let resolved = service
            .find_by_name_create_if_not_exists(&[
                "rust".to_string(),
                "Rust".to_string(),
                "RUST".to_string(),
            ])
            .await
            .expect("Failed to resolve tags");

        // First spelling creates the row, the variants reuse it
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].name, "rust");

        let all = service.find_all().await.expect("Failed to list tags");
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_find_or_create_mixes_existing_and_new() {
        let (_pool, service, _rels) = setup().await;

        service.create("go").await.expect("Failed to create tag");

        let resolved = service
            .find_by_name_create_if_not_exists(&["GO".to_string(), "zig".to_string()])
            .await
            .expect("Failed to resolve tags");

        assert_eq!(resolved.len(), 2);
        let names: Vec<&str> = resolved.iter().map(|t| t.name.as_str()).collect();
        assert!(names.contains(&"go"));
        assert!(names.contains(&"zig"));
    }

    #[tokio::test]
    async fn test_create_tag_relationships_and_find_article_tags() {
        let (pool, service, rels) = setup().await;

        let users = SqlxUserRepository::new(pool.clone());
        let articles = SqlxArticleRepository::new(pool);

        let author = User::new(
            "alice".to_string(),
            "alice@example.com".to_string(),
            "hash".to_string(),
        );
        users.create(&author).await.expect("Failed to create user");

        let article = Article::new(
            "hello".to_string(),
            "Hello".to_string(),
            "d".to_string(),
            "b".to_string(),
            author.id,
        );
        articles.create(&article).await.expect("Failed to create article");

        let tags = service
            .find_by_name_create_if_not_exists(&["systems".to_string(), "go".to_string()])
            .await
            .expect("Failed to resolve tags");
        rels.create_tag_relationships(&article, &tags)
            .await
            .expect("Failed to attach tags");

        let attached = service
            .find_article_tags(&article)
            .await
            .expect("Failed to find article tags");
        let names: Vec<&str> = attached.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["go", "systems"]);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(16))]

            /// Resolving the same name repeatedly always yields the same
            /// tag row, regardless of the casing used on each call.
            #[test]
            fn find_or_create_is_idempotent(name in "[a-zA-Z][a-zA-Z0-9]{2,15}", calls in 2..6usize) {
                let rt = tokio::runtime::Runtime::new().unwrap();
                rt.block_on(async {
                    let (_pool, service, _rels) = setup().await;

                    let mut ids = Vec::new();
                    for i in 0..calls {
                        let spelled = if i % 2 == 0 {
                            name.to_uppercase()
                        } else {
                            name.to_lowercase()
                        };
                        let tags = service
                            .find_by_name_create_if_not_exists(&[spelled])
                            .await
                            .expect("resolve should succeed");
                        assert_eq!(tags.len(), 1);
                        ids.push(tags[0].id);
                    }

                    assert!(ids.windows(2).all(|w| w[0] == w[1]));

                    let all = service.find_all().await.expect("list should succeed");
                    assert_eq!(all.len(), 1);
                });
            }
        }
    }
}
