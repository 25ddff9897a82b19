//! Comment service
//!
//! Comments hang off an article addressed by slug. Deletion is scoped to
//! the comment's author; a comment id belonging to someone else surfaces
//! as `CommentNotFound`.

use std::sync::Arc;

use anyhow::Context;

use crate::db::repositories::CommentRepository;
use crate::error::DomainError;
use crate::models::{Comment, DeleteCommentInput, NewCommentInput};
use crate::services::article::ArticleService;
use crate::services::user::UserService;
use crate::validation::validate;

/// Comment lifecycle operations
#[derive(Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    articles: ArticleService,
    users: UserService,
}

impl CommentService {
    pub fn new(
        comments: Arc<dyn CommentRepository>,
        articles: ArticleService,
        users: UserService,
    ) -> Self {
        Self {
            comments,
            articles,
            users,
        }
    }

    /// Post a comment on the article addressed by slug.
    pub async fn create(&self, input: NewCommentInput) -> Result<Comment, DomainError> {
        let author = self.users.find_by_id(input.author_id).await?;
        let article = self.articles.find_by_slug(&input.article_slug).await?;

        let comment = validate(Comment::new(input.body, author.id, article.id))?;
        self.comments
            .create(&comment)
            .await
            .context("Failed to create comment")?;

        Ok(comment)
    }

    /// Delete the author's own comment.
    pub async fn delete(&self, input: DeleteCommentInput) -> Result<(), DomainError> {
        let comment = self
            .comments
            .find_by_id_and_author(input.comment_id, input.author_id)
            .await
            .context("Failed to find comment")?
            .ok_or(DomainError::CommentNotFound)?;

        self.comments
            .delete(comment.id)
            .await
            .context("Failed to delete comment")?;

        Ok(())
    }

    /// Comments on the article addressed by slug, oldest first.
    pub async fn find_by_article_slug(&self, slug: &str) -> Result<Vec<Comment>, DomainError> {
        let article = self.articles.find_by_slug(slug).await?;
        self.comments
            .find_by_article(article.id)
            .await
            .context("Failed to find comments")
            .map_err(Into::into)
    }
}
