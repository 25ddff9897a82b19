//! Comment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::{Validate, Violations};

/// Comment entity. Author and article never change after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Unique identifier
    pub id: Uuid,
    /// Comment body
    pub body: String,
    /// Commenting user
    pub author_id: Uuid,
    /// Commented article
    pub article_id: Uuid,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Build a candidate comment with a generated id.
    pub fn new(body: String, author_id: Uuid, article_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            body,
            author_id,
            article_id,
            created_at: Utc::now(),
        }
    }
}

impl Validate for Comment {
    fn check(&self, errors: &mut Violations) {
        errors.not_blank("body", &self.body);
    }
}

/// Input for creating a comment on an article
#[derive(Debug, Clone)]
pub struct NewCommentInput {
    pub author_id: Uuid,
    pub article_slug: String,
    pub body: String,
}

impl NewCommentInput {
    pub fn new(author_id: Uuid, article_slug: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            author_id,
            article_slug: article_slug.into(),
            body: body.into(),
        }
    }
}

/// Input for deleting a comment; deletion is scoped to the comment's author.
#[derive(Debug, Clone)]
pub struct DeleteCommentInput {
    pub comment_id: Uuid,
    pub author_id: Uuid,
}

impl DeleteCommentInput {
    pub fn new(comment_id: Uuid, author_id: Uuid) -> Self {
        Self {
            comment_id,
            author_id,
        }
    }
}
