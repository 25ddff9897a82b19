//! Relationship records
//!
//! The three association rows between entities: article-tag, user-article
//! (favorite) and user-user (follow). Each pair is unique; the storage
//! layer enforces it with composite primary keys.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Article-tag association, created at article-creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagRelationship {
    pub article_id: Uuid,
    pub tag_id: Uuid,
}

impl TagRelationship {
    pub fn new(article_id: Uuid, tag_id: Uuid) -> Self {
        Self { article_id, tag_id }
    }
}

/// A (user, article) pairing marking that the user has favorited the
/// article; the count of these rows is the article's favorite count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteRelationship {
    pub user_id: Uuid,
    pub article_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl FavoriteRelationship {
    pub fn new(user_id: Uuid, article_id: Uuid) -> Self {
        Self {
            user_id,
            article_id,
            created_at: Utc::now(),
        }
    }
}

/// A (follower, followed) pairing between two users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowRelationship {
    pub follower_id: Uuid,
    pub followed_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl FollowRelationship {
    pub fn new(follower_id: Uuid, followed_id: Uuid) -> Self {
        Self {
            follower_id,
            followed_id,
            created_at: Utc::now(),
        }
    }
}
