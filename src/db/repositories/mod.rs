//! Repositories
//!
//! One trait per aggregate defining the data-access contract the service
//! layer consumes, plus the SQLx implementation. Services hold the traits
//! as `Arc<dyn …>`, so storage can be swapped without touching business
//! rules.

pub mod article;
pub mod comment;
pub mod favorite;
pub mod follow;
pub mod tag;
pub mod user;

pub use article::{ArticleRepository, SqlxArticleRepository};
pub use comment::{CommentRepository, SqlxCommentRepository};
pub use favorite::{FavoriteRepository, SqlxFavoriteRepository};
pub use follow::{FollowRepository, SqlxFollowRepository};
pub use tag::{SqlxTagRelationshipRepository, SqlxTagRepository, TagRelationshipRepository, TagRepository};
pub use user::{SqlxUserRepository, UserRepository};
