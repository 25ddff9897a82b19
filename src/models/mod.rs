//! Data models
//!
//! Entities, the relationship records between them, and the plain input
//! value objects the service layer accepts from its caller.

mod article;
mod comment;
mod relationship;
mod tag;
mod user;

pub use article::{Article, ArticleFilter, NewArticleInput, PageResult, UpdateArticleInput, DEFAULT_PAGE_LIMIT};
pub use comment::{Comment, DeleteCommentInput, NewCommentInput};
pub use relationship::{FavoriteRelationship, FollowRelationship, TagRelationship};
pub use tag::Tag;
pub use user::{CreateUserInput, LoginUserInput, UpdateUserInput, User};
