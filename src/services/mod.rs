//! Services
//!
//! Business rules live here, one service per aggregate. Services depend on
//! repository traits only and return `Result<T, DomainError>`; failures are
//! raised at the point of detection and propagate to the caller.

pub mod article;
pub mod comment;
pub mod follow;
pub mod password;
pub mod slug;
pub mod tag;
pub mod user;

pub use article::ArticleService;
pub use comment::CommentService;
pub use follow::FollowService;
pub use slug::SlugService;
pub use tag::{TagRelationshipService, TagService};
pub use user::UserService;
