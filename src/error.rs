//! Domain error taxonomy
//!
//! Every service operation returns `Result<T, DomainError>`. Failures are
//! raised at the point of detection and propagate unhandled to the caller,
//! which maps each kind to a user-visible outcome. Persistence faults are
//! wrapped as `Internal` and are distinct from domain failures.

use crate::validation::ModelValidationError;

/// Domain failures surfaced by the service layer.
///
/// Ownership-scoped lookups reuse the same not-found kind as plain lookups:
/// callers cannot distinguish "doesn't exist" from "not yours".
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    /// Requested user does not exist
    #[error("user not found")]
    UserNotFound,

    /// Requested article does not exist or does not belong to the actor
    #[error("article not found")]
    ArticleNotFound,

    /// Requested comment does not exist or does not belong to the actor
    #[error("comment not found")]
    CommentNotFound,

    /// Follow relationship does not exist
    #[error("follow relationship not found")]
    FollowNotFound,

    /// Username is already taken
    #[error("username already exists")]
    UsernameAlreadyExists,

    /// Email is already registered
    #[error("email already exists")]
    EmailAlreadyExists,

    /// Login password does not match the stored hash
    #[error("invalid password")]
    InvalidPassword,

    /// Aggregated field-constraint violations
    #[error(transparent)]
    Validation(#[from] ModelValidationError),

    /// Persistence-layer fault
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
