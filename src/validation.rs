//! Model validation
//!
//! Field-constraint gate run before any entity is persisted. Each entity
//! declares its constraints by implementing [`Validate`]; [`validate`]
//! collects every violation in declaration order and fails with the full
//! list, so callers see all problems at once rather than the first one.

use std::fmt;

/// Aggregated field-constraint violations, in declaration order.
#[derive(Debug, Clone, thiserror::Error)]
pub struct ModelValidationError {
    pub messages: Vec<String>,
}

impl ModelValidationError {
    pub fn new(messages: Vec<String>) -> Self {
        Self { messages }
    }
}

impl fmt::Display for ModelValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "model validation failed: {}", self.messages.join("; "))
    }
}

/// Implemented by every entity that passes through the validator gate.
pub trait Validate {
    /// Record constraint violations into `errors`.
    fn check(&self, errors: &mut Violations);
}

/// Accumulator handed to [`Validate::check`].
#[derive(Debug, Default)]
pub struct Violations {
    messages: Vec<String>,
}

impl Violations {
    /// Require a non-blank string field.
    pub fn not_blank(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.messages.push(format!("{field} must not be blank"));
        }
    }

    /// Require a maximum character length.
    pub fn max_len(&mut self, field: &str, value: &str, max: usize) {
        if value.chars().count() > max {
            self.messages
                .push(format!("{field} must be at most {max} characters"));
        }
    }

    /// Require a plausible email shape.
    pub fn email(&mut self, field: &str, value: &str) {
        let valid = match value.split_once('@') {
            Some((local, domain)) => !local.is_empty() && domain.contains('.'),
            None => false,
        };
        if !valid {
            self.messages.push(format!("{field} must be a valid email"));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }
}

/// Run all declared constraints on `model`.
///
/// Returns the model unchanged when every constraint holds, otherwise fails
/// with the ordered list of human-readable violation messages.
pub fn validate<T: Validate>(model: T) -> Result<T, ModelValidationError> {
    let mut violations = Violations::default();
    model.check(&mut violations);
    if violations.is_empty() {
        Ok(model)
    } else {
        Err(ModelValidationError::new(violations.into_messages()))
    }
}
