//! Tag model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::{Validate, Violations};

/// Tag entity. Names are unique case-insensitively; tags are shared across
/// articles and created lazily on first use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    /// Unique identifier
    pub id: Uuid,
    /// Tag name
    pub name: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Tag {
    /// Build a candidate tag with a generated id.
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            created_at: Utc::now(),
        }
    }
}

impl Validate for Tag {
    fn check(&self, errors: &mut Violations) {
        errors.not_blank("name", &self.name);
        errors.max_len("name", &self.name, 100);
    }
}
