//! Contest participant model.
//!
//! # Invariants
//! - `phone` is unique across users (enforced by storage).
//! - Identity fields other than `phone` belong to the identity collaborator;
//!   this crate only stores them.

use super::{limit_text, require_id, require_text, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type UserId = Uuid;

pub const PHONE_MAX_CHARS: usize = 20;
pub const USERNAME_MAX_CHARS: usize = 150;
pub const NAME_MAX_CHARS: usize = 150;
pub const EMAIL_MAX_CHARS: usize = 254;

/// A registered participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Opaque credential produced by the identity collaborator.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub phone: String,
    /// Epoch milliseconds, assigned by storage on insert.
    pub date_joined: i64,
}

impl User {
    pub fn new(username: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            password_hash: String::new(),
            phone: phone.into(),
            date_joined: 0,
        }
    }

    /// `first_name last_name`, trimmed; empty when neither is set.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_id("user.id", self.id)?;
        require_text("username", &self.username, USERNAME_MAX_CHARS)?;
        require_text("phone", &self.phone, PHONE_MAX_CHARS)?;
        limit_text("email", &self.email, EMAIL_MAX_CHARS)?;
        limit_text("first_name", &self.first_name, NAME_MAX_CHARS)?;
        limit_text("last_name", &self.last_name, NAME_MAX_CHARS)?;
        Ok(())
    }
}
