//! Contest task model.

use super::{is_valid_url, require_id, require_text, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type TaskId = Uuid;

pub const TITLE_MAX_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    /// Maximum points awarded for this task.
    pub points: i64,
    /// Epoch milliseconds.
    pub deadline: i64,
    pub submission_link: String,
    /// Epoch milliseconds, assigned by storage on insert.
    pub date_created: i64,
}

impl Task {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        points: i64,
        deadline: i64,
        submission_link: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            points,
            deadline,
            submission_link: submission_link.into(),
            date_created: 0,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_id("task.id", self.id)?;
        require_text("title", &self.title, TITLE_MAX_CHARS)?;
        require_text("description", &self.description, usize::MAX)?;
        if !is_valid_url(&self.submission_link) {
            return Err(ValidationError::InvalidUrl(self.submission_link.clone()));
        }
        Ok(())
    }
}

impl Display for Task {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.id, self.title)
    }
}
