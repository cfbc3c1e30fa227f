//! Score awarded to one team for one task.
//!
//! Writing a score always refreshes the owning team's `points`; see
//! `repo::score_repo`.

use super::task::TaskId;
use super::team::TeamId;
use super::{require_id, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type ScoreId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub id: ScoreId,
    pub team_id: TeamId,
    pub task_id: TaskId,
    pub score: i64,
}

impl Score {
    pub fn new(team_id: TeamId, task_id: TaskId, score: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            team_id,
            task_id,
            score,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_id("score.id", self.id)?;
        require_id("score.team_id", self.team_id)?;
        require_id("score.task_id", self.task_id)?;
        Ok(())
    }
}
