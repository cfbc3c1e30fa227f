//! Grading use-cases.
//!
//! # Invariants
//! - Every score change goes through `ScoreRepository::save_score`,
//!   `grade_score` or `delete_score`, so team points are always recomputed.

use crate::model::score::{Score, ScoreId};
use crate::model::task::TaskId;
use crate::model::team::TeamId;
use crate::repo::score_repo::{SavedScore, ScoreRepository};
use crate::repo::RepoResult;

pub struct ScoreService<S: ScoreRepository> {
    repo: S,
}

impl<S: ScoreRepository> ScoreService<S> {
    pub fn new(repo: S) -> Self {
        Self { repo }
    }

    /// Records the graded result of a team's task submission.
    ///
    /// Updates the team's existing score for the task when there is one,
    /// otherwise creates it. Lookup and write share one transaction.
    pub fn grade(&self, team_id: TeamId, task_id: TaskId, value: i64) -> RepoResult<SavedScore> {
        self.repo.grade_score(team_id, task_id, value)
    }

    pub fn save_score(&self, score: &Score) -> RepoResult<SavedScore> {
        self.repo.save_score(score)
    }

    pub fn team_scores(&self, team_id: TeamId) -> RepoResult<Vec<Score>> {
        self.repo.list_scores_for_team(team_id)
    }

    /// Removes one score; returns the team's recomputed points.
    pub fn revoke(&self, score_id: ScoreId) -> RepoResult<i64> {
        self.repo.delete_score(score_id)
    }

    pub fn recompute(&self, team_id: TeamId) -> RepoResult<i64> {
        self.repo.recompute_team_points(team_id)
    }
}
