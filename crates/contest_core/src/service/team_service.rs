//! Team registration and administration use-cases.
//!
//! # Responsibility
//! - Register teams with a generated, unique passcode.
//! - Provide leaderboard and task-visibility projections.
//!
//! # Invariants
//! - Generated passcodes are 6 uppercase ASCII letters/digits.
//! - Disqualified teams never appear on the leaderboard.

use crate::model::task::{Task, TaskId};
use crate::model::team::{Team, TeamId, PASSCODE_LEN};
use crate::model::user::UserId;
use crate::repo::task_repo::{TaskListQuery, TaskRepository};
use crate::repo::team_repo::{TeamListQuery, TeamOrder, TeamRepository};
use crate::repo::RepoError;
use log::{info, warn};
use rand::Rng;
use thiserror::Error;

const PASSCODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const PASSCODE_ATTEMPTS: u32 = 8;

#[derive(Debug, Error)]
pub enum TeamServiceError {
    #[error("team not found: {0}")]
    TeamNotFound(TeamId),
    #[error("could not generate a unique passcode after {attempts} attempts")]
    PasscodeExhausted { attempts: u32 },
    #[error(transparent)]
    Repo(#[from] RepoError),
}

pub type TeamServiceResult<T> = Result<T, TeamServiceError>;

pub struct TeamService<T: TeamRepository, K: TaskRepository> {
    teams: T,
    tasks: K,
}

impl<T: TeamRepository, K: TaskRepository> TeamService<T, K> {
    pub fn new(teams: T, tasks: K) -> Self {
        Self { teams, tasks }
    }

    /// Registers a team and assigns it a fresh passcode.
    ///
    /// # Errors
    /// - `Repo(UniquenessViolation)` for a taken name or an already bound
    ///   leader/member.
    /// - `PasscodeExhausted` when every generated passcode collided.
    pub fn register_team(
        &self,
        teamname: &str,
        leader_id: UserId,
        member_id: Option<UserId>,
    ) -> TeamServiceResult<Team> {
        let mut rng = rand::rng();
        for attempt in 1..=PASSCODE_ATTEMPTS {
            let passcode = generate_passcode(&mut rng);
            if self.teams.find_team_by_passcode(&passcode)?.is_some() {
                continue;
            }

            let mut team = Team::new(teamname.trim(), passcode, leader_id);
            team.member_id = member_id;
            match self.teams.create_team(&team) {
                Ok(created) => {
                    info!(
                        "event=team_register module=service status=ok team_id={} attempts={}",
                        created.id, attempt
                    );
                    return Ok(created);
                }
                Err(RepoError::UniquenessViolation { constraint })
                    if constraint == "teams.passcode" =>
                {
                    continue;
                }
                Err(err) => return Err(err.into()),
            }
        }

        warn!(
            "event=team_register module=service status=error error_code=passcode_exhausted attempts={}",
            PASSCODE_ATTEMPTS
        );
        Err(TeamServiceError::PasscodeExhausted {
            attempts: PASSCODE_ATTEMPTS,
        })
    }

    pub fn get_team(&self, team_id: TeamId) -> TeamServiceResult<Team> {
        self.teams
            .get_team(team_id)?
            .ok_or(TeamServiceError::TeamNotFound(team_id))
    }

    pub fn login(&self, passcode: &str) -> TeamServiceResult<Option<Team>> {
        Ok(self.teams.find_team_by_passcode(passcode.trim())?)
    }

    /// Eligible teams ordered by points, best first.
    pub fn leaderboard(&self, limit: Option<u32>) -> TeamServiceResult<Vec<Team>> {
        let query = TeamListQuery {
            exclude_disqualified: true,
            order: TeamOrder::Points,
            limit,
            offset: 0,
        };
        Ok(self.teams.list_teams(&query)?)
    }

    pub fn disqualify(&self, team_id: TeamId) -> TeamServiceResult<()> {
        Ok(self.teams.set_disqualified(team_id, true)?)
    }

    pub fn reinstate(&self, team_id: TeamId) -> TeamServiceResult<()> {
        Ok(self.teams.set_disqualified(team_id, false)?)
    }

    /// Makes `task_id` the highest task visible to the team.
    pub fn unlock_task(&self, team_id: TeamId, task_id: TaskId) -> TeamServiceResult<()> {
        Ok(self.teams.set_max_task_visible(team_id, Some(task_id))?)
    }

    /// Tasks visible to the team: every task due no later than its
    /// max-visible task. Empty when nothing has been unlocked.
    pub fn visible_tasks(&self, team_id: TeamId) -> TeamServiceResult<Vec<Task>> {
        let team = self.get_team(team_id)?;
        let Some(max_task_id) = team.max_task_visible else {
            return Ok(Vec::new());
        };
        let Some(max_task) = self.tasks.get_task(max_task_id)? else {
            return Ok(Vec::new());
        };

        let query = TaskListQuery {
            due_by: Some(max_task.deadline),
            ..TaskListQuery::default()
        };
        Ok(self.tasks.list_tasks(&query)?)
    }
}

/// Draws one passcode of `PASSCODE_LEN` characters from `rng`.
pub fn generate_passcode<R: Rng>(rng: &mut R) -> String {
    (0..PASSCODE_LEN)
        .map(|_| char::from(PASSCODE_CHARSET[rng.random_range(0..PASSCODE_CHARSET.len())]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::generate_passcode;
    use crate::model::is_valid_passcode;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn generated_passcodes_are_valid_and_uppercase() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let passcode = generate_passcode(&mut rng);
            assert!(is_valid_passcode(&passcode), "bad passcode {passcode}");
            assert_eq!(passcode, passcode.to_ascii_uppercase());
        }
    }
}
