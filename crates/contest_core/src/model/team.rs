//! Team model.
//!
//! # Responsibility
//! - Describe a competing unit: one leader, at most one extra member.
//!
//! # Invariants
//! - `teamname` and `passcode` are unique (enforced by storage).
//! - A user leads at most one team and is member of at most one team.
//! - `points` equals the sum of the team's scores; only the score write path
//!   updates it.
//! - `date_created` is set once by storage.

use super::task::TaskId;
use super::user::UserId;
use super::{is_valid_passcode, require_id, require_text, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type TeamId = Uuid;

pub const TEAMNAME_MAX_CHARS: usize = 30;
pub const PASSCODE_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub teamname: String,
    pub passcode: String,
    pub leader_id: UserId,
    pub member_id: Option<UserId>,
    pub disqualified: bool,
    pub points: i64,
    /// Highest task currently unlocked for this team.
    pub max_task_visible: Option<TaskId>,
    /// Epoch milliseconds, assigned by storage on insert.
    pub date_created: i64,
}

impl Team {
    /// Creates a solo team with zero points and no visible task.
    pub fn new(
        teamname: impl Into<String>,
        passcode: impl Into<String>,
        leader_id: UserId,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            teamname: teamname.into(),
            passcode: passcode.into(),
            leader_id,
            member_id: None,
            disqualified: false,
            points: 0,
            max_task_visible: None,
            date_created: 0,
        }
    }

    pub fn with_member(mut self, member_id: UserId) -> Self {
        self.member_id = Some(member_id);
        self
    }

    /// Leader first, then member when present.
    pub fn user_ids(&self) -> impl Iterator<Item = UserId> + '_ {
        std::iter::once(self.leader_id).chain(self.member_id)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_id("team.id", self.id)?;
        require_id("team.leader_id", self.leader_id)?;
        require_text("teamname", &self.teamname, TEAMNAME_MAX_CHARS)?;
        if !is_valid_passcode(&self.passcode) {
            return Err(ValidationError::InvalidPasscode(self.passcode.clone()));
        }
        if let Some(member_id) = self.member_id {
            require_id("team.member_id", member_id)?;
            if member_id == self.leader_id {
                return Err(ValidationError::LeaderIsMember(member_id));
            }
        }
        if let Some(task_id) = self.max_task_visible {
            require_id("team.max_task_visible", task_id)?;
        }
        Ok(())
    }
}

impl Display for Team {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.teamname)
    }
}
