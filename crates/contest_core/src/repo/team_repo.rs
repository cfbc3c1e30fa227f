//! Team repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist team identity, membership and administrative flags.
//! - Own cascade-on-delete of a team's addresses and scores.
//!
//! # Invariants
//! - `points` is never written here except through score recomputation.
//! - `date_created` is assigned on insert and never updated.
//! - Leader/member/task references are checked before writes.

use super::{
    bool_to_int, ensure_connection_ready, ensure_reference, int_to_bool, parse_optional_uuid,
    parse_uuid, push_pagination, RepoError, RepoResult,
};
use crate::model::task::TaskId;
use crate::model::team::{Team, TeamId};
use crate::model::user::UserId;
use log::info;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};

const TEAM_SELECT_SQL: &str = "SELECT
    id,
    teamname,
    passcode,
    leader_id,
    member_id,
    disqualified,
    points,
    max_task_visible,
    date_created
FROM teams";

/// Sort order for team listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TeamOrder {
    /// Oldest registration first.
    #[default]
    Registration,
    /// Highest points first; ties by registration.
    Points,
}

/// Query options for listing teams.
#[derive(Debug, Clone, Default)]
pub struct TeamListQuery {
    pub exclude_disqualified: bool,
    pub order: TeamOrder,
    pub limit: Option<u32>,
    pub offset: u32,
}

pub trait TeamRepository {
    /// Inserts one team with zero points and returns the stored row.
    fn create_team(&self, team: &Team) -> RepoResult<Team>;
    /// Updates name, passcode, membership and administrative flags.
    ///
    /// `points` and `date_created` in `team` are ignored.
    fn update_team(&self, team: &Team) -> RepoResult<()>;
    fn get_team(&self, id: TeamId) -> RepoResult<Option<Team>>;
    fn find_team_by_passcode(&self, passcode: &str) -> RepoResult<Option<Team>>;
    /// Finds the team a user leads or belongs to.
    ///
    /// The led team wins when the user is also a member elsewhere.
    fn find_team_by_user(&self, user_id: UserId) -> RepoResult<Option<Team>>;
    fn list_teams(&self, query: &TeamListQuery) -> RepoResult<Vec<Team>>;
    fn set_disqualified(&self, id: TeamId, disqualified: bool) -> RepoResult<()>;
    fn set_max_task_visible(&self, id: TeamId, task_id: Option<TaskId>) -> RepoResult<()>;
    /// Deletes a team together with its addresses and scores.
    fn delete_team(&self, id: TeamId) -> RepoResult<()>;
}

pub struct SqliteTeamRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTeamRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl TeamRepository for SqliteTeamRepository<'_> {
    fn create_team(&self, team: &Team) -> RepoResult<Team> {
        team.validate()?;
        ensure_team_references(self.conn, team)?;

        self.conn.execute(
            "INSERT INTO teams (
                id,
                teamname,
                passcode,
                leader_id,
                member_id,
                disqualified,
                points,
                max_task_visible
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7);",
            params![
                team.id.to_string(),
                team.teamname.as_str(),
                team.passcode.as_str(),
                team.leader_id.to_string(),
                team.member_id.map(|value| value.to_string()),
                bool_to_int(team.disqualified),
                team.max_task_visible.map(|value| value.to_string()),
            ],
        )?;
        info!("event=team_create module=repo status=ok team_id={}", team.id);

        load_required_team(self.conn, team.id)
    }

    fn update_team(&self, team: &Team) -> RepoResult<()> {
        team.validate()?;
        ensure_team_references(self.conn, team)?;

        let changed = self.conn.execute(
            "UPDATE teams
             SET
                teamname = ?2,
                passcode = ?3,
                leader_id = ?4,
                member_id = ?5,
                disqualified = ?6,
                max_task_visible = ?7
             WHERE id = ?1;",
            params![
                team.id.to_string(),
                team.teamname.as_str(),
                team.passcode.as_str(),
                team.leader_id.to_string(),
                team.member_id.map(|value| value.to_string()),
                bool_to_int(team.disqualified),
                team.max_task_visible.map(|value| value.to_string()),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "team",
                id: team.id,
            });
        }

        Ok(())
    }

    fn get_team(&self, id: TeamId) -> RepoResult<Option<Team>> {
        get_team_where(self.conn, "id = ?1", &id.to_string())
    }

    fn find_team_by_passcode(&self, passcode: &str) -> RepoResult<Option<Team>> {
        get_team_where(self.conn, "passcode = ?1", passcode)
    }

    fn find_team_by_user(&self, user_id: UserId) -> RepoResult<Option<Team>> {
        get_team_where(
            self.conn,
            "leader_id = ?1 OR member_id = ?1 ORDER BY leader_id = ?1 DESC LIMIT 1",
            &user_id.to_string(),
        )
    }

    fn list_teams(&self, query: &TeamListQuery) -> RepoResult<Vec<Team>> {
        let mut sql = format!("{TEAM_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if query.exclude_disqualified {
            sql.push_str(" AND disqualified = 0");
        }

        match query.order {
            TeamOrder::Registration => sql.push_str(" ORDER BY date_created ASC, rowid ASC"),
            TeamOrder::Points => {
                sql.push_str(" ORDER BY points DESC, date_created ASC, rowid ASC")
            }
        }
        push_pagination(&mut sql, &mut bind_values, query.limit, query.offset);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut teams = Vec::new();
        while let Some(row) = rows.next()? {
            teams.push(parse_team_row(row)?);
        }
        Ok(teams)
    }

    fn set_disqualified(&self, id: TeamId, disqualified: bool) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE teams SET disqualified = ?2 WHERE id = ?1;",
            params![id.to_string(), bool_to_int(disqualified)],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "team", id });
        }
        info!(
            "event=team_disqualify module=repo status=ok team_id={} disqualified={}",
            id, disqualified
        );
        Ok(())
    }

    fn set_max_task_visible(&self, id: TeamId, task_id: Option<TaskId>) -> RepoResult<()> {
        if let Some(task_id) = task_id {
            ensure_reference(self.conn, "tasks", "task", task_id)?;
        }
        let changed = self.conn.execute(
            "UPDATE teams SET max_task_visible = ?2 WHERE id = ?1;",
            params![id.to_string(), task_id.map(|value| value.to_string())],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "team", id });
        }
        Ok(())
    }

    fn delete_team(&self, id: TeamId) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let addresses = count_owned(&tx, "addresses", id)?;
        let scores = count_owned(&tx, "scores", id)?;

        let changed = tx.execute("DELETE FROM teams WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "team", id });
        }
        tx.commit()?;

        info!(
            "event=team_delete module=repo status=ok team_id={} cascaded_addresses={} cascaded_scores={}",
            id, addresses, scores
        );
        Ok(())
    }
}

pub(crate) fn load_required_team(conn: &Connection, id: TeamId) -> RepoResult<Team> {
    get_team_where(conn, "id = ?1", &id.to_string())?
        .ok_or(RepoError::NotFound { entity: "team", id })
}

fn get_team_where(conn: &Connection, predicate: &str, value: &str) -> RepoResult<Option<Team>> {
    let mut stmt = conn.prepare(&format!("{TEAM_SELECT_SQL} WHERE {predicate};"))?;
    let mut rows = stmt.query([value])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_team_row(row)?));
    }
    Ok(None)
}

fn ensure_team_references(conn: &Connection, team: &Team) -> RepoResult<()> {
    for user_id in team.user_ids() {
        ensure_reference(conn, "users", "user", user_id)?;
    }
    if let Some(task_id) = team.max_task_visible {
        ensure_reference(conn, "tasks", "task", task_id)?;
    }
    Ok(())
}

fn count_owned(conn: &Connection, table: &str, team_id: TeamId) -> RepoResult<i64> {
    let count = conn.query_row(
        &format!("SELECT COUNT(*) FROM {table} WHERE team_id = ?1;"),
        [team_id.to_string()],
        |row| row.get(0),
    )?;
    Ok(count)
}

fn parse_team_row(row: &Row<'_>) -> RepoResult<Team> {
    let id_text: String = row.get("id")?;
    let leader_text: String = row.get("leader_id")?;
    Ok(Team {
        id: parse_uuid(&id_text, "teams.id")?,
        teamname: row.get("teamname")?,
        passcode: row.get("passcode")?,
        leader_id: parse_uuid(&leader_text, "teams.leader_id")?,
        member_id: parse_optional_uuid(row.get("member_id")?, "teams.member_id")?,
        disqualified: int_to_bool(row.get("disqualified")?, "teams.disqualified")?,
        points: row.get("points")?,
        max_task_visible: parse_optional_uuid(
            row.get("max_task_visible")?,
            "teams.max_task_visible",
        )?,
        date_created: row.get("date_created")?,
    })
}
