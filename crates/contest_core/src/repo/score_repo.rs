//! Score repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist team scores per task.
//! - Keep `teams.points` equal to the sum of the team's scores.
//!
//! # Invariants
//! - Every score write (create, update, delete) re-aggregates the owning
//!   team's points from all of its score rows inside the same `IMMEDIATE`
//!   transaction, so concurrent writers cannot publish a stale total.
//! - A team with no scores has `points = 0`.
//! - Moving a score to another team recomputes both teams.

use super::{ensure_connection_ready, ensure_reference, parse_uuid, RepoError, RepoResult};
use crate::model::score::{Score, ScoreId};
use crate::model::task::TaskId;
use crate::model::team::TeamId;
use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const SCORE_SELECT_SQL: &str = "SELECT
    id,
    team_id,
    task_id,
    score
FROM scores";

/// Outcome of a score write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedScore {
    pub score: Score,
    /// Owning team's points after recomputation.
    pub team_points: i64,
}

pub trait ScoreRepository {
    /// Creates or updates one score and recomputes the owning team's points.
    fn save_score(&self, score: &Score) -> RepoResult<SavedScore>;
    /// Sets the team's score for a task: updates the earliest stored row
    /// for the pair or creates one, in a single write transaction.
    fn grade_score(&self, team_id: TeamId, task_id: TaskId, value: i64) -> RepoResult<SavedScore>;
    fn get_score(&self, id: ScoreId) -> RepoResult<Option<Score>>;
    /// Returns the earliest stored score of `team_id` for `task_id`.
    fn find_score(&self, team_id: TeamId, task_id: TaskId) -> RepoResult<Option<Score>>;
    fn list_scores_for_team(&self, team_id: TeamId) -> RepoResult<Vec<Score>>;
    /// Deletes one score and returns the owning team's recomputed points.
    fn delete_score(&self, id: ScoreId) -> RepoResult<i64>;
    /// Re-aggregates and stores `points` for one team.
    fn recompute_team_points(&self, team_id: TeamId) -> RepoResult<i64>;
}

pub struct SqliteScoreRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteScoreRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ScoreRepository for SqliteScoreRepository<'_> {
    fn save_score(&self, score: &Score) -> RepoResult<SavedScore> {
        score.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let saved = write_score(&tx, score)?;
        tx.commit()?;
        Ok(saved)
    }

    fn grade_score(&self, team_id: TeamId, task_id: TaskId, value: i64) -> RepoResult<SavedScore> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let score = match first_score(&tx, team_id, task_id)? {
            Some(mut existing) => {
                existing.score = value;
                existing
            }
            None => Score::new(team_id, task_id, value),
        };
        score.validate()?;
        let saved = write_score(&tx, &score)?;
        tx.commit()?;
        Ok(saved)
    }

    fn get_score(&self, id: ScoreId) -> RepoResult<Option<Score>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SCORE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_score_row(row)?));
        }
        Ok(None)
    }

    fn find_score(&self, team_id: TeamId, task_id: TaskId) -> RepoResult<Option<Score>> {
        first_score(self.conn, team_id, task_id)
    }

    fn list_scores_for_team(&self, team_id: TeamId) -> RepoResult<Vec<Score>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SCORE_SELECT_SQL} WHERE team_id = ?1 ORDER BY rowid ASC;"
        ))?;
        let mut rows = stmt.query([team_id.to_string()])?;
        let mut scores = Vec::new();
        while let Some(row) = rows.next()? {
            scores.push(parse_score_row(row)?);
        }
        Ok(scores)
    }

    fn delete_score(&self, id: ScoreId) -> RepoResult<i64> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let team_id = owning_team(&tx, id)?.ok_or(RepoError::NotFound {
            entity: "score",
            id,
        })?;

        tx.execute("DELETE FROM scores WHERE id = ?1;", [id.to_string()])?;
        let team_points = recompute_team_points(&tx, team_id)?;
        tx.commit()?;

        info!(
            "event=score_delete module=repo status=ok score_id={} team_id={} team_points={}",
            id, team_id, team_points
        );
        Ok(team_points)
    }

    fn recompute_team_points(&self, team_id: TeamId) -> RepoResult<i64> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let points = recompute_team_points(&tx, team_id)?;
        tx.commit()?;
        Ok(points)
    }
}

/// Stores `SUM(score)` over every score of `team_id` into `teams.points`.
///
/// Callers must hold a write transaction.
///
/// # Errors
/// - `RepoError::ReferenceError` when the team does not exist.
pub(crate) fn recompute_team_points(conn: &Connection, team_id: TeamId) -> RepoResult<i64> {
    let total: i64 = conn.query_row(
        "SELECT COALESCE(SUM(score), 0) FROM scores WHERE team_id = ?1;",
        [team_id.to_string()],
        |row| row.get(0),
    )?;

    let changed = conn.execute(
        "UPDATE teams SET points = ?2 WHERE id = ?1;",
        params![team_id.to_string(), total],
    )?;
    if changed == 0 {
        return Err(RepoError::missing("team", team_id));
    }

    debug!(
        "event=team_points_recompute module=repo status=ok team_id={} points={}",
        team_id, total
    );
    Ok(total)
}

/// Inserts or updates `score` and recomputes every team it touches.
///
/// Callers must hold a write transaction.
fn write_score(conn: &Connection, score: &Score) -> RepoResult<SavedScore> {
    ensure_reference(conn, "teams", "team", score.team_id)?;
    ensure_reference(conn, "tasks", "task", score.task_id)?;

    let previous_team = owning_team(conn, score.id)?;
    match previous_team {
        Some(_) => {
            conn.execute(
                "UPDATE scores
                 SET
                    team_id = ?2,
                    task_id = ?3,
                    score = ?4
                 WHERE id = ?1;",
                params![
                    score.id.to_string(),
                    score.team_id.to_string(),
                    score.task_id.to_string(),
                    score.score,
                ],
            )?;
        }
        None => {
            conn.execute(
                "INSERT INTO scores (id, team_id, task_id, score)
                 VALUES (?1, ?2, ?3, ?4);",
                params![
                    score.id.to_string(),
                    score.team_id.to_string(),
                    score.task_id.to_string(),
                    score.score,
                ],
            )?;
        }
    }

    let team_points = recompute_team_points(conn, score.team_id)?;
    if let Some(previous_team) = previous_team.filter(|team| *team != score.team_id) {
        recompute_team_points(conn, previous_team)?;
    }

    info!(
        "event=score_save module=repo status=ok score_id={} team_id={} mode={} team_points={}",
        score.id,
        score.team_id,
        if previous_team.is_some() { "update" } else { "create" },
        team_points
    );

    Ok(SavedScore {
        score: score.clone(),
        team_points,
    })
}

fn first_score(conn: &Connection, team_id: TeamId, task_id: TaskId) -> RepoResult<Option<Score>> {
    let mut stmt = conn.prepare(&format!(
        "{SCORE_SELECT_SQL}
         WHERE team_id = ?1
           AND task_id = ?2
         ORDER BY rowid ASC
         LIMIT 1;"
    ))?;
    let mut rows = stmt.query(params![team_id.to_string(), task_id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_score_row(row)?));
    }
    Ok(None)
}

fn owning_team(conn: &Connection, score_id: ScoreId) -> RepoResult<Option<TeamId>> {
    let team: Option<String> = conn
        .query_row(
            "SELECT team_id FROM scores WHERE id = ?1;",
            [score_id.to_string()],
            |row| row.get(0),
        )
        .optional()?;
    team.map(|text| parse_uuid(&text, "scores.team_id"))
        .transpose()
}

fn parse_score_row(row: &Row<'_>) -> RepoResult<Score> {
    let id_text: String = row.get("id")?;
    let team_text: String = row.get("team_id")?;
    let task_text: String = row.get("task_id")?;
    Ok(Score {
        id: parse_uuid(&id_text, "scores.id")?,
        team_id: parse_uuid(&team_text, "scores.team_id")?,
        task_id: parse_uuid(&task_text, "scores.task_id")?,
        score: row.get("score")?,
    })
}
