//! Task repository contract and SQLite implementation.
//!
//! # Invariants
//! - Deleting a task removes its scores, clears any team's
//!   `max_task_visible` pointing at it, and recomputes the points of every
//!   team that lost a score, all in one transaction.

use super::score_repo::recompute_team_points;
use super::{ensure_connection_ready, parse_uuid, push_pagination, RepoError, RepoResult};
use crate::model::task::{Task, TaskId};
use crate::model::team::TeamId;
use log::info;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    points,
    deadline,
    submission_link,
    date_created
FROM tasks";

/// Query options for listing tasks, ordered by deadline.
#[derive(Debug, Clone, Default)]
pub struct TaskListQuery {
    /// Only tasks whose deadline is at or before this epoch-ms instant.
    pub due_by: Option<i64>,
    pub limit: Option<u32>,
    pub offset: u32,
}

pub trait TaskRepository {
    fn create_task(&self, task: &Task) -> RepoResult<Task>;
    /// Updates every field except `date_created`.
    fn update_task(&self, task: &Task) -> RepoResult<()>;
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>>;
    fn delete_task(&self, id: TaskId) -> RepoResult<()>;
}

pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, task: &Task) -> RepoResult<Task> {
        task.validate()?;

        self.conn.execute(
            "INSERT INTO tasks (
                id,
                title,
                description,
                points,
                deadline,
                submission_link
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                task.id.to_string(),
                task.title.as_str(),
                task.description.as_str(),
                task.points,
                task.deadline,
                task.submission_link.as_str(),
            ],
        )?;

        self.get_task(task.id)?.ok_or(RepoError::NotFound {
            entity: "task",
            id: task.id,
        })
    }

    fn update_task(&self, task: &Task) -> RepoResult<()> {
        task.validate()?;

        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                title = ?2,
                description = ?3,
                points = ?4,
                deadline = ?5,
                submission_link = ?6
             WHERE id = ?1;",
            params![
                task.id.to_string(),
                task.title.as_str(),
                task.description.as_str(),
                task.points,
                task.deadline,
                task.submission_link.as_str(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "task",
                id: task.id,
            });
        }

        Ok(())
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }
        Ok(None)
    }

    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>> {
        let mut sql = format!("{TASK_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(due_by) = query.due_by {
            sql.push_str(" AND deadline <= ?");
            bind_values.push(Value::Integer(due_by));
        }

        sql.push_str(" ORDER BY deadline ASC, date_created ASC, rowid ASC");
        push_pagination(&mut sql, &mut bind_values, query.limit, query.offset);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let affected_teams = teams_scored_on(&tx, id)?;

        let changed = tx.execute("DELETE FROM tasks WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "task", id });
        }

        for team_id in &affected_teams {
            recompute_team_points(&tx, *team_id)?;
        }
        tx.commit()?;

        info!(
            "event=task_delete module=repo status=ok task_id={} recomputed_teams={}",
            id,
            affected_teams.len()
        );
        Ok(())
    }
}

fn teams_scored_on(conn: &Connection, task_id: TaskId) -> RepoResult<Vec<TeamId>> {
    let mut stmt = conn.prepare("SELECT DISTINCT team_id FROM scores WHERE task_id = ?1;")?;
    let mut rows = stmt.query([task_id.to_string()])?;
    let mut teams = Vec::new();
    while let Some(row) = rows.next()? {
        let text: String = row.get(0)?;
        teams.push(parse_uuid(&text, "scores.team_id")?);
    }
    Ok(teams)
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let id_text: String = row.get("id")?;
    Ok(Task {
        id: parse_uuid(&id_text, "tasks.id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        points: row.get("points")?,
        deadline: row.get("deadline")?,
        submission_link: row.get("submission_link")?,
        date_created: row.get("date_created")?,
    })
}
