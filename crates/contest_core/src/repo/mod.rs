//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define per-entity data access contracts.
//! - Map SQLite constraint failures onto contest error semantics.
//!
//! # Invariants
//! - Write paths call the record's `validate()` before SQL mutations.
//! - Referenced rows are checked before insert/update so callers get a
//!   `ReferenceError` naming the missing entity.
//! - Repositories only accept fully migrated connections.

pub mod address_repo;
pub mod score_repo;
pub mod task_repo;
pub mod team_repo;
pub mod user_repo;

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::ValidationError;
use rusqlite::{ffi, Connection};
use thiserror::Error;
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Error returned by every contest repository.
#[derive(Debug, Error)]
pub enum RepoError {
    /// Duplicate value for a unique column; `constraint` is `table.column`.
    #[error("uniqueness violation on {constraint}")]
    UniquenessViolation { constraint: String },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// A referenced row does not exist at write time.
    #[error("reference error: {0}")]
    ReferenceError(String),
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("invalid persisted data: {0}")]
    InvalidData(String),
    #[error("contest repository requires schema version {expected_version}, got {actual_version}")]
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    #[error("contest repository requires table `{0}`")]
    MissingRequiredTable(&'static str),
}

impl RepoError {
    pub(crate) fn missing(entity: &'static str, id: Uuid) -> Self {
        Self::ReferenceError(format!("{entity} {id} does not exist"))
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(failure, message) = &value {
            match failure.extended_code {
                ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                    return Self::UniquenessViolation {
                        constraint: constraint_target(message.as_deref()),
                    };
                }
                ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                    return Self::ReferenceError(
                        message
                            .clone()
                            .unwrap_or_else(|| "foreign key constraint failed".to_string()),
                    );
                }
                _ => {}
            }
        }
        Self::Db(DbError::Sqlite(value))
    }
}

/// Extracts `table.column` from `UNIQUE constraint failed: table.column`.
fn constraint_target(message: Option<&str>) -> String {
    message
        .and_then(|text| text.rsplit_once(": "))
        .map(|(_, target)| target.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

const REQUIRED_TABLES: [&str; 5] = ["users", "teams", "addresses", "tasks", "scores"];

pub(crate) fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in REQUIRED_TABLES {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

/// Returns whether a row with `id` exists in `table`.
///
/// `table` is always one of the crate's own table names.
pub(crate) fn row_exists(conn: &Connection, table: &str, id: Uuid) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1);"),
        [id.to_string()],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

pub(crate) fn ensure_reference(
    conn: &Connection,
    table: &str,
    entity: &'static str,
    id: Uuid,
) -> RepoResult<()> {
    if row_exists(conn, table, id)? {
        Ok(())
    } else {
        Err(RepoError::missing(entity, id))
    }
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

pub(crate) fn parse_optional_uuid(value: Option<String>, column: &str) -> RepoResult<Option<Uuid>> {
    value.map(|text| parse_uuid(&text, column)).transpose()
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

pub(crate) fn int_to_bool(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}

/// Appends `LIMIT`/`OFFSET` clauses with SQLite's "no limit" form for
/// offset-only pages.
pub(crate) fn push_pagination(
    sql: &mut String,
    bind_values: &mut Vec<rusqlite::types::Value>,
    limit: Option<u32>,
    offset: u32,
) {
    use rusqlite::types::Value;

    if let Some(limit) = limit {
        sql.push_str(" LIMIT ?");
        bind_values.push(Value::Integer(i64::from(limit)));
        if offset > 0 {
            sql.push_str(" OFFSET ?");
            bind_values.push(Value::Integer(i64::from(offset)));
        }
    } else if offset > 0 {
        sql.push_str(" LIMIT -1 OFFSET ?");
        bind_values.push(Value::Integer(i64::from(offset)));
    }
}
