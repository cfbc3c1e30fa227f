//! User repository contract and SQLite implementation.
//!
//! Users are created at registration and edited by the identity
//! collaborator; the store never deletes them.

use super::{ensure_connection_ready, parse_uuid, push_pagination, RepoError, RepoResult};
use crate::model::user::{User, UserId};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const USER_SELECT_SQL: &str = "SELECT
    id,
    username,
    email,
    first_name,
    last_name,
    password_hash,
    phone,
    date_joined
FROM users";

/// Query options for listing users.
#[derive(Debug, Clone, Default)]
pub struct UserListQuery {
    pub limit: Option<u32>,
    pub offset: u32,
}

pub trait UserRepository {
    /// Inserts one user and returns the stored row.
    fn create_user(&self, user: &User) -> RepoResult<User>;
    /// Replaces identity fields of an existing user.
    fn update_user(&self, user: &User) -> RepoResult<()>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    fn find_user_by_phone(&self, phone: &str) -> RepoResult<Option<User>>;
    fn list_users(&self, query: &UserListQuery) -> RepoResult<Vec<User>>;
}

pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, user: &User) -> RepoResult<User> {
        user.validate()?;

        self.conn.execute(
            "INSERT INTO users (
                id,
                username,
                email,
                first_name,
                last_name,
                password_hash,
                phone
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                user.id.to_string(),
                user.username.as_str(),
                user.email.as_str(),
                user.first_name.as_str(),
                user.last_name.as_str(),
                user.password_hash.as_str(),
                user.phone.as_str(),
            ],
        )?;

        self.get_user(user.id)?
            .ok_or_else(|| RepoError::InvalidData(format!("user {} missing after insert", user.id)))
    }

    fn update_user(&self, user: &User) -> RepoResult<()> {
        user.validate()?;

        let changed = self.conn.execute(
            "UPDATE users
             SET
                username = ?2,
                email = ?3,
                first_name = ?4,
                last_name = ?5,
                password_hash = ?6,
                phone = ?7
             WHERE id = ?1;",
            params![
                user.id.to_string(),
                user.username.as_str(),
                user.email.as_str(),
                user.first_name.as_str(),
                user.last_name.as_str(),
                user.password_hash.as_str(),
                user.phone.as_str(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "user",
                id: user.id,
            });
        }

        Ok(())
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_user_row(row)?));
        }
        Ok(None)
    }

    fn find_user_by_phone(&self, phone: &str) -> RepoResult<Option<User>> {
        let id: Option<String> = self
            .conn
            .query_row("SELECT id FROM users WHERE phone = ?1;", [phone], |row| {
                row.get(0)
            })
            .optional()?;
        match id {
            Some(text) => self.get_user(parse_uuid(&text, "users.id")?),
            None => Ok(None),
        }
    }

    fn list_users(&self, query: &UserListQuery) -> RepoResult<Vec<User>> {
        let mut sql = format!("{USER_SELECT_SQL} ORDER BY date_joined ASC, rowid ASC");
        let mut bind_values: Vec<Value> = Vec::new();
        push_pagination(&mut sql, &mut bind_values, query.limit, query.offset);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut users = Vec::new();
        while let Some(row) = rows.next()? {
            users.push(parse_user_row(row)?);
        }
        Ok(users)
    }
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    let id_text: String = row.get("id")?;
    Ok(User {
        id: parse_uuid(&id_text, "users.id")?,
        username: row.get("username")?,
        email: row.get("email")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        password_hash: row.get("password_hash")?,
        phone: row.get("phone")?,
        date_joined: row.get("date_joined")?,
    })
}
