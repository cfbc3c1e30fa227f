//! Address repository contract and SQLite implementation.
//!
//! # Invariants
//! - `state` is written as the canonical `IndianState` display name and
//!   rejected on read when it is not one.
//! - Addresses always belong to an existing team.

use super::{ensure_connection_ready, ensure_reference, parse_uuid, RepoError, RepoResult};
use crate::model::address::{Address, AddressId};
use crate::model::state::IndianState;
use crate::model::team::TeamId;
use rusqlite::{params, Connection, Row};

const ADDRESS_SELECT_SQL: &str = "SELECT
    id,
    team_id,
    line1,
    line2,
    line3,
    city,
    state,
    pincode
FROM addresses";

pub trait AddressRepository {
    fn create_address(&self, address: &Address) -> RepoResult<Address>;
    fn update_address(&self, address: &Address) -> RepoResult<()>;
    fn get_address(&self, id: AddressId) -> RepoResult<Option<Address>>;
    fn list_addresses_for_team(&self, team_id: TeamId) -> RepoResult<Vec<Address>>;
    fn delete_address(&self, id: AddressId) -> RepoResult<()>;
}

pub struct SqliteAddressRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAddressRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl AddressRepository for SqliteAddressRepository<'_> {
    fn create_address(&self, address: &Address) -> RepoResult<Address> {
        address.validate()?;
        ensure_reference(self.conn, "teams", "team", address.team_id)?;

        self.conn.execute(
            "INSERT INTO addresses (
                id,
                team_id,
                line1,
                line2,
                line3,
                city,
                state,
                pincode
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                address.id.to_string(),
                address.team_id.to_string(),
                address.line1.as_str(),
                address.line2.as_str(),
                address.line3.as_str(),
                address.city.as_str(),
                address.state.as_str(),
                address.pincode.as_str(),
            ],
        )?;

        self.get_address(address.id)?.ok_or(RepoError::NotFound {
            entity: "address",
            id: address.id,
        })
    }

    fn update_address(&self, address: &Address) -> RepoResult<()> {
        address.validate()?;
        ensure_reference(self.conn, "teams", "team", address.team_id)?;

        let changed = self.conn.execute(
            "UPDATE addresses
             SET
                team_id = ?2,
                line1 = ?3,
                line2 = ?4,
                line3 = ?5,
                city = ?6,
                state = ?7,
                pincode = ?8
             WHERE id = ?1;",
            params![
                address.id.to_string(),
                address.team_id.to_string(),
                address.line1.as_str(),
                address.line2.as_str(),
                address.line3.as_str(),
                address.city.as_str(),
                address.state.as_str(),
                address.pincode.as_str(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "address",
                id: address.id,
            });
        }
        Ok(())
    }

    fn get_address(&self, id: AddressId) -> RepoResult<Option<Address>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ADDRESS_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_address_row(row)?));
        }
        Ok(None)
    }

    fn list_addresses_for_team(&self, team_id: TeamId) -> RepoResult<Vec<Address>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ADDRESS_SELECT_SQL} WHERE team_id = ?1 ORDER BY rowid ASC;"
        ))?;
        let mut rows = stmt.query([team_id.to_string()])?;
        let mut addresses = Vec::new();
        while let Some(row) = rows.next()? {
            addresses.push(parse_address_row(row)?);
        }
        Ok(addresses)
    }

    fn delete_address(&self, id: AddressId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM addresses WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "address",
                id,
            });
        }
        Ok(())
    }
}

fn parse_address_row(row: &Row<'_>) -> RepoResult<Address> {
    let id_text: String = row.get("id")?;
    let team_text: String = row.get("team_id")?;
    let state_text: String = row.get("state")?;
    let state = state_text.parse::<IndianState>().map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid state `{state_text}` in addresses.state"
        ))
    })?;

    Ok(Address {
        id: parse_uuid(&id_text, "addresses.id")?,
        team_id: parse_uuid(&team_text, "addresses.team_id")?,
        line1: row.get("line1")?,
        line2: row.get("line2")?,
        line3: row.get("line3")?,
        city: row.get("city")?,
        state,
        pincode: row.get("pincode")?,
    })
}
