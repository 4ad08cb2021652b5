//! Client records: the people and companies work is done for.

use crate::LedgerError;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

/// A client row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Client {
    /// Caller-assigned unique id.
    pub id: String,
    /// Display name.
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    /// Creation timestamp, assigned by the store.
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// Fields for creating a client. The id comes from the caller; a duplicate
/// fails at the store level.
#[derive(Debug, Clone, Deserialize)]
pub struct NewClient {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
}

/// The mutable field set for a client update. Absent optionals overwrite
/// with NULL; an update is a full replace of the mutable fields, not a
/// merge.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientUpdate {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
}

const COLUMNS: &str = "id, name, email, phone, company, created_at";

/// Inserts a client and returns the stored row.
pub fn create_client(conn: &Connection, new: &NewClient) -> Result<Client, LedgerError> {
    let client = conn.query_row(
        &format!(
            "INSERT INTO clients (id, name, email, phone, company)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING {COLUMNS}"
        ),
        params![new.id, new.name, new.email, new.phone, new.company],
        map_row,
    )?;
    Ok(client)
}

/// Lists every client, newest first.
pub fn list_clients(conn: &Connection) -> Result<Vec<Client>, LedgerError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM clients ORDER BY created_at DESC"
    ))?;

    let rows = stmt.query_map([], map_row)?;
    let mut clients = Vec::new();
    for row in rows {
        clients.push(row?);
    }
    Ok(clients)
}

/// Replaces a client's mutable fields, returning the updated row.
///
/// Returns `Ok(None)` when no row has the given id.
pub fn update_client(
    conn: &Connection,
    id: &str,
    update: &ClientUpdate,
) -> Result<Option<Client>, LedgerError> {
    let client = conn
        .query_row(
            &format!(
                "UPDATE clients SET name = ?1, email = ?2, phone = ?3, company = ?4
                 WHERE id = ?5
                 RETURNING {COLUMNS}"
            ),
            params![update.name, update.email, update.phone, update.company, id],
            map_row,
        )
        .optional()?;
    Ok(client)
}

/// Deletes a client. Idempotent: deleting an id with no row is not an error.
/// The store cascades the delete to the client's projects and their payments.
pub fn delete_client(conn: &Connection, id: &str) -> Result<(), LedgerError> {
    conn.execute("DELETE FROM clients WHERE id = ?1", [id])?;
    Ok(())
}

fn map_row(row: &Row) -> rusqlite::Result<Client> {
    Ok(Client {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        company: row.get(4)?,
        created_at: row.get(5)?,
    })
}
