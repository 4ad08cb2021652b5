//! Project records. Every project belongs to a client; the store rejects a
//! `client_id` that references no row and cascades client deletes here.

use crate::LedgerError;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

/// A project row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: String,
    #[serde(rename = "clientId")]
    pub client_id: String,
    pub title: String,
    pub description: Option<String>,
    /// Free-form deadline string, not a structured date.
    pub deadline: Option<String>,
    /// Opaque status string; `pending` on creation unless the caller says
    /// otherwise. No transition graph is enforced.
    pub status: String,
    #[serde(rename = "deliveredAt")]
    pub delivered_at: Option<String>,
    pub amount: f64,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// Fields for creating a project.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProject {
    pub id: String,
    #[serde(rename = "clientId")]
    pub client_id: String,
    pub title: String,
    pub description: Option<String>,
    pub deadline: String,
    pub status: Option<String>,
    pub amount: Option<f64>,
}

/// The mutable field set for a project update.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectUpdate {
    pub title: String,
    pub description: Option<String>,
    pub deadline: String,
    pub status: String,
    pub amount: f64,
    #[serde(rename = "deliveredAt")]
    pub delivered_at: Option<String>,
}

const COLUMNS: &str =
    "id, client_id, title, description, deadline, status, delivered_at, amount, created_at";

/// Inserts a project and returns the stored row.
///
/// No client-existence check happens here: an unknown `client_id` surfaces
/// as a store constraint violation and nothing is written.
pub fn create_project(conn: &Connection, new: &NewProject) -> Result<Project, LedgerError> {
    let project = conn.query_row(
        &format!(
            "INSERT INTO projects (id, client_id, title, description, deadline, status, amount)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING {COLUMNS}"
        ),
        params![
            new.id,
            new.client_id,
            new.title,
            new.description,
            new.deadline,
            new.status.as_deref().unwrap_or("pending"),
            new.amount.unwrap_or(0.0),
        ],
        map_row,
    )?;
    Ok(project)
}

/// Lists every project, newest first.
pub fn list_projects(conn: &Connection) -> Result<Vec<Project>, LedgerError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM projects ORDER BY created_at DESC"
    ))?;

    let rows = stmt.query_map([], map_row)?;
    let mut projects = Vec::new();
    for row in rows {
        projects.push(row?);
    }
    Ok(projects)
}

/// Replaces a project's mutable fields, returning the updated row.
/// `client_id` is immutable after creation.
///
/// Returns `Ok(None)` when no row has the given id.
pub fn update_project(
    conn: &Connection,
    id: &str,
    update: &ProjectUpdate,
) -> Result<Option<Project>, LedgerError> {
    let project = conn
        .query_row(
            &format!(
                "UPDATE projects
                 SET title = ?1, description = ?2, deadline = ?3, status = ?4,
                     amount = ?5, delivered_at = ?6
                 WHERE id = ?7
                 RETURNING {COLUMNS}"
            ),
            params![
                update.title,
                update.description,
                update.deadline,
                update.status,
                update.amount,
                update.delivered_at,
                id,
            ],
            map_row,
        )
        .optional()?;
    Ok(project)
}

/// Deletes a project. Idempotent; the store cascades to its payments.
pub fn delete_project(conn: &Connection, id: &str) -> Result<(), LedgerError> {
    conn.execute("DELETE FROM projects WHERE id = ?1", [id])?;
    Ok(())
}

fn map_row(row: &Row) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        client_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        deadline: row.get(4)?,
        status: row.get(5)?,
        delivered_at: row.get(6)?,
        amount: row.get(7)?,
        created_at: row.get(8)?,
    })
}
