//! Payment records, one per amount owed against a project.
//!
//! A payment's identity, amount, project binding, and due date are fixed at
//! creation. The only thing that changes afterwards is whether (and when)
//! the money arrived, so the update path touches `status` and `received_at`
//! and nothing else.

use crate::LedgerError;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

/// A payment row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Payment {
    pub id: String,
    #[serde(rename = "projectId")]
    pub project_id: String,
    pub amount: f64,
    pub status: String,
    #[serde(rename = "dueDate")]
    pub due_date: Option<String>,
    #[serde(rename = "receivedAt")]
    pub received_at: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// Fields for creating a payment.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPayment {
    pub id: String,
    #[serde(rename = "projectId")]
    pub project_id: String,
    pub amount: f64,
    pub status: Option<String>,
    #[serde(rename = "dueDate")]
    pub due_date: String,
}

/// The mutable field set for a payment update.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentUpdate {
    pub status: String,
    #[serde(rename = "receivedAt")]
    pub received_at: Option<String>,
}

const COLUMNS: &str = "id, project_id, amount, status, due_date, received_at, created_at";

/// Inserts a payment and returns the stored row. An unknown `project_id`
/// surfaces as a store constraint violation.
pub fn create_payment(conn: &Connection, new: &NewPayment) -> Result<Payment, LedgerError> {
    let payment = conn.query_row(
        &format!(
            "INSERT INTO payments (id, project_id, amount, status, due_date)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING {COLUMNS}"
        ),
        params![
            new.id,
            new.project_id,
            new.amount,
            new.status.as_deref().unwrap_or("pending"),
            new.due_date,
        ],
        map_row,
    )?;
    Ok(payment)
}

/// Lists every payment, newest first.
pub fn list_payments(conn: &Connection) -> Result<Vec<Payment>, LedgerError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM payments ORDER BY created_at DESC"
    ))?;

    let rows = stmt.query_map([], map_row)?;
    let mut payments = Vec::new();
    for row in rows {
        payments.push(row?);
    }
    Ok(payments)
}

/// Updates a payment's `status` and `received_at`, returning the updated row.
///
/// Returns `Ok(None)` when no row has the given id.
pub fn update_payment(
    conn: &Connection,
    id: &str,
    update: &PaymentUpdate,
) -> Result<Option<Payment>, LedgerError> {
    let payment = conn
        .query_row(
            &format!(
                "UPDATE payments SET status = ?1, received_at = ?2
                 WHERE id = ?3
                 RETURNING {COLUMNS}"
            ),
            params![update.status, update.received_at, id],
            map_row,
        )
        .optional()?;
    Ok(payment)
}

/// Deletes a payment. Idempotent.
pub fn delete_payment(conn: &Connection, id: &str) -> Result<(), LedgerError> {
    conn.execute("DELETE FROM payments WHERE id = ?1", [id])?;
    Ok(())
}

fn map_row(row: &Row) -> rusqlite::Result<Payment> {
    Ok(Payment {
        id: row.get(0)?,
        project_id: row.get(1)?,
        amount: row.get(2)?,
        status: row.get(3)?,
        due_date: row.get(4)?,
        received_at: row.get(5)?,
        created_at: row.get(6)?,
    })
}
