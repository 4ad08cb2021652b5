//! Idempotent schema provisioning.
//!
//! The schema is a single SQL batch embedded at compile time. It contains
//! only `CREATE TABLE IF NOT EXISTS` statements in dependency order
//! (clients, then projects, then payments), so running it against a database
//! that already has the tables is a no-op.

use rusqlite::Connection;
use thiserror::Error;

const SCHEMA: &str = include_str!("schema.sql");

/// Errors that can occur while provisioning the schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A statement in the schema batch failed.
    #[error("schema initialization failed: {0}")]
    Execution(#[from] rusqlite::Error),
}

/// Runs the embedded schema batch against the given connection.
///
/// Safe to call on every startup: existing tables (and their data) are left
/// untouched. Callers decide whether a failure is fatal: the server logs it
/// and keeps serving, since the schema usually already exists.
///
/// # Errors
///
/// Returns `SchemaError::Execution` if any statement in the batch fails.
pub fn init_schema(conn: &Connection) -> Result<(), SchemaError> {
    conn.execute_batch(SCHEMA)?;
    tracing::debug!("schema provisioned");
    Ok(())
}
