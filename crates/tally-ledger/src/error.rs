use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl LedgerError {
    /// Whether the underlying failure is a store constraint violation,
    /// a duplicate primary key or a foreign key pointing at no row.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            LedgerError::Database(rusqlite::Error::SqliteFailure(code, _))
                if code.code == rusqlite::ffi::ErrorCode::ConstraintViolation
        )
    }
}
