//! Database layer for the tally backend.
//!
//! Provides SQLite connection pooling (via `r2d2`) and idempotent schema
//! provisioning. The three business tables (clients, projects, payments)
//! are created through the embedded schema in this crate.
//!
//! # Design decisions
//!
//! - **SQLite with WAL mode**: a single-binary deployment needs no external
//!   database process. WAL allows concurrent readers with a single writer,
//!   which matches the read-heavy CRUD access pattern.
//! - **`r2d2` connection pool**: a bounded pool created once at startup
//!   replaces open-per-request connections, so the store cannot be exhausted
//!   under load and release-on-every-exit-path is handled by RAII.
//! - **Embedded schema**: the SQL ships inside the binary via `include_str!`
//!   and consists solely of `CREATE TABLE IF NOT EXISTS` statements, so
//!   re-running it on every startup is safe.

mod pool;
mod schema;

pub use pool::{create_pool, DbPool, PoolSettings};
pub use schema::{init_schema, SchemaError};
