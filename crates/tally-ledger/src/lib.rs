//! Domain layer for the tally backend.
//!
//! One module per business entity: clients, the projects done for them, and
//! the payments owed against those projects. Each module exposes plain
//! synchronous functions over a `rusqlite::Connection`; every operation is a
//! single parameterized SQL statement, with creates and updates using
//! `RETURNING` so the caller gets the resulting row in one round trip.
//!
//! Relationship integrity (unique ids, live foreign keys, cascade deletes)
//! is enforced by the store, not here: the functions surface constraint
//! failures through [`LedgerError`] rather than pre-checking.

mod error;

pub mod clients;
pub mod payments;
pub mod projects;

pub use error::LedgerError;
