//! Data layer (`PostgreSQL`) for the Podium results board.
//!
//! The board is a read-side consumer: moderation writes results upstream,
//! and this crate reads them for the startup history seed and the
//! analytics snapshot. The announcement queue itself is never persisted.

pub mod error;
pub mod postgres;
pub mod result_store;

pub use error::DbError;
pub use postgres::{PostgresConfig, PostgresPool};
pub use result_store::{ResultRow, ResultStore};
