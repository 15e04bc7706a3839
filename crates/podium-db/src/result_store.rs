//! Read operations on the `results` table.
//!
//! Two reads serve the board: the one-shot initial-population query that
//! seeds the display history at startup, and the full-snapshot query the
//! analytics view aggregates over. All mutation of the table happens in
//! the moderation flow, outside this service.

use chrono::{DateTime, Utc};
use podium_types::{MAX_SCORE, ResultId, ResultRecord};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbError;

/// Column list shared by every `results` query.
const RESULT_COLUMNS: &str =
    "id, name, school, aplus, reg_no, image_url, approved, created_at, updated_at";

/// A row of the `results` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ResultRow {
    /// Primary key.
    pub id: Uuid,
    /// Student display name.
    pub name: Option<String>,
    /// School label.
    pub school: Option<String>,
    /// Top-grade count as stored (SMALLINT, may hold out-of-range values).
    pub aplus: Option<i16>,
    /// Examination registration number.
    pub reg_no: Option<String>,
    /// Uploaded result image URL.
    pub image_url: Option<String>,
    /// Whether moderation has approved the record for display.
    pub approved: bool,
    /// Insert timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp (approval flips bump this).
    pub updated_at: DateTime<Utc>,
}

impl From<ResultRow> for ResultRecord {
    fn from(row: ResultRow) -> Self {
        Self {
            id: ResultId::from(row.id),
            name: row.name,
            school: row.school,
            // Scores outside 0..=10 are stored-data defects; clamp rather
            // than dropping the record.
            aplus: row
                .aplus
                .and_then(|score| u8::try_from(score).ok())
                .map(|score| score.min(MAX_SCORE)),
            reg_no: row.reg_no,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Read operations on the `results` table.
pub struct ResultStore<'a> {
    pool: &'a PgPool,
}

impl<'a> ResultStore<'a> {
    /// Create a store bound to a connection pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The most recently approved records, newest first.
    ///
    /// This is the startup bulk read that seeds the display history, so
    /// records approved before this process started are not re-announced.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn list_recent_approved(&self, limit: u32) -> Result<Vec<ResultRecord>, DbError> {
        let query = format!(
            "SELECT {RESULT_COLUMNS} FROM results WHERE approved ORDER BY updated_at DESC LIMIT $1"
        );
        let rows = sqlx::query_as::<_, ResultRow>(&query)
            .bind(i64::from(limit))
            .fetch_all(self.pool)
            .await?;

        tracing::debug!(count = rows.len(), limit, "Loaded recent approved results");
        Ok(rows.into_iter().map(ResultRecord::from).collect())
    }

    /// Every record, newest first, for the analytics snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn fetch_all(&self) -> Result<Vec<ResultRecord>, DbError> {
        let query = format!("SELECT {RESULT_COLUMNS} FROM results ORDER BY updated_at DESC");
        let rows = sqlx::query_as::<_, ResultRow>(&query)
            .fetch_all(self.pool)
            .await?;

        tracing::debug!(count = rows.len(), "Loaded full result snapshot");
        Ok(rows.into_iter().map(ResultRecord::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(aplus: Option<i16>) -> ResultRow {
        ResultRow {
            id: Uuid::now_v7(),
            name: Some(String::from("Asha")),
            school: Some(String::from("GHSS Meenangadi, Wayanad")),
            aplus,
            reg_no: Some(String::from("402113")),
            image_url: None,
            approved: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn row_maps_onto_record() {
        let row = row(Some(9));
        let id = row.id;
        let record = ResultRecord::from(row);
        assert_eq!(record.id.into_inner(), id);
        assert_eq!(record.aplus, Some(9));
        assert_eq!(record.district(), "Wayanad");
    }

    #[test]
    fn out_of_range_scores_are_clamped() {
        assert_eq!(ResultRecord::from(row(Some(25))).aplus, Some(MAX_SCORE));
        assert_eq!(ResultRecord::from(row(Some(-3))).aplus, None);
        assert_eq!(ResultRecord::from(row(None)).aplus, None);
    }
}
