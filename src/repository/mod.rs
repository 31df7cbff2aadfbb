//! Repository layer for database persistence.
//!
//! All database access uses Diesel ORM over SQLite through diesel-async's
//! `SyncConnectionWrapper`.

pub mod models;
pub mod pool;
pub mod source;

pub use pool::{DieselError, SqliteConn, SqlitePool};
pub use source::{
    store_discovered, DieselSourceRepository, InsertOutcome, PromoteOutcome, SourceSink,
    StoreSummary,
};

use chrono::{DateTime, Utc};
use diesel_async::SimpleAsyncConnection;

/// Create tables if they don't exist.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), DieselError> {
    let mut conn = pool.get().await?;
    conn.batch_execute(include_str!("schema_sqlite.sql")).await
}

/// Wrap a foreign error (connection setup, JSON encoding) as a diesel error.
pub fn to_diesel_error(e: impl std::fmt::Display) -> DieselError {
    DieselError::QueryBuilderError(e.to_string().into())
}

/// Parse a datetime string from the database, defaulting to Unix epoch on error.
pub fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::UNIX_EPOCH)
}

/// Parse an optional datetime string from the database.
pub fn parse_datetime_opt(s: Option<String>) -> Option<DateTime<Utc>> {
    s.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn init_schema_is_repeatable() {
        let dir = tempdir().unwrap();
        let pool = SqlitePool::from_path(&dir.path().join("schema.db"));
        init_schema(&pool).await.unwrap();
        init_schema(&pool).await.unwrap();
    }

    #[test]
    fn datetime_parsing_is_lenient() {
        assert_eq!(parse_datetime("garbage"), DateTime::UNIX_EPOCH);
        assert!(parse_datetime_opt(Some("2024-03-01T10:00:00+00:00".into())).is_some());
        assert!(parse_datetime_opt(None).is_none());
    }

    #[test]
    fn foreign_errors_keep_their_message() {
        let err = to_diesel_error("boom");
        assert!(err.to_string().contains("boom"));
    }
}
