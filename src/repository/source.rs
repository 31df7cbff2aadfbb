//! Known/new source persistence.
//!
//! Known sources are authoritative. A domain present there blocks insertion
//! into new sources, and promotion moves a verified new source across in a
//! single transaction.

use async_trait::async_trait;
use chrono::Utc;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::{AsyncConnection, RunQueryDsl};
use serde::Serialize;
use tracing::debug;

use super::models::{KnownSourceRecord, NewKnownSourceRow, NewSourceRecord, NewSourceRow};
use super::pool::{DieselError, SqlitePool};
use super::to_diesel_error;
use crate::discovery::domain::{base_domain, normalize};
use crate::models::{KnownSource, MediaRecord, NewSource};
use crate::schema::{known_sources, new_sources};

/// Result of inserting into one of the partitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "id", rename_all = "snake_case")]
pub enum InsertOutcome {
    Inserted(i32),
    /// Domain is already vetted; nothing written.
    AlreadyKnown,
    /// Domain is already awaiting verification under this id.
    AlreadyNew(i32),
}

/// Result of promoting a new source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "id", rename_all = "snake_case")]
pub enum PromoteOutcome {
    /// Moved into known sources under this id.
    Promoted(i32),
    NotVerified,
    /// No such new source (never existed or already promoted).
    Missing,
}

/// Tally of a write-through batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreSummary {
    pub inserted: usize,
    pub already_known: usize,
    pub already_new: usize,
}

/// Persistence interface the discovery layer writes through.
///
/// Duplicate inserts are reported, never raised as errors.
#[async_trait]
pub trait SourceSink: Send + Sync {
    /// Whether a domain (or a URL on it) is a known source.
    async fn exists_known(&self, domain_or_url: &str) -> Result<bool, DieselError>;

    /// Whether a domain (or a URL on it) is awaiting verification.
    async fn exists_new(&self, domain_or_url: &str) -> Result<bool, DieselError>;

    async fn insert_new(&self, record: &MediaRecord) -> Result<InsertOutcome, DieselError>;

    /// Promote a verified new source. Promoting twice is a no-op.
    async fn promote(&self, id: i32) -> Result<PromoteOutcome, DieselError>;

    async fn list_known(&self) -> Result<Vec<KnownSource>, DieselError>;

    async fn list_new(&self) -> Result<Vec<NewSource>, DieselError>;
}

/// Store discovered records as new sources, skipping anything already present.
pub async fn store_discovered(
    sink: &dyn SourceSink,
    records: &[MediaRecord],
) -> Result<StoreSummary, DieselError> {
    let mut summary = StoreSummary::default();
    for record in records {
        match sink.insert_new(record).await? {
            InsertOutcome::Inserted(_) => summary.inserted += 1,
            InsertOutcome::AlreadyKnown => summary.already_known += 1,
            InsertOutcome::AlreadyNew(_) => summary.already_new += 1,
        }
    }
    Ok(summary)
}

/// Diesel-based source repository for SQLite.
#[derive(Clone)]
pub struct DieselSourceRepository {
    pool: SqlitePool,
}

/// The domain to match plus the raw value, for "domain or URL" lookups.
fn lookup_keys(domain_or_url: &str) -> (String, String) {
    (base_domain(domain_or_url), domain_or_url.trim().to_string())
}

impl DieselSourceRepository {
    /// Create a new source repository with an existing pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a new source by ID.
    pub async fn get_new(&self, id: i32) -> Result<Option<NewSource>, DieselError> {
        let mut conn = self.pool.get().await?;

        new_sources::table
            .find(id)
            .first::<NewSourceRecord>(&mut conn)
            .await
            .optional()
            .map(|opt| opt.map(NewSource::from))
    }

    /// Mark a new source as verified. Returns `None` if it does not exist.
    ///
    /// Verifying an already verified source keeps the original timestamp.
    pub async fn verify(&self, id: i32) -> Result<Option<NewSource>, DieselError> {
        let mut conn = self.pool.get().await?;
        let now = Utc::now().to_rfc3339();

        diesel::update(
            new_sources::table
                .find(id)
                .filter(new_sources::is_verified.eq(false)),
        )
        .set((
            new_sources::is_verified.eq(true),
            new_sources::verified_at.eq(Some(&now)),
        ))
        .execute(&mut conn)
        .await?;

        new_sources::table
            .find(id)
            .first::<NewSourceRecord>(&mut conn)
            .await
            .optional()
            .map(|opt| opt.map(NewSource::from))
    }

    /// Promote every verified new source. Returns how many moved.
    pub async fn sync_verified(&self) -> Result<usize, DieselError> {
        let ids: Vec<i32> = {
            let mut conn = self.pool.get().await?;
            new_sources::table
                .filter(new_sources::is_verified.eq(true))
                .select(new_sources::id)
                .order(new_sources::id.asc())
                .load(&mut conn)
                .await?
        };

        let mut promoted = 0;
        for id in ids {
            if let PromoteOutcome::Promoted(_) = self.promote(id).await? {
                promoted += 1;
            }
        }
        Ok(promoted)
    }

    /// Add a vetted source directly, removing any pending new source for the same domain.
    pub async fn add_known(
        &self,
        url: &str,
        name: &str,
        description: &str,
    ) -> Result<InsertOutcome, DieselError> {
        let domain = base_domain(url);
        if domain.is_empty() {
            return Err(to_diesel_error(format!("no registrable domain in '{}'", url)));
        }
        let url = url.trim().to_string();
        let name = if name.trim().is_empty() {
            domain.clone()
        } else {
            name.trim().to_string()
        };
        let description = description.trim().to_string();
        let created_at = Utc::now().to_rfc3339();

        let mut conn = self.pool.get().await?;
        conn.transaction(|conn| {
            Box::pin(async move {
                let inserted = diesel::insert_or_ignore_into(known_sources::table)
                    .values(&NewKnownSourceRow {
                        domain: &domain,
                        name: &name,
                        url: &url,
                        description: &description,
                        source_origin: None,
                        enrichment: None,
                        created_at: &created_at,
                    })
                    .execute(conn)
                    .await?;

                let removed =
                    diesel::delete(new_sources::table.filter(new_sources::domain.eq(&domain)))
                        .execute(conn)
                        .await?;
                if removed > 0 {
                    debug!("Dropped pending new source for {}", domain);
                }

                if inserted == 0 {
                    return Ok(InsertOutcome::AlreadyKnown);
                }

                let id: i32 = known_sources::table
                    .filter(known_sources::domain.eq(&domain))
                    .select(known_sources::id)
                    .first(conn)
                    .await?;
                Ok(InsertOutcome::Inserted(id))
            })
        })
        .await
    }

    pub async fn count_known(&self) -> Result<i64, DieselError> {
        let mut conn = self.pool.get().await?;
        known_sources::table
            .select(count_star())
            .first(&mut conn)
            .await
    }

    pub async fn count_new(&self) -> Result<i64, DieselError> {
        let mut conn = self.pool.get().await?;
        new_sources::table
            .select(count_star())
            .first(&mut conn)
            .await
    }
}

#[async_trait]
impl SourceSink for DieselSourceRepository {
    async fn exists_known(&self, domain_or_url: &str) -> Result<bool, DieselError> {
        let (domain, raw) = lookup_keys(domain_or_url);
        let mut conn = self.pool.get().await?;

        let count: i64 = known_sources::table
            .filter(known_sources::domain.eq(&domain).or(known_sources::url.eq(&raw)))
            .select(count_star())
            .first(&mut conn)
            .await?;

        Ok(count > 0)
    }

    async fn exists_new(&self, domain_or_url: &str) -> Result<bool, DieselError> {
        let (domain, raw) = lookup_keys(domain_or_url);
        let mut conn = self.pool.get().await?;

        let count: i64 = new_sources::table
            .filter(new_sources::domain.eq(&domain).or(new_sources::url.eq(&raw)))
            .select(count_star())
            .first(&mut conn)
            .await?;

        Ok(count > 0)
    }

    async fn insert_new(&self, record: &MediaRecord) -> Result<InsertOutcome, DieselError> {
        let domain = normalize(&record.domain);
        if domain.is_empty() {
            return Err(to_diesel_error(format!(
                "no registrable domain in '{}'",
                record.domain
            )));
        }
        let enrichment = record
            .enrichment
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(to_diesel_error)?;
        let found_at = record.found_at.to_rfc3339();
        let origin = record.source_origin.as_str();

        let mut conn = self.pool.get().await?;
        conn.transaction(|conn| {
            Box::pin(async move {
                let known: i64 = known_sources::table
                    .filter(known_sources::domain.eq(&domain))
                    .select(count_star())
                    .first(conn)
                    .await?;
                if known > 0 {
                    return Ok(InsertOutcome::AlreadyKnown);
                }

                let inserted = diesel::insert_or_ignore_into(new_sources::table)
                    .values(&NewSourceRow {
                        domain: &domain,
                        url: &record.url,
                        title: &record.title,
                        description: &record.description,
                        source_origin: origin,
                        enrichment: enrichment.as_deref(),
                        found_at: &found_at,
                        is_verified: false,
                    })
                    .execute(conn)
                    .await?;

                let id: i32 = new_sources::table
                    .filter(new_sources::domain.eq(&domain))
                    .select(new_sources::id)
                    .first(conn)
                    .await?;

                Ok(if inserted > 0 {
                    InsertOutcome::Inserted(id)
                } else {
                    InsertOutcome::AlreadyNew(id)
                })
            })
        })
        .await
    }

    async fn promote(&self, id: i32) -> Result<PromoteOutcome, DieselError> {
        let mut conn = self.pool.get().await?;

        conn.transaction(|conn| {
            Box::pin(async move {
                let Some(record) = new_sources::table
                    .find(id)
                    .first::<NewSourceRecord>(conn)
                    .await
                    .optional()?
                else {
                    return Ok(PromoteOutcome::Missing);
                };
                if !record.is_verified {
                    return Ok(PromoteOutcome::NotVerified);
                }

                let source = NewSource::from(record.clone());
                let created_at = Utc::now().to_rfc3339();

                diesel::insert_or_ignore_into(known_sources::table)
                    .values(&NewKnownSourceRow {
                        domain: &record.domain,
                        name: source.display_name(),
                        url: &record.url,
                        description: &record.description,
                        source_origin: Some(record.source_origin.as_str()),
                        enrichment: record.enrichment.as_deref(),
                        created_at: &created_at,
                    })
                    .execute(conn)
                    .await?;

                diesel::delete(new_sources::table.find(id))
                    .execute(conn)
                    .await?;

                let known_id: i32 = known_sources::table
                    .filter(known_sources::domain.eq(&record.domain))
                    .select(known_sources::id)
                    .first(conn)
                    .await?;

                Ok(PromoteOutcome::Promoted(known_id))
            })
        })
        .await
    }

    async fn list_known(&self) -> Result<Vec<KnownSource>, DieselError> {
        let mut conn = self.pool.get().await?;

        known_sources::table
            .order(known_sources::id.asc())
            .load::<KnownSourceRecord>(&mut conn)
            .await
            .map(|records| records.into_iter().map(KnownSource::from).collect())
    }

    async fn list_new(&self) -> Result<Vec<NewSource>, DieselError> {
        let mut conn = self.pool.get().await?;

        new_sources::table
            .order(new_sources::id.asc())
            .load::<NewSourceRecord>(&mut conn)
            .await
            .map(|records| records.into_iter().map(NewSource::from).collect())
    }
}
