//! Diesel row types for the source tables.

use diesel::prelude::*;

use super::{parse_datetime, parse_datetime_opt};
use crate::models::{KnownSource, NewSource, SearchOrigin, VerificationState};
use crate::schema;

/// Known source row.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = schema::known_sources)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct KnownSourceRecord {
    pub id: i32,
    pub domain: String,
    pub name: String,
    pub url: String,
    pub description: String,
    pub source_origin: Option<String>,
    pub enrichment: Option<String>,
    pub created_at: String,
}

/// Known source for insertion.
#[derive(Insertable, Debug)]
#[diesel(table_name = schema::known_sources)]
pub struct NewKnownSourceRow<'a> {
    pub domain: &'a str,
    pub name: &'a str,
    pub url: &'a str,
    pub description: &'a str,
    pub source_origin: Option<&'a str>,
    pub enrichment: Option<&'a str>,
    pub created_at: &'a str,
}

/// New source row.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = schema::new_sources)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct NewSourceRecord {
    pub id: i32,
    pub domain: String,
    pub url: String,
    pub title: String,
    pub description: String,
    pub source_origin: String,
    pub enrichment: Option<String>,
    pub found_at: String,
    pub is_verified: bool,
    pub verified_at: Option<String>,
}

/// New source for insertion.
#[derive(Insertable, Debug)]
#[diesel(table_name = schema::new_sources)]
pub struct NewSourceRow<'a> {
    pub domain: &'a str,
    pub url: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub source_origin: &'a str,
    pub enrichment: Option<&'a str>,
    pub found_at: &'a str,
    pub is_verified: bool,
}

impl From<KnownSourceRecord> for KnownSource {
    fn from(record: KnownSourceRecord) -> Self {
        KnownSource {
            id: record.id,
            domain: record.domain,
            name: record.name,
            url: record.url,
            description: record.description,
            source_origin: record.source_origin.as_deref().and_then(SearchOrigin::from_str),
            enrichment: record
                .enrichment
                .as_deref()
                .and_then(|json| serde_json::from_str(json).ok()),
            created_at: parse_datetime(&record.created_at),
        }
    }
}

impl From<NewSourceRecord> for NewSource {
    fn from(record: NewSourceRecord) -> Self {
        NewSource {
            id: record.id,
            domain: record.domain,
            url: record.url,
            title: record.title,
            description: record.description,
            source_origin: SearchOrigin::from_str(&record.source_origin)
                .unwrap_or(SearchOrigin::WebSearch),
            enrichment: record
                .enrichment
                .as_deref()
                .and_then(|json| serde_json::from_str(json).ok()),
            found_at: parse_datetime(&record.found_at),
            verification: VerificationState {
                is_verified: record.is_verified,
                verified_at: parse_datetime_opt(record.verified_at),
            },
        }
    }
}
