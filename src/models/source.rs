//! Persisted source models: the vetted "known" partition and the discovered "new" partition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::media::{MediaEnrichment, MediaRecord, SearchOrigin};

/// A pre-vetted, authoritative media source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnownSource {
    pub id: i32,
    pub domain: String,
    pub name: String,
    pub url: String,
    pub description: String,
    pub source_origin: Option<SearchOrigin>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrichment: Option<MediaEnrichment>,
    pub created_at: DateTime<Utc>,
}

/// Verification status of a newly discovered source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationState {
    pub is_verified: bool,
    pub verified_at: Option<DateTime<Utc>>,
}

impl VerificationState {
    /// Mark as verified. Verifying twice keeps the first timestamp.
    pub fn verify(&mut self, now: DateTime<Utc>) {
        if !self.is_verified {
            self.is_verified = true;
            self.verified_at = Some(now);
        }
    }
}

/// A source found by discovery that has not been promoted yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSource {
    pub id: i32,
    pub domain: String,
    pub url: String,
    pub title: String,
    pub description: String,
    pub source_origin: SearchOrigin,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrichment: Option<MediaEnrichment>,
    pub found_at: DateTime<Utc>,
    #[serde(flatten)]
    pub verification: VerificationState,
}

impl NewSource {
    /// Name to carry over on promotion.
    pub fn display_name(&self) -> &str {
        self.enrichment
            .as_ref()
            .and_then(|e| e.name.as_deref())
            .filter(|n| !n.is_empty())
            .or_else(|| Some(self.title.as_str()).filter(|t| !t.is_empty()))
            .unwrap_or(&self.domain)
    }

    pub fn as_record(&self) -> MediaRecord {
        MediaRecord {
            domain: self.domain.clone(),
            url: self.url.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            found_at: self.found_at,
            source_origin: self.source_origin,
            enrichment: self.enrichment.clone(),
        }
    }
}
