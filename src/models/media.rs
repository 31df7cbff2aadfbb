//! Discovery-time models: search hits and the media records built from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The search surface a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchOrigin {
    /// General web search (DuckDuckGo).
    WebSearch,
    /// News aggregator RSS feed (Google News).
    NewsAggregator,
}

impl SearchOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WebSearch => "web_search",
            Self::NewsAggregator => "news_aggregator",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "web_search" => Some(Self::WebSearch),
            "news_aggregator" => Some(Self::NewsAggregator),
            _ => None,
        }
    }

    /// Aggregator links are always wrapped in tracking redirects; search-result links are not.
    pub fn requires_resolution(&self) -> bool {
        matches!(self, Self::NewsAggregator)
    }

    /// Human-readable label used in CLI output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::WebSearch => "DuckDuckGo",
            Self::NewsAggregator => "Google News",
        }
    }
}

impl std::fmt::Display for SearchOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single search hit, alive only for the duration of one discovery run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCandidate {
    pub title: String,
    pub raw_url: String,
    pub origin: SearchOrigin,
    /// Result snippet or feed summary, already cleaned of markup.
    pub snippet: String,
}

impl SourceCandidate {
    pub fn new(title: impl Into<String>, raw_url: impl Into<String>, origin: SearchOrigin) -> Self {
        Self {
            title: title.into(),
            raw_url: raw_url.into(),
            origin,
            snippet: String::new(),
        }
    }

    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = snippet.into();
        self
    }

    /// Same candidate pointing at a different (resolved) URL.
    pub fn with_url(mut self, url: String) -> Self {
        self.raw_url = url;
        self
    }
}

/// Social media handles reported by the analyzer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialMedia {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telegram: Option<String>,
}

impl SocialMedia {
    pub fn is_empty(&self) -> bool {
        self.facebook.is_none() && self.twitter.is_none() && self.telegram.is_none()
    }
}

/// Fields only present when the external analyzer produced a judgment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaEnrichment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage: Option<String>,
    /// 0..=100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reliability_score: Option<u8>,
    #[serde(default, skip_serializing_if = "SocialMedia::is_empty")]
    pub social_media: SocialMedia,
    #[serde(default)]
    pub has_rss: bool,
}

/// A discovered media source, keyed by its registrable base domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRecord {
    pub domain: String,
    pub url: String,
    pub title: String,
    pub description: String,
    pub found_at: DateTime<Utc>,
    pub source_origin: SearchOrigin,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrichment: Option<MediaEnrichment>,
}

impl MediaRecord {
    /// Build a record from a candidate with no analyzer input (empty description).
    pub fn from_candidate(domain: String, candidate: &SourceCandidate) -> Self {
        Self {
            domain,
            url: candidate.raw_url.clone(),
            title: candidate.title.clone(),
            description: String::new(),
            found_at: Utc::now(),
            source_origin: candidate.origin,
            enrichment: None,
        }
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = description;
        self
    }

    pub fn with_enrichment(mut self, enrichment: MediaEnrichment) -> Self {
        self.enrichment = Some(enrichment);
        self
    }

    /// Display name: analyzer name if known, otherwise the search title, otherwise the domain.
    pub fn display_name(&self) -> &str {
        self.enrichment
            .as_ref()
            .and_then(|e| e.name.as_deref())
            .filter(|n| !n.is_empty())
            .or_else(|| Some(self.title.as_str()).filter(|t| !t.is_empty()))
            .unwrap_or(&self.domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_round_trips_through_str() {
        for origin in [SearchOrigin::WebSearch, SearchOrigin::NewsAggregator] {
            assert_eq!(SearchOrigin::from_str(origin.as_str()), Some(origin));
        }
        assert_eq!(SearchOrigin::from_str("bing"), None);
    }

    #[test]
    fn only_aggregator_links_need_resolution() {
        assert!(SearchOrigin::NewsAggregator.requires_resolution());
        assert!(!SearchOrigin::WebSearch.requires_resolution());
    }

    #[test]
    fn record_from_candidate_has_empty_description() {
        let candidate = SourceCandidate::new("Title", "https://example.ua/a", SearchOrigin::WebSearch);
        let record = MediaRecord::from_candidate("example.ua".into(), &candidate);

        assert_eq!(record.domain, "example.ua");
        assert_eq!(record.url, "https://example.ua/a");
        assert!(record.description.is_empty());
        assert!(record.enrichment.is_none());
    }

    #[test]
    fn display_name_prefers_enrichment() {
        let candidate = SourceCandidate::new("", "https://example.ua", SearchOrigin::WebSearch);
        let record = MediaRecord::from_candidate("example.ua".into(), &candidate);
        assert_eq!(record.display_name(), "example.ua");

        let record = record.with_enrichment(MediaEnrichment {
            name: Some("Приклад".into()),
            ..Default::default()
        });
        assert_eq!(record.display_name(), "Приклад");
    }

    #[test]
    fn enrichment_serializes_type_key() {
        let enrichment = MediaEnrichment {
            media_type: Some("online".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&enrichment).unwrap();
        assert_eq!(json["type"], "online");
        assert!(json.get("social_media").is_none());
    }
}
