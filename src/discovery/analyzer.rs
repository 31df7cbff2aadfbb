//! Candidate assessment: external analyzer with cache, heuristic fallback.

use std::sync::Arc;

use tracing::debug;

use super::cache::DomainCache;
use super::classify::{news_score, NEWS_SCORE_THRESHOLD};
use super::domain::base_domain;
use super::fetch::{page_description, PageFetcher};
use crate::llm::{MediaJudge, MediaJudgment};
use crate::models::{MediaRecord, SearchOrigin, SourceCandidate};

/// Why a candidate produced no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// No registrable domain could be extracted.
    EmptyDomain,
    /// Heuristic score below [`NEWS_SCORE_THRESHOLD`].
    NotNews { score: u8 },
    /// Domain already accepted earlier in the run.
    Duplicate,
}

/// Outcome of assessing one candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum Assessment {
    /// The analyzer produced a judgment (fresh or cached).
    Judged(MediaRecord),
    /// The analyzer was configured but unavailable; normalizer output only.
    Fallback(MediaRecord),
    /// No analyzer configured; accepted by provenance or the heuristic.
    Heuristic(MediaRecord),
    Rejected(RejectReason),
}

impl Assessment {
    pub fn record(&self) -> Option<&MediaRecord> {
        match self {
            Self::Judged(r) | Self::Fallback(r) | Self::Heuristic(r) => Some(r),
            Self::Rejected(_) => None,
        }
    }

    pub fn into_record(self) -> Option<MediaRecord> {
        match self {
            Self::Judged(r) | Self::Fallback(r) | Self::Heuristic(r) => Some(r),
            Self::Rejected(_) => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Judged(_) => "judged",
            Self::Fallback(_) => "fallback",
            Self::Heuristic(_) => "heuristic",
            Self::Rejected(_) => "rejected",
        }
    }
}

/// Turns candidates into media records.
///
/// With a judge configured every candidate is judged, memoized per base
/// domain. Without one, web-search candidates are fetched and gated by the
/// news heuristic while aggregator candidates are accepted as-is.
pub struct MediaAnalyzer {
    judge: Option<Arc<dyn MediaJudge>>,
    fetcher: Option<Arc<dyn PageFetcher>>,
    cache: DomainCache,
    classify_without_analyzer: bool,
}

impl Default for MediaAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaAnalyzer {
    pub fn new() -> Self {
        Self {
            judge: None,
            fetcher: None,
            cache: DomainCache::new(),
            classify_without_analyzer: true,
        }
    }

    pub fn with_judge(mut self, judge: Arc<dyn MediaJudge>) -> Self {
        self.judge = Some(judge);
        self
    }

    pub fn with_fetcher(mut self, fetcher: Arc<dyn PageFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn classify_without_analyzer(mut self, enabled: bool) -> Self {
        self.classify_without_analyzer = enabled;
        self
    }

    pub fn has_judge(&self) -> bool {
        self.judge.is_some()
    }

    pub fn cache(&self) -> &DomainCache {
        &self.cache
    }

    pub async fn assess(&self, candidate: &SourceCandidate) -> Assessment {
        let domain = base_domain(&candidate.raw_url);
        if domain.is_empty() {
            return Assessment::Rejected(RejectReason::EmptyDomain);
        }

        match self.judge {
            Some(ref judge) => self.judged(judge.as_ref(), candidate, domain).await,
            None => self.classified(candidate, domain).await,
        }
    }

    async fn judged(
        &self,
        judge: &dyn MediaJudge,
        candidate: &SourceCandidate,
        domain: String,
    ) -> Assessment {
        if let Some(judgment) = self.cache.get(&domain) {
            debug!("Cache hit for {}", domain);
            return Assessment::Judged(apply(domain, judgment, candidate));
        }

        match judge.judge(&candidate.raw_url, &domain).await {
            Some(judgment) => {
                self.cache.insert(domain.clone(), judgment.clone());
                Assessment::Judged(apply(domain, judgment, candidate))
            }
            None => {
                debug!("{} gave no judgment for {}; using fallback", judge.name(), domain);
                Assessment::Fallback(MediaRecord::from_candidate(domain, candidate))
            }
        }
    }

    async fn classified(&self, candidate: &SourceCandidate, domain: String) -> Assessment {
        let record = MediaRecord::from_candidate(domain, candidate);

        if candidate.origin == SearchOrigin::NewsAggregator || !self.classify_without_analyzer {
            return Assessment::Heuristic(record.with_description(candidate.snippet.clone()));
        }

        let content = match self.fetcher {
            Some(ref fetcher) => fetcher.fetch(&candidate.raw_url).await,
            None => None,
        };

        let score = news_score(&candidate.raw_url, content.as_deref());
        if score < NEWS_SCORE_THRESHOLD {
            debug!("{} scored {} (not news)", candidate.raw_url, score);
            return Assessment::Rejected(RejectReason::NotNews { score });
        }

        let description = content
            .as_deref()
            .and_then(page_description)
            .unwrap_or_else(|| candidate.snippet.clone());
        Assessment::Heuristic(record.with_description(description))
    }
}

/// The record keeps the normalizer's domain whatever the judge reported.
fn apply(domain: String, judgment: MediaJudgment, candidate: &SourceCandidate) -> MediaRecord {
    let record = MediaRecord::from_candidate(domain, candidate)
        .with_description(judgment.description);
    match judgment.enrichment {
        Some(enrichment) => record.with_enrichment(enrichment),
        None => record,
    }
}
