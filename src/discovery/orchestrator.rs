//! Discovery orchestrator: fan out, resolve, assess, dedup, bound.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::analyzer::{Assessment, MediaAnalyzer, RejectReason};
use super::domain::{base_domain, is_host_or_subdomain};
use super::resolve::RedirectResolver;
use super::sources::SearchSource;
use crate::models::{MediaRecord, SourceCandidate};

/// Entry point of the discovery pipeline.
///
/// Sources are queried in order (web search first, then the aggregator) and
/// their candidates processed in that same order, so earlier sources win
/// domain collisions. Never fails: source errors are logged and the source
/// counts as empty.
pub struct MediaDiscovery {
    sources: Vec<Arc<dyn SearchSource>>,
    resolver: Arc<dyn RedirectResolver>,
    analyzer: MediaAnalyzer,
    aggregator_host: String,
}

impl MediaDiscovery {
    pub fn new(
        sources: Vec<Arc<dyn SearchSource>>,
        resolver: Arc<dyn RedirectResolver>,
        analyzer: MediaAnalyzer,
    ) -> Self {
        Self {
            sources,
            resolver,
            analyzer,
            aggregator_host: "news.google.com".to_string(),
        }
    }

    /// Host whose appearance in web-search results is logged as a possible tracking link.
    pub fn with_aggregator_host(mut self, host: impl Into<String>) -> Self {
        self.aggregator_host = host.into();
        self
    }

    pub fn analyzer(&self) -> &MediaAnalyzer {
        &self.analyzer
    }

    /// Discover up to `max_results` media records for `query`, one per base domain.
    pub async fn search_media(&self, query: &str, max_results: usize) -> Vec<MediaRecord> {
        if max_results == 0 || query.trim().is_empty() {
            return Vec::new();
        }

        let mut batches = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            match source.search(query, max_results).await {
                Ok(candidates) => {
                    debug!(
                        "{} ({}) returned {} candidates",
                        source.name(),
                        source.origin().as_str(),
                        candidates.len()
                    );
                    batches.push(candidates);
                }
                Err(e) => {
                    warn!("{} search failed for '{}': {}", source.name(), query, e);
                }
            }
        }

        let mut seen: HashSet<String> = HashSet::new();
        let mut records = Vec::new();

        'outer: for candidate in batches.into_iter().flatten() {
            let candidate = self.resolve(candidate).await;
            match self.consider(&candidate, &seen).await {
                Assessment::Rejected(reason) => {
                    debug!("Rejected {}: {:?}", candidate.raw_url, reason);
                }
                accepted => {
                    let kind = accepted.kind();
                    if let Some(record) = accepted.into_record() {
                        debug!("Accepted {} ({})", record.domain, kind);
                        seen.insert(record.domain.clone());
                        records.push(record);
                        if records.len() >= max_results {
                            break 'outer;
                        }
                    }
                }
            }
        }

        info!("Discovered {} media sources for '{}'", records.len(), query);
        records
    }

    /// Unwrap aggregator links; web-search links pass through untouched.
    async fn resolve(&self, candidate: SourceCandidate) -> SourceCandidate {
        if candidate.origin.requires_resolution() {
            let resolved = self.resolver.resolve(&candidate.raw_url).await;
            return candidate.with_url(resolved);
        }

        if is_host_or_subdomain(&candidate.raw_url, &self.aggregator_host) {
            debug!(
                "Web-search result points at the aggregator and is not resolved: {}",
                candidate.raw_url
            );
        }
        candidate
    }

    /// Dedup against this run before spending an analyzer call.
    async fn consider(&self, candidate: &SourceCandidate, seen: &HashSet<String>) -> Assessment {
        let domain = base_domain(&candidate.raw_url);
        if domain.is_empty() {
            return Assessment::Rejected(RejectReason::EmptyDomain);
        }
        if seen.contains(&domain) {
            return Assessment::Rejected(RejectReason::Duplicate);
        }

        let assessment = self.analyzer.assess(candidate).await;
        match assessment.record() {
            Some(record) if seen.contains(&record.domain) => {
                Assessment::Rejected(RejectReason::Duplicate)
            }
            _ => assessment,
        }
    }
}
