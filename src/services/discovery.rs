//! Media discovery service.
//!
//! Wires search sources, the redirect-resolving browser and the analyzer
//! together from configuration, and writes results through to the source
//! repository. Used by both the CLI and the web server.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::browser::BrowserSession;
use crate::config::Config;
use crate::discovery::{
    BrowserResolver, DuckDuckGoSource, GoogleNewsSource, HttpPageFetcher, MediaAnalyzer,
    MediaDiscovery, SearchSource,
};
use crate::llm::{LlmClient, LlmJudge};
use crate::models::MediaRecord;
use crate::repository::{store_discovered, SourceSink, StoreSummary};

/// Result of one search request.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub query: String,
    pub results: Vec<MediaRecord>,
    /// Absent on dry runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stored: Option<StoreSummary>,
}

/// Which optional pipeline stages are live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServiceStatus {
    /// An external analyzer judges candidates.
    pub analyzer: bool,
    /// Aggregator links can be resolved in the browser.
    pub browser: bool,
}

/// Service for discovering and storing media sources.
pub struct DiscoveryService {
    discovery: MediaDiscovery,
    sink: Arc<dyn SourceSink>,
    browser: Option<Arc<BrowserSession>>,
    default_max_results: usize,
}

impl DiscoveryService {
    /// Create a service around an already assembled pipeline.
    pub fn new(discovery: MediaDiscovery, sink: Arc<dyn SourceSink>) -> Self {
        Self {
            discovery,
            sink,
            browser: None,
            default_max_results: crate::discovery::config::DEFAULT_MAX_RESULTS,
        }
    }

    /// Assemble the production pipeline from configuration.
    ///
    /// Starts the browser session; call [`DiscoveryService::shutdown`] when done.
    pub async fn from_config(config: &Config, sink: Arc<dyn SourceSink>) -> anyhow::Result<Self> {
        let sources: Vec<Arc<dyn SearchSource>> = vec![
            Arc::new(DuckDuckGoSource::new(&config.discovery, &config.user_agent)?),
            Arc::new(GoogleNewsSource::new(&config.discovery, &config.user_agent)?),
        ];

        let fetcher = HttpPageFetcher::new(&config.user_agent, config.discovery.page_timeout)?;
        let mut analyzer = MediaAnalyzer::new()
            .with_fetcher(Arc::new(fetcher))
            .classify_without_analyzer(config.discovery.classify_without_analyzer);

        if config.llm.enabled {
            let client = LlmClient::new(config.llm.clone())?;
            info!(
                "Using model {} at {} for media analysis",
                config.llm.model, config.llm.endpoint
            );
            analyzer = analyzer.with_judge(Arc::new(LlmJudge::new(client)));
        }

        // Started last: no `?` may follow it.
        let browser = Arc::new(BrowserSession::start(config.browser.clone()).await);
        let resolver = Arc::new(BrowserResolver::new(browser.clone()));

        let discovery = MediaDiscovery::new(sources, resolver, analyzer)
            .with_aggregator_host(config.browser.aggregator_host.clone());

        Ok(Self {
            discovery,
            sink,
            browser: Some(browser),
            default_max_results: config.discovery.max_results,
        })
    }

    pub async fn status(&self) -> ServiceStatus {
        let browser = match self.browser {
            Some(ref browser) => browser.is_available().await,
            None => false,
        };
        ServiceStatus {
            analyzer: self.discovery.analyzer().has_judge(),
            browser,
        }
    }

    pub fn default_max_results(&self) -> usize {
        self.default_max_results
    }

    /// Run discovery and, unless `dry_run`, store every result as a new source.
    pub async fn search(
        &self,
        query: &str,
        max_results: Option<usize>,
        dry_run: bool,
    ) -> anyhow::Result<SearchOutcome> {
        let limit = max_results.unwrap_or(self.default_max_results);
        let results = self.discovery.search_media(query, limit).await;

        let stored = if dry_run {
            None
        } else {
            Some(store_discovered(self.sink.as_ref(), &results).await?)
        };

        Ok(SearchOutcome {
            query: query.to_string(),
            results,
            stored,
        })
    }

    /// Close the browser session, if one was started.
    pub async fn shutdown(&self) {
        if let Some(ref browser) = self.browser {
            browser.shutdown().await;
        }
    }
}
