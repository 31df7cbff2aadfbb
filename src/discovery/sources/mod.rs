//! Search source adapters.
//!
//! Each source wraps one external discovery surface and returns at most one
//! bounded page of candidates per query.

mod duckduckgo;
mod google_news;

pub use duckduckgo::DuckDuckGoSource;
pub use google_news::GoogleNewsSource;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::discovery::DiscoveryError;
use crate::models::{SearchOrigin, SourceCandidate};

/// A pluggable search surface.
#[async_trait]
pub trait SearchSource: Send + Sync {
    /// Unique identifier for this source (e.g., "duckduckgo").
    fn name(&self) -> &str;

    /// Which partition of the pipeline this source feeds.
    fn origin(&self) -> SearchOrigin;

    /// Return up to `max_results` candidates for a free-text query.
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SourceCandidate>, DiscoveryError>;
}

/// HTTP client shared by the search adapters.
pub(crate) fn build_client(user_agent: &str, timeout_secs: u64) -> Result<Client, DiscoveryError> {
    Ok(Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(timeout_secs))
        .build()?)
}
