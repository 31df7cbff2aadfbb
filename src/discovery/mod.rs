//! Media-source discovery pipeline.
//!
//! A free-text query fans out to a web search engine and a news aggregator
//! feed. Aggregator links are unwrapped by a [`RedirectResolver`], every
//! candidate is judged (or heuristically classified), reduced to its base
//! domain and deduplicated. The result is a bounded, ordered list of
//! [`MediaRecord`](crate::models::MediaRecord)s; persisting them is up to the caller.

pub mod analyzer;
pub mod cache;
pub mod classify;
pub mod config;
pub mod domain;
pub mod fetch;
mod orchestrator;
pub mod resolve;
pub mod sources;

pub use analyzer::{Assessment, MediaAnalyzer, RejectReason};
pub use cache::DomainCache;
pub use config::DiscoveryConfig;
pub use fetch::{HttpPageFetcher, PageFetcher};
pub use orchestrator::MediaDiscovery;
pub use resolve::{BrowserResolver, PassthroughResolver, RedirectResolver};
pub use sources::{DuckDuckGoSource, GoogleNewsSource, SearchSource};

/// Error type for discovery operations.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Source unavailable: {0}")]
    Unavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
