//! Redirect resolution for aggregator tracking links.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::domain::is_host_or_subdomain;
use crate::browser::BrowserSession;

/// Turns a (possibly wrapped) URL into its final destination.
///
/// Never fails: on any problem the input URL is returned unchanged.
#[async_trait]
pub trait RedirectResolver: Send + Sync {
    async fn resolve(&self, url: &str) -> String;
}

/// Resolver that returns its input.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughResolver;

#[async_trait]
impl RedirectResolver for PassthroughResolver {
    async fn resolve(&self, url: &str) -> String {
        url.to_string()
    }
}

/// Resolver that loads the URL in the shared browser session.
pub struct BrowserResolver {
    session: Arc<BrowserSession>,
}

impl BrowserResolver {
    pub fn new(session: Arc<BrowserSession>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl RedirectResolver for BrowserResolver {
    async fn resolve(&self, url: &str) -> String {
        if url.is_empty() {
            return String::new();
        }

        match self.session.snapshot(url).await {
            Ok(snapshot) => {
                let config = self.session.config();
                let destination = pick_destination(
                    &snapshot.url,
                    &snapshot.links,
                    &config.aggregator_host,
                    &config.blocked_hosts,
                );
                debug!("Resolved {} -> {}", url, destination);
                destination
            }
            Err(crate::browser::BrowserError::Unavailable) => url.to_string(),
            Err(e) => {
                warn!("Could not resolve {}: {}", url, e);
                url.to_string()
            }
        }
    }
}

/// Choose the real destination once a page has settled.
///
/// If the page is still on the aggregator, the first link that leaves both the
/// aggregator and every blocked host wins; failing that, `current_url` is returned.
pub fn pick_destination(
    current_url: &str,
    links: &[String],
    aggregator_host: &str,
    blocked_hosts: &[String],
) -> String {
    if !is_host_or_subdomain(current_url, aggregator_host) {
        return current_url.to_string();
    }

    links
        .iter()
        .filter(|link| link.starts_with("http://") || link.starts_with("https://"))
        .find(|link| {
            !is_host_or_subdomain(link, aggregator_host)
                && !blocked_hosts
                    .iter()
                    .any(|blocked| is_host_or_subdomain(link, blocked))
        })
        .cloned()
        .unwrap_or_else(|| current_url.to_string())
}
