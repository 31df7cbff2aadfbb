//! Candidate page fetching for heuristic classification.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::debug;

use super::domain::clean_text;
use super::DiscoveryError;

/// Fetches raw HTML. `None` means the page could not be retrieved.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Option<String>;
}

/// Plain HTTP GET with a per-request timeout.
pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    pub fn new(user_agent: &str, timeout_secs: u64) -> Result<Self, DiscoveryError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Option<String> {
        let response = match self.client.get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                debug!("Fetch failed for {}: {}", url, e);
                return None;
            }
        };
        if !response.status().is_success() {
            debug!("Fetch of {} returned HTTP {}", url, response.status());
            return None;
        }
        response.text().await.ok()
    }
}

/// `<meta name="description">` (or `og:description`) of a page, cleaned.
pub fn page_description(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector =
        Selector::parse(r#"meta[name="description"], meta[property="og:description"]"#).ok()?;

    document
        .select(&selector)
        .filter_map(|el| el.value().attr("content"))
        .map(clean_text)
        .find(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_meta_description() {
        let html = r#"<html><head>
            <meta name="description" content="  Новини   України ">
        </head></html>"#;
        assert_eq!(page_description(html).as_deref(), Some("Новини України"));
    }

    #[test]
    fn falls_back_to_open_graph() {
        let html = r#"<head><meta name="description" content=""><meta property="og:description" content="OG"></head>"#;
        assert_eq!(page_description(html).as_deref(), Some("OG"));
        assert_eq!(page_description("<p>none</p>"), None);
    }
}
