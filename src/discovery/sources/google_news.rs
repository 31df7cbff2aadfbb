//! Google News RSS source.
//!
//! Entry links point at news.google.com wrapper pages; they are returned as-is
//! and unwrapped later by the redirect resolver.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{build_client, SearchSource};
use crate::discovery::domain::clean_text;
use crate::discovery::{DiscoveryConfig, DiscoveryError};
use crate::models::{SearchOrigin, SourceCandidate};

const GOOGLE_NEWS_RSS_URL: &str = "https://news.google.com/rss/search";

/// News aggregator search through the Google News RSS feed.
pub struct GoogleNewsSource {
    client: Client,
    language: String,
    country: String,
}

impl GoogleNewsSource {
    pub fn new(config: &DiscoveryConfig, user_agent: &str) -> Result<Self, DiscoveryError> {
        Ok(Self {
            client: build_client(user_agent, config.search_timeout)?,
            language: config.aggregator_language.clone(),
            country: config.aggregator_country.clone(),
        })
    }

    /// Feed URL for a free-text query.
    pub fn feed_url(&self, query: &str) -> String {
        format!(
            "{}?q={}&hl={}&gl={}&ceid={}:{}",
            GOOGLE_NEWS_RSS_URL,
            urlencoding::encode(query),
            self.language,
            self.country,
            self.country,
            self.language
        )
    }
}

#[async_trait]
impl SearchSource for GoogleNewsSource {
    fn name(&self) -> &str {
        "google_news"
    }

    fn origin(&self) -> SearchOrigin {
        SearchOrigin::NewsAggregator
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SourceCandidate>, DiscoveryError> {
        let url = self.feed_url(query);
        debug!("Google News feed: {}", url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(DiscoveryError::Unavailable(format!(
                "Google News returned {}",
                response.status()
            )));
        }

        let bytes = response.bytes().await?;
        parse_feed(&bytes, max_results)
    }
}

/// Parse feed entries into candidates, keeping the first `max_results`.
pub(crate) fn parse_feed(bytes: &[u8], max_results: usize) -> Result<Vec<SourceCandidate>, DiscoveryError> {
    let feed = feed_rs::parser::parse(bytes)
        .map_err(|e| DiscoveryError::Parse(format!("Failed to parse RSS feed: {}", e)))?;

    let candidates: Vec<SourceCandidate> = feed
        .entries
        .into_iter()
        .filter_map(|entry| {
            let link = entry
                .links
                .first()
                .map(|l| l.href.clone())
                .or_else(|| entry.id.starts_with("http").then(|| entry.id.clone()))?;

            let title = entry
                .title
                .map(|t| clean_text(&t.content))
                .unwrap_or_default();
            let snippet = entry
                .summary
                .map(|s| clean_text(&s.content))
                .unwrap_or_default();

            Some(SourceCandidate::new(title, link, SearchOrigin::NewsAggregator).with_snippet(snippet))
        })
        .take(max_results)
        .collect();

    debug!("Parsed {} entries from Google News", candidates.len());
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel>
  <title>"медіа" - Google News</title>
  <link>https://news.google.com</link>
  <description>Google News</description>
  <item>
    <title>Перша новина - Українська правда</title>
    <link>https://news.google.com/rss/articles/AAA?oc=5</link>
    <guid isPermaLink="false">AAA</guid>
    <description>&lt;a href="x"&gt;Перша&lt;/a&gt;</description>
  </item>
  <item>
    <title>Друга новина</title>
    <link>https://news.google.com/rss/articles/BBB?oc=5</link>
    <guid isPermaLink="false">BBB</guid>
  </item>
  <item>
    <title>Третя</title>
    <link>https://news.google.com/rss/articles/CCC?oc=5</link>
    <guid isPermaLink="false">CCC</guid>
  </item>
</channel></rss>"#;

    #[test]
    fn builds_localized_feed_url() {
        let source = GoogleNewsSource::new(&DiscoveryConfig::default(), "test-agent").unwrap();
        assert_eq!(
            source.feed_url("незалежні медіа"),
            "https://news.google.com/rss/search?q=%D0%BD%D0%B5%D0%B7%D0%B0%D0%BB%D0%B5%D0%B6%D0%BD%D1%96%20%D0%BC%D0%B5%D0%B4%D1%96%D0%B0&hl=uk&gl=UA&ceid=UA:uk"
        );
    }

    #[test]
    fn parses_entries_up_to_bound() {
        let candidates = parse_feed(FEED.as_bytes(), 2).unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].title, "Перша новина - Українська правда");
        assert_eq!(candidates[0].raw_url, "https://news.google.com/rss/articles/AAA?oc=5");
        assert_eq!(candidates[0].snippet, "Перша");
        assert_eq!(candidates[0].origin, SearchOrigin::NewsAggregator);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_feed(b"not a feed", 10).is_err());
    }
}
