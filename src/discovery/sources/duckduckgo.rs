//! DuckDuckGo web search source.
//!
//! Uses the DuckDuckGo HTML endpoint with fixed region, safe-search and
//! time-window filters taken from configuration.

use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::{build_client, SearchSource};
use crate::discovery::domain::clean_text;
use crate::discovery::{DiscoveryConfig, DiscoveryError};
use crate::models::{SearchOrigin, SourceCandidate};

/// DuckDuckGo search URL.
const DDG_SEARCH_URL: &str = "https://html.duckduckgo.com/html/";

/// Web search through DuckDuckGo.
pub struct DuckDuckGoSource {
    client: Client,
    region: String,
    safesearch: &'static str,
    time_window: Option<String>,
}

impl DuckDuckGoSource {
    pub fn new(config: &DiscoveryConfig, user_agent: &str) -> Result<Self, DiscoveryError> {
        Ok(Self {
            client: build_client(user_agent, config.search_timeout)?,
            region: config.region.clone(),
            safesearch: config.safesearch_param(),
            time_window: config.time_window.clone(),
        })
    }

    fn form<'a>(&'a self, query: &'a str) -> Vec<(&'static str, &'a str)> {
        let mut form = vec![("q", query), ("kl", self.region.as_str()), ("kp", self.safesearch)];
        if let Some(ref df) = self.time_window {
            form.push(("df", df.as_str()));
        }
        form
    }
}

#[async_trait]
impl SearchSource for DuckDuckGoSource {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    fn origin(&self) -> SearchOrigin {
        SearchOrigin::WebSearch
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SourceCandidate>, DiscoveryError> {
        debug!("DuckDuckGo search: {}", query);

        let response = self
            .client
            .post(DDG_SEARCH_URL)
            .form(&self.form(query))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DiscoveryError::Unavailable(format!(
                "DuckDuckGo returned {}",
                response.status()
            )));
        }

        let html = response
            .text()
            .await
            .map_err(|e| DiscoveryError::Parse(format!("Failed to read response text: {}", e)))?;

        let mut results = parse_results(&html)?;
        results.truncate(max_results);
        Ok(results)
    }
}

/// Parse search results from the HTML endpoint, skipping ads.
pub(crate) fn parse_results(html: &str) -> Result<Vec<SourceCandidate>, DiscoveryError> {
    let document = Html::parse_document(html);

    let parse = |s: &str| {
        Selector::parse(s)
            .map_err(|e| DiscoveryError::Parse(format!("Failed to parse selector: {:?}", e)))
    };
    let result_selector = parse("div.result")?;
    let link_selector = parse("a.result__a")?;
    let snippet_selector = parse(".result__snippet")?;

    let mut results = Vec::new();
    for result in document.select(&result_selector) {
        if result
            .value()
            .attr("class")
            .is_some_and(|c| c.contains("result--ad"))
        {
            continue;
        }

        let Some(link) = result.select(&link_selector).next() else {
            continue;
        };
        let Some(url) = link.value().attr("href").and_then(extract_url) else {
            continue;
        };

        let title = clean_text(&element_text(link));
        let snippet = result
            .select(&snippet_selector)
            .next()
            .map(|s| clean_text(&element_text(s)))
            .unwrap_or_default();

        results.push(SourceCandidate::new(title, url, SearchOrigin::WebSearch).with_snippet(snippet));
    }

    debug!("Parsed {} results from DuckDuckGo", results.len());
    Ok(results)
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<Vec<_>>().join(" ")
}

/// Extract the actual URL from DuckDuckGo's click-tracking link.
fn extract_url(href: &str) -> Option<String> {
    if href.starts_with("//duckduckgo.com/l/") || href.starts_with("https://duckduckgo.com/l/") {
        // //duckduckgo.com/l/?uddg=<encoded_url>&...
        let uddg_start = href.find("uddg=")?;
        let encoded = &href[uddg_start + 5..];
        let end = encoded.find('&').unwrap_or(encoded.len());
        urlencoding::decode(&encoded[..end])
            .ok()
            .map(|s| s.into_owned())
    } else if href.starts_with("http://") || href.starts_with("https://") {
        Some(href.to_string())
    } else if href.starts_with("//") {
        Some(format!("https:{}", href))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r##"<html><body>
        <div class="result results_links result--ad">
          <a class="result__a" href="https://ads.example.com/">Ad</a>
        </div>
        <div class="result results_links web-result">
          <h2><a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.pravda.com.ua%2Fnews%2F&amp;rut=abc">Українська <b>правда</b></a></h2>
          <a class="result__snippet" href="#">Новини   України</a>
        </div>
        <div class="result results_links web-result">
          <a class="result__a" href="https://suspilne.media/">Суспільне</a>
        </div>
        <div class="result"><a class="result__a" href="/relative">Skip</a></div>
    </body></html>"##;

    #[test]
    fn parses_results_and_skips_ads() {
        let results = parse_results(PAGE).unwrap();
        assert_eq!(results.len(), 2);

        assert_eq!(results[0].raw_url, "https://www.pravda.com.ua/news/");
        assert_eq!(results[0].title, "Українська правда");
        assert_eq!(results[0].snippet, "Новини України");
        assert_eq!(results[0].origin, SearchOrigin::WebSearch);

        assert_eq!(results[1].raw_url, "https://suspilne.media/");
        assert!(results[1].snippet.is_empty());
    }

    #[test]
    fn extract_direct_and_protocol_relative_urls() {
        assert_eq!(
            extract_url("https://example.ua/a"),
            Some("https://example.ua/a".to_string())
        );
        assert_eq!(
            extract_url("//example.ua/a"),
            Some("https://example.ua/a".to_string())
        );
        assert_eq!(extract_url("//duckduckgo.com/l/?rut=x"), None);
        assert_eq!(extract_url("/y.js"), None);
    }

    #[test]
    fn form_carries_fixed_filters() {
        let config = DiscoveryConfig {
            time_window: Some("m".to_string()),
            ..Default::default()
        };
        let source = DuckDuckGoSource::new(&config, "test-agent").unwrap();
        let form = source.form("медіа");

        assert!(form.contains(&("kl", "ua-uk")));
        assert!(form.contains(&("kp", "-1")));
        assert!(form.contains(&("df", "m")));
    }
}
