//! Configuration types for the discovery pipeline.

use serde::{Deserialize, Serialize};

/// Default cap on records returned from one discovery run.
pub const DEFAULT_MAX_RESULTS: usize = 20;

/// Fixed search and classification settings.
///
/// Region, safety and time-window filters are operator configuration; callers
/// of the pipeline only pass a query and a result bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Result bound used when the caller does not give one.
    pub max_results: usize,

    /// DuckDuckGo region code (`kl`), e.g. "ua-uk".
    pub region: String,

    /// DuckDuckGo safe search: "strict", "moderate" or "off".
    pub safesearch: String,

    /// DuckDuckGo time window (`df`): "d", "w", "m" or "y". Unset means any time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_window: Option<String>,

    /// News aggregator interface language (`hl`).
    pub aggregator_language: String,

    /// News aggregator country (`gl`).
    pub aggregator_country: String,

    /// Timeout for search and feed requests, in seconds.
    pub search_timeout: u64,

    /// Timeout for fetching candidate pages for classification, in seconds.
    pub page_timeout: u64,

    /// Gate web-search candidates through the heuristic when no analyzer is configured.
    pub classify_without_analyzer: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            region: "ua-uk".to_string(),
            safesearch: "moderate".to_string(),
            time_window: None,
            aggregator_language: "uk".to_string(),
            aggregator_country: "UA".to_string(),
            search_timeout: 10,
            page_timeout: 10,
            classify_without_analyzer: true,
        }
    }
}

impl DiscoveryConfig {
    /// DuckDuckGo `kp` value for the configured safe-search level.
    pub fn safesearch_param(&self) -> &'static str {
        match self.safesearch.to_lowercase().as_str() {
            "strict" | "on" => "1",
            "off" => "-2",
            _ => "-1",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_ukrainian_results() {
        let config = DiscoveryConfig::default();
        assert_eq!(config.max_results, 20);
        assert_eq!(config.region, "ua-uk");
        assert_eq!(config.safesearch_param(), "-1");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: DiscoveryConfig = toml::from_str("safesearch = \"off\"").unwrap();
        assert_eq!(config.safesearch_param(), "-2");
        assert_eq!(config.aggregator_country, "UA");
    }
}
