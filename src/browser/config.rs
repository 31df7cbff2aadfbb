//! Browser session configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings for the redirect-resolving browser.
///
/// The aggregator host and blocked hosts drive destination picking when a
/// wrapper page never navigates on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowserEngineConfig {
    /// When false, aggregator links are kept as-is.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Page load timeout in seconds.
    #[serde(default = "default_page_load_timeout")]
    pub page_load_timeout: u64,

    /// Delay after load for client-side redirects to fire, in milliseconds.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Explicit Chrome executable. Auto-detected when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chrome_path: Option<PathBuf>,

    /// Extra Chrome flags, appended after the built-in ones.
    #[serde(default)]
    pub chrome_args: Vec<String>,

    /// DevTools URL of an already running browser, e.g. "ws://localhost:9222".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,

    /// Host whose pages are redirect wrappers to be unwrapped.
    #[serde(default = "default_aggregator_host")]
    pub aggregator_host: String,

    /// Hosts that are never a valid destination (sign-in pages and the like).
    #[serde(default = "default_blocked_hosts")]
    pub blocked_hosts: Vec<String>,
}

fn default_enabled() -> bool {
    true
}

fn default_headless() -> bool {
    true
}

fn default_page_load_timeout() -> u64 {
    30
}

fn default_settle_delay_ms() -> u64 {
    2000
}

fn default_aggregator_host() -> String {
    "news.google.com".to_string()
}

fn default_blocked_hosts() -> Vec<String> {
    vec!["accounts.google.com".to_string()]
}

impl Default for BrowserEngineConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            headless: default_headless(),
            page_load_timeout: default_page_load_timeout(),
            settle_delay_ms: default_settle_delay_ms(),
            chrome_path: None,
            chrome_args: Vec::new(),
            remote_url: None,
            aggregator_host: default_aggregator_host(),
            blocked_hosts: default_blocked_hosts(),
        }
    }
}

impl BrowserEngineConfig {
    /// Apply `BROWSER_ENABLED` and `BROWSER_REMOTE_URL`.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("BROWSER_ENABLED") {
            self.enabled = !matches!(val.to_lowercase().as_str(), "0" | "false" | "no");
        }
        self.remote_url = std::env::var("BROWSER_REMOTE_URL")
            .ok()
            .filter(|v| !v.is_empty())
            .or(self.remote_url);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config: BrowserEngineConfig =
            serde_json::from_str(r#"{"headless": false, "chrome_args": ["--lang=uk"]}"#).unwrap();
        assert!(!config.headless);
        assert!(config.enabled);
        assert_eq!(config.chrome_args, ["--lang=uk"]);
        assert_eq!(config.blocked_hosts, ["accounts.google.com"]);
    }
}
