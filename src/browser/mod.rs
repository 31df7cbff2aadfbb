//! Long-lived headless browser session used to follow client-side redirects.
//!
//! The session is an explicitly owned resource: started once when the
//! service starts, shared behind a mutex, and released with [`BrowserSession::shutdown`].
//! A session that fails to start stays degraded for its whole lifetime and
//! every request reports [`BrowserError::Unavailable`].

mod config;

pub use config::BrowserEngineConfig;

use thiserror::Error;

#[cfg(feature = "browser")]
use std::time::Duration;

#[cfg(feature = "browser")]
use tokio::sync::Mutex;
#[cfg(feature = "browser")]
use tokio::task::JoinHandle;
#[cfg(feature = "browser")]
use tracing::{debug, error, info, warn};

#[cfg(feature = "browser")]
use chromiumoxide::cdp::browser_protocol::page::NavigateParams;
#[cfg(feature = "browser")]
use chromiumoxide::{Browser, BrowserConfig};
#[cfg(feature = "browser")]
use futures::StreamExt;

/// What a loaded page looked like once it settled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSnapshot {
    /// Address the page ended up on.
    pub url: String,
    /// Absolute `href` of every anchor, in document order.
    pub links: Vec<String>,
}

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("browser failed to start: {0}")]
    Launch(String),
    #[error("navigation failed: {0}")]
    Navigation(String),
    #[error("page load timed out after {0}s")]
    Timeout(u64),
    #[error("browser session unavailable")]
    Unavailable,
}

#[cfg(feature = "browser")]
enum SessionState {
    Running {
        browser: Browser,
        handler: JoinHandle<()>,
        remote: bool,
    },
    Degraded,
    Closed,
}

/// Shared browser session.
#[cfg(feature = "browser")]
pub struct BrowserSession {
    config: BrowserEngineConfig,
    state: Mutex<SessionState>,
}

/// Pump CDP events until the connection drops.
#[cfg(feature = "browser")]
fn drive(mut handler: chromiumoxide::Handler) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if event.is_err() {
                break;
            }
        }
    })
}

/// Run one page load under the page-load timeout, settle delay included.
#[cfg(feature = "browser")]
async fn bounded<T, F>(timeout_secs: u64, load: F) -> Result<T, BrowserError>
where
    F: std::future::Future<Output = Result<T, BrowserError>>,
{
    tokio::time::timeout(Duration::from_secs(timeout_secs), load)
        .await
        .unwrap_or(Err(BrowserError::Timeout(timeout_secs)))
}

#[cfg(feature = "browser")]
impl BrowserSession {
    /// Start the session. Failure is logged once and leaves the session degraded.
    pub async fn start(config: BrowserEngineConfig) -> Self {
        let state = if !config.enabled {
            info!("Browser disabled; aggregator links will not be resolved");
            SessionState::Degraded
        } else {
            match Self::launch(&config).await {
                Ok(state) => state,
                Err(e) => {
                    error!("{}; aggregator links will not be resolved", e);
                    SessionState::Degraded
                }
            }
        };

        Self {
            config,
            state: Mutex::new(state),
        }
    }

    /// A session that never launches a browser.
    pub fn degraded(config: BrowserEngineConfig) -> Self {
        Self {
            config,
            state: Mutex::new(SessionState::Degraded),
        }
    }

    pub fn config(&self) -> &BrowserEngineConfig {
        &self.config
    }

    pub async fn is_available(&self) -> bool {
        matches!(*self.state.lock().await, SessionState::Running { .. })
    }

    async fn launch(config: &BrowserEngineConfig) -> Result<SessionState, BrowserError> {
        if let Some(ref remote_url) = config.remote_url {
            return Self::connect_remote(remote_url, config).await;
        }

        info!("Launching browser (headless={})", config.headless);

        let mut builder = BrowserConfig::builder()
            .request_timeout(Duration::from_secs(config.page_load_timeout));
        if let Some(ref path) = config.chrome_path {
            builder = builder.chrome_executable(path);
        }
        if !config.headless {
            builder = builder.with_head();
        }

        builder = builder
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--disable-dev-shm-usage")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--no-sandbox")
            .arg("--disable-gpu");
        for arg in &config.chrome_args {
            builder = builder.arg(arg);
        }

        let browser_config = builder.build().map_err(BrowserError::Launch)?;

        let (browser, handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        let handler = drive(handler);

        Ok(SessionState::Running {
            browser,
            handler,
            remote: false,
        })
    }

    async fn connect_remote(
        url: &str,
        config: &BrowserEngineConfig,
    ) -> Result<SessionState, BrowserError> {
        info!("Connecting to remote browser at {}", url);

        let http_url = url
            .replace("ws://", "http://")
            .replace("wss://", "https://");
        let version_url = format!("{}/json/version", http_url.trim_end_matches('/'));

        let resp: serde_json::Value = reqwest::Client::new()
            .get(&version_url)
            .timeout(Duration::from_secs(config.page_load_timeout))
            .send()
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?
            .json()
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        let ws_url = resp
            .get("webSocketDebuggerUrl")
            .and_then(|v| v.as_str())
            .ok_or_else(|| BrowserError::Launch("No webSocketDebuggerUrl in response".into()))?;

        let handler_config = chromiumoxide::handler::HandlerConfig {
            request_timeout: Duration::from_secs(config.page_load_timeout),
            ..Default::default()
        };

        let (browser, handler) = Browser::connect_with_config(ws_url, handler_config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        let handler = drive(handler);

        Ok(SessionState::Running {
            browser,
            handler,
            remote: true,
        })
    }

    /// Load `url`, wait for it to settle, and report where it landed plus its links.
    pub async fn snapshot(&self, url: &str) -> Result<PageSnapshot, BrowserError> {
        let state = self.state.lock().await;
        let SessionState::Running { ref browser, .. } = *state else {
            return Err(BrowserError::Unavailable);
        };

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::Navigation(e.to_string()))?;

        let result = bounded(self.config.page_load_timeout, self.load(&page, url)).await;
        if let Err(e) = page.close().await {
            debug!("Failed to close page for {}: {}", url, e);
        }
        result
    }

    async fn load(
        &self,
        page: &chromiumoxide::Page,
        url: &str,
    ) -> Result<PageSnapshot, BrowserError> {
        let nav_params = NavigateParams::builder()
            .url(url)
            .build()
            .map_err(BrowserError::Navigation)?;

        debug!("Navigating to {}", url);
        page.execute(nav_params)
            .await
            .map_err(|e| BrowserError::Navigation(e.to_string()))?;
        page.wait_for_navigation()
            .await
            .map_err(|e| BrowserError::Navigation(e.to_string()))?;

        tokio::time::sleep(Duration::from_millis(self.config.settle_delay_ms)).await;

        let current = page
            .url()
            .await
            .map_err(|e| BrowserError::Navigation(e.to_string()))?
            .unwrap_or_else(|| url.to_string());

        let links: Vec<String> = match page
            .evaluate(
                "Array.from(document.querySelectorAll('a[href]')).map(a => a.href)".to_string(),
            )
            .await
        {
            Ok(result) => result.into_value().unwrap_or_default(),
            Err(e) => {
                debug!("Could not collect links from {}: {}", current, e);
                Vec::new()
            }
        };

        Ok(PageSnapshot {
            url: current,
            links,
        })
    }

    /// Close the browser. Errors are logged, never returned. Safe to call twice.
    pub async fn shutdown(&self) {
        let mut state = self.state.lock().await;
        let previous = std::mem::replace(&mut *state, SessionState::Closed);

        if let SessionState::Running {
            mut browser,
            handler,
            remote,
        } = previous
        {
            if !remote {
                if let Err(e) = browser.close().await {
                    error!("Failed to close browser: {}", e);
                } else if let Err(e) = browser.wait().await {
                    warn!("Failed waiting for browser exit: {}", e);
                }
            }
            handler.abort();
            info!("Browser session closed");
        }
    }
}

/// Shared browser session (stub without the `browser` feature; always degraded).
#[cfg(not(feature = "browser"))]
pub struct BrowserSession {
    config: BrowserEngineConfig,
}

#[cfg(not(feature = "browser"))]
impl BrowserSession {
    pub async fn start(config: BrowserEngineConfig) -> Self {
        if config.enabled {
            tracing::error!(
                "Browser support not compiled. Rebuild with: cargo build --features browser"
            );
        }
        Self { config }
    }

    pub fn degraded(config: BrowserEngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BrowserEngineConfig {
        &self.config
    }

    pub async fn is_available(&self) -> bool {
        false
    }

    pub async fn snapshot(&self, _url: &str) -> Result<PageSnapshot, BrowserError> {
        Err(BrowserError::Unavailable)
    }

    pub async fn shutdown(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_session_is_degraded() {
        let config = BrowserEngineConfig {
            enabled: false,
            ..Default::default()
        };
        let session = BrowserSession::start(config).await;

        assert!(!session.is_available().await);
        assert!(matches!(
            session.snapshot("https://news.google.com/rss/articles/XYZ").await,
            Err(BrowserError::Unavailable)
        ));

        session.shutdown().await;
        session.shutdown().await;
    }

    #[cfg(feature = "browser")]
    #[tokio::test]
    async fn stalled_page_load_times_out() {
        let stalled = bounded(0, std::future::pending::<Result<PageSnapshot, BrowserError>>()).await;
        assert!(matches!(stalled, Err(BrowserError::Timeout(0))));

        let quick = bounded(5, async {
            Ok::<_, BrowserError>(PageSnapshot {
                url: "https://www.pravda.com.ua/".to_string(),
                links: Vec::new(),
            })
        })
        .await
        .unwrap();
        assert_eq!(quick.url, "https://www.pravda.com.ua/");
    }
}
