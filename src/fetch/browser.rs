// Slow-path fetcher: drives a persistent headless-browser session so
// script-rendered postings still produce a readable document.

use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions, Tab};
use tracing::{debug, info, warn};

use super::retry::{jittered_delay, render_with_retries, RetryPolicy};
use super::{resolved_user_agent, PageFetcher};
use crate::config::ScraperConfig;
use crate::data_model::{FetchMode, FetchResult};
use crate::error::{Result, ScrapeError};

/// Selectors whose presence means the page has rendered enough to read, in
/// probe order. `body` last: it fires on near-empty shells too.
const READINESS_SELECTORS: &[&str] = &[
    "[class*='job-description']",
    "[class*='description']",
    "h1",
    "body",
];

/// Explicit handle for the one browser session a run shares across all of
/// its dynamic fetches. Navigation mutates the single tab, so the session
/// must never be driven concurrently; the sequential pipeline guarantees
/// that. `close` is the deliberate release on the normal path; dropping the
/// handle kills the browser process, which covers every other exit path.
pub struct BrowserSession {
    _browser: Browser,
    tab: Arc<Tab>,
}

impl BrowserSession {
    pub fn launch(user_agent: &str) -> Result<Self> {
        let launch_options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(false)
            .window_size(Some((1920, 1080)))
            .idle_browser_timeout(Duration::from_secs(600))
            .args(vec![
                OsStr::new("--disable-blink-features=AutomationControlled"),
                OsStr::new("--blink-settings=imagesEnabled=false"),
                OsStr::new("--disable-gpu"),
            ])
            .build()
            .map_err(|e| ScrapeError::BrowserSession(format!("invalid launch options: {}", e)))?;

        let browser = Browser::new(launch_options)
            .map_err(|e| ScrapeError::BrowserSession(format!("failed to launch browser: {}", e)))?;
        let tab = browser
            .new_tab()
            .map_err(|e| ScrapeError::BrowserSession(format!("failed to open tab: {}", e)))?;
        tab.set_user_agent(user_agent, None, None)
            .map_err(|e| ScrapeError::BrowserSession(format!("failed to set user agent: {}", e)))?;

        info!("Browser session started");
        Ok(BrowserSession {
            _browser: browser,
            tab,
        })
    }

    fn tab(&self) -> Arc<Tab> {
        Arc::clone(&self.tab)
    }

    fn close(&self) {
        if let Err(e) = self.tab.close(true) {
            warn!(error = %e, "Failed to close browser tab");
        }
    }
}

pub struct BrowserFetcher {
    session: BrowserSession,
    retry: RetryPolicy,
    min_page_length: usize,
    readiness_timeout: Duration,
    settle_delay_ms: (u64, u64),
    request_delay_ms: (u64, u64),
}

impl BrowserFetcher {
    /// Acquires the browser session for the run. A launch failure is fatal:
    /// it surfaces here, before the first URL.
    pub fn launch(config: &ScraperConfig) -> Result<Self> {
        let session = BrowserSession::launch(&resolved_user_agent(config))?;
        let retry = RetryPolicy::new(config.max_retries, config.retry_backoff_ms)?;
        Ok(BrowserFetcher {
            session,
            retry,
            min_page_length: config.min_page_length,
            readiness_timeout: Duration::from_millis(config.readiness_timeout_ms),
            settle_delay_ms: config.settle_delay_ms,
            request_delay_ms: config.request_delay_ms,
        })
    }

    /// One navigation attempt on the blocking tab API. Readiness is
    /// best-effort: if no known container appears within the budget, the
    /// attempt still reads the document after a settle delay so
    /// script-driven rendering gets a chance to finish.
    fn render_once(
        tab: &Arc<Tab>,
        url: &str,
        readiness_timeout: Duration,
        settle_delay_ms: (u64, u64),
    ) -> Result<String> {
        tab.navigate_to(url).map_err(|e| ScrapeError::Network {
            url: url.to_string(),
            reason: format!("navigation failed: {}", e),
        })?;
        if let Err(e) = tab.wait_until_navigated() {
            debug!(%url, error = %e, "Navigation wait did not settle");
        }

        let per_selector = readiness_timeout / READINESS_SELECTORS.len() as u32;
        let ready = READINESS_SELECTORS.iter().any(|selector| {
            tab.wait_for_element_with_custom_timeout(selector, per_selector)
                .is_ok()
        });
        if !ready {
            debug!(%url, "No readiness selector fired; settling before read");
            std::thread::sleep(jittered_delay(settle_delay_ms));
        }

        tab.get_content().map_err(|e| ScrapeError::Network {
            url: url.to_string(),
            reason: format!("failed to read document: {}", e),
        })
    }
}

#[async_trait]
impl PageFetcher for BrowserFetcher {
    fn name(&self) -> &'static str {
        "browser"
    }

    async fn fetch(&self, url: &str) -> Result<FetchResult> {
        // Randomized inter-request delay.
        tokio::time::sleep(jittered_delay(self.request_delay_ms)).await;

        let (html, attempts) =
            render_with_retries(url, &self.retry, self.min_page_length, || {
                let tab = self.session.tab();
                let target = url.to_string();
                let readiness_timeout = self.readiness_timeout;
                let settle_delay_ms = self.settle_delay_ms;
                async move {
                    tokio::task::spawn_blocking(move || {
                        Self::render_once(&tab, &target, readiness_timeout, settle_delay_ms)
                    })
                    .await
                    .map_err(|e| ScrapeError::Unexpected(format!("render task failed: {}", e)))?
                }
            })
            .await?;

        Ok(FetchResult {
            url: url.to_string(),
            html,
            mode: FetchMode::Dynamic,
            attempts,
        })
    }

    async fn close(&self) -> Result<()> {
        self.session.close();
        info!("Browser session released");
        Ok(())
    }
}
