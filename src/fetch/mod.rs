// src/fetch/mod.rs

pub mod browser;
pub mod retry;
pub mod static_http;

pub use browser::BrowserFetcher;
pub use retry::RetryPolicy;
pub use static_http::StaticFetcher;

use async_trait::async_trait;

use crate::config::ScraperConfig;
use crate::data_model::{FetchMode, FetchResult};
use crate::error::Result;

/// Spoofed desktop browser identity shared by both fetch modes.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0.0.0 Safari/537.36";

/// Retrieves raw page content for one URL at a time.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch(&self, url: &str) -> Result<FetchResult>;

    /// Release any long-lived fetch resources. Called exactly once at the
    /// end of a run; the default is a no-op for stateless fetchers.
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// Builds the fetcher for the configured mode. Browser acquisition happens
/// here, before any URL is attempted, so a session failure aborts the run
/// up front instead of mid-batch.
pub fn build_fetcher(config: &ScraperConfig) -> Result<Box<dyn PageFetcher>> {
    match config.fetch_mode {
        FetchMode::Static => Ok(Box::new(StaticFetcher::new(config)?)),
        FetchMode::Dynamic => Ok(Box::new(BrowserFetcher::launch(config)?)),
    }
}

pub(crate) fn resolved_user_agent(config: &ScraperConfig) -> String {
    config
        .user_agent
        .clone()
        .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string())
}
