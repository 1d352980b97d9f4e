// Fast-path fetcher: one plain HTTP GET per URL, no retry. Optimized for
// volume over static pages; a lost URL is tolerated and skipped upstream.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::{resolved_user_agent, PageFetcher};
use crate::config::ScraperConfig;
use crate::data_model::{FetchMode, FetchResult};
use crate::error::{Result, ScrapeError};

pub struct StaticFetcher {
    client: reqwest::Client,
}

impl StaticFetcher {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(resolved_user_agent(config))
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| ScrapeError::Unexpected(format!("failed to build HTTP client: {}", e)))?;
        Ok(StaticFetcher { client })
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    fn name(&self) -> &'static str {
        "static_http"
    }

    async fn fetch(&self, url: &str) -> Result<FetchResult> {
        debug!(%url, "Fetching via HTTP GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ScrapeError::Network {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Network {
                url: url.to_string(),
                reason: format!("HTTP status {}", status),
            });
        }

        let html = response.text().await.map_err(|e| ScrapeError::Network {
            url: url.to_string(),
            reason: format!("failed to read response body: {}", e),
        })?;

        Ok(FetchResult {
            url: url.to_string(),
            html,
            mode: FetchMode::Static,
            attempts: 1,
        })
    }
}
