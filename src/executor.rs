use std::sync::atomic::{AtomicBool, Ordering};

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use crate::classify::KeywordClassifier;
use crate::config::ScraperConfig;
use crate::data_model::{JobPosting, MatchResult};
use crate::error::Result;
use crate::extract::{ContentExtractor, PageDocument, TitleExtractor};
use crate::fetch::{build_fetcher, PageFetcher};

/// Aggregate outcome of one batch run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Matched postings, preserving input URL order.
    pub matches: Vec<MatchResult>,
    /// URLs that went through the full pipeline, matched or not.
    pub processed: usize,
    /// URLs abandoned on fetch failure.
    pub skipped: usize,
}

/// Sequences fetch -> extract -> classify for each URL in turn. Strictly
/// sequential: one URL runs to completion before the next starts, which is
/// also what keeps the shared browser session single-user.
pub struct PipelineExecutor {
    fetcher: Box<dyn PageFetcher>,
    titles: TitleExtractor,
    contents: ContentExtractor,
    classifier: KeywordClassifier,
}

impl PipelineExecutor {
    /// Builds the pipeline for one run. Browser-session acquisition happens
    /// inside `build_fetcher`, so a session failure surfaces here, before
    /// any URL is attempted.
    pub fn from_config(config: &ScraperConfig) -> Result<Self> {
        config.validate()?;
        let fetcher = build_fetcher(config)?;
        info!(fetcher = fetcher.name(), "Pipeline ready");
        Ok(PipelineExecutor {
            fetcher,
            titles: TitleExtractor::new(),
            contents: ContentExtractor::new(config.content_truncation_limit),
            classifier: KeywordClassifier::new(
                config.keyword_dictionary(),
                config.strong_keyword_lexicon(),
            ),
        })
    }

    /// Assembles a pipeline from explicit components (tests swap in a mock
    /// fetcher through this).
    pub fn new(
        fetcher: Box<dyn PageFetcher>,
        titles: TitleExtractor,
        contents: ContentExtractor,
        classifier: KeywordClassifier,
    ) -> Self {
        PipelineExecutor {
            fetcher,
            titles,
            contents,
            classifier,
        }
    }

    /// Processes the batch. Per-URL failures are logged and skipped; one bad
    /// page never aborts the rest. `abort` is checked between URLs, so
    /// flipping it stops the remaining queue without interrupting the URL in
    /// flight. The fetch session is released once, after the loop.
    pub async fn run(&self, urls: &[String], abort: &AtomicBool) -> RunSummary {
        let pb = ProgressBar::new(urls.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        let mut summary = RunSummary::default();

        for url in urls {
            if abort.load(Ordering::Relaxed) {
                warn!(
                    remaining = urls.len() - summary.processed - summary.skipped,
                    "Abort requested; leaving the rest of the queue unprocessed"
                );
                break;
            }

            pb.set_message(url.clone());
            match self.process_url(url).await {
                Ok(Some(result)) => {
                    info!(%url, title = %result.title, tier = ?result.tier, "Matched");
                    summary.matches.push(result);
                    summary.processed += 1;
                }
                Ok(None) => {
                    debug!(%url, "No match");
                    summary.processed += 1;
                }
                Err(e) => {
                    warn!(%url, error = %e, "Skipping URL");
                    summary.skipped += 1;
                }
            }
            pb.inc(1);
        }
        pb.finish_and_clear();

        if let Err(e) = self.fetcher.close().await {
            warn!(error = %e, "Failed to release fetch session");
        }

        summary
    }

    /// Fetch, extract and classify a single URL.
    pub async fn process_url(&self, url: &str) -> Result<Option<MatchResult>> {
        let fetched = self.fetcher.fetch(url).await?;
        debug!(%url, mode = ?fetched.mode, attempts = fetched.attempts, "Fetched document");

        let page = PageDocument::new(&fetched.url, &fetched.html);
        let (title, title_strategy) = self.titles.extract(&page);
        let (content, content_strategy) = self.contents.extract(&page);
        let posting = JobPosting {
            url: fetched.url,
            title,
            content,
            title_strategy,
            content_strategy,
        };
        debug!(
            url = %posting.url,
            title = %posting.title,
            title_strategy = ?posting.title_strategy,
            content_strategy = ?posting.content_strategy,
            content_chars = posting.content.chars().count(),
            "Extracted posting"
        );

        Ok(self
            .classifier
            .classify(&posting.url, &posting.title, &posting.content))
    }
}
