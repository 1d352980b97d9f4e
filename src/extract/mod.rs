// src/extract/mod.rs

pub mod content;
pub mod title;

// Re-export the cascade front-ends.
pub use content::ContentExtractor;
pub use title::TitleExtractor;

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

/// Subtrees that never contribute visible text.
pub const NON_TEXT_TAGS: &[&str] = &["script", "style", "noscript"];

/// Chrome stripped for whole-body extraction.
pub const NON_CONTENT_TAGS: &[&str] = &["script", "style", "noscript", "nav", "header", "footer"];

/// A fetched page parsed once and shared by both extraction cascades.
pub struct PageDocument {
    url: Option<Url>,
    pub dom: Html,
}

impl PageDocument {
    /// Parses the document. An unparseable URL only disables the URL-path
    /// title heuristic; it never fails the page.
    pub fn new(url: &str, html: &str) -> Self {
        PageDocument {
            url: Url::parse(url).ok(),
            dom: Html::parse_document(html),
        }
    }

    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// Result-returning query: `None` when the selector matches nothing.
    pub fn find(&self, selector: &Selector) -> Option<ElementRef<'_>> {
        self.dom.select(selector).next()
    }
}

/// One extraction attempt. Returns `Some` only for a *valid* result; the
/// chain treats `None` as "move on to the next strategy".
pub trait ExtractionStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn try_extract(&self, page: &PageDocument) -> Option<String>;
}

/// Ordered list of extraction strategies, each tagged with the kind reported
/// on the posting. The first strategy producing a valid result wins; later
/// stages are never consulted and no stage re-runs after a success.
pub struct StrategyChain<K: Copy> {
    strategies: Vec<(K, Box<dyn ExtractionStrategy>)>,
}

impl<K: Copy> StrategyChain<K> {
    pub fn new(strategies: Vec<(K, Box<dyn ExtractionStrategy>)>) -> Self {
        if strategies.is_empty() {
            warn!("Extraction chain created with no strategies.");
        }
        StrategyChain { strategies }
    }

    pub fn run(&self, page: &PageDocument) -> Option<(String, K)> {
        for (kind, strategy) in &self.strategies {
            if let Some(value) = strategy.try_extract(page) {
                debug!(strategy = strategy.name(), "Extraction strategy accepted");
                return Some((value, *kind));
            }
        }
        None
    }
}
