// Content extraction cascade: recovers a responsibilities/requirements body
// from heterogeneous markup, degrading stage by stage instead of failing.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Node, Selector};

use super::{ExtractionStrategy, PageDocument, StrategyChain, NON_CONTENT_TAGS, NON_TEXT_TAGS};
use crate::data_model::ContentStrategy;
use crate::utils::text::{cjk_runs, normalize_whitespace, truncate_chars, visible_text};

/// Class-name patterns seen on description containers, in priority order.
const DESCRIPTION_SELECTORS: &[&str] = &[
    "[class*='job-description']",
    "[class*='job-detail']",
    "[class*='job_require']",
    "[class*='job-intro']",
    "[class*='description']",
    "[class*='requirement']",
    "[class*='job-content']",
];

/// Minimum text length for a structured description container.
const DESCRIPTION_FLOOR: usize = 100;

/// Section headers that anchor the keyword lookup, in the boards' lexicon.
const SECTION_KEYWORDS: &[&str] = &[
    "岗位职责",
    "任职要求",
    "职位描述",
    "工作职责",
    "岗位要求",
    "职位信息",
    "responsibilities",
    "requirements",
    "job description",
];

/// Minimum text length for an ancestor container around a section header.
const SECTION_FLOOR: usize = 150;

/// Generic content-region probes for pages without recognizable structure.
const REGION_SELECTORS: &[&str] = &[
    "main",
    "[role='main']",
    "article",
    "[class*='content']",
    "[id*='content']",
    "[class*='wrapper']",
    "[class*='container']",
];

/// Below this the whole-body stage keeps degrading to its sub-fallbacks.
const BODY_FLOOR: usize = 100;

/// Stage 1: known description-container class patterns.
struct DescriptionSelectors;

impl ExtractionStrategy for DescriptionSelectors {
    fn name(&self) -> &'static str {
        "content_description_selectors"
    }

    fn try_extract(&self, page: &PageDocument) -> Option<String> {
        for raw in DESCRIPTION_SELECTORS {
            if let Ok(selector) = Selector::parse(raw) {
                for element in page.dom.select(&selector) {
                    let text = visible_text(element, NON_TEXT_TAGS);
                    if text.chars().count() > DESCRIPTION_FLOOR {
                        return Some(text);
                    }
                }
            }
        }
        None
    }
}

/// Stage 2: find a section-header keyword anywhere in the document, then
/// climb to the nearest ancestor large enough to be the description block.
struct SectionKeywordAnchors;

impl ExtractionStrategy for SectionKeywordAnchors {
    fn name(&self) -> &'static str {
        "content_section_keyword"
    }

    fn try_extract(&self, page: &PageDocument) -> Option<String> {
        for node in page.dom.root_element().descendants() {
            let text = match node.value() {
                Node::Text(text) => text,
                _ => continue,
            };
            let lowered = text.to_lowercase();
            if !SECTION_KEYWORDS.iter().any(|keyword| lowered.contains(keyword)) {
                continue;
            }

            let mut ancestor = node.parent();
            while let Some(parent) = ancestor {
                if let Some(element) = ElementRef::wrap(parent) {
                    // A header keyword inside a script payload is not an
                    // anchor for this stage.
                    if NON_TEXT_TAGS.contains(&element.value().name()) {
                        break;
                    }
                    let container_text = visible_text(element, NON_TEXT_TAGS);
                    if container_text.chars().count() >= SECTION_FLOOR {
                        return Some(container_text);
                    }
                }
                ancestor = parent.parent();
            }
        }
        None
    }
}

/// Stage 3: generic main-content regions, first non-empty match.
struct ContentRegions;

impl ExtractionStrategy for ContentRegions {
    fn name(&self) -> &'static str {
        "content_region_probe"
    }

    fn try_extract(&self, page: &PageDocument) -> Option<String> {
        for raw in REGION_SELECTORS {
            if let Ok(selector) = Selector::parse(raw) {
                for element in page.dom.select(&selector) {
                    let text = visible_text(element, NON_TEXT_TAGS);
                    if !text.is_empty() {
                        return Some(text);
                    }
                }
            }
        }
        None
    }
}

static BODY: Lazy<Selector> =
    Lazy::new(|| Selector::parse("body").expect("Failed to parse body selector"));

static VISIBLE_STYLED: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(
        "[style*='display: block'], [style*='display:block'], \
         [style*='visibility: visible'], [style*='visibility:visible']",
    )
    .expect("Failed to parse visible-style selector")
});

static SCRIPT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("script").expect("Failed to parse script selector"));

/// Markers that a script payload carries posting data worth mining.
const SCRIPT_HINTS: &[&str] = &["job", "position", "职位", "岗位"];

/// Stage 4: whole-body text with page chrome stripped. Script-rendered pages
/// can leave the static body nearly empty; then elements with explicit
/// visible-display styling are scanned, and failing that, job-related script
/// payloads are reduced to their CJK runs.
struct BodyFallback;

impl ExtractionStrategy for BodyFallback {
    fn name(&self) -> &'static str {
        "content_body_fallback"
    }

    fn try_extract(&self, page: &PageDocument) -> Option<String> {
        if let Some(body) = page.find(&BODY) {
            let text = visible_text(body, NON_CONTENT_TAGS);
            if text.chars().count() >= BODY_FLOOR {
                return Some(text);
            }
        }

        let mut styled = String::new();
        for element in page.dom.select(&VISIBLE_STYLED) {
            styled.push_str(&visible_text(element, NON_TEXT_TAGS));
            styled.push(' ');
        }
        let styled = normalize_whitespace(&styled);
        if styled.chars().count() >= BODY_FLOOR {
            return Some(styled);
        }

        for element in page.dom.select(&SCRIPT) {
            let payload: String = element.text().collect();
            let lowered = payload.to_lowercase();
            if !SCRIPT_HINTS.iter().any(|hint| lowered.contains(hint)) {
                continue;
            }
            let runs = cjk_runs(&payload);
            if !runs.is_empty() {
                return Some(runs.join(" "));
            }
        }

        None
    }
}

/// Stage 5: absolute fallback, the raw document text (script/style still
/// discarded), possibly empty. Unconditional, so the cascade always yields.
struct RawDocument;

impl ExtractionStrategy for RawDocument {
    fn name(&self) -> &'static str {
        "content_raw_document"
    }

    fn try_extract(&self, page: &PageDocument) -> Option<String> {
        Some(visible_text(page.dom.root_element(), NON_TEXT_TAGS))
    }
}

/// Runs the content cascade and applies the run-wide truncation cap. Always
/// yields a string; an empty one means even the raw tier found nothing.
pub struct ContentExtractor {
    chain: StrategyChain<ContentStrategy>,
    truncation_limit: usize,
}

impl ContentExtractor {
    pub fn new(truncation_limit: usize) -> Self {
        let strategies: Vec<(ContentStrategy, Box<dyn ExtractionStrategy>)> = vec![
            (ContentStrategy::DescriptionSelector, Box::new(DescriptionSelectors)),
            (ContentStrategy::SectionKeyword, Box::new(SectionKeywordAnchors)),
            (ContentStrategy::ContentRegion, Box::new(ContentRegions)),
            (ContentStrategy::BodyText, Box::new(BodyFallback)),
            (ContentStrategy::RawDocument, Box::new(RawDocument)),
        ];
        ContentExtractor {
            chain: StrategyChain::new(strategies),
            truncation_limit,
        }
    }

    pub fn extract(&self, page: &PageDocument) -> (String, ContentStrategy) {
        let (text, strategy) = self
            .chain
            .run(page)
            .unwrap_or_else(|| (String::new(), ContentStrategy::RawDocument));
        (truncate_chars(&text, self.truncation_limit), strategy)
    }
}
