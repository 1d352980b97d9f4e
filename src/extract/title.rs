// Title extraction cascade: six strategies from trusted structure down to a
// full-text scan, with a sentinel when everything is exhausted.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Selector;

use super::{ExtractionStrategy, PageDocument, StrategyChain, NON_TEXT_TAGS};
use crate::data_model::{TitleStrategy, UNKNOWN_TITLE};
use crate::utils::text::{element_text, normalize_whitespace, visible_text};

/// Role-indicating tokens used to validate extracted titles. This is a
/// validity filter for the cascade, distinct from the classification
/// dictionary the classifier matches against.
const ROLE_SIGNALS: &[&str] = &[
    "工程师",
    "开发",
    "程序员",
    "架构师",
    "技术",
    "测试",
    "运维",
    "算法",
    "engineer",
    "developer",
    "programmer",
    "architect",
    "technical",
    "devops",
    "java",
    "python",
    "android",
    "ios",
    "web",
];

fn has_role_signal(text: &str) -> bool {
    let lowered = text.to_lowercase();
    ROLE_SIGNALS.iter().any(|signal| lowered.contains(signal))
}

/// Class-name patterns seen on title-bearing elements, in priority order.
const TITLE_CLASS_SELECTORS: &[&str] = &[
    "[class*='job-title']",
    "[class*='position-title']",
    "[class*='job-name']",
    "[class*='jobTitle']",
    "[class*='job_title']",
    "[class*='position-name']",
    "h1[class*='title']",
];

/// Stage 1: structured markup is trusted on its own; only a length window
/// guards against grabbing navigation or banner text.
struct StructuredSelectors;

impl ExtractionStrategy for StructuredSelectors {
    fn name(&self) -> &'static str {
        "title_structured_selectors"
    }

    fn try_extract(&self, page: &PageDocument) -> Option<String> {
        for raw in TITLE_CLASS_SELECTORS {
            if let Ok(selector) = Selector::parse(raw) {
                for element in page.dom.select(&selector) {
                    let text = element_text(element);
                    let len = text.chars().count();
                    if (3..=100).contains(&len) {
                        return Some(text);
                    }
                }
            }
        }
        None
    }
}

/// Stage 2: heading scan, `h1` before the broader heading tags. Headings
/// carry all sorts of page furniture, so a role signal is required.
struct HeadingScan;

impl ExtractionStrategy for HeadingScan {
    fn name(&self) -> &'static str {
        "title_heading_scan"
    }

    fn try_extract(&self, page: &PageDocument) -> Option<String> {
        for raw in ["h1", "h2, h3"] {
            if let Ok(selector) = Selector::parse(raw) {
                for element in page.dom.select(&selector) {
                    let text = element_text(element);
                    let len = text.chars().count();
                    if (2..=100).contains(&len) && has_role_signal(&text) {
                        return Some(text);
                    }
                }
            }
        }
        None
    }
}

/// Branding tokens job boards append to `<title>`, stripped from the
/// extracted segment.
const BRANDING_SUFFIXES: &[&str] = &["招聘信息", "招聘", "人才网", "求职", "找工作"];

/// First segment of a `<title>`-style string: split on `_`, then on a spaced
/// dash so hyphenated role names survive, then drop branding suffixes.
fn first_title_segment(raw: &str) -> Option<String> {
    let segment = raw.split('_').next().unwrap_or(raw);
    let segment = segment.split(" - ").next().unwrap_or(segment);
    let mut cleaned = normalize_whitespace(segment);
    for suffix in BRANDING_SUFFIXES {
        if let Some(stripped) = cleaned.strip_suffix(suffix) {
            cleaned = stripped.trim().to_string();
        }
    }
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

fn valid_segment(segment: &str) -> bool {
    let len = segment.chars().count();
    (2..=100).contains(&len) && has_role_signal(segment)
}

static TITLE_TAG: Lazy<Selector> =
    Lazy::new(|| Selector::parse("title").expect("Failed to parse title selector"));

/// Stage 3: document `<title>` tag.
struct TitleTag;

impl ExtractionStrategy for TitleTag {
    fn name(&self) -> &'static str {
        "title_document_title"
    }

    fn try_extract(&self, page: &PageDocument) -> Option<String> {
        let element = page.find(&TITLE_TAG)?;
        let segment = first_title_segment(&element_text(element))?;
        if valid_segment(&segment) {
            Some(segment)
        } else {
            None
        }
    }
}

static META_TITLE: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("meta[property='og:title'], meta[name='title']")
        .expect("Failed to parse meta title selector")
});

/// Stage 4: `og:title` / `meta[name='title']`, same split rule as stage 3.
struct MetaTag;

impl ExtractionStrategy for MetaTag {
    fn name(&self) -> &'static str {
        "title_meta_tag"
    }

    fn try_extract(&self, page: &PageDocument) -> Option<String> {
        for element in page.dom.select(&META_TITLE) {
            if let Some(content) = element.value().attr("content") {
                if let Some(segment) = first_title_segment(content) {
                    if valid_segment(&segment) {
                        return Some(segment);
                    }
                }
            }
        }
        None
    }
}

/// Job-detail pages carry an opaque id segment shaped letters+digits+J+digits
/// (e.g. CCL1514719060J40910554815); those never hold a title.
static JOB_ID_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]+\d+J\d+").expect("Failed to compile job-id regex"));

/// Stage 5: URL-path heuristic.
struct UrlPath;

impl ExtractionStrategy for UrlPath {
    fn name(&self) -> &'static str {
        "title_url_path"
    }

    fn try_extract(&self, page: &PageDocument) -> Option<String> {
        let url = page.url()?;
        for segment in url.path_segments()? {
            if segment.is_empty() || segment.contains("htm") || JOB_ID_SEGMENT.is_match(segment) {
                continue;
            }
            let token: String = segment.chars().filter(|c| c.is_alphabetic()).collect();
            if token.chars().count() > 5 && has_role_signal(&token) {
                return Some(token);
            }
        }
        None
    }
}

static ROLE_SPAN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)[\p{Han}A-Za-z0-9+#./（）()]{0,24}(工程师|程序员|架构师|开发|engineer|developer|programmer|architect)[\p{Han}A-Za-z0-9+#./（）()]{0,24}",
    )
    .expect("Failed to compile role-span regex")
});

/// Stage 6: last resort, a bounded role-keyword-anchored span scanned out of
/// the page's visible text.
struct FullTextScan;

impl ExtractionStrategy for FullTextScan {
    fn name(&self) -> &'static str {
        "title_full_text_scan"
    }

    fn try_extract(&self, page: &PageDocument) -> Option<String> {
        let text = visible_text(page.dom.root_element(), NON_TEXT_TAGS);
        for span in ROLE_SPAN.find_iter(&text) {
            let candidate = span.as_str().trim();
            let len = candidate.chars().count();
            if (2..=50).contains(&len) {
                return Some(candidate.to_string());
            }
        }
        None
    }
}

/// Runs the title cascade. Never fails: when every strategy is exhausted the
/// caller gets the sentinel title instead of an absent value.
pub struct TitleExtractor {
    chain: StrategyChain<TitleStrategy>,
}

impl TitleExtractor {
    pub fn new() -> Self {
        let strategies: Vec<(TitleStrategy, Box<dyn ExtractionStrategy>)> = vec![
            (TitleStrategy::StructuredSelector, Box::new(StructuredSelectors)),
            (TitleStrategy::HeadingScan, Box::new(HeadingScan)),
            (TitleStrategy::TitleTag, Box::new(TitleTag)),
            (TitleStrategy::MetaTag, Box::new(MetaTag)),
            (TitleStrategy::UrlPath, Box::new(UrlPath)),
            (TitleStrategy::FullTextScan, Box::new(FullTextScan)),
        ];
        TitleExtractor {
            chain: StrategyChain::new(strategies),
        }
    }

    pub fn extract(&self, page: &PageDocument) -> (String, TitleStrategy) {
        match self.chain.run(page) {
            Some((title, strategy)) => (title, strategy),
            None => (UNKNOWN_TITLE.to_string(), TitleStrategy::Unknown),
        }
    }
}

impl Default for TitleExtractor {
    fn default() -> Self {
        TitleExtractor::new()
    }
}
