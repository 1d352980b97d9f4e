use serde::{Deserialize, Serialize};

/// Title returned when every extraction strategy is exhausted. Downstream
/// stages branch on content, never on a missing field.
pub const UNKNOWN_TITLE: &str = "未知职位";

/// How a page is retrieved: a plain HTTP GET or a scripted browser render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    #[default]
    Static,
    Dynamic,
}

/// Raw page content retrieved for one URL. Owned by the pipeline run for
/// that URL and dropped once extraction completes.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub url: String,
    pub html: String,
    pub mode: FetchMode,
    /// Navigation attempts spent; always 1 in static mode.
    pub attempts: u32,
}

/// Which title-cascade stage produced the accepted title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleStrategy {
    StructuredSelector,
    HeadingScan,
    TitleTag,
    MetaTag,
    UrlPath,
    FullTextScan,
    /// Cascade exhausted; the posting carries the sentinel title.
    Unknown,
}

/// Which content-cascade stage produced the accepted body text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentStrategy {
    DescriptionSelector,
    SectionKeyword,
    ContentRegion,
    BodyText,
    RawDocument,
}

/// One extracted posting. `title` and `content` are always present strings
/// (possibly the sentinel or empty), immutable once built.
#[derive(Debug, Clone)]
pub struct JobPosting {
    pub url: String,
    pub title: String,
    pub content: String,
    pub title_strategy: TitleStrategy,
    pub content_strategy: ContentStrategy,
}

/// The classification rule level that produced a positive result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchTier {
    Title,
    Content,
    StrongKeyword,
}

/// A posting judged software-development-related, with the evidence that
/// produced the decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub url: String,
    pub title: String,
    /// Full hit set in dictionary order; `reason` applies the display caps.
    pub matched_keywords: Vec<String>,
    pub tier: MatchTier,
    pub reason: String,
}
