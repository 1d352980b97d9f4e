// Keyword classification: decides whether a posting is software-development
// related from its (title, content) pair.

use tracing::debug;

use crate::data_model::{MatchResult, MatchTier};

/// Built-in classification dictionary. The operator-facing list targets
/// Chinese job boards; English equivalents ride along so bilingual postings
/// classify the same way. Matching is plain substring containment, so a hit
/// inside a longer word counts too.
pub const SOFTWARE_JOB_KEYWORDS: &[&str] = &[
    "软件开发",
    "软件工程",
    "开发工程师",
    "程序员",
    "前端开发",
    "后端开发",
    "全栈开发",
    "Java",
    "Python",
    "C++",
    "JavaScript开发",
    "C 语言",
    "Android开发",
    "iOS开发",
    "AI开发",
    "人工智能",
    "算法工程师",
    "系统开发",
    "Web开发",
    "移动开发",
    "编程",
    "代码开发",
    "software development",
    "software engineer",
    "software developer",
    "full stack",
    "front end developer",
    "backend developer",
    "web developer",
    "mobile developer",
    "machine learning",
    "algorithm",
    "code",
    "programming",
];

/// High-confidence generic terms for the strong-keyword tier.
pub const STRONG_CONTENT_KEYWORDS: &[&str] = &[
    "编程",
    "代码",
    "算法",
    "数据结构",
    "软件架构",
    "系统设计",
    "programming",
    "code",
    "algorithm",
    "data structure",
    "software architecture",
    "system design",
];

/// Classifies postings against two immutable dictionaries. Construct once at
/// startup from the run configuration; never mutated afterwards.
pub struct KeywordClassifier {
    keywords: Vec<String>,
    strong_keywords: Vec<String>,
}

impl KeywordClassifier {
    pub fn new(keywords: Vec<String>, strong_keywords: Vec<String>) -> Self {
        KeywordClassifier {
            keywords,
            strong_keywords,
        }
    }

    /// Classifier over the built-in dictionaries.
    pub fn with_defaults() -> Self {
        KeywordClassifier::new(
            SOFTWARE_JOB_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            STRONG_CONTENT_KEYWORDS.iter().map(|s| s.to_string()).collect(),
        )
    }

    /// Pure decision function: the same `(title, content)` always yields the
    /// same result. Tiers are evaluated in strict order and the first
    /// positive one wins; a rejection at one tier is never revisited.
    ///
    /// 1. Title tier: any dictionary keyword in the title.
    /// 2. Content tier: any dictionary keyword in the content.
    /// 3. Strong-keyword tier: no dictionary hit anywhere, but the content
    ///    carries one of the high-confidence generic terms.
    pub fn classify(&self, url: &str, title: &str, content: &str) -> Option<MatchResult> {
        let title_lower = title.to_lowercase();
        let title_hits = hits_in(&self.keywords, &title_lower);
        if !title_hits.is_empty() {
            debug!(%url, hits = title_hits.len(), "Title tier matched");
            return Some(MatchResult {
                url: url.to_string(),
                title: title.to_string(),
                reason: format!("职位名称匹配: {}", join_capped(&title_hits, 3)),
                matched_keywords: owned(title_hits),
                tier: MatchTier::Title,
            });
        }

        let content_lower = content.to_lowercase();
        let content_hits = hits_in(&self.keywords, &content_lower);
        if !content_hits.is_empty() {
            debug!(%url, hits = content_hits.len(), "Content tier matched");
            return Some(MatchResult {
                url: url.to_string(),
                title: title.to_string(),
                reason: format!("内容匹配: {}", join_capped(&content_hits, 2)),
                matched_keywords: owned(content_hits),
                tier: MatchTier::Content,
            });
        }

        let strong_hits = hits_in(&self.strong_keywords, &content_lower);
        if !strong_hits.is_empty() {
            debug!(%url, hits = strong_hits.len(), "Strong-keyword tier matched");
            return Some(MatchResult {
                url: url.to_string(),
                title: title.to_string(),
                reason: format!("内容包含强相关词: {}", strong_hits[0]),
                matched_keywords: owned(strong_hits),
                tier: MatchTier::StrongKeyword,
            });
        }

        None
    }
}

/// Dictionary entries contained in the (already lowercased) text, preserving
/// dictionary order. No tokenization or stemming.
fn hits_in<'a>(dictionary: &'a [String], lowered_text: &str) -> Vec<&'a String> {
    dictionary
        .iter()
        .filter(|keyword| lowered_text.contains(&keyword.to_lowercase()))
        .collect()
}

/// Display summary capped at `cap` entries; the full set stays in
/// `matched_keywords`.
fn join_capped(keyword_hits: &[&String], cap: usize) -> String {
    keyword_hits
        .iter()
        .take(cap)
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn owned(keyword_hits: Vec<&String>) -> Vec<String> {
    keyword_hits.into_iter().cloned().collect()
}
