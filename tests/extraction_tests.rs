use JobSifter::classify::KeywordClassifier;
use JobSifter::data_model::{ContentStrategy, TitleStrategy, UNKNOWN_TITLE};
use JobSifter::extract::{ContentExtractor, PageDocument, TitleExtractor};

fn page(url: &str, html: &str) -> PageDocument {
    PageDocument::new(url, html)
}

fn extract_both(url: &str, html: &str) -> (String, TitleStrategy, String, ContentStrategy) {
    let doc = page(url, html);
    let (title, title_strategy) = TitleExtractor::new().extract(&doc);
    let (content, content_strategy) = ContentExtractor::new(4_000).extract(&doc);
    (title, title_strategy, content, content_strategy)
}

/// A well-structured board page: both cascades stop at their first stage.
#[test]
fn test_structured_page_uses_first_stages() {
    let html = r#"<html>
    <head><title>完全另一个标题_某招聘网</title></head>
    <body>
        <h1 class="job-title">高级Java开发工程师</h1>
        <div class="job-description">
            岗位职责：负责核心交易系统的服务端开发，参与架构设计与性能优化，
            编写高质量的代码并完善单元测试，配合团队完成每个迭代的交付目标，
            持续关注线上运行质量，推动技术债务的治理与研发流程的改进，
            参与团队的技术方案评审，为新人提供指导并沉淀内部技术文档，
            与产品和运营紧密协作，确保业务需求得到高质量的工程实现。
        </div>
    </body></html>"#;

    let (title, title_strategy, content, content_strategy) =
        extract_both("https://example.com/jobdetail/1.htm", html);

    assert_eq!(title, "高级Java开发工程师");
    assert_eq!(title_strategy, TitleStrategy::StructuredSelector);
    assert_eq!(content_strategy, ContentStrategy::DescriptionSelector);
    assert!(content.contains("岗位职责"));
    // The <title> tag's different answer never surfaces: stage 1 won.
    assert!(!title.contains("另一个"));
}

/// No structured markup at all: title comes from the document title, content
/// from the stripped body.
#[test]
fn test_degraded_page_walks_down_the_cascades() {
    let html = r#"<html>
    <head><title>Backend Developer_Acme Corp</title></head>
    <body>
        <nav>Home | Jobs | About</nav>
        <p>We are looking for a backend developer to join our platform team.
        You will design APIs, review code, and operate services in production.
        Experience with distributed systems and observability is a plus.</p>
        <footer>© Acme Corp</footer>
    </body></html>"#;

    let (title, title_strategy, content, content_strategy) =
        extract_both("https://acme.example.com/careers/backend", html);

    assert_eq!(title, "Backend Developer");
    assert_eq!(title_strategy, TitleStrategy::TitleTag);
    assert_eq!(content_strategy, ContentStrategy::BodyText);
    assert!(content.contains("backend developer"));
    assert!(!content.contains("Home | Jobs"));
    assert!(!content.contains("Acme Corp"), "footer must be stripped: {}", content);
}

/// An empty shell never fails extraction: the posting carries sentinels and
/// simply fails to classify.
#[test]
fn test_empty_shell_degrades_without_error() {
    let html = r#"<html><head></head><body><script>var boot = 1;</script></body></html>"#;
    let (title, title_strategy, content, content_strategy) =
        extract_both("https://example.com/spa", html);

    assert_eq!(title, UNKNOWN_TITLE);
    assert_eq!(title_strategy, TitleStrategy::Unknown);
    assert_eq!(content_strategy, ContentStrategy::RawDocument);
    assert_eq!(content, "");

    let verdict = KeywordClassifier::with_defaults().classify("https://example.com/spa", &title, &content);
    assert!(verdict.is_none());
}

/// End to end over markup: extraction output feeds classification.
#[test]
fn test_extracted_posting_classifies_by_content() {
    let html = r#"<html><head><title>职位详情</title></head>
    <body>
        <div class="job-description">
            任职要求：三年以上服务端开发经验，熟练掌握Java或Python，
            理解常用算法与数据结构，有良好的编程习惯与代码审查意识，
            能够独立完成模块设计与交付，具备良好的沟通协作能力。
        </div>
    </body></html>"#;

    let doc = page("https://example.com/jobdetail/88.htm", html);
    let (title, _) = TitleExtractor::new().extract(&doc);
    let (content, _) = ContentExtractor::new(4_000).extract(&doc);

    let result = KeywordClassifier::with_defaults()
        .classify("https://example.com/jobdetail/88.htm", &title, &content)
        .expect("description content should classify");
    assert_eq!(result.tier, JobSifter::data_model::MatchTier::Content);
}

/// Truncation happens after extraction, before classification sees the text.
#[test]
fn test_content_cap_is_enforced_per_run_config() {
    let mut body = String::from("岗位职责：");
    while body.chars().count() < 1_000 {
        body.push_str("负责平台服务的设计与开发，持续优化系统性能与稳定性。");
    }
    let html = format!(
        r#"<html><body><div class="job-description">{}</div></body></html>"#,
        body
    );

    let doc = page("https://example.com/j/9", &html);
    let (content, strategy) = ContentExtractor::new(120).extract(&doc);
    assert_eq!(strategy, ContentStrategy::DescriptionSelector);
    assert_eq!(content.chars().count(), 120);
}
