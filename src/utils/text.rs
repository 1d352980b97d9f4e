// Text utils shared by the extraction cascades.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Node};

/// Collapse all whitespace runs (spaces, blank lines, tabs) to single spaces.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to at most `max` characters, counted in chars so CJK text is
/// never split mid-codepoint.
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        text.chars().take(max).collect()
    }
}

/// Flattened text of one element, whitespace-normalized. Does not skip any
/// subtree; use `visible_text` where script/style must be discarded.
pub fn element_text(element: ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

/// Text of an element subtree with the named child subtrees (script/style
/// and friends) discarded before extraction, whitespace-normalized.
pub fn visible_text(root: ElementRef<'_>, skip_tags: &[&str]) -> String {
    let mut buf = String::new();
    collect_text(root, skip_tags, &mut buf);
    normalize_whitespace(&buf)
}

fn collect_text(element: ElementRef<'_>, skip_tags: &[&str], buf: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                buf.push_str(text);
                buf.push(' ');
            }
            Node::Element(child_element) => {
                if skip_tags.contains(&child_element.name()) {
                    continue;
                }
                if let Some(child_ref) = ElementRef::wrap(child) {
                    collect_text(child_ref, skip_tags, buf);
                }
            }
            _ => {}
        }
    }
}

static CJK_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\p{Han}{2,}").expect("Failed to compile CJK run regex"));

/// Contiguous CJK runs of at least two characters, in document order.
pub fn cjk_runs(text: &str) -> Vec<&str> {
    CJK_RUN.find_iter(text).map(|m| m.as_str()).collect()
}
