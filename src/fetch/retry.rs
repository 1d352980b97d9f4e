// Bounded-retry policy for dynamic fetches, kept independent of the browser
// specifics so the jitter maths and the abandon condition stay unit-testable.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, warn};

use crate::error::{Result, ScrapeError};

/// How many navigation attempts a URL gets and how long to back off between
/// them.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff_ms: (u64, u64),
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff_ms: (u64, u64)) -> Result<Self> {
        if max_attempts == 0 {
            return Err(ScrapeError::ConfigValidationError(
                "RetryPolicy: max_attempts must be greater than 0".to_string(),
            ));
        }
        if backoff_ms.0 > backoff_ms.1 {
            return Err(ScrapeError::ConfigValidationError(format!(
                "RetryPolicy: backoff range start ({}) cannot be greater than end ({})",
                backoff_ms.0, backoff_ms.1
            )));
        }
        Ok(RetryPolicy {
            max_attempts,
            backoff_ms,
        })
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Jittered backoff before the next attempt, uniform across the range.
    pub fn backoff_delay(&self) -> Duration {
        jittered_delay(self.backoff_ms)
    }
}

/// Uniform random delay drawn from a `[lo, hi]` millisecond range.
pub fn jittered_delay(range_ms: (u64, u64)) -> Duration {
    let (lo, hi) = range_ms;
    let ms = if lo == hi {
        lo
    } else {
        rand::thread_rng().gen_range(lo..=hi)
    };
    Duration::from_millis(ms)
}

/// The abandon condition for one render attempt: documents shorter than
/// `min_len` chars are treated as a blocked or empty render.
pub fn plausible_document(html: &str, min_len: usize) -> bool {
    html.chars().count() >= min_len
}

/// Drives render attempts under the policy. An attempt is rejected when it
/// errors or when its document stays under the plausibility floor; rejected
/// attempts back off and retry until the policy's budget runs out, which
/// abandons the URL with `RenderTimeout`.
pub async fn render_with_retries<F, Fut>(
    url: &str,
    policy: &RetryPolicy,
    min_page_length: usize,
    mut render: F,
) -> Result<(String, u32)>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<String>>,
{
    for attempt in 1..=policy.max_attempts() {
        match render().await {
            Ok(html) if plausible_document(&html, min_page_length) => {
                debug!(%url, attempt, chars = html.chars().count(), "Rendered document accepted");
                return Ok((html, attempt));
            }
            Ok(html) => {
                warn!(
                    %url,
                    attempt,
                    chars = html.chars().count(),
                    floor = min_page_length,
                    "Rendered document implausibly small; treating as blocked"
                );
            }
            Err(e) => {
                warn!(%url, attempt, error = %e, "Render attempt failed");
            }
        }

        if attempt < policy.max_attempts() {
            tokio::time::sleep(policy.backoff_delay()).await;
        }
    }

    Err(ScrapeError::RenderTimeout {
        url: url.to_string(),
        attempts: policy.max_attempts(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_new_rejects_zero_attempts() {
        let result = RetryPolicy::new(0, (100, 200));
        assert!(matches!(
            result,
            Err(ScrapeError::ConfigValidationError(msg)) if msg.contains("max_attempts")
        ));
    }

    #[test]
    fn test_new_rejects_inverted_range() {
        let result = RetryPolicy::new(3, (200, 100));
        assert!(matches!(
            result,
            Err(ScrapeError::ConfigValidationError(msg)) if msg.contains("backoff range")
        ));
    }

    #[test]
    fn test_backoff_delay_stays_in_range() {
        let policy = RetryPolicy::new(3, (50, 80)).unwrap();
        for _ in 0..100 {
            let delay = policy.backoff_delay();
            assert!(delay >= Duration::from_millis(50));
            assert!(delay <= Duration::from_millis(80));
        }
    }

    #[test]
    fn test_degenerate_range_is_fixed_delay() {
        let policy = RetryPolicy::new(1, (250, 250)).unwrap();
        assert_eq!(policy.backoff_delay(), Duration::from_millis(250));
        assert_eq!(jittered_delay((0, 0)), Duration::ZERO);
    }

    #[test]
    fn test_plausible_document_floor() {
        assert!(!plausible_document("", 1));
        assert!(!plausible_document("tiny page", 1000));
        assert!(plausible_document(&"长".repeat(1000), 1000));
        assert!(plausible_document("anything", 0));
        // Chars, not bytes: 400 CJK chars are 1200 bytes but still below a
        // 1000-char floor.
        assert!(!plausible_document(&"页".repeat(400), 1000));
    }

    #[tokio::test]
    async fn test_sub_floor_documents_exhaust_the_retry_budget() {
        let policy = RetryPolicy::new(3, (0, 0)).unwrap();
        let calls = AtomicU32::new(0);

        // Every attempt renders a 400-char document, well under the floor.
        let result = render_with_retries("https://example.com/j/slow", &policy, 1000, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok("x".repeat(400)) }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(matches!(
            result,
            Err(ScrapeError::RenderTimeout { attempts: 3, ref url }) if url == "https://example.com/j/slow"
        ));
    }

    #[tokio::test]
    async fn test_retry_recovers_once_a_render_clears_the_floor() {
        let policy = RetryPolicy::new(3, (0, 0)).unwrap();
        let calls = AtomicU32::new(0);

        let result = render_with_retries("https://example.com/j/flaky", &policy, 10, || {
            let attempt = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if attempt == 1 {
                    Ok("tiny".to_string())
                } else {
                    Ok("a document long enough to read".to_string())
                }
            }
        })
        .await;

        let (html, attempts) = result.expect("second attempt clears the floor");
        assert_eq!(attempts, 2);
        assert!(html.contains("long enough"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_attempts_also_consume_the_budget() {
        let policy = RetryPolicy::new(2, (0, 0)).unwrap();
        let calls = AtomicU32::new(0);

        let result = render_with_retries("https://example.com/j/down", &policy, 10, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(ScrapeError::Network {
                    url: "https://example.com/j/down".to_string(),
                    reason: "navigation failed".to_string(),
                })
            }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(matches!(result, Err(ScrapeError::RenderTimeout { attempts: 2, .. })));
    }
}
