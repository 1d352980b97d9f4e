use thiserror::Error;

/// Custom Result type for this crate.
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// The Error type for scraping pipeline operations.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Configuration validation error: {0}")]
    ConfigValidationError(String),

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    /// Transport failure, timeout or non-2xx status while fetching one URL.
    /// Recoverable at the per-URL level: the batch logs it and moves on.
    #[error("Network error fetching '{url}': {reason}")]
    Network { url: String, reason: String },

    /// A dynamic fetch never produced a plausible document within its retry
    /// budget. Also recoverable at the per-URL level.
    #[error("Render timed out for '{url}' after {attempts} attempt(s)")]
    RenderTimeout { url: String, attempts: u32 },

    /// The browser-automation session could not be acquired. Fatal for the
    /// whole run: without a session no URL can be processed, so this is
    /// surfaced before the batch starts.
    #[error("Browser session error: {0}")]
    BrowserSession(String),

    #[error("Serialization/Deserialization error: {source}")]
    SerializationError {
        #[from]
        source: serde_json::Error,
    },

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}
