//! Error types for newswatch.
//!
//! The taxonomy separates failures that abort a pipeline run (an unreachable
//! or misbehaving source) from failures that are contained at a boundary.
//! Notification rejection is deliberately NOT represented here: a channel
//! reports acceptance as a boolean and never raises past its own boundary.

/// Top-level error type for all newswatch operations.
#[derive(Debug, thiserror::Error)]
pub enum NewswatchError {
    /// The source page could not be retrieved (transport fault or
    /// non-success HTTP status). Aborts the current pipeline run.
    #[error("source unavailable: {url}: {reason}")]
    SourceUnavailable { url: String, reason: String },

    /// The configured story selector path is not valid CSS. Distinct from a
    /// malformed story block, which is skipped rather than raised.
    #[error("extraction error: {message}")]
    Extraction { message: String },

    /// A required credential or address is absent at startup.
    #[error("missing required configuration: {0}")]
    MissingConfig(String),

    /// The configuration file could not be read or parsed.
    #[error("config error: {message}")]
    Config { message: String },

    /// A scheduled fire time could not be parsed.
    #[error("schedule error: {message}")]
    Schedule { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, NewswatchError>;

impl NewswatchError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create an extraction error from any displayable message.
    pub fn extraction(msg: impl Into<String>) -> Self {
        Self::Extraction {
            message: msg.into(),
        }
    }

    /// Create a schedule error from any displayable message.
    pub fn schedule(msg: impl Into<String>) -> Self {
        Self::Schedule {
            message: msg.into(),
        }
    }

    /// Wrap a source retrieval failure with the page URL for context.
    pub fn source_unavailable(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            url: url.into(),
            reason: reason.into(),
        }
    }
}
