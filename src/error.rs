// src/error.rs

//! Unified error handling for the collector.

use thiserror::Error;

/// Result type alias for collector operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Why an API reply could not be turned into an envelope.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// Body is not JSON, or its top-level value is not an object
    #[error("malformed JSON")]
    MalformedJson,

    #[error("missing response")]
    MissingResponse,

    #[error("missing header")]
    MissingHeader,

    #[error("missing body")]
    MissingBody,
}

/// Coarse classification used for retry decisions and user-facing reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Parse,
    Validation,
    Config,
    Io,
    Aborted,
}

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with something other than 200 OK
    #[error("HTTP {status} / body = {body_snippet}")]
    Status { status: u16, body_snippet: String },

    /// Envelope parsing failed
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// JSON serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller-supplied query values are malformed
    #[error("Validation error: {0}")]
    Validation(String),

    /// A page kept failing until the retry ceiling was reached
    #[error("page {page} failed after {attempts} attempt(s): {source}")]
    PageFailed {
        page: u32,
        attempts: u32,
        #[source]
        source: Box<AppError>,
    },

    /// The caller cancelled the collection
    #[error("collection aborted")]
    Aborted,
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Kind of the underlying failure. `PageFailed` reports its last cause.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Http(_) | Self::Status { .. } => ErrorKind::Transport,
            Self::Parse(_) | Self::Json(_) => ErrorKind::Parse,
            Self::Validation(_) | Self::Url(_) => ErrorKind::Validation,
            Self::Config(_) | Self::Toml(_) => ErrorKind::Config,
            Self::Io(_) => ErrorKind::Io,
            Self::PageFailed { source, .. } => source.kind(),
            Self::Aborted => ErrorKind::Aborted,
        }
    }

    /// Whether a fresh attempt at the same page could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Transport | ErrorKind::Parse)
    }
}
