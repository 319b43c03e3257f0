//! Error types for the classification adapter.

use thiserror::Error;

/// Internal errors produced while requesting or validating a
/// classification. Never propagated past the adapter — every variant is
/// converted into the safe default and logged.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// The HTTP request failed (network error, non-success status, or the
    /// per-request timeout elapsed).
    #[error("classification request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The transcript exceeded the input bound.
    #[error("transcript exceeds maximum size: {0} bytes (limit: {1} bytes)")]
    TranscriptTooLarge(usize, usize),

    /// The API response carried no text content.
    #[error("classification response carried no text content")]
    EmptyResponse,

    /// The model's output was not valid JSON.
    #[error("classification output was not valid JSON: {0}")]
    MalformedOutput(String),

    /// The model's output parsed but violated the expected schema.
    #[error("classification output violated the schema: {0}")]
    InvalidSchema(String),
}
