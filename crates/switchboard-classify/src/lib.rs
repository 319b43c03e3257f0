//! Speech classification for the Switchboard platform.
//!
//! Wraps the external language-model capability behind the
//! [`SpeechClassifier`] trait: transcript text in, validated
//! category-plus-summary out. The adapter enforces output-schema validation
//! and a fallback-on-failure policy — the routing engine must never block
//! or crash because a classification call failed, so the public entry
//! point is infallible and substitutes a safe default on any error.
//!
//! A live caller is on hold while this runs, so the request carries a
//! short bounded timeout and is never retried; one failed attempt is
//! terminal for that call.

mod anthropic;
mod error;

pub use anthropic::AnthropicClassifier;
pub use error::ClassifyError;

use async_trait::async_trait;
use switchboard_types::{CallCategory, Classification};

/// Summary text used whenever classification fails or returns an invalid
/// schema.
pub const FALLBACK_SUMMARY: &str = "Unable to analyze caller message - defaulting to support";

/// Returns the safe default classification.
///
/// Support routes to voicemail, the least harmful destination for a call
/// we could not analyze.
pub fn fallback_classification() -> Classification {
    Classification {
        category: CallCategory::Support,
        summary: FALLBACK_SUMMARY.to_string(),
    }
}

/// Classifies an unknown caller's transcribed speech.
///
/// Implementations must be total: any internal failure is replaced with
/// [`fallback_classification`] rather than surfaced to the caller.
#[async_trait]
pub trait SpeechClassifier: Send + Sync {
    /// Classifies the transcript, always producing a valid result.
    async fn classify(&self, text: &str) -> Classification;
}
