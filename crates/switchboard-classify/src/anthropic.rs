//! Anthropic Messages API classifier.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use switchboard_types::{CallCategory, Classification};

use crate::error::ClassifyError;
use crate::{fallback_classification, SpeechClassifier};

/// Maximum transcript size accepted for classification (8 KiB). Provider
/// transcripts are far smaller; the bound protects the prompt budget.
const MAX_TRANSCRIPT_BYTES: usize = 8 * 1024;

/// Per-request timeout. The caller is on hold waiting for the provider's
/// next instruction, so exceeding this is a failure, not a slow path.
const CLASSIFY_TIMEOUT: Duration = Duration::from_secs(5);

/// Default model for transcript classification.
const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";

const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/messages";

const API_VERSION: &str = "2023-06-01";

/// Classifier backed by the Anthropic Messages API.
///
/// Single-shot: one request per call, no retries, bounded timeout. Any
/// failure — transport, malformed body, schema violation — yields the
/// safe default rather than an error.
#[derive(Debug, Clone)]
pub struct AnthropicClassifier {
    client: reqwest::Client,
    api_key: String,
    model: String,
    api_url: String,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct RawAnalysis {
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    summary: Option<String>,
}

impl AnthropicClassifier {
    /// Creates a classifier with the default model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_model(api_key, DEFAULT_MODEL)
    }

    /// Creates a classifier with an explicit model name.
    pub fn with_model(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }

    /// Overrides the API endpoint. Test hook.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    async fn request_classification(&self, text: &str) -> Result<Classification, ClassifyError> {
        if text.len() > MAX_TRANSCRIPT_BYTES {
            return Err(ClassifyError::TranscriptTooLarge(
                text.len(),
                MAX_TRANSCRIPT_BYTES,
            ));
        }

        let prompt = format!(
            "Analyze the following caller's message: '{text}' Classify the message's \
             intent into one of the following categories: [Sales, Support, Personal, \
             Urgent, Spam]. Provide a concise, one-sentence summary of the request. \
             Respond ONLY with a valid JSON object in the format: \
             {{ \"category\": \"...\", \"summary\": \"...\" }}"
        );

        let request = MessagesRequest {
            model: &self.model,
            max_tokens: 150,
            temperature: 0.1,
            messages: vec![Message {
                role: "user",
                content: &prompt,
            }],
        };

        let response = self
            .client
            .post(&self.api_url)
            .timeout(CLASSIFY_TIMEOUT)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<MessagesResponse>()
            .await?;

        let content = response
            .content
            .first()
            .map(|block| block.text.trim())
            .filter(|text| !text.is_empty())
            .ok_or(ClassifyError::EmptyResponse)?;

        parse_classification(content)
    }
}

/// Parses and validates the model's JSON output.
///
/// # Errors
///
/// Returns `ClassifyError::MalformedOutput` for non-JSON content and
/// `ClassifyError::InvalidSchema` when a field is missing, empty, or the
/// category falls outside the closed set. The adapter converts both into
/// the safe default.
fn parse_classification(content: &str) -> Result<Classification, ClassifyError> {
    let raw: RawAnalysis = serde_json::from_str(content)
        .map_err(|e| ClassifyError::MalformedOutput(e.to_string()))?;

    let category_raw = raw
        .category
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ClassifyError::InvalidSchema("missing category".to_string()))?;
    let summary = raw
        .summary
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ClassifyError::InvalidSchema("missing summary".to_string()))?;

    let category = CallCategory::from_str(&category_raw).map_err(|_| {
        ClassifyError::InvalidSchema(format!("category outside the fixed set: {category_raw}"))
    })?;

    Ok(Classification { category, summary })
}

#[async_trait]
impl SpeechClassifier for AnthropicClassifier {
    async fn classify(&self, text: &str) -> Classification {
        match self.request_classification(text).await {
            Ok(classification) => {
                tracing::info!(
                    category = classification.category.as_str(),
                    summary = %classification.summary,
                    "caller message classified"
                );
                classification
            }
            Err(e) => {
                tracing::warn!(error = %e, "classification failed, using safe default");
                fallback_classification()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FALLBACK_SUMMARY;

    #[test]
    fn parse_accepts_well_formed_output() {
        let parsed = parse_classification(
            r#"{ "category": "Support", "summary": "Account inquiry" }"#,
        )
        .expect("should parse");
        assert_eq!(parsed.category, CallCategory::Support);
        assert_eq!(parsed.summary, "Account inquiry");
    }

    #[test]
    fn parse_rejects_non_json_content() {
        let err = parse_classification("I think this is a sales call.")
            .expect_err("prose should fail");
        assert!(matches!(err, ClassifyError::MalformedOutput(_)));
    }

    #[test]
    fn parse_rejects_missing_fields() {
        for content in [
            r#"{ "category": "Support" }"#,
            r#"{ "summary": "Account inquiry" }"#,
            r#"{ "category": "", "summary": "Account inquiry" }"#,
            r#"{ "category": "Support", "summary": "" }"#,
            r#"{}"#,
        ] {
            let err = parse_classification(content).expect_err("schema violation should fail");
            assert!(matches!(err, ClassifyError::InvalidSchema(_)), "{content}");
        }
    }

    #[test]
    fn parse_rejects_category_outside_fixed_set() {
        let err = parse_classification(
            r#"{ "category": "Billing", "summary": "Invoice question" }"#,
        )
        .expect_err("unknown category should fail");
        assert!(matches!(err, ClassifyError::InvalidSchema(_)));
    }

    #[tokio::test]
    async fn unreachable_endpoint_falls_back_to_default() {
        // Port 9 (discard) refuses connections immediately.
        let classifier = AnthropicClassifier::new("test-key")
            .with_api_url("http://127.0.0.1:9/v1/messages");

        let classification = classifier.classify("I need help with my account").await;
        assert_eq!(classification.category, CallCategory::Support);
        assert_eq!(classification.summary, FALLBACK_SUMMARY);
    }

    #[tokio::test]
    async fn oversized_transcript_falls_back_to_default() {
        let classifier = AnthropicClassifier::new("test-key")
            .with_api_url("http://127.0.0.1:9/v1/messages");

        let transcript = "a".repeat(MAX_TRANSCRIPT_BYTES + 1);
        let classification = classifier.classify(&transcript).await;
        assert_eq!(classification.summary, FALLBACK_SUMMARY);
    }
}
