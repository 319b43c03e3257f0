//! Telephony webhook handlers.
//!
//! One endpoint per engine entry point, plus the two whisper-document
//! endpoints the provider fetches for the destination leg. The provider
//! posts `application/x-www-form-urlencoded` parameters and expects a
//! `text/xml` response document; the engine guarantees a complete document
//! for every request, so these handlers are infallible.

use crate::AppState;
use axum::{
    extract::{Extension, Form, Query},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use switchboard_twiml::scenarios;
use switchboard_types::CallEvent;

/// A rendered TwiML response.
pub struct Xml(pub String);

impl IntoResponse for Xml {
    fn into_response(self) -> Response {
        ([(header::CONTENT_TYPE, "text/xml")], self.0).into_response()
    }
}

/// Parameters common to every provider callback.
///
/// Fields default to empty rather than failing extraction: a malformed
/// webhook still deserves a valid response document.
#[derive(Debug, Deserialize)]
pub struct VoiceWebhook {
    /// The caller's number.
    #[serde(rename = "From", default)]
    pub from: String,
    /// The provider's call identifier.
    #[serde(rename = "CallSid", default)]
    pub call_sid: String,
}

/// Parameters for the speech-gather callback.
#[derive(Debug, Deserialize)]
pub struct GatherWebhook {
    #[serde(rename = "From", default)]
    pub from: String,
    #[serde(rename = "CallSid", default)]
    pub call_sid: String,
    /// The transcribed speech, absent when nothing was captured.
    #[serde(rename = "SpeechResult")]
    pub speech_result: Option<String>,
}

/// Parameters for the recording-complete callback.
#[derive(Debug, Deserialize)]
pub struct RecordingWebhook {
    #[serde(rename = "From", default)]
    pub from: String,
    #[serde(rename = "CallSid", default)]
    pub call_sid: String,
    /// Where the provider stored the recording.
    #[serde(rename = "RecordingUrl")]
    pub recording_url: Option<String>,
}

/// Parameters for the dial-status callback.
#[derive(Debug, Deserialize)]
pub struct DialStatusWebhook {
    #[serde(rename = "From", default)]
    pub from: String,
    #[serde(rename = "CallSid", default)]
    pub call_sid: String,
    /// Outcome of the outbound leg.
    #[serde(rename = "DialCallStatus")]
    pub dial_call_status: Option<String>,
}

/// Parameters for digit-gather callbacks (whisper-confirm and do-not-call).
#[derive(Debug, Deserialize)]
pub struct DigitsWebhook {
    #[serde(rename = "From", default)]
    pub from: String,
    #[serde(rename = "CallSid", default)]
    pub call_sid: String,
    /// The gathered key press, absent when the callback carried no digits.
    #[serde(rename = "Digits")]
    pub digits: Option<String>,
}

/// Query parameters for the direct-forwarding whisper document.
#[derive(Debug, Deserialize)]
pub struct WhisperQuery {
    /// The matched contact's name.
    pub name: Option<String>,
}

/// Query parameters for the screened-forwarding whisper document.
#[derive(Debug, Deserialize)]
pub struct ScreenedWhisperQuery {
    /// The analysis summary to whisper.
    pub summary: Option<String>,
}

/// Handler for `POST /voice` — the inbound call entry point.
pub async fn voice_handler(
    Extension(state): Extension<Arc<AppState>>,
    Form(payload): Form<VoiceWebhook>,
) -> Xml {
    let call = CallEvent::new(payload.from, payload.call_sid);
    let document = state.engine.handle_incoming(&call).await;
    Xml(document.render())
}

/// Handler for `POST /handle-gather` — the screening transcript.
pub async fn gather_handler(
    Extension(state): Extension<Arc<AppState>>,
    Form(payload): Form<GatherWebhook>,
) -> Xml {
    let call = CallEvent::new(payload.from, payload.call_sid);
    let document = state
        .engine
        .handle_speech(&call, payload.speech_result.as_deref())
        .await;
    Xml(document.render())
}

/// Handler for `POST /handle-recording` — voicemail completion.
pub async fn recording_handler(
    Extension(state): Extension<Arc<AppState>>,
    Form(payload): Form<RecordingWebhook>,
) -> Xml {
    let call = CallEvent::new(payload.from, payload.call_sid);
    let document = state
        .engine
        .handle_recording_complete(&call, payload.recording_url.as_deref())
        .await;
    Xml(document.render())
}

/// Handler for `POST /handle-dial-status` — the forwarded leg's outcome.
pub async fn dial_status_handler(
    Extension(state): Extension<Arc<AppState>>,
    Form(payload): Form<DialStatusWebhook>,
) -> Xml {
    let call = CallEvent::new(payload.from, payload.call_sid);
    let document = state
        .engine
        .handle_dial_status(&call, payload.dial_call_status.as_deref())
        .await;
    Xml(document.render())
}

/// Handler for `POST /handle-accept` — the whisper-confirm key press.
pub async fn accept_handler(
    Extension(state): Extension<Arc<AppState>>,
    Form(payload): Form<DigitsWebhook>,
) -> Xml {
    let call = CallEvent::new(payload.from, payload.call_sid);
    let document = state
        .engine
        .handle_acceptance(&call, payload.digits.as_deref())
        .await;
    Xml(document.render())
}

/// Handler for `POST /handle-tcpa` — the do-not-call response digit.
pub async fn tcpa_handler(
    Extension(state): Extension<Arc<AppState>>,
    Form(payload): Form<DigitsWebhook>,
) -> Xml {
    let call = CallEvent::new(payload.from, payload.call_sid);
    let document = state
        .engine
        .handle_tcpa(&call, payload.digits.as_deref())
        .await;
    Xml(document.render())
}

/// Handler for `/whisper` — whisper-confirm document for a direct call.
///
/// Builder-only: the provider fetches this for the destination leg, so
/// there is no routing decision to make.
pub async fn whisper_handler(Query(params): Query<WhisperQuery>) -> Xml {
    Xml(scenarios::whisper_confirm(params.name.as_deref()).render())
}

/// Handler for `/whisper-screened` — whisper-confirm document for a
/// screened call.
pub async fn screened_whisper_handler(Query(params): Query<ScreenedWhisperQuery>) -> Xml {
    Xml(scenarios::screened_whisper_confirm(params.summary.as_deref()).render())
}
