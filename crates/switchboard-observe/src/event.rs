//! Notification payload types for the dashboard stream.

use serde::{Deserialize, Serialize};
use switchboard_types::{CallCategory, RoutingOutcome};

/// Structured notification payloads, one per engine transition.
///
/// Payloads are serialised to JSON for the SSE stream. Each variant
/// corresponds to an `event` tag string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CallNotification {
    /// A call arrived; fired before any lookup so dashboards see every
    /// attempt even if a later step fails.
    IncomingCall {
        /// The caller's number.
        from_number: String,
        /// The provider's call identifier.
        call_sid: String,
    },

    /// Caller matched a blacklist entry; compliance handling engaged.
    BlacklistedCall {
        /// The caller's number.
        from_number: String,
        /// Why the number was listed.
        reason: String,
    },

    /// Caller matched a contact; direct forwarding engaged.
    WhitelistedCall {
        /// The caller's number.
        from_number: String,
        /// The matched contact's name.
        contact_name: String,
    },

    /// Unknown caller; the screening greeting is playing.
    CallScreening {
        /// The caller's number.
        from_number: String,
    },

    /// A screening transcript was submitted for analysis.
    AnalysisStarted {
        /// The caller's number.
        from_number: String,
    },

    /// Analysis finished.
    AnalysisComplete {
        /// The caller's number.
        from_number: String,
        /// The assigned category.
        category: CallCategory,
        /// One-sentence summary of the request.
        summary: String,
    },

    /// A routing decision completed.
    CallRouted {
        /// The caller's number.
        from_number: String,
        /// The terminal outcome.
        outcome: RoutingOutcome,
        /// Human-readable summary of the decision.
        summary: String,
    },

    /// A voicemail recording finished.
    VoicemailRecorded {
        /// The caller's number.
        from_number: String,
        /// Where the provider stored the recording.
        recording_url: String,
    },

    /// The recipient accepted a forwarded call.
    CallAccepted {
        /// The caller's number.
        from_number: String,
    },

    /// The recipient declined or never answered a forwarded call.
    CallNotAccepted {
        /// The caller's number.
        from_number: String,
    },

    /// An internal failure; the caller received the fallback rejection.
    RoutingError {
        /// The caller's number.
        from_number: String,
        /// What went wrong.
        detail: String,
    },
}

impl CallNotification {
    /// Returns the canonical event tag string for this payload.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::IncomingCall { .. } => "INCOMING_CALL",
            Self::BlacklistedCall { .. } => "BLACKLISTED_CALL",
            Self::WhitelistedCall { .. } => "WHITELISTED_CALL",
            Self::CallScreening { .. } => "CALL_SCREENING",
            Self::AnalysisStarted { .. } => "ANALYSIS_STARTED",
            Self::AnalysisComplete { .. } => "ANALYSIS_COMPLETE",
            Self::CallRouted { .. } => "CALL_ROUTED",
            Self::VoicemailRecorded { .. } => "VOICEMAIL_RECORDED",
            Self::CallAccepted { .. } => "CALL_ACCEPTED",
            Self::CallNotAccepted { .. } => "CALL_NOT_ACCEPTED",
            Self::RoutingError { .. } => "ROUTING_ERROR",
        }
    }

    /// Returns the caller number this notification concerns.
    pub fn from_number(&self) -> &str {
        match self {
            Self::IncomingCall { from_number, .. }
            | Self::BlacklistedCall { from_number, .. }
            | Self::WhitelistedCall { from_number, .. }
            | Self::CallScreening { from_number }
            | Self::AnalysisStarted { from_number }
            | Self::AnalysisComplete { from_number, .. }
            | Self::CallRouted { from_number, .. }
            | Self::VoicemailRecorded { from_number, .. }
            | Self::CallAccepted { from_number }
            | Self::CallNotAccepted { from_number }
            | Self::RoutingError { from_number, .. } => from_number,
        }
    }
}
