//! Shared domain types for the Switchboard call-screening platform.
//!
//! This crate provides the foundational types used across all Switchboard
//! crates: call categories, routing outcomes, blacklist pattern kinds, and
//! the record types for contacts, blacklist entries, and call logs.
//!
//! No crate in the workspace depends on anything *except*
//! `switchboard-types` for cross-cutting type definitions. This keeps the
//! dependency graph clean and prevents circular dependencies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Intent categories assigned to an unknown caller's transcribed speech.
///
/// The set is closed on purpose: the routing policy matches exhaustively
/// on it, so adding a category forces a compile-time routing decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallCategory {
    /// A sales or business-development call.
    Sales,
    /// A support or account-related request.
    Support,
    /// A personal call for the line owner.
    Personal,
    /// Something that cannot wait for voicemail.
    Urgent,
    /// Robocalls, scams, and other unwanted traffic.
    Spam,
}

impl CallCategory {
    /// Returns the canonical string label for this category.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sales => "Sales",
            Self::Support => "Support",
            Self::Personal => "Personal",
            Self::Urgent => "Urgent",
            Self::Spam => "Spam",
        }
    }
}

impl std::fmt::Display for CallCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CallCategory {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Sales" => Ok(Self::Sales),
            "Support" => Ok(Self::Support),
            "Personal" => Ok(Self::Personal),
            "Urgent" => Ok(Self::Urgent),
            "Spam" => Ok(Self::Spam),
            _ => Err(ParseCategoryError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown call category string.
#[derive(Debug, Clone)]
pub struct ParseCategoryError(pub String);

impl std::fmt::Display for ParseCategoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown call category: {}", self.0)
    }
}

impl std::error::Error for ParseCategoryError {}

/// The terminal label attached to a completed routing decision.
///
/// Drives both the call-log status column and the dashboard notification
/// payload. Exactly one outcome is produced per engine entry-point
/// invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoutingOutcome {
    /// Caller matched a contact and was forwarded directly.
    Whitelisted,
    /// Caller matched a blacklist entry and received compliance handling.
    Blacklisted,
    /// Unknown caller, screening greeting played (non-terminal progress).
    Screening,
    /// Screened caller forwarded to the personal line.
    Forwarded,
    /// Screened caller sent to voicemail.
    Voicemail,
    /// Caller rejected and hung up on.
    Rejected,
    /// Blacklisted caller requested do-not-call removal.
    TcpaRemoval,
    /// Internal failure; the caller received the fallback rejection.
    Error,
}

impl RoutingOutcome {
    /// Returns the call-log status label for this outcome.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Whitelisted => "Whitelisted",
            Self::Blacklisted => "Blacklisted",
            Self::Screening => "Screening",
            Self::Forwarded => "Forwarded",
            Self::Voicemail => "Voicemail",
            Self::Rejected => "Rejected",
            Self::TcpaRemoval => "TCPA Removal",
            Self::Error => "Error",
        }
    }
}

impl std::fmt::Display for RoutingOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of the whisper-confirm sub-flow on a forwarded call leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AcceptanceOutcome {
    /// The recipient pressed a key; the legs were bridged.
    Accepted,
    /// The recipient timed out or the leg failed; the caller was dropped.
    NotAccepted,
}

impl AcceptanceOutcome {
    /// Returns the call-log status label for this acceptance result.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Accepted => "Accepted",
            Self::NotAccepted => "NotAccepted",
        }
    }
}

/// Matching semantics for a blacklist entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    /// Normalized incoming number equals normalized stored number.
    Exact,
    /// The incoming number's area code equals the stored bare area code.
    AreaCode,
    /// The incoming number's digits start with the stored digits.
    Prefix,
}

impl PatternType {
    /// Returns the stored string form for this pattern type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::AreaCode => "area_code",
            Self::Prefix => "prefix",
        }
    }
}

impl std::str::FromStr for PatternType {
    type Err = ParsePatternTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact" => Ok(Self::Exact),
            "area_code" => Ok(Self::AreaCode),
            "prefix" => Ok(Self::Prefix),
            _ => Err(ParsePatternTypeError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown pattern type string.
#[derive(Debug, Clone)]
pub struct ParsePatternTypeError(pub String);

impl std::fmt::Display for ParsePatternTypeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown pattern type: {}", self.0)
    }
}

impl std::error::Error for ParsePatternTypeError {}

/// A whitelisted contact entitled to direct forwarding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Database row ID.
    pub id: i64,
    /// Display name, used in the whisper message.
    pub name: String,
    /// Phone number as entered; matching normalizes at read time.
    pub phone_number: String,
}

/// A blacklisted number subject to do-not-call compliance handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlacklistEntry {
    /// Database row ID.
    pub id: i64,
    /// The stored number or pattern value.
    pub phone_number: String,
    /// Why the number was listed (e.g., "Robocaller").
    pub reason: String,
    /// Which matching semantics apply to `phone_number`.
    pub pattern_type: PatternType,
    /// ISO 8601 timestamp of when the entry was added.
    pub date_added: String,
}

/// A single row from the `call_logs` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallLogEntry {
    /// Database row ID.
    pub id: i64,
    /// The caller's number as received from the provider.
    pub from_number: String,
    /// Routing outcome or acceptance status label.
    pub status: String,
    /// Human-readable summary of the decision.
    pub summary: Option<String>,
    /// Recording URL, set after a voicemail completes.
    pub recording_url: Option<String>,
    /// ISO 8601 timestamp of the log entry.
    pub timestamp: String,
}

/// An inbound call event, one per webhook invocation.
///
/// Ephemeral — the engine holds no state between provider callbacks; all
/// continuity is reconstructed from the number and call SID the provider
/// echoes back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallEvent {
    /// The caller's number (`From` webhook parameter).
    pub from_number: String,
    /// The provider's call identifier (`CallSid` webhook parameter).
    pub call_sid: String,
    /// When this webhook invocation was received.
    pub received_at: DateTime<Utc>,
}

impl CallEvent {
    /// Creates a call event stamped with the current time.
    pub fn new(from_number: impl Into<String>, call_sid: impl Into<String>) -> Self {
        Self {
            from_number: from_number.into(),
            call_sid: call_sid.into(),
            received_at: Utc::now(),
        }
    }
}

/// A validated classification of a caller's transcribed speech.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// The assigned intent category.
    pub category: CallCategory,
    /// One-sentence summary of the caller's request.
    pub summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn category_round_trip() {
        for category in [
            CallCategory::Sales,
            CallCategory::Support,
            CallCategory::Personal,
            CallCategory::Urgent,
            CallCategory::Spam,
        ] {
            let label = category.as_str();
            assert_eq!(CallCategory::from_str(label).unwrap(), category);
        }
    }

    #[test]
    fn category_rejects_unknown_strings() {
        assert!(CallCategory::from_str("sales").is_err());
        assert!(CallCategory::from_str("Billing").is_err());
        assert!(CallCategory::from_str("").is_err());
    }

    #[test]
    fn category_serde_uses_exact_names() {
        let json = serde_json::to_string(&CallCategory::Urgent).unwrap();
        assert_eq!(json, "\"Urgent\"");
        let back: CallCategory = serde_json::from_str("\"Spam\"").unwrap();
        assert_eq!(back, CallCategory::Spam);
    }

    #[test]
    fn outcome_labels() {
        assert_eq!(RoutingOutcome::Whitelisted.as_str(), "Whitelisted");
        assert_eq!(RoutingOutcome::TcpaRemoval.as_str(), "TCPA Removal");
        assert_eq!(RoutingOutcome::Error.as_str(), "Error");
    }

    #[test]
    fn pattern_type_round_trip() {
        for pattern in [PatternType::Exact, PatternType::AreaCode, PatternType::Prefix] {
            assert_eq!(PatternType::from_str(pattern.as_str()).unwrap(), pattern);
        }
        assert!(PatternType::from_str("fuzzy").is_err());
    }

    #[test]
    fn pattern_type_serde_is_snake_case() {
        let json = serde_json::to_string(&PatternType::AreaCode).unwrap();
        assert_eq!(json, "\"area_code\"");
    }

    #[test]
    fn call_event_carries_identifiers() {
        let event = CallEvent::new("+15551234567", "CA123");
        assert_eq!(event.from_number, "+15551234567");
        assert_eq!(event.call_sid, "CA123");
    }
}
