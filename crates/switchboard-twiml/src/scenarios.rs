//! One pure builder per routing scenario.
//!
//! Fixed prompt texts and callback paths live here so the webhook layer,
//! the engine, and the tests all agree on them. Each builder returns a
//! complete document; none can fail.

use url::form_urlencoded;

use crate::verb::VoiceResponse;

/// Callback path receiving the screening speech transcript.
pub const GATHER_ACTION: &str = "/handle-gather";

/// Callback path receiving voicemail recording metadata.
pub const RECORDING_ACTION: &str = "/handle-recording";

/// Callback path receiving the outbound leg's dial status.
pub const DIAL_STATUS_ACTION: &str = "/handle-dial-status";

/// Callback path receiving the whisper-confirm key press.
pub const ACCEPT_ACTION: &str = "/handle-accept";

/// Callback path receiving the do-not-call response digit.
pub const TCPA_ACTION: &str = "/handle-tcpa";

/// Whisper document path for direct forwarding.
pub const WHISPER_PATH: &str = "/whisper";

/// Whisper document path for screened forwarding.
pub const SCREENED_WHISPER_PATH: &str = "/whisper-screened";

/// Seconds the screening gather waits for speech to begin.
const SPEECH_GATHER_TIMEOUT_SECS: u32 = 10;

/// Seconds the whisper-confirm gather waits for a key press.
const ACCEPT_TIMEOUT_SECS: u32 = 10;

/// Seconds the do-not-call gather waits for a digit.
const TCPA_TIMEOUT_SECS: u32 = 15;

/// Seconds to wait for the destination leg to answer.
const DIAL_TIMEOUT_SECS: u32 = 20;

/// Maximum voicemail length in seconds.
const VOICEMAIL_MAX_LENGTH_SECS: u32 = 60;

/// The universal fallback text, also used by [`rejection`].
const REJECTION_TEXT: &str =
    "Sorry, I cannot take your call right now. Please try again later. Goodbye.";

fn whisper_url(path: &str, key: &str, value: Option<&str>) -> String {
    match value {
        Some(value) => {
            let query: String = form_urlencoded::Serializer::new(String::new())
                .append_pair(key, value)
                .finish();
            format!("{path}?{query}")
        }
        None => path.to_string(),
    }
}

/// Forwards a whitelisted caller to the personal line.
///
/// The destination leg fetches the whisper-confirm document before the
/// legs are bridged; the caller hears hold wording only.
pub fn direct_forwarding(
    contact_name: Option<&str>,
    destination: &str,
    caller_id: Option<&str>,
) -> VoiceResponse {
    let mut response = VoiceResponse::new();
    response.say("Please hold while I connect your call.");
    response.dial(
        destination,
        caller_id.map(str::to_string),
        Some(DIAL_STATUS_ACTION.to_string()),
        Some(DIAL_TIMEOUT_SECS),
        Some(whisper_url(WHISPER_PATH, "name", contact_name)),
    );
    response
}

/// Greets an unknown caller and gathers their stated purpose.
///
/// If the gather times out without speech, the document apologizes and
/// hangs up on its own; no callback fires in that case.
pub fn ai_greeting() -> VoiceResponse {
    let mut response = VoiceResponse::new();
    response.say("Hello. What can I help you with today?");
    response.gather_speech(SPEECH_GATHER_TIMEOUT_SECS, GATHER_ACTION);
    response.say("Sorry, I did not hear you. Please try calling back.");
    response.pause(2);
    response.hangup();
    response
}

/// Forwards a screened caller, whispering the analysis summary to the
/// recipient.
pub fn screened_forwarding(
    summary: &str,
    destination: &str,
    caller_id: Option<&str>,
) -> VoiceResponse {
    let mut response = VoiceResponse::new();
    response.say("Please hold while I connect your call.");
    response.dial(
        destination,
        caller_id.map(str::to_string),
        Some(DIAL_STATUS_ACTION.to_string()),
        Some(DIAL_TIMEOUT_SECS),
        Some(whisper_url(SCREENED_WHISPER_PATH, "summary", Some(summary))),
    );
    response
}

/// Invites the caller to leave a voicemail.
pub fn voicemail() -> VoiceResponse {
    let mut response = VoiceResponse::new();
    response.say("Please leave a message after the tone. Press pound when finished.");
    response.record(RECORDING_ACTION, VOICEMAIL_MAX_LENGTH_SECS, '#');
    // Spoken only if the recording step fails outright.
    response.say("Thank you for calling.");
    response
}

/// Politely declines the call. The universal fallback document.
pub fn rejection() -> VoiceResponse {
    let mut response = VoiceResponse::new();
    response.say(REJECTION_TEXT);
    response.hangup();
    response
}

/// Thanks the caller after a voicemail recording completes.
pub fn recording_complete() -> VoiceResponse {
    let mut response = VoiceResponse::new();
    response.say("Thank you for your message. I will get back to you soon. Goodbye.");
    response.hangup();
    response
}

/// Whisper played to the recipient leg for a whitelisted caller.
///
/// One key press accepts; silence lets the document decline and hang up
/// the leg, which surfaces to the caller as a failed dial.
pub fn whisper_confirm(contact_name: Option<&str>) -> VoiceResponse {
    let intro = match contact_name {
        Some(name) => format!("Direct call from {name}. Press any key to accept."),
        None => "Direct call from a whitelisted contact. Press any key to accept.".to_string(),
    };
    let mut response = VoiceResponse::new();
    response.say(intro);
    response.gather_digit(ACCEPT_TIMEOUT_SECS, ACCEPT_ACTION);
    response.say("No answer received. Goodbye.");
    response.hangup();
    response
}

/// Whisper played to the recipient leg for a screened caller.
pub fn screened_whisper_confirm(summary: Option<&str>) -> VoiceResponse {
    let intro = match summary {
        Some(summary) => format!("Screened call about: {summary}. Press any key to accept."),
        None => "Screened call. Press any key to accept.".to_string(),
    };
    let mut response = VoiceResponse::new();
    response.say(intro);
    response.gather_digit(ACCEPT_TIMEOUT_SECS, ACCEPT_ACTION);
    response.say("No answer received. Goodbye.");
    response.hangup();
    response
}

/// Brief confirmation after the recipient accepts; the call continues.
pub fn call_accepted() -> VoiceResponse {
    let mut response = VoiceResponse::new();
    response.say("Connecting you now.");
    response
}

/// Spoken to the caller when the outbound leg could not be completed.
pub fn dial_status_failure() -> VoiceResponse {
    let mut response = VoiceResponse::new();
    response.say("The call could not be completed. Please try again later. Goodbye.");
    response.hangup();
    response
}

/// Do-not-call compliance notice for blacklisted callers.
pub fn tcpa_compliance() -> VoiceResponse {
    let mut response = VoiceResponse::new();
    response.say(
        "This number is on a do not call list maintained by the called party. \
         Under the Telephone Consumer Protection Act, continued calls to this \
         number may result in penalties. To request removal from our records, \
         press 1 now.",
    );
    response.gather_digit(TCPA_TIMEOUT_SECS, TCPA_ACTION);
    response.say("No response received. Goodbye.");
    response.hangup();
    response
}

/// Removal instructions after a blacklisted caller presses 1.
pub fn tcpa_removal_instructions() -> VoiceResponse {
    let mut response = VoiceResponse::new();
    response.say(
        "Your removal request has been recorded. This number will be removed \
         from our records within thirty days. Goodbye.",
    );
    response.hangup();
    response
}

/// Bare hangup, used to conclude callbacks on already-finished legs.
pub fn hangup_only() -> VoiceResponse {
    let mut response = VoiceResponse::new();
    response.hangup();
    response
}
