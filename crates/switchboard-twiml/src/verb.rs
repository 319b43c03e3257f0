//! The voice instruction model.

/// Input mode for a `Gather` instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatherInput {
    /// Collect transcribed speech.
    Speech,
    /// Collect touch-tone key presses.
    Dtmf,
}

impl GatherInput {
    /// Returns the provider's attribute value for this input mode.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Speech => "speech",
            Self::Dtmf => "dtmf",
        }
    }
}

/// A single voice instruction.
///
/// All callback-bearing instructions post form-encoded parameters back to
/// the webhook surface; the engine reconstructs call continuity from the
/// caller number and call SID the provider echoes into those callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verb {
    /// Speak text to the active leg.
    Say {
        /// Provider voice name.
        voice: &'static str,
        /// Speech language tag.
        language: &'static str,
        /// The text to speak.
        text: String,
    },
    /// Collect speech or digits, then post to `action`.
    Gather {
        /// Input mode.
        input: GatherInput,
        /// Overall timeout in seconds.
        timeout: u32,
        /// Provider-side end-of-speech detection ("auto"), speech mode only.
        speech_timeout: Option<&'static str>,
        /// Number of digits to collect, DTMF mode only.
        num_digits: Option<u32>,
        /// Callback path receiving the gathered input.
        action: String,
    },
    /// Record the caller, then post to `action`.
    Record {
        /// Callback path receiving the recording metadata.
        action: String,
        /// Maximum recording length in seconds.
        max_length: u32,
        /// Key that terminates the recording.
        finish_on_key: char,
        /// Whether to play a beep before recording.
        play_beep: bool,
        /// Whether to trim trailing silence.
        trim_silence: bool,
    },
    /// Bridge the call to a destination number.
    Dial {
        /// Destination number.
        number: String,
        /// Caller ID to present to the destination.
        caller_id: Option<String>,
        /// Callback path receiving the dial status.
        action: Option<String>,
        /// Seconds to wait for the destination to answer.
        timeout: Option<u32>,
        /// Document fetched and played to the destination leg before
        /// bridging (the whisper).
        whisper_url: Option<String>,
    },
    /// Wait silently.
    Pause {
        /// Pause length in seconds.
        length: u32,
    },
    /// End the call.
    Hangup,
}

/// An ordered, self-contained voice-response document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoiceResponse {
    verbs: Vec<Verb>,
}

/// Voice used for every spoken instruction.
pub(crate) const VOICE: &str = "Polly.Matthew-Neural";

/// Language tag used for every spoken instruction.
pub(crate) const LANGUAGE: &str = "en-US";

impl VoiceResponse {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the ordered instruction sequence.
    pub fn verbs(&self) -> &[Verb] {
        &self.verbs
    }

    /// Appends a spoken message in the platform voice.
    pub fn say(&mut self, text: impl Into<String>) -> &mut Self {
        self.verbs.push(Verb::Say {
            voice: VOICE,
            language: LANGUAGE,
            text: text.into(),
        });
        self
    }

    /// Appends a speech gather posting to `action`.
    pub fn gather_speech(&mut self, timeout: u32, action: impl Into<String>) -> &mut Self {
        self.verbs.push(Verb::Gather {
            input: GatherInput::Speech,
            timeout,
            speech_timeout: Some("auto"),
            num_digits: None,
            action: action.into(),
        });
        self
    }

    /// Appends a single-digit DTMF gather posting to `action`.
    pub fn gather_digit(&mut self, timeout: u32, action: impl Into<String>) -> &mut Self {
        self.verbs.push(Verb::Gather {
            input: GatherInput::Dtmf,
            timeout,
            speech_timeout: None,
            num_digits: Some(1),
            action: action.into(),
        });
        self
    }

    /// Appends a recording instruction posting to `action`.
    pub fn record(
        &mut self,
        action: impl Into<String>,
        max_length: u32,
        finish_on_key: char,
    ) -> &mut Self {
        self.verbs.push(Verb::Record {
            action: action.into(),
            max_length,
            finish_on_key,
            play_beep: true,
            trim_silence: true,
        });
        self
    }

    /// Appends a dial instruction.
    pub fn dial(
        &mut self,
        number: impl Into<String>,
        caller_id: Option<String>,
        action: Option<String>,
        timeout: Option<u32>,
        whisper_url: Option<String>,
    ) -> &mut Self {
        self.verbs.push(Verb::Dial {
            number: number.into(),
            caller_id,
            action,
            timeout,
            whisper_url,
        });
        self
    }

    /// Appends a silent pause.
    pub fn pause(&mut self, length: u32) -> &mut Self {
        self.verbs.push(Verb::Pause { length });
        self
    }

    /// Appends a hangup.
    pub fn hangup(&mut self) -> &mut Self {
        self.verbs.push(Verb::Hangup);
        self
    }
}
