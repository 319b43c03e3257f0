//! TwiML XML rendering.
//!
//! The markup dialect is a transport detail; the engine works with the
//! [`Verb`] sequence and only the webhook layer calls [`VoiceResponse::render`].

use std::fmt::Write;

use crate::verb::{Verb, VoiceResponse};

/// Escapes the five XML special characters.
///
/// Used for both text nodes and attribute values; attribute values are
/// always double-quoted, but escaping all five keeps the helper total.
fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

impl VoiceResponse {
    /// Renders the document as a TwiML XML string.
    pub fn render(&self) -> String {
        let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response>");

        for verb in self.verbs() {
            match verb {
                Verb::Say {
                    voice,
                    language,
                    text,
                } => {
                    let _ = write!(
                        xml,
                        "<Say voice=\"{}\" language=\"{}\">{}</Say>",
                        escape(voice),
                        escape(language),
                        escape(text)
                    );
                }
                Verb::Gather {
                    input,
                    timeout,
                    speech_timeout,
                    num_digits,
                    action,
                } => {
                    let _ = write!(
                        xml,
                        "<Gather input=\"{}\" timeout=\"{}\"",
                        input.as_str(),
                        timeout
                    );
                    if let Some(speech_timeout) = speech_timeout {
                        let _ = write!(xml, " speechTimeout=\"{}\"", escape(speech_timeout));
                    }
                    if let Some(num_digits) = num_digits {
                        let _ = write!(xml, " numDigits=\"{}\"", num_digits);
                    }
                    let _ = write!(
                        xml,
                        " action=\"{}\" method=\"POST\"/>",
                        escape(action)
                    );
                }
                Verb::Record {
                    action,
                    max_length,
                    finish_on_key,
                    play_beep,
                    trim_silence,
                } => {
                    let trim = if *trim_silence {
                        "trim-silence"
                    } else {
                        "do-not-trim"
                    };
                    let _ = write!(
                        xml,
                        "<Record action=\"{}\" method=\"POST\" maxLength=\"{}\" finishOnKey=\"{}\" playBeep=\"{}\" trim=\"{}\"/>",
                        escape(action),
                        max_length,
                        finish_on_key,
                        play_beep,
                        trim
                    );
                }
                Verb::Dial {
                    number,
                    caller_id,
                    action,
                    timeout,
                    whisper_url,
                } => {
                    xml.push_str("<Dial");
                    if let Some(action) = action {
                        let _ = write!(xml, " action=\"{}\" method=\"POST\"", escape(action));
                    }
                    if let Some(caller_id) = caller_id {
                        let _ = write!(xml, " callerId=\"{}\"", escape(caller_id));
                    }
                    if let Some(timeout) = timeout {
                        let _ = write!(xml, " timeout=\"{}\"", timeout);
                    }
                    xml.push('>');
                    match whisper_url {
                        Some(url) => {
                            let _ = write!(
                                xml,
                                "<Number url=\"{}\">{}</Number>",
                                escape(url),
                                escape(number)
                            );
                        }
                        None => xml.push_str(&escape(number)),
                    }
                    xml.push_str("</Dial>");
                }
                Verb::Pause { length } => {
                    let _ = write!(xml, "<Pause length=\"{}\"/>", length);
                }
                Verb::Hangup => xml.push_str("<Hangup/>"),
            }
        }

        xml.push_str("</Response>");
        xml
    }
}
