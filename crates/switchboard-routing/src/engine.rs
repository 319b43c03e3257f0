//! The call-routing state machine.
//!
//! One method per provider callback: initial call, speech result,
//! recording complete, dial status, acceptance digit, do-not-call digit.
//! Every method is total — it always returns a complete response document,
//! converting internal failures into the universal rejection at the
//! boundary so the transport layer never sees an error.

use std::sync::Arc;

use switchboard_classify::SpeechClassifier;
use switchboard_observe::{CallNotification, CallNotifier};
use switchboard_twiml::{scenarios, VoiceResponse};
use switchboard_types::{
    AcceptanceOutcome, BlacklistEntry, CallCategory, CallEvent, Contact, RoutingOutcome,
};

use crate::directory::{CallerDirectory, DirectoryError};
use crate::lookup;

/// Outcome of an outbound dial leg, as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialStatus {
    /// The legs were bridged and the call finished normally.
    Completed,
    /// The destination answered (reported by some providers in place of
    /// `completed` while the call is still up).
    Answered,
    /// The destination was busy.
    Busy,
    /// The destination never answered — including a whisper prompt that
    /// timed out and hung up the destination leg.
    NoAnswer,
    /// The leg could not be set up.
    Failed,
    /// The leg was canceled before connecting.
    Canceled,
}

impl DialStatus {
    /// Parses the provider's `DialCallStatus` value.
    pub fn from_provider(raw: &str) -> Option<Self> {
        match raw {
            "completed" => Some(Self::Completed),
            "answered" => Some(Self::Answered),
            "busy" => Some(Self::Busy),
            "no-answer" => Some(Self::NoAnswer),
            "failed" => Some(Self::Failed),
            "canceled" => Some(Self::Canceled),
            _ => None,
        }
    }

    /// True if the forwarded call went through.
    fn is_success(self) -> bool {
        matches!(self, Self::Completed | Self::Answered)
    }
}

/// The routing engine.
///
/// Holds no per-call state: every entry point reconstructs context from
/// the echoed caller number and call SID plus the persisted record sets,
/// so concurrent calls need no synchronization.
pub struct RoutingEngine {
    directory: Arc<dyn CallerDirectory>,
    classifier: Arc<dyn SpeechClassifier>,
    notifier: CallNotifier,
    forward_to: String,
    caller_id: Option<String>,
}

impl RoutingEngine {
    /// Creates an engine with injected collaborators.
    ///
    /// `forward_to` is the personal line whitelisted and screened calls
    /// are dialed to; `caller_id` optionally overrides the caller ID
    /// presented on that leg.
    pub fn new(
        directory: Arc<dyn CallerDirectory>,
        classifier: Arc<dyn SpeechClassifier>,
        notifier: CallNotifier,
        forward_to: impl Into<String>,
        caller_id: Option<String>,
    ) -> Self {
        Self {
            directory,
            classifier,
            notifier,
            forward_to: forward_to.into(),
            caller_id: caller_id.filter(|id| !id.is_empty()),
        }
    }

    /// Entry point for an inbound call.
    ///
    /// Blacklist is checked before whitelist and wins on conflict — a
    /// number should never be in both, but if it is, rejection wins.
    pub async fn handle_incoming(&self, call: &CallEvent) -> VoiceResponse {
        tracing::info!(
            from_number = %call.from_number,
            call_sid = %call.call_sid,
            "incoming call"
        );

        // Fired before any lookup: dashboards see every call attempt even
        // if a later step fails.
        self.notifier.notify(CallNotification::IncomingCall {
            from_number: call.from_number.clone(),
            call_sid: call.call_sid.clone(),
        });

        match self.route_incoming(call).await {
            Ok(document) => document,
            Err(e) => self.fail_closed(call, e).await,
        }
    }

    async fn route_incoming(&self, call: &CallEvent) -> Result<VoiceResponse, DirectoryError> {
        if let Some(entry) = self.blacklist_match(call).await {
            self.notifier.notify(CallNotification::BlacklistedCall {
                from_number: call.from_number.clone(),
                reason: entry.reason.clone(),
            });

            let summary = format!("Do-not-call notice played: {}", entry.reason);
            self.log_outcome(call, RoutingOutcome::Blacklisted, &summary)
                .await?;
            return Ok(scenarios::tcpa_compliance());
        }

        if let Some(contact) = self.contact_match(call).await {
            self.notifier.notify(CallNotification::WhitelistedCall {
                from_number: call.from_number.clone(),
                contact_name: contact.name.clone(),
            });

            let summary = format!("Direct call from {}", contact.name);
            self.log_outcome(call, RoutingOutcome::Whitelisted, &summary)
                .await?;
            return Ok(scenarios::direct_forwarding(
                Some(contact.name.as_str()),
                &self.forward_to,
                self.caller_id.as_deref(),
            ));
        }

        self.notifier.notify(CallNotification::CallScreening {
            from_number: call.from_number.clone(),
        });

        // Non-terminal progress row; the speech entry point writes the
        // terminal outcome for a screened call.
        self.log_outcome(call, RoutingOutcome::Screening, "AI gatekeeper engaged")
            .await?;
        Ok(scenarios::ai_greeting())
    }

    /// Entry point for the screening speech transcript.
    ///
    /// A missing or empty transcript is rejected without ever invoking the
    /// classifier.
    pub async fn handle_speech(&self, call: &CallEvent, speech: Option<&str>) -> VoiceResponse {
        match self.route_speech(call, speech).await {
            Ok(document) => document,
            Err(e) => self.fail_closed(call, e).await,
        }
    }

    async fn route_speech(
        &self,
        call: &CallEvent,
        speech: Option<&str>,
    ) -> Result<VoiceResponse, DirectoryError> {
        let Some(text) = speech.map(str::trim).filter(|text| !text.is_empty()) else {
            tracing::info!(from_number = %call.from_number, "no speech captured, rejecting");
            let summary = "No speech detected during screening";
            self.log_outcome(call, RoutingOutcome::Rejected, summary).await?;
            self.notifier.notify(CallNotification::CallRouted {
                from_number: call.from_number.clone(),
                outcome: RoutingOutcome::Rejected,
                summary: summary.to_string(),
            });
            return Ok(scenarios::rejection());
        };

        self.notifier.notify(CallNotification::AnalysisStarted {
            from_number: call.from_number.clone(),
        });

        // Infallible by contract: the adapter substitutes its safe default
        // on any failure, so a broken classifier degrades to voicemail.
        let analysis = self.classifier.classify(text).await;

        self.notifier.notify(CallNotification::AnalysisComplete {
            from_number: call.from_number.clone(),
            category: analysis.category,
            summary: analysis.summary.clone(),
        });

        let (outcome, document) = match analysis.category {
            CallCategory::Urgent | CallCategory::Sales => (
                RoutingOutcome::Forwarded,
                scenarios::screened_forwarding(
                    &analysis.summary,
                    &self.forward_to,
                    self.caller_id.as_deref(),
                ),
            ),
            CallCategory::Support | CallCategory::Personal => {
                (RoutingOutcome::Voicemail, scenarios::voicemail())
            }
            CallCategory::Spam => (RoutingOutcome::Rejected, scenarios::rejection()),
        };

        self.log_outcome(call, outcome, &analysis.summary).await?;
        self.notifier.notify(CallNotification::CallRouted {
            from_number: call.from_number.clone(),
            outcome,
            summary: analysis.summary,
        });

        Ok(document)
    }

    /// Entry point for the voicemail recording-complete callback.
    ///
    /// Attaching the URL is best-effort: the caller is thanked either way.
    pub async fn handle_recording_complete(
        &self,
        call: &CallEvent,
        recording_url: Option<&str>,
    ) -> VoiceResponse {
        if let Some(url) = recording_url.filter(|url| !url.is_empty()) {
            match self.directory.attach_recording(&call.from_number, url).await {
                Ok(0) => tracing::warn!(
                    from_number = %call.from_number,
                    "recording callback without a matching voicemail row"
                ),
                Ok(_) => {
                    tracing::info!(
                        from_number = %call.from_number,
                        recording_url = url,
                        "voicemail recording attached"
                    );
                    self.notifier.notify(CallNotification::VoicemailRecorded {
                        from_number: call.from_number.clone(),
                        recording_url: url.to_string(),
                    });
                }
                Err(e) => tracing::warn!(
                    from_number = %call.from_number,
                    error = %e,
                    "failed to attach recording url"
                ),
            }
        }

        scenarios::recording_complete()
    }

    /// Entry point for the outbound leg's dial-status callback.
    pub async fn handle_dial_status(&self, call: &CallEvent, status: Option<&str>) -> VoiceResponse {
        let parsed = status.and_then(DialStatus::from_provider);

        if parsed.is_some_and(DialStatus::is_success) {
            tracing::info!(from_number = %call.from_number, "forwarded call finished");
            return scenarios::hangup_only();
        }

        let status_label = status.unwrap_or("unknown");
        tracing::info!(
            from_number = %call.from_number,
            dial_status = status_label,
            "destination did not accept the forwarded call"
        );
        self.notifier.notify(CallNotification::CallNotAccepted {
            from_number: call.from_number.clone(),
        });

        let summary = format!("Dial ended with status {status_label}");
        if let Err(e) = self
            .directory
            .append_call_log(
                &call.from_number,
                AcceptanceOutcome::NotAccepted.as_str(),
                Some(&summary),
            )
            .await
        {
            tracing::warn!(error = %e, "failed to record dial failure");
        }

        scenarios::dial_status_failure()
    }

    /// Entry point for the whisper-confirm key press.
    ///
    /// The callback only fires when the recipient pressed a key; a missing
    /// digit is treated as a decline.
    pub async fn handle_acceptance(&self, call: &CallEvent, digit: Option<&str>) -> VoiceResponse {
        match digit.filter(|digit| !digit.is_empty()) {
            Some(digit) => {
                tracing::info!(from_number = %call.from_number, digit, "recipient accepted the call");
                self.notifier.notify(CallNotification::CallAccepted {
                    from_number: call.from_number.clone(),
                });
                if let Err(e) = self
                    .directory
                    .append_call_log(
                        &call.from_number,
                        AcceptanceOutcome::Accepted.as_str(),
                        Some("Recipient accepted the forwarded call"),
                    )
                    .await
                {
                    tracing::warn!(error = %e, "failed to record call acceptance");
                }
                scenarios::call_accepted()
            }
            None => {
                tracing::info!(from_number = %call.from_number, "whisper prompt got no digit");
                self.notifier.notify(CallNotification::CallNotAccepted {
                    from_number: call.from_number.clone(),
                });
                if let Err(e) = self
                    .directory
                    .append_call_log(
                        &call.from_number,
                        AcceptanceOutcome::NotAccepted.as_str(),
                        Some("Recipient did not respond to the whisper prompt"),
                    )
                    .await
                {
                    tracing::warn!(error = %e, "failed to record declined call");
                }
                scenarios::hangup_only()
            }
        }
    }

    /// Entry point for the do-not-call response digit.
    ///
    /// Only digit `1` requests removal; anything else terminates the call
    /// with no removal logged. The removal row must be durably written
    /// before the caller is told it was recorded, so a log failure here
    /// falls back to rejection instead of over-promising.
    pub async fn handle_tcpa(&self, call: &CallEvent, digit: Option<&str>) -> VoiceResponse {
        if digit != Some("1") {
            tracing::info!(
                from_number = %call.from_number,
                digit = digit.unwrap_or(""),
                "do-not-call prompt ended without a removal request"
            );
            return scenarios::hangup_only();
        }

        let summary = "Caller requested removal from the call list";
        match self
            .log_outcome(call, RoutingOutcome::TcpaRemoval, summary)
            .await
        {
            Ok(()) => {
                self.notifier.notify(CallNotification::CallRouted {
                    from_number: call.from_number.clone(),
                    outcome: RoutingOutcome::TcpaRemoval,
                    summary: summary.to_string(),
                });
                scenarios::tcpa_removal_instructions()
            }
            Err(e) => self.fail_closed(call, e).await,
        }
    }

    /// Queries the blacklist, failing open on store errors.
    ///
    /// An error is logged distinctly from a genuine no-match: failing open
    /// on blacklist checks has compliance implications and the distinction
    /// must be visible in the logs.
    async fn blacklist_match(&self, call: &CallEvent) -> Option<BlacklistEntry> {
        match self.directory.blacklist().await {
            Ok(entries) => lookup::find_blacklist_match(&call.from_number, &entries).cloned(),
            Err(e) => {
                tracing::error!(
                    from_number = %call.from_number,
                    error = %e,
                    "blacklist lookup failed; treating caller as unlisted"
                );
                None
            }
        }
    }

    /// Queries the contacts, failing open on store errors.
    ///
    /// A lookup error never grants forwarding privileges: the caller is
    /// treated as unknown and proceeds to screening.
    async fn contact_match(&self, call: &CallEvent) -> Option<Contact> {
        match self.directory.contacts().await {
            Ok(contacts) => lookup::find_contact_match(&call.from_number, &contacts).cloned(),
            Err(e) => {
                tracing::error!(
                    from_number = %call.from_number,
                    error = %e,
                    "contact lookup failed; treating caller as unknown"
                );
                None
            }
        }
    }

    async fn log_outcome(
        &self,
        call: &CallEvent,
        outcome: RoutingOutcome,
        summary: &str,
    ) -> Result<(), DirectoryError> {
        self.directory
            .append_call_log(&call.from_number, outcome.as_str(), Some(summary))
            .await?;
        tracing::info!(
            from_number = %call.from_number,
            outcome = outcome.as_str(),
            summary,
            "call routed"
        );
        Ok(())
    }

    /// Converts an internal failure into the universal rejection.
    ///
    /// The caller must never be left without a response document, and a
    /// broken store must not accidentally forward a call.
    async fn fail_closed(&self, call: &CallEvent, error: DirectoryError) -> VoiceResponse {
        tracing::error!(
            from_number = %call.from_number,
            call_sid = %call.call_sid,
            error = %error,
            "routing failed, returning fallback rejection"
        );

        self.notifier.notify(CallNotification::RoutingError {
            from_number: call.from_number.clone(),
            detail: error.to_string(),
        });

        if let Err(log_error) = self
            .directory
            .append_call_log(
                &call.from_number,
                RoutingOutcome::Error.as_str(),
                Some(&error.to_string()),
            )
            .await
        {
            tracing::warn!(error = %log_error, "failed to record error outcome");
        }

        scenarios::rejection()
    }
}
