//! Voice-response document builder for the Switchboard platform.
//!
//! The routing engine decides *what* should happen to a call; this crate
//! expresses that decision as an ordered sequence of primitive voice
//! instructions (speak, gather, record, dial, pause, hang up) and renders
//! it to the telephony provider's TwiML markup at the transport boundary.
//!
//! Every builder in [`scenarios`] is a pure function: deterministic for a
//! given input, no side effects, and total — each returns a self-contained
//! document that is valid on its own, even when it references a follow-up
//! callback path.

mod render;
mod verb;

pub mod scenarios;

pub use verb::{GatherInput, Verb, VoiceResponse};
