//! Dashboard notification layer for the Switchboard platform.
//!
//! The routing engine announces every state transition — call arrival,
//! screening, analysis, and the final routing decision — as a typed
//! [`CallNotification`]. The [`CallNotifier`] fans these out to dashboard
//! subscribers over a broadcast channel; the server exposes the stream via
//! SSE.
//!
//! Notifications are best-effort by contract: a send never blocks, never
//! fails the routing decision, and a call is handled identically whether
//! zero or many dashboards are watching.

mod event;
mod notifier;

pub use event::CallNotification;
pub use notifier::CallNotifier;
