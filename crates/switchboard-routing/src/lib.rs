//! Call-routing decision engine for the Switchboard platform.
//!
//! Two pieces live here:
//!
//! - [`lookup`] — phone-number normalization and the blacklist/whitelist
//!   matching algorithm, as pure functions over record slices. Matching
//!   correctness is security-relevant for blacklist enforcement, so the
//!   algorithm is exact, not approximate.
//! - [`engine`] — the [`RoutingEngine`](engine::RoutingEngine) state
//!   machine. Each provider callback is an independent, stateless entry
//!   point: continuity is reconstructed from the caller number and call
//!   SID the provider echoes back, never from engine memory, so multiple
//!   calls are handled concurrently with no locking.
//!
//! The engine's collaborators (record store, classifier, notifier) are
//! constructor-injected so the state machine is unit-testable with no
//! network or disk access.

mod directory;

pub mod engine;
pub mod lookup;

pub use directory::{CallerDirectory, DirectoryError};
pub use engine::{DialStatus, RoutingEngine};
