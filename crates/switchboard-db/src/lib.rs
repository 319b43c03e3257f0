//! Database layer for the Switchboard platform.
//!
//! Provides SQLite connection pooling (via `r2d2`), WAL-mode initialization,
//! embedded SQL migrations, and query helpers for the three record sets the
//! routing engine and admin API read and write: contacts (the whitelist),
//! blacklist entries, and the call log.
//!
//! # Design decisions
//!
//! - **SQLite with WAL mode**: a personal call-screening deployment is a
//!   single-server install — no external database process required. WAL
//!   mode allows concurrent readers with a single writer, which matches
//!   the webhook access pattern.
//! - **`r2d2` connection pool**: provides bounded connection reuse without
//!   manual lifetime management.
//! - **Embedded migrations**: SQL files are compiled into the binary via
//!   `include_str!`, ensuring migrations ship with the server and cannot
//!   drift from the code that depends on them.
//! - **Numbers stored as entered**: normalization-tolerant matching happens
//!   at read time in the routing engine's lookup, so admin input never has
//!   to be pre-cleaned.

mod blacklist;
mod call_log;
mod contacts;
mod error;
mod migrations;
mod pool;

pub use blacklist::{add_blacklist_entry, all_blacklist_entries, delete_blacklist_entry};
pub use call_log::{
    append_call_log, attach_recording, clear_call_logs, delete_call_log, recent_call_logs,
};
pub use contacts::{add_contact, all_contacts, delete_contact};
pub use error::StoreError;
pub use migrations::{run_migrations, MigrationError};
pub use pool::{create_pool, DbPool, DbRuntimeSettings, PoolError};
