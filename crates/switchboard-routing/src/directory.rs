//! The record-store port the engine reads and writes through.

use async_trait::async_trait;
use switchboard_types::{BlacklistEntry, Contact};
use thiserror::Error;

/// Errors surfaced by a [`CallerDirectory`] implementation.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The backing store could not be reached.
    #[error("record store unavailable: {0}")]
    Unavailable(String),

    /// A query against the backing store failed.
    #[error("record store query failed: {0}")]
    Query(String),
}

/// Read/write access to the persisted record sets.
///
/// The engine bulk-fetches both record sets and matches in core (the sets
/// are a personal contact and blacklist, not a directory service). The
/// server implements this over SQLite; tests use an in-memory double.
#[async_trait]
pub trait CallerDirectory: Send + Sync {
    /// Returns all whitelisted contacts.
    async fn contacts(&self) -> Result<Vec<Contact>, DirectoryError>;

    /// Returns all blacklist entries.
    async fn blacklist(&self) -> Result<Vec<BlacklistEntry>, DirectoryError>;

    /// Appends one call-log row.
    async fn append_call_log(
        &self,
        from_number: &str,
        status: &str,
        summary: Option<&str>,
    ) -> Result<(), DirectoryError>;

    /// Attaches a recording URL to the caller's most recent Voicemail row,
    /// returning the number of rows updated.
    async fn attach_recording(
        &self,
        from_number: &str,
        recording_url: &str,
    ) -> Result<usize, DirectoryError>;
}
