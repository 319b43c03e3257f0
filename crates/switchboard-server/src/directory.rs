//! SQLite-backed implementation of the engine's record-store port.

use async_trait::async_trait;
use switchboard_db::DbPool;
use switchboard_routing::{CallerDirectory, DirectoryError};
use switchboard_types::{BlacklistEntry, Contact};

/// Record store over the shared connection pool.
///
/// SQLite calls are blocking, so every operation runs on the blocking
/// thread pool; the engine itself never blocks the runtime.
#[derive(Clone)]
pub struct SqliteDirectory {
    pool: DbPool,
}

impl SqliteDirectory {
    /// Creates a directory over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<T, F>(&self, operation: F) -> Result<T, DirectoryError>
    where
        T: Send + 'static,
        F: FnOnce(&rusqlite::Connection) -> Result<T, switchboard_db::StoreError>
            + Send
            + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| DirectoryError::Unavailable(e.to_string()))?;
            operation(&conn).map_err(|e| DirectoryError::Query(e.to_string()))
        })
        .await
        .map_err(|e| DirectoryError::Unavailable(format!("task join error: {e}")))?
    }
}

#[async_trait]
impl CallerDirectory for SqliteDirectory {
    async fn contacts(&self) -> Result<Vec<Contact>, DirectoryError> {
        self.run_blocking(switchboard_db::all_contacts).await
    }

    async fn blacklist(&self) -> Result<Vec<BlacklistEntry>, DirectoryError> {
        self.run_blocking(switchboard_db::all_blacklist_entries)
            .await
    }

    async fn append_call_log(
        &self,
        from_number: &str,
        status: &str,
        summary: Option<&str>,
    ) -> Result<(), DirectoryError> {
        let from_number = from_number.to_string();
        let status = status.to_string();
        let summary = summary.map(str::to_string);
        self.run_blocking(move |conn| {
            switchboard_db::append_call_log(conn, &from_number, &status, summary.as_deref())
                .map(|_| ())
        })
        .await
    }

    async fn attach_recording(
        &self,
        from_number: &str,
        recording_url: &str,
    ) -> Result<usize, DirectoryError> {
        let from_number = from_number.to_string();
        let recording_url = recording_url.to_string();
        self.run_blocking(move |conn| {
            switchboard_db::attach_recording(conn, &from_number, &recording_url)
        })
        .await
    }
}
