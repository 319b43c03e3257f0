//! Error type for query helpers.

/// Errors that can occur during record store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A database operation failed.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A stored row contained an unrecognized pattern type value.
    #[error("invalid pattern type '{value}' in blacklist row {id}")]
    InvalidPatternType {
        /// The offending row ID.
        id: i64,
        /// The unrecognized stored value.
        value: String,
    },
}

impl StoreError {
    /// True if this error is a SQLite UNIQUE constraint violation.
    ///
    /// The admin API maps this onto HTTP 409 for duplicate phone numbers.
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            StoreError::Database(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation
        )
    }
}
