//! Query helpers for the `blacklist` table.

use std::str::FromStr;

use rusqlite::{params, Connection};
use switchboard_types::{BlacklistEntry, PatternType};

use crate::error::StoreError;

/// Inserts a new blacklist entry and returns the stored row.
///
/// # Errors
///
/// Returns `StoreError::Database` on SQL failure; a duplicate phone number
/// surfaces as a UNIQUE constraint violation.
pub fn add_blacklist_entry(
    conn: &Connection,
    phone_number: &str,
    reason: &str,
    pattern_type: PatternType,
) -> Result<BlacklistEntry, StoreError> {
    let (id, date_added) = conn.query_row(
        "INSERT INTO blacklist (phone_number, reason, pattern_type)
         VALUES (?1, ?2, ?3)
         RETURNING id, date_added",
        params![phone_number, reason, pattern_type.as_str()],
        |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)),
    )?;

    Ok(BlacklistEntry {
        id,
        phone_number: phone_number.to_string(),
        reason: reason.to_string(),
        pattern_type,
        date_added,
    })
}

/// Returns all blacklist entries, newest first.
///
/// # Errors
///
/// Returns `StoreError::Database` on SQL failure, or
/// `StoreError::InvalidPatternType` if a row holds a pattern type string
/// outside the known set (the schema CHECK constraint makes this unlikely,
/// but matching is security-relevant, so a bad row is an error rather than
/// a silent skip).
pub fn all_blacklist_entries(conn: &Connection) -> Result<Vec<BlacklistEntry>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, phone_number, reason, pattern_type, date_added
         FROM blacklist
         ORDER BY date_added DESC, id DESC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
        ))
    })?;

    let mut entries = Vec::new();
    for row in rows {
        let (id, phone_number, reason, pattern_raw, date_added) = row?;
        let pattern_type = PatternType::from_str(&pattern_raw)
            .map_err(|_| StoreError::InvalidPatternType {
                id,
                value: pattern_raw,
            })?;
        entries.push(BlacklistEntry {
            id,
            phone_number,
            reason,
            pattern_type,
            date_added,
        });
    }

    Ok(entries)
}

/// Deletes a blacklist entry by ID, returning the number of rows removed.
///
/// # Errors
///
/// Returns `StoreError::Database` on SQL failure.
pub fn delete_blacklist_entry(conn: &Connection, id: i64) -> Result<usize, StoreError> {
    let changes = conn.execute("DELETE FROM blacklist WHERE id = ?1", params![id])?;
    Ok(changes)
}
