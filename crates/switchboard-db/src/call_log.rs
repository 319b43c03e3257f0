//! Query helpers for the `call_logs` table.
//!
//! Every routing decision appends exactly one row via [`append_call_log`].
//! Voicemail recordings are attached after the fact by
//! [`attach_recording`], which targets the caller's most recent Voicemail
//! row.

use rusqlite::{params, Connection};
use switchboard_types::CallLogEntry;

use crate::error::StoreError;

/// Appends a call-log row and returns the stored entry.
///
/// # Errors
///
/// Returns `StoreError::Database` on SQL failure.
pub fn append_call_log(
    conn: &Connection,
    from_number: &str,
    status: &str,
    summary: Option<&str>,
) -> Result<CallLogEntry, StoreError> {
    let (id, timestamp) = conn.query_row(
        "INSERT INTO call_logs (from_number, status, summary)
         VALUES (?1, ?2, ?3)
         RETURNING id, timestamp",
        params![from_number, status, summary],
        |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)),
    )?;

    Ok(CallLogEntry {
        id,
        from_number: from_number.to_string(),
        status: status.to_string(),
        summary: summary.map(str::to_string),
        recording_url: None,
        timestamp,
    })
}

/// Returns the most recent call-log rows, newest first.
///
/// # Errors
///
/// Returns `StoreError::Database` on SQL failure.
pub fn recent_call_logs(conn: &Connection, limit: i64) -> Result<Vec<CallLogEntry>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, from_number, status, summary, recording_url, timestamp
         FROM call_logs
         ORDER BY timestamp DESC, id DESC
         LIMIT ?1",
    )?;
    let rows = stmt.query_map(params![limit], |row| {
        Ok(CallLogEntry {
            id: row.get(0)?,
            from_number: row.get(1)?,
            status: row.get(2)?,
            summary: row.get(3)?,
            recording_url: row.get(4)?,
            timestamp: row.get(5)?,
        })
    })?;

    let mut logs = Vec::new();
    for row in rows {
        logs.push(row?);
    }

    Ok(logs)
}

/// Deletes a call-log row by ID, returning the number of rows removed.
///
/// # Errors
///
/// Returns `StoreError::Database` on SQL failure.
pub fn delete_call_log(conn: &Connection, id: i64) -> Result<usize, StoreError> {
    let changes = conn.execute("DELETE FROM call_logs WHERE id = ?1", params![id])?;
    Ok(changes)
}

/// Deletes every call-log row, returning the number of rows removed.
///
/// # Errors
///
/// Returns `StoreError::Database` on SQL failure.
pub fn clear_call_logs(conn: &Connection) -> Result<usize, StoreError> {
    let changes = conn.execute("DELETE FROM call_logs", [])?;
    Ok(changes)
}

/// Sets the recording URL on the caller's most recent Voicemail row.
///
/// Returns the number of rows updated (0 if the caller has no Voicemail
/// row, e.g. a recording callback arrived for a call that was never routed
/// to voicemail).
///
/// # Errors
///
/// Returns `StoreError::Database` on SQL failure.
pub fn attach_recording(
    conn: &Connection,
    from_number: &str,
    recording_url: &str,
) -> Result<usize, StoreError> {
    // SQLite UPDATE has no ORDER BY; pick the newest row with a subquery.
    let changes = conn.execute(
        "UPDATE call_logs SET recording_url = ?1
         WHERE id = (
             SELECT id FROM call_logs
             WHERE from_number = ?2 AND status = 'Voicemail'
             ORDER BY timestamp DESC, id DESC
             LIMIT 1
         )",
        params![recording_url, from_number],
    )?;
    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::run_migrations;

    fn test_db() -> Connection {
        let conn = Connection::open_in_memory().expect("should open in-memory db");
        run_migrations(&conn).expect("migrations should succeed");
        conn
    }

    #[test]
    fn append_and_list() {
        let conn = test_db();

        let entry = append_call_log(&conn, "+15551234567", "Screening", Some("greeting played"))
            .expect("append should succeed");
        assert!(entry.id > 0);
        assert!(!entry.timestamp.is_empty());

        append_call_log(&conn, "+15551234567", "Voicemail", Some("Account inquiry"))
            .expect("append should succeed");

        let logs = recent_call_logs(&conn, 50).expect("list should succeed");
        assert_eq!(logs.len(), 2);
        // Newest first.
        assert_eq!(logs[0].status, "Voicemail");
        assert_eq!(logs[1].status, "Screening");
    }

    #[test]
    fn attach_recording_targets_newest_voicemail_row() {
        let conn = test_db();

        append_call_log(&conn, "+15551234567", "Voicemail", Some("first")).unwrap();
        let newest = append_call_log(&conn, "+15551234567", "Voicemail", Some("second")).unwrap();
        // Other statuses and other callers are never touched.
        append_call_log(&conn, "+15551234567", "Rejected", None).unwrap();
        append_call_log(&conn, "+15559990000", "Voicemail", Some("other caller")).unwrap();

        let changed = attach_recording(&conn, "+15551234567", "https://example.test/rec.mp3")
            .expect("attach should succeed");
        assert_eq!(changed, 1);

        let logs = recent_call_logs(&conn, 50).unwrap();
        let updated: Vec<_> = logs
            .iter()
            .filter(|l| l.recording_url.is_some())
            .collect();
        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0].id, newest.id);
    }

    #[test]
    fn attach_recording_without_voicemail_row_is_noop() {
        let conn = test_db();
        append_call_log(&conn, "+15551234567", "Rejected", None).unwrap();

        let changed = attach_recording(&conn, "+15551234567", "https://example.test/rec.mp3")
            .expect("attach should succeed");
        assert_eq!(changed, 0);
    }

    #[test]
    fn delete_and_clear() {
        let conn = test_db();
        let entry = append_call_log(&conn, "+15551234567", "Screening", None).unwrap();
        append_call_log(&conn, "+15559990000", "Rejected", None).unwrap();

        assert_eq!(delete_call_log(&conn, entry.id).unwrap(), 1);
        assert_eq!(clear_call_logs(&conn).unwrap(), 1);
        assert!(recent_call_logs(&conn, 50).unwrap().is_empty());
    }
}
