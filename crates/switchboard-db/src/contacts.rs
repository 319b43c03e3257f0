//! Query helpers for the `contacts` table (the whitelist).

use rusqlite::{params, Connection};
use switchboard_types::Contact;

use crate::error::StoreError;

/// Inserts a new contact and returns the stored row.
///
/// # Errors
///
/// Returns `StoreError::Database` on SQL failure; a duplicate phone number
/// surfaces as a UNIQUE constraint violation
/// (see [`StoreError::is_unique_violation`]).
pub fn add_contact(
    conn: &Connection,
    name: &str,
    phone_number: &str,
) -> Result<Contact, StoreError> {
    let id = conn.query_row(
        "INSERT INTO contacts (name, phone_number) VALUES (?1, ?2) RETURNING id",
        params![name, phone_number],
        |row| row.get::<_, i64>(0),
    )?;

    Ok(Contact {
        id,
        name: name.to_string(),
        phone_number: phone_number.to_string(),
    })
}

/// Returns all contacts ordered by name.
///
/// The routing engine bulk-fetches this set and matches in core; the set is
/// a personal contact list, so a full scan per call is fine.
///
/// # Errors
///
/// Returns `StoreError::Database` on SQL failure.
pub fn all_contacts(conn: &Connection) -> Result<Vec<Contact>, StoreError> {
    let mut stmt = conn.prepare("SELECT id, name, phone_number FROM contacts ORDER BY name")?;
    let rows = stmt.query_map([], |row| {
        Ok(Contact {
            id: row.get(0)?,
            name: row.get(1)?,
            phone_number: row.get(2)?,
        })
    })?;

    let mut contacts = Vec::new();
    for row in rows {
        contacts.push(row?);
    }

    Ok(contacts)
}

/// Deletes a contact by ID, returning the number of rows removed.
///
/// # Errors
///
/// Returns `StoreError::Database` on SQL failure.
pub fn delete_contact(conn: &Connection, id: i64) -> Result<usize, StoreError> {
    let changes = conn.execute("DELETE FROM contacts WHERE id = ?1", params![id])?;
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
    fn add_and_list_contacts() {
        let conn = test_db();

        let alice = add_contact(&conn, "Alice", "+15551234567").expect("insert should succeed");
        assert!(alice.id > 0);

        add_contact(&conn, "Bob", "555-987-6543").expect("insert should succeed");

        let contacts = all_contacts(&conn).expect("list should succeed");
        assert_eq!(contacts.len(), 2);
        // Ordered by name.
        assert_eq!(contacts[0].name, "Alice");
        assert_eq!(contacts[1].name, "Bob");
    }

    #[test]
    fn duplicate_phone_number_is_unique_violation() {
        let conn = test_db();
        add_contact(&conn, "Alice", "+15551234567").expect("insert should succeed");

        let err = add_contact(&conn, "Alice Again", "+15551234567")
            .expect_err("duplicate number should fail");
        assert!(err.is_unique_violation());
    }

    #[test]
    fn delete_contact_reports_changes() {
        let conn = test_db();
        let alice = add_contact(&conn, "Alice", "+15551234567").expect("insert should succeed");

        assert_eq!(delete_contact(&conn, alice.id).unwrap(), 1);
        assert_eq!(delete_contact(&conn, alice.id).unwrap(), 0);
    }
}
