//! Phone-number normalization and caller matching.
//!
//! Normalization is exact, not approximate: blacklist enforcement depends
//! on every formatting of the same number resolving to the same canonical
//! form. Matching is a linear scan with first match winning — the record
//! sets are personal lists, so no index structure is needed.

use switchboard_types::{BlacklistEntry, Contact, PatternType};

/// Strips everything but ASCII digits.
fn digits_of(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Normalizes a phone number to `+<digits>` canonical form.
///
/// - Exactly 10 digits: assumed US national format, `1` is prepended.
/// - 11 digits starting with `1`: kept as-is.
/// - Anything else: digits kept as given, no country code is invented.
///
/// Idempotent: normalizing an already-normalized number is a no-op.
pub fn normalize_number(raw: &str) -> String {
    let digits = digits_of(raw);
    if digits.len() == 10 {
        format!("+1{digits}")
    } else {
        format!("+{digits}")
    }
}

/// Returns the three digits following the country-code digit, if present.
fn area_code_of(normalized: &str) -> Option<&str> {
    normalized.strip_prefix('+').and_then(|digits| digits.get(1..4))
}

/// True if the incoming number matches the entry under its pattern type.
fn matches_entry(incoming: &str, entry: &BlacklistEntry) -> bool {
    match entry.pattern_type {
        PatternType::Exact => normalize_number(incoming) == normalize_number(&entry.phone_number),
        PatternType::AreaCode => {
            // The stored value is a bare area code, not a normalized number.
            area_code_of(&normalize_number(incoming)) == Some(digits_of(&entry.phone_number).as_str())
        }
        PatternType::Prefix => {
            let stored = digits_of(&entry.phone_number);
            // An empty stored pattern would match every caller.
            !stored.is_empty() && digits_of(incoming).starts_with(&stored)
        }
    }
}

/// Finds the first blacklist entry matching the incoming number.
///
/// Iteration order is whatever the backing store returned; callers must
/// not rely on a tie-break beyond first-match-wins.
pub fn find_blacklist_match<'a>(
    incoming: &str,
    entries: &'a [BlacklistEntry],
) -> Option<&'a BlacklistEntry> {
    entries.iter().find(|entry| matches_entry(incoming, entry))
}

/// Finds the first contact whose number normalizes identically to the
/// incoming number.
pub fn find_contact_match<'a>(incoming: &str, contacts: &'a [Contact]) -> Option<&'a Contact> {
    let normalized = normalize_number(incoming);
    contacts
        .iter()
        .find(|contact| normalize_number(&contact.phone_number) == normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64, phone_number: &str, pattern_type: PatternType) -> BlacklistEntry {
        BlacklistEntry {
            id,
            phone_number: phone_number.to_string(),
            reason: "test".to_string(),
            pattern_type,
            date_added: "2025-01-01 00:00:00".to_string(),
        }
    }

    fn contact(id: i64, name: &str, phone_number: &str) -> Contact {
        Contact {
            id,
            name: name.to_string(),
            phone_number: phone_number.to_string(),
        }
    }

    #[test]
    fn ten_digit_numbers_gain_country_code() {
        assert_eq!(normalize_number("5551234567"), "+15551234567");
        assert_eq!(normalize_number("(555) 123-4567"), "+15551234567");
        assert_eq!(normalize_number("555.123.4567"), "+15551234567");
    }

    #[test]
    fn eleven_digit_leading_one_kept_as_is() {
        assert_eq!(normalize_number("15551234567"), "+15551234567");
        assert_eq!(normalize_number("+1 555 123 4567"), "+15551234567");
    }

    #[test]
    fn other_lengths_keep_digits_as_given() {
        assert_eq!(normalize_number("+44 7911 123456"), "+447911123456");
        assert_eq!(normalize_number("123-4567"), "+1234567");
        assert_eq!(normalize_number(""), "+");
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in [
            "5551234567",
            "(555) 123-4567",
            "+15551234567",
            "15551234567",
            "+44 7911 123456",
            "123-4567",
            "",
        ] {
            let once = normalize_number(raw);
            assert_eq!(normalize_number(&once), once, "input: {raw:?}");
        }
    }

    #[test]
    fn exact_match_is_formatting_insensitive() {
        let entries = vec![entry(1, "+15551234567", PatternType::Exact)];

        for incoming in ["(555) 123-4567", "5551234567", "+15551234567", "1-555-123-4567"] {
            let matched = find_blacklist_match(incoming, &entries);
            assert_eq!(matched.map(|e| e.id), Some(1), "input: {incoming:?}");
        }

        assert!(find_blacklist_match("5551234568", &entries).is_none());
    }

    #[test]
    fn area_code_matches_bare_stored_value() {
        let entries = vec![entry(1, "800", PatternType::AreaCode)];

        assert!(find_blacklist_match("(800) 555-0199", &entries).is_some());
        assert!(find_blacklist_match("+18005550199", &entries).is_some());
        assert!(find_blacklist_match("(555) 123-4567", &entries).is_none());
    }

    #[test]
    fn area_code_stored_with_punctuation_still_matches() {
        let entries = vec![entry(1, "(800)", PatternType::AreaCode)];
        assert!(find_blacklist_match("8005550199", &entries).is_some());
    }

    #[test]
    fn prefix_compares_raw_digit_strings() {
        let entries = vec![entry(1, "555-12", PatternType::Prefix)];

        assert!(find_blacklist_match("(555) 123-4567", &entries).is_some());
        assert!(find_blacklist_match("555-999-0000", &entries).is_none());
    }

    #[test]
    fn empty_prefix_never_matches() {
        let entries = vec![entry(1, "---", PatternType::Prefix)];
        assert!(find_blacklist_match("5551234567", &entries).is_none());
    }

    #[test]
    fn first_match_wins_in_iteration_order() {
        let entries = vec![
            entry(1, "555", PatternType::AreaCode),
            entry(2, "+15551234567", PatternType::Exact),
        ];

        let matched = find_blacklist_match("5551234567", &entries);
        assert_eq!(matched.map(|e| e.id), Some(1));
    }

    #[test]
    fn contact_match_normalizes_both_sides() {
        let contacts = vec![
            contact(1, "Alice", "555-123-4567"),
            contact(2, "Bob", "+15559876543"),
        ];

        assert_eq!(
            find_contact_match("+15551234567", &contacts).map(|c| c.name.as_str()),
            Some("Alice")
        );
        assert_eq!(
            find_contact_match("(555) 987-6543", &contacts).map(|c| c.name.as_str()),
            Some("Bob")
        );
        assert!(find_contact_match("+15550000000", &contacts).is_none());
    }
}
