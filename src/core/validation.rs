//! Caller-side entry validation.
//!
//! The parser and serializer are deliberately duplicate-tolerant and do not
//! validate fields; these checks belong to the editing surface, which runs
//! them before mutating the entry set.

use crate::core::entry::TnsEntry;
use crate::error::{Result, TnsedError};

/// Validate the required fields of one entry.
///
/// Name must be a non-empty identifier (letters, digits, underscore — the
/// same charset the parser anchors alias headers on), host must be present
/// and the port must be numeric text.
pub fn validate_entry(entry: &TnsEntry) -> Result<()> {
    let name = entry.name.trim();
    if name.is_empty() {
        return Err(TnsedError::invalid_entry("the entry name is required"));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(TnsedError::invalid_entry(format!(
            "'{}' is not a valid alias name (letters, digits and underscore only)",
            name
        )));
    }

    if entry.host.trim().is_empty() {
        return Err(TnsedError::invalid_entry("the host is required"));
    }

    let port = entry.port.trim();
    if port.is_empty() {
        return Err(TnsedError::invalid_entry("the port is required"));
    }
    if !port.chars().all(|c| c.is_ascii_digit()) {
        return Err(TnsedError::invalid_entry(format!(
            "the port must be a valid number, got '{}'",
            port
        )));
    }

    Ok(())
}

/// Whether the entry has neither a service name nor a SID. Not an error
/// (such entries exist in the wild), but worth warning about.
pub fn missing_connect_data(entry: &TnsEntry) -> bool {
    entry.service_name.trim().is_empty() && entry.sid.trim().is_empty()
}

/// Find an entry with the same name, optionally skipping one original name
/// (for edit flows where the entry is being compared against its peers).
pub fn find_by_name<'a>(
    entries: &'a [TnsEntry],
    name: &str,
    skip_name: Option<&str>,
) -> Option<&'a TnsEntry> {
    entries
        .iter()
        .filter(|e| skip_name.map_or(true, |skip| !e.name.eq_ignore_ascii_case(skip)))
        .find(|e| e.name.eq_ignore_ascii_case(name))
}

/// Find an entry identical to `candidate` across all seven identity fields,
/// optionally skipping the entry being edited.
pub fn find_identical<'a>(
    entries: &'a [TnsEntry],
    candidate: &TnsEntry,
    skip_name: Option<&str>,
) -> Option<&'a TnsEntry> {
    entries
        .iter()
        .filter(|e| skip_name.map_or(true, |skip| !e.name.eq_ignore_ascii_case(skip)))
        .find(|e| e.is_identical_to(candidate))
}
