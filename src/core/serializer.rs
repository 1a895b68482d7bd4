//! Canonical writer for tnsnames.ora files.
//!
//! Output is regenerated from scratch on every save: entries are sorted by
//! name, a fixed two-line header replaces whatever comments the source file
//! had, and each entry is rendered through [`TnsEntry::to_tns_format`].

use std::fs;
use std::path::Path;

use crate::core::entry::TnsEntry;
use crate::error::{Result, TnsedError};

const FILE_HEADER: &str = "\
# tnsnames.ora Network Configuration File
# Generated by tnsed
";

/// Render the canonical file text for a set of entries.
///
/// Entries are sorted case-insensitively by name regardless of input order,
/// so repeated serialization of the same set is byte-identical.
pub fn serialize(entries: &[TnsEntry]) -> String {
    let mut sorted: Vec<&TnsEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| {
        a.name
            .to_ascii_lowercase()
            .cmp(&b.name.to_ascii_lowercase())
    });

    let mut out = String::new();
    out.push_str(FILE_HEADER);
    out.push('\n');

    for entry in sorted {
        out.push_str(&entry.to_tns_format());
        out.push('\n');
    }

    out
}

/// Write the canonical file text to disk (UTF-8).
pub fn save_file(path: &Path, entries: &[TnsEntry]) -> Result<()> {
    fs::write(path, serialize(entries)).map_err(|e| TnsedError::file_access(path, e))?;
    log::info!("saved {} entries to {}", entries.len(), path.display());
    Ok(())
}
