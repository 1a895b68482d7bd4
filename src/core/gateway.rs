//! Legacy gateway config mirroring.
//!
//! Some client installations route Oracle access through a gateway that
//! reads an INI-style file with a `[OraGtwy]` section, one `RemoteDBName`
//! line per alias. After a save, the current alias names are mirrored into
//! that section; every other line of the file is left alone.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::entry::TnsEntry;
use crate::error::{Result, TnsedError};

const SECTION_HEADER: &str = "[OraGtwy]";
const REMOTE_KEY: &str = "RemoteDBName=";

/// Outcome of a gateway sync. A missing gateway file is a soft result, not
/// an error: most machines simply don't have one.
#[derive(Debug)]
pub enum GatewayUpdate {
    Updated { path: PathBuf, aliases: usize },
    FileMissing { path: PathBuf },
}

/// Mirror the distinct alias names of `entries` into the gateway file's
/// `[OraGtwy]` section.
pub fn update_remote_db_names(path: &Path, entries: &[TnsEntry]) -> Result<GatewayUpdate> {
    if !path.exists() {
        return Ok(GatewayUpdate::FileMissing {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| TnsedError::file_access(path, e))?;
    let names = distinct_sorted_names(entries);
    let updated = rewrite_section(&content, &names);

    fs::write(path, updated).map_err(|e| TnsedError::file_access(path, e))?;
    log::info!(
        "gateway file {} updated with {} aliases",
        path.display(),
        names.len()
    );

    Ok(GatewayUpdate::Updated {
        path: path.to_path_buf(),
        aliases: names.len(),
    })
}

/// Distinct alias names, deduplicated and sorted case-insensitively.
pub fn distinct_sorted_names(entries: &[TnsEntry]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();

    for entry in entries {
        let name = entry.name.trim();
        if name.is_empty() {
            continue;
        }
        if !names.iter().any(|n| n.eq_ignore_ascii_case(name)) {
            names.push(name.to_string());
        }
    }

    names.sort_by(|a, b| a.to_ascii_lowercase().cmp(&b.to_ascii_lowercase()));
    names
}

/// Rebuild the file content with a fresh `RemoteDBName` block.
///
/// An existing section keeps its non-RemoteDBName lines; a missing section
/// is appended at the end of the file.
fn rewrite_section(content: &str, names: &[String]) -> String {
    let mut lines: Vec<String> = content.lines().map(|l| l.to_string()).collect();

    let Some(section_start) = lines
        .iter()
        .position(|l| l.trim().eq_ignore_ascii_case(SECTION_HEADER))
    else {
        if lines.last().map_or(false, |l| !l.is_empty()) {
            lines.push(String::new());
        }
        lines.push(SECTION_HEADER.to_string());
        lines.extend(names.iter().map(|n| remote_db_line(n)));
        return join_lines(&lines);
    };

    let section_end = lines[section_start + 1..]
        .iter()
        .position(is_section_header)
        .map(|offset| section_start + 1 + offset)
        .unwrap_or(lines.len());

    let remote_key = REMOTE_KEY.to_ascii_lowercase();
    let kept: Vec<String> = lines[section_start + 1..section_end]
        .iter()
        .filter(|l| !l.trim().to_ascii_lowercase().starts_with(&remote_key))
        .cloned()
        .collect();

    let mut updated: Vec<String> = lines[..=section_start].to_vec();
    updated.extend(names.iter().map(|n| remote_db_line(n)));

    if let Some(first_kept) = kept.first() {
        if !first_kept.is_empty() && updated.last().map_or(false, |l| !l.is_empty()) {
            updated.push(String::new());
        }
    }
    updated.extend(kept);
    updated.extend_from_slice(&lines[section_end..]);

    join_lines(&updated)
}

fn remote_db_line(name: &str) -> String {
    format!("RemoteDBName={},@{}", name, name)
}

fn is_section_header(line: &String) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with('[') && trimmed.ends_with(']')
}

fn join_lines(lines: &[String]) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
