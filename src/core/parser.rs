//! Tolerant parser for the tnsnames.ora nested-parenthesis format.
//!
//! The format as found in the wild is hand-edited: comments, stray blank
//! lines, inconsistent indentation and half-broken entries are all normal.
//! The parser therefore never fails on malformed content; an entry is
//! delimited by the next alias header rather than by balanced parentheses,
//! and a missing key simply yields an empty field.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;

use crate::core::entry::TnsEntry;
use crate::error::{Result, TnsedError};

/// Alias headers anchor at line starts: one identifier followed by `=`.
static HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^([A-Za-z0-9_]+)\s*=").expect("valid header regex"));

static HOST_RE: Lazy<Regex> = Lazy::new(|| key_regex("HOST"));
static PORT_RE: Lazy<Regex> = Lazy::new(|| key_regex("PORT"));
static PROTOCOL_RE: Lazy<Regex> = Lazy::new(|| key_regex("PROTOCOL"));
static SERVICE_NAME_RE: Lazy<Regex> = Lazy::new(|| key_regex("SERVICE_NAME"));
static SID_RE: Lazy<Regex> = Lazy::new(|| key_regex("SID"));
static SERVER_RE: Lazy<Regex> = Lazy::new(|| key_regex("SERVER"));

/// Key extraction pattern: the key after an opening parenthesis, `=`, then
/// everything up to (not including) the next `)`. The parenthesis anchor
/// keeps an alias named e.g. `MYSID` from feeding the SID extractor.
fn key_regex(key: &str) -> Regex {
    Regex::new(&format!(r"(?i)\(\s*{}\s*=\s*([^)]*)\)", key)).expect("valid key regex")
}

/// Parse a tnsnames.ora file into entries.
///
/// A missing file is not an error: the caller gets an empty list, matching
/// the first-run experience where no config exists yet. An existing but
/// unreadable file does surface as an error.
pub fn parse_file(path: &Path) -> Result<Vec<TnsEntry>> {
    if !path.exists() {
        log::debug!("tnsnames file {} does not exist, returning no entries", path.display());
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path).map_err(|e| TnsedError::file_access(path, e))?;
    Ok(parse_text(&content))
}

/// Parse raw tnsnames.ora text into entries.
///
/// Duplicate alias names are preserved as distinct entries; surfacing name
/// collisions is the caller's job.
pub fn parse_text(content: &str) -> Vec<TnsEntry> {
    let cleaned = strip_comments(content);

    let headers: Vec<(usize, String)> = HEADER_RE
        .captures_iter(&cleaned)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(1)?;
            Some((whole.start(), name.as_str().trim().to_string()))
        })
        .collect();

    let mut entries = Vec::with_capacity(headers.len());

    for (i, (start, name)) in headers.iter().enumerate() {
        let end = headers
            .get(i + 1)
            .map(|(next_start, _)| *next_start)
            .unwrap_or(cleaned.len());
        let span = &cleaned[*start..end];

        let mut entry = TnsEntry {
            name: name.clone(),
            host: extract_value(span, &HOST_RE),
            port: extract_value(span, &PORT_RE),
            protocol: extract_value(span, &PROTOCOL_RE),
            service_name: extract_value(span, &SERVICE_NAME_RE),
            sid: extract_value(span, &SID_RE),
            server: extract_value(span, &SERVER_RE),
            raw_content: span.trim_end().to_string(),
            ..Default::default()
        };

        if entry.protocol.is_empty() {
            entry.protocol = "TCP".to_string();
        }

        entries.push(entry);
    }

    log::debug!("parsed {} entries", entries.len());
    entries
}

/// Drop blank lines and `#` comment lines, rejoin the rest.
fn strip_comments(content: &str) -> String {
    content
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// First match wins; later duplicate keys in the same entry are ignored.
fn extract_value(text: &str, pattern: &Regex) -> String {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}
