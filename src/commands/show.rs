use anyhow::Result;
use colored::Colorize;

use crate::commands::{load_entries, resolve_tnsnames_path};
use crate::error::TnsedError;

pub fn execute(matches: &clap::ArgMatches) -> Result<()> {
    let path = resolve_tnsnames_path(matches)?;
    let entries = load_entries(&path)?;

    let name = matches
        .get_one::<String>("alias")
        .map(|s| s.as_str())
        .unwrap_or_default();
    let raw = matches.get_flag("raw");

    let matching: Vec<_> = entries
        .iter()
        .filter(|e| e.name.eq_ignore_ascii_case(name))
        .collect();

    if matching.is_empty() {
        return Err(TnsedError::entry_not_found(name).into());
    }

    if matching.len() > 1 {
        println!(
            "{}",
            format!(
                "Warning: {} entries share the name '{}'",
                matching.len(),
                name
            )
            .yellow()
        );
    }

    for entry in matching {
        if raw {
            // as found in the source file, not the canonical rendering
            println!("{}", entry.raw_content);
        } else {
            print!("{}", entry.to_tns_format());
        }
    }

    Ok(())
}
