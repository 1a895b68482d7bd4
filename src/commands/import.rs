use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::io::Read;

use crate::commands::{load_entries, resolve_tnsnames_path, save_entries};
use crate::core::parser::parse_text;
use crate::core::validation::{find_by_name, find_identical, validate_entry};

/// Merge entries pasted on stdin into the file. Mirrors the "paste a TNS
/// block" flow: people copy connection descriptors out of tickets and
/// emails all the time.
pub fn execute(matches: &clap::ArgMatches) -> Result<()> {
    let path = resolve_tnsnames_path(matches)?;
    let replace = matches.get_flag("replace");

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read from stdin")?;

    let imported = parse_text(&input);
    if imported.is_empty() {
        bail!("No TNS entries recognized in the input");
    }

    let mut entries = load_entries(&path)?;
    let mut added = 0usize;
    let mut replaced = 0usize;
    let mut skipped = 0usize;

    for entry in imported {
        validate_entry(&entry)?;

        if find_identical(&entries, &entry, None).is_some() {
            println!(
                "{}",
                format!("Skipping '{}': identical entry already present", entry.name).dimmed()
            );
            skipped += 1;
            continue;
        }

        if find_by_name(&entries, &entry.name, None).is_some() {
            if !replace {
                bail!(
                    "An entry named '{}' already exists; pass --replace to overwrite",
                    entry.name
                );
            }

            entries.retain(|e| !e.name.eq_ignore_ascii_case(&entry.name));
            entries.push(entry);
            replaced += 1;
        } else {
            entries.push(entry);
            added += 1;
        }
    }

    if added + replaced > 0 {
        save_entries(&path, &entries)?;
    }

    println!(
        "{}",
        format!(
            "✓ Imported {} added, {} replaced, {} skipped",
            added, replaced, skipped
        )
        .green()
    );
    Ok(())
}
