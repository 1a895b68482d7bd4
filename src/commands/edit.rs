use anyhow::{bail, Result};
use colored::Colorize;

use crate::commands::{load_entries, resolve_tnsnames_path, save_entries};
use crate::core::validation::{find_by_name, find_identical, missing_connect_data, validate_entry};
use crate::error::TnsedError;

pub fn execute(matches: &clap::ArgMatches) -> Result<()> {
    let path = resolve_tnsnames_path(matches)?;
    let mut entries = load_entries(&path)?;

    let original_name = matches
        .get_one::<String>("alias")
        .cloned()
        .unwrap_or_default();

    let position = entries
        .iter()
        .position(|e| e.name.eq_ignore_ascii_case(&original_name))
        .ok_or_else(|| TnsedError::entry_not_found(original_name.clone()))?;

    let mut edited = entries[position].clone();
    let mut changed = false;

    let mut apply = |field: &mut String, key: &str| {
        if let Some(value) = matches.get_one::<String>(key) {
            *field = value.clone();
            changed = true;
        }
    };

    apply(&mut edited.name, "rename");
    apply(&mut edited.host, "host");
    apply(&mut edited.port, "port");
    apply(&mut edited.service_name, "service-name");
    apply(&mut edited.sid, "sid");
    apply(&mut edited.protocol, "protocol");
    apply(&mut edited.server, "server");

    if !changed {
        bail!("Nothing to change; pass at least one field flag (see 'tnsed edit --help')");
    }

    validate_entry(&edited)?;

    if missing_connect_data(&edited) {
        println!(
            "{}",
            "Warning: entry has neither SERVICE_NAME nor SID; most clients need one of them"
                .yellow()
        );
    }

    if find_identical(&entries, &edited, Some(&original_name)).is_some() {
        bail!("An identical entry already exists");
    }

    // renames must not collide with another alias
    if !edited.name.eq_ignore_ascii_case(&original_name)
        && find_by_name(&entries, &edited.name, Some(&original_name)).is_some()
    {
        bail!("An entry named '{}' already exists", edited.name);
    }

    let summary = edited.summary();
    entries[position] = edited;
    save_entries(&path, &entries)?;

    println!("{}", format!("✓ Updated {}", summary).green());
    Ok(())
}
