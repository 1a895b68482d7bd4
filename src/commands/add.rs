use anyhow::{bail, Result};
use colored::Colorize;

use crate::commands::{load_entries, resolve_tnsnames_path, save_entries};
use crate::core::entry::TnsEntry;
use crate::core::validation::{find_by_name, find_identical, missing_connect_data, validate_entry};

pub fn execute(matches: &clap::ArgMatches) -> Result<()> {
    let path = resolve_tnsnames_path(matches)?;
    let mut entries = load_entries(&path)?;

    let get = |key: &str| {
        matches
            .get_one::<String>(key)
            .cloned()
            .unwrap_or_default()
    };

    let entry = TnsEntry {
        name: get("name"),
        host: get("host"),
        port: get("port"),
        service_name: get("service-name"),
        sid: get("sid"),
        protocol: get("protocol"),
        server: get("server"),
        ..Default::default()
    };

    validate_entry(&entry)?;

    if missing_connect_data(&entry) {
        println!(
            "{}",
            "Warning: entry has neither SERVICE_NAME nor SID; most clients need one of them"
                .yellow()
        );
    }

    if find_identical(&entries, &entry, None).is_some() {
        bail!("An identical entry already exists");
    }

    if find_by_name(&entries, &entry.name, None).is_some() {
        bail!(
            "An entry named '{}' already exists (names are case-insensitive)",
            entry.name
        );
    }

    let summary = entry.summary();
    entries.push(entry);
    save_entries(&path, &entries)?;

    println!("{}", format!("✓ Added {}", summary).green());
    Ok(())
}
