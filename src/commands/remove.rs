use anyhow::Result;
use colored::Colorize;

use crate::commands::{load_entries, resolve_tnsnames_path, save_entries};
use crate::error::TnsedError;
use crate::ui::confirm;

pub fn execute(matches: &clap::ArgMatches) -> Result<()> {
    let path = resolve_tnsnames_path(matches)?;
    let mut entries = load_entries(&path)?;

    let name = matches
        .get_one::<String>("alias")
        .map(|s| s.as_str())
        .unwrap_or_default();
    let assume_yes = matches.get_flag("yes");

    let matching = entries
        .iter()
        .filter(|e| e.name.eq_ignore_ascii_case(name))
        .count();

    if matching == 0 {
        return Err(TnsedError::entry_not_found(name).into());
    }

    if !assume_yes {
        let prompt = if matching == 1 {
            format!("Remove entry '{}'? [y/N]", name)
        } else {
            format!("Remove {} entries named '{}'? [y/N]", matching, name)
        };

        if !confirm(&prompt)? {
            println!("{}", "Aborted".dimmed());
            return Ok(());
        }
    }

    entries.retain(|e| !e.name.eq_ignore_ascii_case(name));
    save_entries(&path, &entries)?;

    println!("{}", format!("✓ Removed '{}'", name).green());
    Ok(())
}
