use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

use crate::commands::{load_entries, resolve_tnsnames_path};
use crate::core::config::Config;
use crate::core::gateway::{update_remote_db_names, GatewayUpdate};

pub fn execute(matches: &clap::ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("sync", sub_matches)) => sync(sub_matches),
        _ => unreachable!("subcommand is required"),
    }
}

fn sync(matches: &clap::ArgMatches) -> Result<()> {
    let tns_path = resolve_tnsnames_path(matches)?;
    let entries = load_entries(&tns_path)?;

    let gateway_path = matches
        .get_one::<String>("gateway-file")
        .map(PathBuf::from)
        .or_else(|| {
            Config::load()
                .ok()
                .and_then(|c| c.gateway_path)
                .map(PathBuf::from)
        })
        .context(
            "No gateway file configured; pass --gateway-file <PATH> or run 'tnsed config set gateway <PATH>'",
        )?;

    match update_remote_db_names(&gateway_path, &entries)? {
        GatewayUpdate::Updated { path, aliases } => {
            println!(
                "{}",
                format!("✓ {} updated ({} aliases)", path.display(), aliases).green()
            );
        }
        GatewayUpdate::FileMissing { path } => {
            println!(
                "{}",
                format!("Gateway file not found at {}", path.display()).yellow()
            );
        }
    }

    Ok(())
}
