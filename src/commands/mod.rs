// Command handlers module
pub mod add;
pub mod check;
pub mod completions;
pub mod config;
pub mod edit;
pub mod gateway;
pub mod import;
pub mod list;
pub mod remove;
pub mod show;

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::core::config::Config;
use crate::core::entry::TnsEntry;
use crate::core::gateway::GatewayUpdate;
use crate::core::{gateway as gateway_core, locate, parser, serializer};

/// Resolve the tnsnames.ora to operate on: explicit `--file`, then the
/// configured path, then platform discovery.
pub(crate) fn resolve_tnsnames_path(matches: &clap::ArgMatches) -> Result<PathBuf> {
    if let Some(file) = matches.get_one::<String>("file") {
        return Ok(PathBuf::from(file));
    }

    let config = Config::load().unwrap_or_default();
    if let Some(path) = config.tnsnames_path {
        return Ok(PathBuf::from(path));
    }

    locate::default_tnsnames_path().context(
        "Could not locate a tnsnames.ora file; pass --file <PATH> or run 'tnsed config set file <PATH>'",
    )
}

pub(crate) fn load_entries(path: &Path) -> Result<Vec<TnsEntry>> {
    parser::parse_file(path).with_context(|| format!("Failed to load {}", path.display()))
}

/// Save the entry set and, when a gateway file is configured, mirror the
/// alias names into it. A gateway problem never fails the save itself.
pub(crate) fn save_entries(path: &Path, entries: &[TnsEntry]) -> Result<()> {
    serializer::save_file(path, entries)
        .with_context(|| format!("Failed to save {}", path.display()))?;

    let config = Config::load().unwrap_or_default();
    if let Some(gateway_path) = config.gateway_path {
        match gateway_core::update_remote_db_names(Path::new(&gateway_path), entries) {
            Ok(GatewayUpdate::Updated { aliases, .. }) => {
                println!(
                    "{}",
                    format!("✓ Gateway file synced ({} aliases)", aliases).dimmed()
                );
            }
            Ok(GatewayUpdate::FileMissing { path }) => {
                println!(
                    "{}",
                    format!("Gateway file not found at {}, skipping sync", path.display())
                        .yellow()
                );
            }
            Err(err) => {
                log::warn!("gateway sync failed: {}", err);
                println!("{}", format!("Gateway sync failed: {}", err).yellow());
            }
        }
    }

    Ok(())
}
