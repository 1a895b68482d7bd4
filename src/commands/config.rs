use anyhow::{bail, Result};
use colored::Colorize;

use crate::core::config::Config;

pub fn execute(matches: &clap::ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("show", _)) => show(),
        Some(("set", sub_matches)) => {
            let key = sub_matches
                .get_one::<String>("key")
                .map(|s| s.as_str())
                .unwrap_or_default();
            let value = sub_matches
                .get_one::<String>("value")
                .map(|s| s.as_str())
                .unwrap_or_default();
            set(key, Some(value))
        }
        Some(("unset", sub_matches)) => {
            let key = sub_matches
                .get_one::<String>("key")
                .map(|s| s.as_str())
                .unwrap_or_default();
            set(key, None)
        }
        _ => show(),
    }
}

fn show() -> Result<()> {
    let config = Config::load()?;

    let display = |value: &Option<String>| match value {
        Some(v) => v.normal(),
        None => "(not set)".dimmed(),
    };

    println!("{}  {}", "file:    ".bold(), display(&config.tnsnames_path));
    println!("{}  {}", "gateway: ".bold(), display(&config.gateway_path));
    println!(
        "{}  {}",
        "parallel:".bold(),
        display(&config.max_parallel_checks.map(|v| v.to_string()))
    );
    println!("{}  {}", "command: ".bold(), display(&config.ping_command));
    println!(
        "{}  {}",
        "timeout: ".bold(),
        display(&config.check_timeout_secs.map(|v| format!("{}s", v)))
    );

    Ok(())
}

fn set(key: &str, value: Option<&str>) -> Result<()> {
    let mut config = Config::load()?;

    match key {
        "file" => config.tnsnames_path = value.map(String::from),
        "gateway" => config.gateway_path = value.map(String::from),
        "command" => config.ping_command = value.map(String::from),
        "parallel" => {
            config.max_parallel_checks = match value {
                Some(v) => Some(
                    v.parse()
                        .map_err(|_| anyhow::anyhow!("'{}' is not a valid count", v))?,
                ),
                None => None,
            }
        }
        "timeout" => {
            config.check_timeout_secs = match value {
                Some(v) => Some(
                    v.parse()
                        .map_err(|_| anyhow::anyhow!("'{}' is not a valid number of seconds", v))?,
                ),
                None => None,
            }
        }
        other => bail!(
            "Unknown config key '{}' (expected file, gateway, parallel, command or timeout)",
            other
        ),
    }

    config.save()?;
    println!("{}", "✓ Configuration updated".green());
    Ok(())
}
