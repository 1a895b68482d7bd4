use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::commands::{load_entries, resolve_tnsnames_path};
use crate::core::config::Config;
use crate::core::entry::{ConnectionStatus, TnsEntry};
use crate::core::status::{
    ConnectionStatusService, StatusEvent, DEFAULT_CHECK_TIMEOUT, DEFAULT_MAX_PARALLEL_CHECKS,
    DEFAULT_PING_COMMAND,
};
use crate::ui::{pad_cell, status_label};

pub fn execute(matches: &clap::ArgMatches) -> Result<()> {
    let path = resolve_tnsnames_path(matches)?;
    let config = Config::load().unwrap_or_default();

    let parallel = matches
        .get_one::<usize>("parallel")
        .copied()
        .or(config.max_parallel_checks)
        .unwrap_or(DEFAULT_MAX_PARALLEL_CHECKS);
    let timeout_secs = matches
        .get_one::<u64>("timeout")
        .copied()
        .or(config.check_timeout_secs)
        .unwrap_or(DEFAULT_CHECK_TIMEOUT.as_secs());
    let command = matches
        .get_one::<String>("command")
        .cloned()
        .or(config.ping_command)
        .unwrap_or_else(|| DEFAULT_PING_COMMAND.to_string());
    let force = matches.get_flag("force");
    let watch_interval = matches.get_one::<u64>("watch").copied();
    let names: Vec<String> = matches
        .get_many::<String>("alias")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    if which::which(&command).is_err() {
        log::warn!("reachability tool '{}' not found on PATH", command);
        println!(
            "{}",
            format!(
                "Warning: '{}' was not found on PATH; every alias will report Offline",
                command
            )
            .yellow()
        );
    }

    let service = Arc::new(
        ConnectionStatusService::new(parallel)
            .with_command(command)
            .with_timeout(Duration::from_secs(timeout_secs)),
    );

    // Ctrl-C cancels the running campaign instead of tearing the process
    // down mid-write
    let stop = Arc::new(AtomicBool::new(false));
    {
        let service = Arc::clone(&service);
        let stop = Arc::clone(&stop);
        ctrlc::set_handler(move || {
            eprintln!();
            eprintln!("Cancelling pending checks...");
            stop.store(true, Ordering::SeqCst);
            service.cancel_pending_checks();
        })
        .context("Failed to install Ctrl-C handler")?;
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .thread_name("status-worker")
        .build()
        .context("Failed to build async runtime")?;

    match watch_interval {
        None => {
            let mut entries = load_selected(&path, &names)?;
            service.initialize_status(&mut entries);
            runtime.block_on(run_campaign(&service, &mut entries, force))?;
            print_summary(&entries);
            Ok(())
        }
        Some(interval) => watch_loop(&runtime, &service, &path, &names, force, interval, &stop),
    }
}

/// Load entries, restricted to the requested aliases when any were named.
fn load_selected(path: &Path, names: &[String]) -> Result<Vec<TnsEntry>> {
    let entries = load_entries(path)?;

    if entries.is_empty() {
        bail!("No entries found in {}", path.display());
    }

    if names.is_empty() {
        return Ok(entries);
    }

    for name in names {
        if !entries.iter().any(|e| e.name.eq_ignore_ascii_case(name)) {
            bail!("No entry named '{}' in {}", name, path.display());
        }
    }

    Ok(entries
        .into_iter()
        .filter(|e| names.iter().any(|n| e.name.eq_ignore_ascii_case(n)))
        .collect())
}

/// Drive one refresh campaign to completion, applying events to `entries`
/// as they arrive. Returns whether the campaign was cancelled.
async fn run_campaign(
    service: &ConnectionStatusService,
    entries: &mut [TnsEntry],
    force: bool,
) -> Result<bool> {
    let start = Instant::now();

    let Some(mut handle) = service.start_refresh(entries, force) else {
        println!(
            "{}",
            "All statuses are already cached; use --force to recheck".dimmed()
        );
        return Ok(false);
    };

    let mut cancelled = false;

    while let Some(event) = handle.next_event().await {
        match event {
            StatusEvent::Checking { name } => {
                apply_status(entries, &name, ConnectionStatus::Checking);
                println!("{}", format!("  checking {}...", name).dimmed());
            }
            StatusEvent::Finished {
                name,
                status,
                completed,
                total,
            } => {
                apply_status(entries, &name, status);
                println!(
                    "[{}/{}] {} {}",
                    completed,
                    total,
                    pad_cell(&name, 24),
                    status_label(status)
                );
            }
            StatusEvent::CampaignDone {
                cancelled: campaign_cancelled,
            } => {
                cancelled = campaign_cancelled;
            }
        }
    }

    if cancelled {
        println!("{}", "Campaign cancelled".yellow());
    } else {
        println!(
            "{}",
            format!("Done in {:.1}s", start.elapsed().as_secs_f32()).dimmed()
        );
    }

    Ok(cancelled)
}

/// The caller applies terminal statuses to its own entries; the service
/// never holds references into the entry set.
fn apply_status(entries: &mut [TnsEntry], name: &str, status: ConnectionStatus) {
    for entry in entries
        .iter_mut()
        .filter(|e| e.name.eq_ignore_ascii_case(name))
    {
        entry.status = status;
    }
}

fn print_summary(entries: &[TnsEntry]) {
    let online = entries
        .iter()
        .filter(|e| e.status == ConnectionStatus::Online)
        .count();
    let offline = entries
        .iter()
        .filter(|e| e.status == ConnectionStatus::Offline)
        .count();
    let other = entries.len() - online - offline;

    println!();
    for entry in entries {
        println!("  {} {}", pad_cell(&entry.name, 24), status_label(entry.status));
    }
    println!();

    let mut parts = vec![
        format!("{} online", online).green().to_string(),
        format!("{} offline", offline).red().to_string(),
    ];
    if other > 0 {
        parts.push(format!("{} unchecked", other).dimmed().to_string());
    }
    println!("{}", parts.join(", "));
}

/// Re-check on an interval, reusing the cache across reloads: removed
/// aliases are evicted, edited aliases are flagged for recheck, untouched
/// aliases keep their cached status.
fn watch_loop(
    runtime: &tokio::runtime::Runtime,
    service: &Arc<ConnectionStatusService>,
    path: &Path,
    names: &[String],
    force: bool,
    interval: u64,
    stop: &Arc<AtomicBool>,
) -> Result<()> {
    let mut previous: Vec<TnsEntry> = Vec::new();

    loop {
        let mut entries = load_selected(path, names)?;

        for old in &previous {
            match entries
                .iter()
                .find(|e| e.name.eq_ignore_ascii_case(&old.name))
            {
                None => service.clear_cache(Some(&old.name)),
                Some(current) if !current.is_identical_to(old) => {
                    service.mark_for_refresh(&current.name)
                }
                Some(_) => {}
            }
        }

        service.initialize_status(&mut entries);
        let cancelled = runtime.block_on(run_campaign(service, &mut entries, force))?;
        print_summary(&entries);
        previous = entries;

        if cancelled || stop.load(Ordering::SeqCst) {
            return Ok(());
        }

        println!(
            "{}",
            format!("Next check in {}s (Ctrl-C to stop)", interval).dimmed()
        );

        // chunked sleep so Ctrl-C is honored promptly
        let deadline = Instant::now() + Duration::from_secs(interval);
        while Instant::now() < deadline {
            if stop.load(Ordering::SeqCst) {
                return Ok(());
            }
            std::thread::sleep(Duration::from_millis(200));
        }
    }
}
