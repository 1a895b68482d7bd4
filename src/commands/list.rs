use anyhow::Result;
use colored::Colorize;

use crate::commands::{load_entries, resolve_tnsnames_path};
use crate::core::entry::TnsEntry;
use crate::ui::{formatters::cell_width, pad_cell};

pub fn execute(matches: &clap::ArgMatches) -> Result<()> {
    let path = resolve_tnsnames_path(matches)?;
    let entries = load_entries(&path)?;

    if entries.is_empty() {
        println!(
            "{}",
            format!("No entries found in {}", path.display()).yellow()
        );
        return Ok(());
    }

    println!("{}", path.display().to_string().dimmed());
    print_table(&entries);
    println!();
    println!(
        "{}",
        format!(
            "{} {}",
            entries.len(),
            if entries.len() == 1 { "entry" } else { "entries" }
        )
        .dimmed()
    );

    Ok(())
}

fn print_table(entries: &[TnsEntry]) {
    let headers = ["NAME", "PROTOCOL", "HOST", "PORT", "SERVICE/SID", "SERVER"];

    let rows: Vec<[String; 6]> = entries.iter().map(row).collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell_width(cell));
        }
    }

    let header_line = headers
        .iter()
        .enumerate()
        .map(|(i, h)| pad_cell(h, widths[i]))
        .collect::<Vec<_>>()
        .join("  ");
    println!("{}", header_line.bold());

    for row in &rows {
        let line = row
            .iter()
            .enumerate()
            .map(|(i, cell)| pad_cell(cell, widths[i]))
            .collect::<Vec<_>>()
            .join("  ");
        println!("{}", line);
    }
}

fn row(entry: &TnsEntry) -> [String; 6] {
    let connect = if !entry.service_name.is_empty() {
        entry.service_name.clone()
    } else if !entry.sid.is_empty() {
        format!("{} (SID)", entry.sid)
    } else {
        "-".to_string()
    };

    [
        entry.name.clone(),
        entry.protocol.clone(),
        entry.host.clone(),
        entry.port.clone(),
        connect,
        if entry.server.is_empty() {
            "-".to_string()
        } else {
            entry.server.clone()
        },
    ]
}
