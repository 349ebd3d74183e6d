//! Output formatting
//!
//! Results go to stdout, as JSON when piped or requested and as plain
//! tables otherwise. Progress and model logs go to stderr.

use anyhow::Result;
use colored::*;
use fal_client::PollEvent;
use fal_client::decode::{render_json, render_summary};
use fal_core::domain::job::{QueueState, QueueStatus};
use fal_core::domain::log::LogEntry;
use serde::Serialize;
use std::io::{IsTerminal, Write};

/// How results are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Tables and summaries for a terminal
    Human,
    /// JSON, optionally indented
    Json { pretty: bool },
}

impl OutputMode {
    /// Pick the mode from the global flags and whether stdout is a terminal
    pub fn detect(json: bool, pretty: bool) -> Self {
        Self::resolve(json, pretty, std::io::stdout().is_terminal())
    }

    fn resolve(json: bool, pretty: bool, is_terminal: bool) -> Self {
        if pretty {
            OutputMode::Json { pretty: true }
        } else if json {
            OutputMode::Json {
                pretty: is_terminal,
            }
        } else if !is_terminal {
            OutputMode::Json { pretty: false }
        } else {
            OutputMode::Human
        }
    }
}

/// Write a value as JSON to stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}

/// Write a raw model result to stdout in the selected mode
pub fn print_result(body: &[u8], mode: OutputMode) -> Result<()> {
    let rendered = match mode {
        OutputMode::Json { pretty } => render_json(body, pretty),
        OutputMode::Human => render_summary(body).into_bytes(),
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&rendered)?;
    stdout.flush()?;
    Ok(())
}

// =============================================================================
// Tables
// =============================================================================

/// Lay out rows in left-aligned columns separated by two spaces
pub fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            let len = cell.chars().count();
            match widths.get_mut(i) {
                Some(width) => *width = (*width).max(len),
                None => widths.push(len),
            }
        }
    }

    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let mut out = format_row(&header_cells, &widths);
    for row in rows {
        out.push_str(&format_row(row, &widths));
    }
    out
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::new();
    for (i, cell) in cells.iter().enumerate() {
        if i + 1 == cells.len() {
            line.push_str(cell);
        } else {
            let pad = widths[i] - cell.chars().count() + 2;
            line.push_str(cell);
            line.push_str(&" ".repeat(pad));
        }
    }
    line.push('\n');
    line
}

/// Print a table with a bold header line
pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    let table = format_table(headers, rows);
    let mut lines = table.lines();
    if let Some(header) = lines.next() {
        println!("{}", header.bold());
    }
    for line in lines {
        println!("{}", line);
    }
}

/// Two-column key/value lines, skipping empty and "-" values
pub fn format_key_value(rows: &[(&str, String)]) -> String {
    let visible: Vec<Vec<String>> = rows
        .iter()
        .filter(|(_, value)| !value.is_empty() && value != "-")
        .map(|(key, value)| vec![key.to_string(), value.clone()])
        .collect();

    let width = visible.iter().map(|row| row[0].chars().count()).max().unwrap_or(0);
    visible
        .iter()
        .map(|row| format_row(row, &[width]))
        .collect()
}

pub fn print_key_value(rows: &[(&str, String)]) {
    print!("{}", format_key_value(rows));
}

/// Shorten to `max_len` characters, ending with "…" when cut
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let mut cut: String = s.chars().take(max_len.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

// =============================================================================
// Queue status and progress
// =============================================================================

/// STATUS and POSITION lines of a status snapshot
pub fn format_status(status: &QueueStatus) -> String {
    let position = status
        .queue_position
        .map(|position| position.to_string())
        .unwrap_or_default();

    format_key_value(&[
        ("STATUS", colorize_state(&status.status).to_string()),
        ("POSITION", position),
    ])
}

/// Print a status snapshot; logs go to stderr
pub fn print_status(status: &QueueStatus) {
    print!("{}", format_status(status));

    if !status.logs.is_empty() {
        eprintln!();
        eprintln!("{}", "Logs:".bold());
        for entry in &status.logs {
            eprintln!("  {}", format_log_entry(entry));
        }
    }
}

/// Report polling progress on stderr
pub fn print_poll_event(event: &PollEvent) {
    match event {
        PollEvent::Submitted { request_id } => {
            eprintln!("{} {}", "Queued:".cyan(), request_id)
        }
        PollEvent::Queued {
            position: Some(position),
        } => eprintln!("{}", format!("Queue position: {}", position).yellow()),
        PollEvent::Queued { position: None } => eprintln!("{}", "In queue...".yellow()),
        PollEvent::Running => eprintln!("{}", "In progress...".cyan()),
        PollEvent::Log(entry) => eprintln!("{}", format_log_entry(entry)),
    }
}

/// Format a model log line as "[LEVEL] message", prefixed with the time
/// when the timestamp is RFC 3339
pub fn format_log_entry(entry: &LogEntry) -> String {
    let level = colorize_level(&entry.level);
    match chrono::DateTime::parse_from_rfc3339(&entry.timestamp) {
        Ok(timestamp) => format!(
            "{} [{}] {}",
            timestamp.format("%H:%M:%S").to_string().dimmed(),
            level,
            entry.message
        ),
        Err(_) => format!("[{}] {}", level, entry.message),
    }
}

fn colorize_level(level: &str) -> ColoredString {
    let upper = level.to_uppercase();
    match upper.as_str() {
        "DEBUG" | "TRACE" => upper.dimmed(),
        "WARN" | "WARNING" => upper.yellow(),
        "ERROR" | "STDERR" => upper.red(),
        _ => upper.cyan(),
    }
}

fn colorize_state(state: &QueueState) -> ColoredString {
    let text = state.as_str();
    match state {
        QueueState::Queued => text.yellow(),
        QueueState::Running => text.cyan(),
        QueueState::Completed => text.green(),
        QueueState::Unknown(_) => text.dimmed(),
    }
}
