//! Table and JSON rendering shared by the command handlers.

use std::fmt::Write as _;

use serde::Serialize;

use crate::error::CliError;

/// Renders rows under a header with two spaces between columns
///
/// The last column is not padded.
#[must_use]
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .filter_map(|r| r.get(i))
                .map(|c| c.chars().count())
                .max()
                .unwrap_or(0)
                .max(h.len())
        })
        .collect();

    let mut output = String::new();
    write_row(&mut output, headers.iter().copied(), &widths);
    let dashes: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_row(&mut output, dashes.iter().map(String::as_str), &widths);
    for row in rows {
        write_row(&mut output, row.iter().map(String::as_str), &widths);
    }

    output.trim_end().to_string()
}

fn write_row<'a>(output: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    let _ = writeln!(output, "{}", line.join("  ").trim_end());
}

/// Renders `label: value` pairs with the values aligned
#[must_use]
pub fn render_details(pairs: &[(&str, String)]) -> String {
    let width = pairs.iter().map(|(l, _)| l.len() + 1).max().unwrap_or(0);
    let mut output = String::new();
    for (label, value) in pairs {
        let _ = writeln!(output, "{:<width$} {value}", format!("{label}:"));
    }
    output.trim_end().to_string()
}

/// Pretty-printed JSON
///
/// # Errors
///
/// Returns `CliError::Output` if serialization fails.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| CliError::Output(format!("Failed to serialize to JSON: {e}")))
}

/// `-` for a missing optional value
#[must_use]
pub fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

/// Seconds as `3d 4h 5m`
#[must_use]
pub fn format_uptime(seconds: u64) -> String {
    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3600;
    let minutes = (seconds % 3600) / 60;
    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}
