//! Token extraction strategy for statistics tables
//!
//! `sysstat` prints a two-line header over per-node rows and a `Total` row,
//! with numbers whose width varies from one poll to the next. Instead of
//! trusting column offsets, each row's name is cut off at its first 2+ space
//! gap and the remaining numeric tokens are assigned by position.

use std::sync::LazyLock;

use regex::Regex;

use super::columns::{is_footer, is_indented, is_separator};

static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"-?\d+(?:\.\d+)?").expect("NUMBER_RE is a valid regex pattern")
});

static NAME_GAP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("NAME_GAP_RE is a valid regex pattern"));

/// How per-node values combine when there is no `Total` row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    /// Rates add up
    Sum,
    /// Latencies average
    Mean,
}

/// A statistics row: its name and numeric tokens in order
#[derive(Debug, Clone, PartialEq)]
pub struct StatRow {
    /// First column, e.g. `VCH-4,2` or `Total`
    pub name: String,
    /// Numbers after the name, left to right
    pub values: Vec<f64>,
}

impl StatRow {
    /// Returns true for the summary row
    #[must_use]
    pub fn is_total(&self) -> bool {
        self.name.eq_ignore_ascii_case("total")
    }
}

/// Splits a line into its name and numeric tokens
///
/// Returns `None` for lines with no 2+ space gap after the name, which is
/// how header and key-value lines look.
#[must_use]
pub fn stat_row(line: &str) -> Option<StatRow> {
    let trimmed = line.trim_end();
    let gap = NAME_GAP_RE.find(trimmed)?;
    let name = trimmed[..gap.start()].trim();
    if name.is_empty() {
        return None;
    }
    let values = NUMBER_RE
        .find_iter(&trimmed[gap.end()..])
        .filter_map(|m| m.as_str().parse().ok())
        .collect();
    Some(StatRow {
        name: name.to_string(),
        values,
    })
}

/// Collects every row carrying at least `min_values` numbers
#[must_use]
pub fn stat_rows(raw: &str, min_values: usize) -> Vec<StatRow> {
    raw.lines()
        .filter(|l| {
            !l.trim().is_empty() && !is_separator(l) && !is_footer(l) && !is_indented(l)
        })
        .filter_map(stat_row)
        .filter(|row| row.values.len() >= min_values)
        .collect()
}

/// Extracts one value per field from a statistics table
///
/// The `Total` row wins when present. Otherwise per-node rows are combined
/// field by field as `fields` says. Returns `None` when no row has enough
/// numbers, so the caller can fall back to key-value parsing.
#[must_use]
pub fn extract(raw: &str, fields: &[Aggregate]) -> Option<Vec<f64>> {
    let rows = stat_rows(raw, fields.len());
    if let Some(total) = rows.iter().find(|r| r.is_total()) {
        return Some(total.values[..fields.len()].to_vec());
    }
    if rows.is_empty() {
        return None;
    }

    let count = rows.len() as f64;
    let combined = fields
        .iter()
        .enumerate()
        .map(|(i, aggregate)| {
            let sum: f64 = rows.iter().map(|r| r.values[i]).sum();
            match aggregate {
                Aggregate::Sum => sum,
                Aggregate::Mean => sum / count,
            }
        })
        .collect();
    Some(combined)
}
