//! Header-aligned table strategy
//!
//! Column boundaries come from the header: every character position that is
//! non-blank on any header line belongs to a column, and runs of two or more
//! blank positions separate columns. Taking the union over all header lines
//! keeps labels that are split across lines (`Total` over `Capacity`) in one
//! column even when the fragments have different widths.
//!
//! Data values are usually right-aligned under their label and may start a
//! little left of the header text. When a boundary falls strictly inside a
//! value (a run of words joined by single spaces), the boundary moves to the
//! start of that value, so `  524 MB` lands in the column on its right.
//!
//! All offsets are in characters, not bytes.

use std::sync::LazyLock;

use regex::Regex;

use super::fields::Fields;
use crate::error::{ParseError, ParseResult};

/// Most header lines a table may have
const MAX_HEADER_LINES: usize = 3;

static FOOTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^Display(ed|ing)\s+\d+").expect("FOOTER_RE is a valid regex pattern")
});

/// One column derived from the header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Header fragments joined top-down with single spaces
    pub name: String,
    /// First character position
    pub start: usize,
    /// One past the last header character
    pub end: usize,
}

/// Returns true for lines made only of dashes, equals signs and blanks
#[must_use]
pub fn is_separator(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && trimmed.chars().all(|c| matches!(c, '-' | '=' | ' ' | '\t'))
}

/// Returns true for `Displayed N out of M ...` style footers
#[must_use]
pub fn is_footer(line: &str) -> bool {
    FOOTER_RE.is_match(line.trim())
}

/// Returns true for lines that start with whitespace
#[must_use]
pub fn is_indented(line: &str) -> bool {
    line.starts_with(char::is_whitespace)
}

fn has_digit(line: &str) -> bool {
    line.chars().any(|c| c.is_ascii_digit())
}

/// Spans of words joined by single spaces, as `[start, end)` char ranges
fn phrases(chars: &[char]) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        if chars[i].is_whitespace() {
            i += 1;
            continue;
        }
        let start = i;
        let mut end = i;
        while end < chars.len() {
            if !chars[end].is_whitespace() {
                end += 1;
            } else if chars[end] == ' '
                && end + 1 < chars.len()
                && !chars[end + 1].is_whitespace()
            {
                end += 1;
            } else {
                break;
            }
        }
        spans.push((start, end));
        i = end;
    }
    spans
}

/// Column layout inferred from one or more header lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    columns: Vec<Column>,
}

impl ColumnLayout {
    /// Infers columns from header lines, top line first
    #[must_use]
    pub fn from_header(lines: &[&str]) -> Self {
        let rows: Vec<Vec<char>> = lines
            .iter()
            .map(|l| l.trim_end().chars().collect())
            .collect();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);

        let occupied: Vec<bool> = (0..width)
            .map(|i| rows.iter().any(|r| r.get(i).is_some_and(|c| !c.is_whitespace())))
            .collect();

        let mut spans: Vec<(usize, usize)> = Vec::new();
        let mut i = 0;
        while i < width {
            if !occupied[i] {
                i += 1;
                continue;
            }
            let start = i;
            let mut end = i;
            // Extend across single blank positions only
            while end < width && (occupied[end] || (end + 1 < width && occupied[end + 1])) {
                end += 1;
            }
            spans.push((start, end));
            i = end;
        }

        let columns = spans
            .into_iter()
            .map(|(start, end)| {
                let name = rows
                    .iter()
                    .map(|r| slice(r, start, end).trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ");
                Column { name, start, end }
            })
            .collect();

        Self { columns }
    }

    /// The inferred columns, left to right
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Splits a data line into fields keyed by column name
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MissingColumns`] when the line ends before the
    /// last column starts.
    pub fn split(&self, line: &str) -> ParseResult<Fields> {
        let chars: Vec<char> = line.trim_end().chars().collect();
        let Some(last) = self.columns.last() else {
            return Err(ParseError::NoHeader);
        };
        if chars.len() <= last.start {
            return Err(ParseError::MissingColumns {
                expected: self.columns.len(),
                found: self.columns.iter().filter(|c| c.start < chars.len()).count(),
                line: line.to_string(),
            });
        }

        let spans = phrases(&chars);
        let mut bounds = Vec::with_capacity(self.columns.len());
        let mut previous = 0;
        for (idx, column) in self.columns.iter().enumerate() {
            let mut bound = if idx == 0 { 0 } else { column.start };
            if let Some(&(phrase_start, _)) = spans
                .iter()
                .find(|&&(s, e)| s < bound && bound < e)
            {
                bound = phrase_start;
            }
            bound = bound.max(previous);
            bounds.push(bound);
            previous = bound;
        }

        let mut fields = Fields::new();
        for (idx, column) in self.columns.iter().enumerate() {
            let start = bounds[idx];
            let end = bounds.get(idx + 1).copied().unwrap_or(chars.len());
            fields.insert(column.name.clone(), slice(&chars, start, end).trim());
        }
        Ok(fields)
    }
}

fn slice(chars: &[char], start: usize, end: usize) -> String {
    let end = end.min(chars.len());
    if start >= end {
        return String::new();
    }
    chars[start..end].iter().collect()
}

/// Result of parsing one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// The inferred layout
    pub layout: ColumnLayout,
    /// Rows that split cleanly
    pub rows: Vec<Fields>,
    /// Rows that were dropped
    pub rejected: Vec<ParseError>,
}

/// Finds the header with `is_header` and splits every data line under it
///
/// Header continuation lines (digit-free lines right below the matched line,
/// or indented digit-free lines right above it) join the header. Blank,
/// separator, indented and footer lines are skipped. Malformed rows are
/// logged against `command` and dropped.
///
/// # Errors
///
/// Returns [`ParseError::NoHeader`] when no line satisfies `is_header`.
pub fn parse_table(
    raw: &str,
    command: &str,
    is_header: impl Fn(&str) -> bool,
) -> ParseResult<Table> {
    let lines: Vec<&str> = raw.lines().map(|l| l.trim_end_matches('\r')).collect();
    let anchor = lines
        .iter()
        .position(|l| is_header(l))
        .ok_or(ParseError::NoHeader)?;

    let mut first = anchor;
    while first > 0
        && anchor - first + 1 < MAX_HEADER_LINES
        && is_header_fragment(lines[first - 1])
        && is_indented(lines[first - 1])
    {
        first -= 1;
    }
    let mut last = anchor;
    while last + 1 < lines.len()
        && last - first + 1 < MAX_HEADER_LINES
        && is_header_fragment(lines[last + 1])
    {
        last += 1;
    }

    let layout = ColumnLayout::from_header(&lines[first..=last]);
    let mut rows = Vec::new();
    let mut rejected = Vec::new();

    for line in &lines[last + 1..] {
        if line.trim().is_empty() || is_separator(line) || is_indented(line) || is_footer(line) {
            continue;
        }
        match layout.split(line) {
            Ok(fields) => rows.push(fields),
            Err(e) => {
                tracing::warn!(command, error = %e, "Skipping malformed row");
                rejected.push(e);
            }
        }
    }

    Ok(Table {
        layout,
        rows,
        rejected,
    })
}

fn is_header_fragment(line: &str) -> bool {
    !line.trim().is_empty() && !is_separator(line) && !is_footer(line) && !has_digit(line)
}
