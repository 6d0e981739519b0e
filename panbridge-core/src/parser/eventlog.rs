//! `eventlog -output tab -count 200`
//!
//! The first non-blank line names the columns, every further line is one
//! event. Column names differ between code levels, hence the candidate
//! lists below.

use chrono::SecondsFormat;

use super::fields::Fields;
use super::values::{map_severity, name_to_id, parse_timestamp};
use super::{CommandParser, ParseStrategy};
use crate::models::{Alert, AlertStatus};

const CODE: &[&str] = &["CODE", "Code", "Sequence", "Seq", "ID"];
const MESSAGE: &[&str] = &["MESSAGE", "Message", "Description"];
const CATEGORY: &[&str] = &["CATEGORY", "Category", "Type", "Severity"];
const TIME: &[&str] = &["TIME", "Time"];
const COMPONENT: &[&str] = &["COMPONENT", "Component"];
const COMPONENT_TYPE: &[&str] = &["COMPONENT_TYPE", "Component_Type"];
const IP_ADDRESS: &[&str] = &["IP_ADDRESS", "IP Address"];
const VOLUME: &[&str] = &["VOLUME", "Volume"];

/// Splits tab-delimited output into rows keyed by the header line
///
/// Missing trailing cells become empty strings.
#[must_use]
pub fn tab_rows(raw: &str) -> Vec<Fields> {
    let mut lines = raw.lines().filter(|l| !l.trim().is_empty());
    let Some(header) = lines.next() else {
        return Vec::new();
    };
    let labels: Vec<&str> = header.split('\t').map(str::trim).collect();

    lines
        .map(|line| {
            let mut cells = line.split('\t');
            labels
                .iter()
                .map(|label| (*label, cells.next().unwrap_or("").trim()))
                .collect()
        })
        .collect()
}

/// Parses the event log into active alerts
pub struct EventlogParser;

impl CommandParser for EventlogParser {
    const COMMAND: &'static str = "eventlog -output tab -count 200";
    const STRATEGY: ParseStrategy = ParseStrategy::TabDelimited;
    type Output = Vec<Alert>;

    fn parse(raw: &str) -> Vec<Alert> {
        tab_rows(raw).iter().filter_map(alert_from_row).collect()
    }
}

fn alert_from_row(row: &Fields) -> Option<Alert> {
    let message = row.lookup(MESSAGE)?;
    let code = row.lookup_or_empty(CODE);
    let timestamp = parse_timestamp(row.lookup_or_empty(TIME));

    let source = [COMPONENT_TYPE, COMPONENT, IP_ADDRESS, VOLUME]
        .iter()
        .map(|keys| row.lookup_or_empty(keys))
        .filter(|part| !part.is_empty() && *part != "-")
        .collect::<Vec<_>>()
        .join(" ");

    Some(Alert {
        id: name_to_id(
            "alert",
            &format!(
                "{code}-{}",
                timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
            ),
        ),
        severity: map_severity(row.lookup_or_empty(CATEGORY)),
        status: AlertStatus::Active,
        message: message.to_string(),
        source: if source.is_empty() {
            "system".into()
        } else {
            source
        },
        timestamp,
        acknowledged_at: None,
        resolved_at: None,
    })
}
