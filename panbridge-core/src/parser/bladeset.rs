//! `bladeset list allcolumns` and `bladeset detail <name>`

use std::sync::LazyLock;

use regex::Regex;

use super::columns::parse_table;
use super::fields::Fields;
use super::kv::parse_key_values;
use super::values::{
    map_pool_status, name_to_id, parse_capacity, parse_count, try_parse_capacity,
};
use super::{CommandParser, ParseStrategy, quote_arg};
use crate::error::{ParseError, ParseResult};
use crate::models::{Pool, PoolDetail, PoolStatus, PoolTier};

static OSDS_ONLINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\s*/\s*(\d+)\s+OSDs?\s+online")
        .expect("OSDS_ONLINE_RE is a valid regex pattern")
});

static INFO_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(Vertical Parity|MLEC|OSD Capacit)")
        .expect("INFO_LINE_RE is a valid regex pattern")
});

const NAME: &[&str] = &["BladeSet Name", "Name", "BladeSet"];
const TOTAL: &[&str] = &["Total Capacity", "Capacity", "Total", "Size"];
const USED: &[&str] = &["Used Capacity", "Used", "Space Used"];
const AVAILABLE: &[&str] = &["Available Capacity", "Available", "Avail", "Free"];
const STATUS: &[&str] = &["Status", "State"];
const OSDS: &[&str] = &["OSDs", "Drives", "Drive Count"];

/// Parses the bladeset table into pools
pub struct BladesetListParser;

impl CommandParser for BladesetListParser {
    const COMMAND: &'static str = "bladeset list allcolumns";
    const STRATEGY: ParseStrategy = ParseStrategy::HeaderAligned;
    type Output = Vec<Pool>;

    fn parse(raw: &str) -> Vec<Pool> {
        let is_header = |l: &str| {
            let lower = l.to_lowercase();
            lower.contains("bladeset") && lower.contains("status")
        };
        let Ok(table) = parse_table(raw, Self::COMMAND, is_header) else {
            tracing::debug!(command = Self::COMMAND, "No bladeset header found");
            return Vec::new();
        };

        table
            .rows
            .iter()
            .filter_map(|row| match Self::pool_from_row(row) {
                Ok(pool) => pool,
                Err(e) => {
                    tracing::warn!(command = Self::COMMAND, error = %e, "Skipping bladeset row");
                    None
                }
            })
            .collect()
    }
}

impl BladesetListParser {
    /// Builds a pool from one table row; `Ok(None)` for informational lines
    fn pool_from_row(row: &Fields) -> ParseResult<Option<Pool>> {
        let name = row
            .lookup(NAME)
            .ok_or_else(|| ParseError::MissingField("BladeSet Name".into()))?;
        if INFO_LINE_RE.is_match(name) {
            return Ok(None);
        }

        let total = row.lookup(TOTAL).map_or(0, parse_capacity);
        let used = row.lookup(USED).and_then(try_parse_capacity);
        let available = row.lookup(AVAILABLE).and_then(try_parse_capacity);
        let (used, available) = match (used, available) {
            (Some(u), Some(a)) => (u, a),
            (Some(u), None) => (u, total.saturating_sub(u)),
            (None, Some(a)) => (total.saturating_sub(a), a),
            (None, None) => (0, total),
        };

        let status_text = row.lookup_or_empty(STATUS);
        let osds = OSDS_ONLINE_RE.captures(status_text).and_then(|c| {
            let online = c[1].parse::<u32>().ok()?;
            let expected = c[2].parse::<u32>().ok()?;
            Some((online, expected))
        });
        let status = match osds {
            Some((online, expected)) if online == expected => PoolStatus::Online,
            Some(_) => PoolStatus::Degraded,
            None => map_pool_status(status_text),
        };
        let (vpods_online, vpod_count) = osds.unwrap_or((0, 0));

        Ok(Some(Pool {
            id: name_to_id("pool", name),
            name: name.to_string(),
            status,
            total_capacity_bytes: total,
            used_capacity_bytes: used,
            available_capacity_bytes: available,
            volume_count: 0,
            drive_count: parse_count(row.lookup_or_empty(OSDS)),
            raid_level: "unknown".into(),
            tier: PoolTier::Ssd,
            node_count: None,
            metadata_used_bytes: None,
            metadata_total_bytes: None,
            vpod_count,
            vpods_online,
        }))
    }
}

/// Parses `bladeset detail` key-value output into a pool overlay
pub struct BladesetDetailParser;

impl BladesetDetailParser {
    /// Builds the detail command for a bladeset name
    #[must_use]
    pub fn command(name: &str) -> String {
        format!("{} {}", Self::COMMAND, quote_arg(name))
    }
}

impl CommandParser for BladesetDetailParser {
    const COMMAND: &'static str = "bladeset detail";
    const STRATEGY: ParseStrategy = ParseStrategy::KeyValue;
    type Output = PoolDetail;

    fn parse(raw: &str) -> PoolDetail {
        let kv = parse_key_values(raw);
        let count = |keys: &[&str]| kv.lookup(keys).map(parse_count).filter(|n| *n > 0);

        PoolDetail {
            total_capacity_bytes: kv.lookup(&["Capacity", "Total Capacity"]).map(parse_capacity),
            used_capacity_bytes: kv.lookup(&["Used", "Used Capacity"]).map(parse_capacity),
            raid_level: kv
                .lookup(&["RAID Level", "RAID Config", "RAID"])
                .map(str::to_string),
            status: kv.lookup(&["Status"]).map(map_pool_status),
            metadata_used_bytes: kv.lookup(&["Metadata Used"]).map(parse_capacity),
            metadata_total_bytes: kv
                .lookup(&["Metadata Total", "Metadata Capacity"])
                .map(parse_capacity),
            drive_count: kv.lookup(&["Drives", "Drive Count"]).map(parse_count),
            node_count: count(&["Nodes", "Node Count"]),
        }
    }
}
