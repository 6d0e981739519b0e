//! `volume list show all` and `volume details <name>`

use chrono::Utc;

use super::columns::parse_table;
use super::fields::Fields;
use super::kv::parse_key_values;
use super::values::{
    leading_number, map_volume_status, name_to_id, parse_bool, parse_capacity,
};
use super::{CommandParser, ParseStrategy, quote_arg};
use crate::error::{ParseError, ParseResult};
use crate::models::{TieringPolicy, Volume, VolumeDetail};

/// I/O group reported for every volume
pub const DEFAULT_IO_GROUP: &str = "default";

/// Parses the volume table
pub struct VolumeListParser;

impl CommandParser for VolumeListParser {
    const COMMAND: &'static str = "volume list show all";
    const STRATEGY: ParseStrategy = ParseStrategy::HeaderAligned;
    type Output = Vec<Volume>;

    fn parse(raw: &str) -> Vec<Volume> {
        let is_header = |l: &str| l.trim_start().starts_with("Volume") && l.contains("Status");
        let Ok(table) = parse_table(raw, Self::COMMAND, is_header) else {
            tracing::debug!(command = Self::COMMAND, "No volume header found");
            return Vec::new();
        };

        table
            .rows
            .iter()
            .filter(|row| row.lookup_or_empty(&["Volume"]).starts_with('/'))
            .filter_map(|row| match Self::volume_from_row(row) {
                Ok(volume) => Some(volume),
                Err(e) => {
                    tracing::warn!(command = Self::COMMAND, error = %e, "Skipping volume row");
                    None
                }
            })
            .collect()
    }
}

impl VolumeListParser {
    fn volume_from_row(row: &Fields) -> ParseResult<Volume> {
        let name = row
            .lookup(&["Volume"])
            .ok_or_else(|| ParseError::MissingField("Volume".into()))?;
        let bladeset = row.lookup_or_empty(&["BladeSet", "Bladeset"]);

        Ok(Volume {
            id: name_to_id("vol", name),
            name: name.to_string(),
            status: map_volume_status(row.lookup_or_empty(&["Status", "State"])),
            capacity_bytes: parse_capacity(row.lookup_or_empty(&["Hard Quota", "Quota"])),
            used_bytes: parse_capacity(row.lookup_or_empty(&["Space Used", "Used"])),
            pool_id: if bladeset.is_empty() {
                String::new()
            } else {
                name_to_id("pool", bladeset)
            },
            pool_name: bladeset.to_string(),
            host_mappings: Vec::new(),
            io_group_id: DEFAULT_IO_GROUP.into(),
            tiering_policy: TieringPolicy::None,
            compressed: false,
            created_at: Utc::now(),
            reduction_ratio: None,
            raid_level: row.lookup(&["RAID"]).map(str::to_string),
        })
    }
}

/// Parses `volume details` key-value output into a volume overlay
pub struct VolumeDetailsParser;

impl VolumeDetailsParser {
    /// Builds the details command for a volume name
    #[must_use]
    pub fn command(name: &str) -> String {
        format!("{} {}", Self::COMMAND, quote_arg(name))
    }
}

impl CommandParser for VolumeDetailsParser {
    const COMMAND: &'static str = "volume details";
    const STRATEGY: ParseStrategy = ParseStrategy::KeyValue;
    type Output = VolumeDetail;

    fn parse(raw: &str) -> VolumeDetail {
        let kv = parse_key_values(raw);
        VolumeDetail {
            compressed: kv.lookup(&["Compressed", "Compression"]).map(parse_bool),
            reduction_ratio: kv
                .lookup(&["Reduction Ratio", "Data Reduction"])
                .and_then(leading_number)
                .filter(|r| *r > 0.0),
            status: kv.lookup(&["Status"]).map(map_volume_status),
            capacity_bytes: kv.lookup(&["Capacity", "Size"]).map(parse_capacity),
            used_bytes: kv.lookup(&["Used", "Used Capacity"]).map(parse_capacity),
        }
    }
}
