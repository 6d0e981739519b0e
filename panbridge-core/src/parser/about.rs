//! `about`

use super::kv::parse_key_values;
use super::values::parse_uptime;
use super::{CommandParser, ParseStrategy};
use crate::models::AboutInfo;

/// Model reported when the appliance does not name one
pub const DEFAULT_MODEL: &str = "VDURA V5000";

/// Parses system identity and uptime
pub struct AboutParser;

impl CommandParser for AboutParser {
    const COMMAND: &'static str = "about";
    const STRATEGY: ParseStrategy = ParseStrategy::KeyValue;
    type Output = AboutInfo;

    fn parse(raw: &str) -> AboutInfo {
        let kv = parse_key_values(raw);
        AboutInfo {
            cluster_name: kv
                .lookup(&["System Name", "Cluster Name", "Name"])
                .unwrap_or("Unknown")
                .to_string(),
            model: kv
                .lookup(&["Model", "Product Name", "Machine Type"])
                .unwrap_or(DEFAULT_MODEL)
                .to_string(),
            serial_number: kv.lookup_or_empty(&["Serial Number", "Serial"]).to_string(),
            firmware_version: kv
                .lookup_or_empty(&["Code Level", "Firmware Version", "Firmware", "Version"])
                .to_string(),
            uptime_seconds: parse_uptime(kv.lookup_or_empty(&["Uptime", "System Uptime"])),
        }
    }
}
