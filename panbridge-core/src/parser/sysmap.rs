//! `sysmap nodes allcolumns` and `sysmap nodes storage capacity`

use std::collections::HashMap;

use super::columns::parse_table;
use super::fields::Fields;
use super::values::{infer_role, map_node_status, name_to_id, parse_capacity};
use super::{CommandParser, ParseStrategy};
use crate::error::{ParseError, ParseResult};
use crate::models::{Node, NodeCapacity};

fn starts_with_node(line: &str) -> bool {
    line.trim_start()
        .get(..4)
        .is_some_and(|p| p.eq_ignore_ascii_case("node"))
}

fn node_name(row: &Fields) -> ParseResult<&str> {
    row.lookup(&["Node", "Name"])
        .ok_or_else(|| ParseError::MissingField("Node".into()))
}

/// Parses the node table; continuation lines (IPMI, Services) are skipped
pub struct SysmapNodesParser;

impl CommandParser for SysmapNodesParser {
    const COMMAND: &'static str = "sysmap nodes allcolumns";
    const STRATEGY: ParseStrategy = ParseStrategy::HeaderAligned;
    type Output = Vec<Node>;

    fn parse(raw: &str) -> Vec<Node> {
        let is_header = |l: &str| starts_with_node(l) && l.to_lowercase().contains("state");
        let Ok(table) = parse_table(raw, Self::COMMAND, is_header) else {
            tracing::debug!(command = Self::COMMAND, "No sysmap header found");
            return Vec::new();
        };

        table
            .rows
            .iter()
            .filter_map(|row| match Self::node_from_row(row) {
                Ok(node) => Some(node),
                Err(e) => {
                    tracing::warn!(command = Self::COMMAND, error = %e, "Skipping node row");
                    None
                }
            })
            .collect()
    }
}

impl SysmapNodesParser {
    fn node_from_row(row: &Fields) -> ParseResult<Node> {
        let name = node_name(row)?;
        let bladeset = row.lookup_or_empty(&["BladeSet", "Bladeset"]);
        let pool_name = (!bladeset.is_empty() && bladeset != "-").then(|| bladeset.to_string());
        let ip = row.lookup_or_empty(&["IP Address", "IP"]);
        let state = row.lookup(&["State", "Status"]).unwrap_or("online");

        Ok(Node {
            id: name_to_id("node", name),
            name: name.to_string(),
            status: map_node_status(state),
            serial_number: row.lookup_or_empty(&["Serial", "Serial Number"]).to_string(),
            firmware_version: String::new(),
            cpu_usage_percent: 0.0,
            memory_usage_percent: 0.0,
            role: infer_role(row.lookup_or_empty(&["Type", "Role"])),
            ip_address: (!ip.is_empty() && ip != "-").then(|| ip.to_string()),
            pool_id: pool_name.as_deref().map(|p| name_to_id("pool", p)),
            pool_name,
            capacity: None,
        })
    }
}

/// Parses per-node capacity into a map keyed by node name
pub struct SysmapCapacityParser;

impl CommandParser for SysmapCapacityParser {
    const COMMAND: &'static str = "sysmap nodes storage capacity";
    const STRATEGY: ParseStrategy = ParseStrategy::HeaderAligned;
    type Output = HashMap<String, NodeCapacity>;

    fn parse(raw: &str) -> HashMap<String, NodeCapacity> {
        let is_header = |l: &str| starts_with_node(l) && l.to_lowercase().contains("capacity");
        let Ok(table) = parse_table(raw, Self::COMMAND, is_header) else {
            tracing::debug!(command = Self::COMMAND, "No capacity header found");
            return HashMap::new();
        };

        let mut capacities = HashMap::with_capacity(table.rows.len());
        for row in &table.rows {
            match node_name(row) {
                Ok(name) => {
                    let total = parse_capacity(row.lookup_or_empty(&["Capacity", "Total Capacity"]));
                    let used = row.lookup(&["Used", "Used Capacity"]).map_or(0, parse_capacity);
                    capacities.insert(
                        name.to_string(),
                        NodeCapacity {
                            data_space_bytes: used,
                            data_space_total_bytes: total,
                            ..NodeCapacity::default()
                        },
                    );
                }
                Err(e) => {
                    tracing::warn!(command = Self::COMMAND, error = %e, "Skipping capacity row");
                }
            }
        }
        capacities
    }
}

/// Attaches capacity figures to nodes by name
pub fn enrich_nodes(nodes: &mut [Node], capacities: &HashMap<String, NodeCapacity>) {
    for node in nodes {
        if let Some(cap) = capacities.get(&node.name) {
            node.capacity = Some(*cap);
        }
    }
}
