//! System and node commands.

use panbridge_core::models::{Node, SystemInfo};
use panbridge_core::parser::values::format_bytes;
use panbridge_core::service::ApplianceServices;

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::format::{format_uptime, or_dash, render_details, render_table, to_json};

/// System command handler
pub async fn cmd_system(
    services: &ApplianceServices,
    format: OutputFormat,
) -> Result<String, CliError> {
    let info = services.system.system_info().await?;
    match format {
        OutputFormat::Table => Ok(format_system(&info)),
        OutputFormat::Json => to_json(&info),
    }
}

/// Nodes command handler
pub async fn cmd_nodes(
    services: &ApplianceServices,
    format: OutputFormat,
) -> Result<String, CliError> {
    let info = services.system.system_info().await?;
    match format {
        OutputFormat::Table => Ok(format_nodes(&info.nodes)),
        OutputFormat::Json => to_json(&info.nodes),
    }
}

/// Format cluster identity and totals
#[must_use]
pub fn format_system(info: &SystemInfo) -> String {
    render_details(&[
        ("Cluster", info.cluster_name.clone()),
        ("Model", info.model.clone()),
        ("Serial", info.serial_number.clone()),
        ("Firmware", info.firmware_version.clone()),
        ("Uptime", format_uptime(info.uptime_seconds)),
        (
            "Nodes",
            format!(
                "{} ({} director, {} storage)",
                info.node_count, info.director_node_count, info.storage_node_count
            ),
        ),
        ("Raw capacity", format_bytes(info.total_raw_capacity_bytes)),
        ("Usable capacity", format_bytes(info.total_usable_capacity_bytes)),
        ("Used capacity", format_bytes(info.total_used_capacity_bytes)),
    ])
}

/// Format nodes as a table
#[must_use]
pub fn format_nodes(nodes: &[Node]) -> String {
    if nodes.is_empty() {
        return "No nodes found.".to_string();
    }
    let rows: Vec<Vec<String>> = nodes
        .iter()
        .map(|n| {
            vec![
                n.name.clone(),
                n.role.as_str().to_string(),
                n.status.to_string(),
                or_dash(n.ip_address.as_deref()),
                or_dash(n.pool_name.as_deref()),
                n.capacity
                    .as_ref()
                    .map_or_else(|| "-".to_string(), |c| format_bytes(c.data_space_total_bytes)),
            ]
        })
        .collect();
    render_table(&["NAME", "ROLE", "STATUS", "ADDRESS", "POOL", "CAPACITY"], &rows)
}
