//! Pool (bladeset) command.

use panbridge_core::models::Pool;
use panbridge_core::parser::values::format_bytes;
use panbridge_core::service::ApplianceServices;

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::format::{render_details, render_table, to_json};

/// Pools command handler; lists every pool or shows one by id
pub async fn cmd_pools(
    services: &ApplianceServices,
    id: Option<&str>,
    format: OutputFormat,
) -> Result<String, CliError> {
    if let Some(id) = id {
        let pool = services
            .pools
            .get_pool(id)
            .await?
            .ok_or_else(|| CliError::NotFound(format!("pool '{id}'")))?;
        return match format {
            OutputFormat::Table => Ok(format_pool(&pool)),
            OutputFormat::Json => to_json(&pool),
        };
    }

    let pools = services.pools.list_pools().await?;
    match format {
        OutputFormat::Table => Ok(format_pools(&pools)),
        OutputFormat::Json => to_json(&pools),
    }
}

/// Format pools as a table
#[must_use]
pub fn format_pools(pools: &[Pool]) -> String {
    if pools.is_empty() {
        return "No pools found.".to_string();
    }
    let rows: Vec<Vec<String>> = pools
        .iter()
        .map(|p| {
            vec![
                p.id.clone(),
                p.name.clone(),
                p.status.to_string(),
                format_bytes(p.total_capacity_bytes),
                format_bytes(p.used_capacity_bytes),
                format_bytes(p.available_capacity_bytes),
                format!("{}/{}", p.vpods_online, p.vpod_count),
            ]
        })
        .collect();
    render_table(
        &["ID", "NAME", "STATUS", "TOTAL", "USED", "AVAILABLE", "OSDS"],
        &rows,
    )
}

/// Format one pool with its enriched fields
#[must_use]
pub fn format_pool(pool: &Pool) -> String {
    let mut pairs = vec![
        ("Id", pool.id.clone()),
        ("Name", pool.name.clone()),
        ("Status", pool.status.to_string()),
        ("RAID", pool.raid_level.clone()),
        ("Total", format_bytes(pool.total_capacity_bytes)),
        ("Used", format_bytes(pool.used_capacity_bytes)),
        ("Available", format_bytes(pool.available_capacity_bytes)),
        ("OSDs online", format!("{}/{}", pool.vpods_online, pool.vpod_count)),
        ("Volumes", pool.volume_count.to_string()),
    ];
    if let Some(nodes) = pool.node_count {
        pairs.push(("Nodes", nodes.to_string()));
    }
    if let (Some(used), Some(total)) = (pool.metadata_used_bytes, pool.metadata_total_bytes) {
        pairs.push((
            "Metadata",
            format!("{} of {}", format_bytes(used), format_bytes(total)),
        ));
    }
    render_details(&pairs)
}
