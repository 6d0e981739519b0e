//! Alert commands.

use panbridge_core::models::{Alert, AlertFilter};
use panbridge_core::service::ApplianceServices;

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::format::{render_table, to_json};

/// Parses the `--severity` and `--status` options
pub fn build_filter(severity: Option<&str>, status: Option<&str>) -> Result<AlertFilter, CliError> {
    Ok(AlertFilter {
        severity: severity
            .map(str::parse)
            .transpose()
            .map_err(CliError::InvalidArgument)?,
        status: status
            .map(str::parse)
            .transpose()
            .map_err(CliError::InvalidArgument)?,
    })
}

/// List alerts command handler
pub async fn cmd_list(
    services: &ApplianceServices,
    filter: AlertFilter,
    format: OutputFormat,
) -> Result<String, CliError> {
    let alerts = services.alerts.list_alerts(filter).await?;
    match format {
        OutputFormat::Table => Ok(format_alerts(&alerts)),
        OutputFormat::Json => to_json(&alerts),
    }
}

/// Acknowledge alert command handler
pub async fn cmd_ack(
    services: &ApplianceServices,
    id: &str,
    format: OutputFormat,
) -> Result<String, CliError> {
    let alert = services
        .alerts
        .acknowledge(id)
        .await?
        .ok_or_else(|| CliError::NotFound(format!("alert '{id}'")))?;
    match format {
        OutputFormat::Table => Ok(format!("Acknowledged alert '{}'", alert.id)),
        OutputFormat::Json => to_json(&alert),
    }
}

/// Format alerts as a table
#[must_use]
pub fn format_alerts(alerts: &[Alert]) -> String {
    if alerts.is_empty() {
        return "No alerts found.".to_string();
    }
    let rows: Vec<Vec<String>> = alerts
        .iter()
        .map(|a| {
            vec![
                a.id.clone(),
                a.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                a.severity.to_string(),
                a.status.to_string(),
                a.message.clone(),
            ]
        })
        .collect();
    render_table(&["ID", "TIME", "SEVERITY", "STATUS", "MESSAGE"], &rows)
}
