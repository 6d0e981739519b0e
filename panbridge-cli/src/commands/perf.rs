//! Performance command.

use panbridge_core::models::PerformanceSummary;
use panbridge_core::service::ApplianceServices;

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::format::{render_details, to_json};

/// Performance command handler
pub async fn cmd_perf(
    services: &ApplianceServices,
    format: OutputFormat,
) -> Result<String, CliError> {
    let summary = services.performance.summary().await?;
    match format {
        OutputFormat::Table => Ok(format_summary(&summary)),
        OutputFormat::Json => to_json(&summary),
    }
}

/// Format the current figures
#[must_use]
pub fn format_summary(summary: &PerformanceSummary) -> String {
    let mut pairs = vec![
        ("IOPS", format!("{:.0}", summary.current_iops)),
        ("Throughput", format!("{:.1} MB/s", summary.current_throughput_mbs)),
        ("Latency", format!("{:.2} ms", summary.current_latency_ms)),
        ("Samples", summary.history.len().to_string()),
    ];
    if let Some(latest) = summary.metadata_history.last() {
        pairs.push((
            "Metadata ops",
            format!(
                "{:.0} creates/s, {:.0} removes/s, {:.0} lookups/s",
                latest.creates, latest.removes, latest.lookups
            ),
        ));
    }
    render_details(&pairs)
}
