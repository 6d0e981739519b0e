//! Volume commands.

use panbridge_core::models::{CreateVolumeRequest, TieringPolicy, Volume};
use panbridge_core::parser::values::format_bytes;
use panbridge_core::service::ApplianceServices;

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::format::{or_dash, render_details, render_table, to_json};

/// Arguments of `volumes create`
pub struct CreateParams {
    pub name: String,
    pub pool: String,
    pub capacity_bytes: u64,
    pub tiering: Option<TieringPolicy>,
    pub compressed: bool,
}

impl CreateParams {
    /// Builds and validates the request before any connection is made
    pub fn into_request(self) -> Result<CreateVolumeRequest, CliError> {
        let request = CreateVolumeRequest {
            name: self.name,
            capacity_bytes: self.capacity_bytes,
            pool_id: self.pool,
            tiering_policy: self.tiering,
            compressed: self.compressed,
        };
        request.validate()?;
        Ok(request)
    }
}

/// List volumes command handler
pub async fn cmd_list(
    services: &ApplianceServices,
    format: OutputFormat,
) -> Result<String, CliError> {
    let volumes = services.volumes.list_volumes().await?;
    match format {
        OutputFormat::Table => Ok(format_volumes(&volumes)),
        OutputFormat::Json => to_json(&volumes),
    }
}

/// Show volume command handler
pub async fn cmd_show(
    services: &ApplianceServices,
    id: &str,
    format: OutputFormat,
) -> Result<String, CliError> {
    let volume = services
        .volumes
        .get_volume(id)
        .await?
        .ok_or_else(|| CliError::NotFound(format!("volume '{id}'")))?;
    match format {
        OutputFormat::Table => Ok(format_volume(&volume)),
        OutputFormat::Json => to_json(&volume),
    }
}

/// Create volume command handler
pub async fn cmd_create(
    services: &ApplianceServices,
    request: &CreateVolumeRequest,
    format: OutputFormat,
) -> Result<String, CliError> {
    let volume = services.volumes.create_volume(request).await?;
    match format {
        OutputFormat::Table => Ok(format!(
            "Created volume '{}' ({}) on {}",
            volume.name, volume.id, volume.pool_name
        )),
        OutputFormat::Json => to_json(&volume),
    }
}

/// Delete volume command handler
pub async fn cmd_delete(services: &ApplianceServices, id: &str) -> Result<String, CliError> {
    if services.volumes.delete_volume(id).await? {
        Ok(format!("Deleted volume '{id}'"))
    } else {
        Err(CliError::NotFound(format!("volume '{id}'")))
    }
}

const fn tiering_label(policy: TieringPolicy) -> &'static str {
    match policy {
        TieringPolicy::Auto => "auto",
        TieringPolicy::None => "none",
    }
}

/// Format volumes as a table
#[must_use]
pub fn format_volumes(volumes: &[Volume]) -> String {
    if volumes.is_empty() {
        return "No volumes found.".to_string();
    }
    let rows: Vec<Vec<String>> = volumes
        .iter()
        .map(|v| {
            vec![
                v.id.clone(),
                v.name.clone(),
                v.pool_name.clone(),
                v.status.to_string(),
                format_bytes(v.used_bytes),
                format_bytes(v.capacity_bytes),
            ]
        })
        .collect();
    render_table(&["ID", "NAME", "POOL", "STATUS", "USED", "QUOTA"], &rows)
}

/// Format one volume
#[must_use]
pub fn format_volume(volume: &Volume) -> String {
    render_details(&[
        ("Id", volume.id.clone()),
        ("Name", volume.name.clone()),
        ("Pool", volume.pool_name.clone()),
        ("Status", volume.status.to_string()),
        ("Used", format_bytes(volume.used_bytes)),
        ("Quota", format_bytes(volume.capacity_bytes)),
        ("RAID", or_dash(volume.raid_level.as_deref())),
        ("Tiering", tiering_label(volume.tiering_policy).to_string()),
        ("Compressed", if volume.compressed { "yes" } else { "no" }.to_string()),
        (
            "Reduction",
            volume
                .reduction_ratio
                .map_or_else(|| "-".to_string(), |r| format!("{r:.2}:1")),
        ),
        ("Created", volume.created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use panbridge_core::models::VolumeStatus;
    use panbridge_core::parser::values::GIB;

    fn volume() -> Volume {
        Volume {
            id: "vol-home".into(),
            name: "/home".into(),
            status: VolumeStatus::Online,
            capacity_bytes: 10 * GIB,
            used_bytes: 2 * GIB,
            pool_id: "pool-set-1".into(),
            pool_name: "Set 1".into(),
            host_mappings: Vec::new(),
            io_group_id: "io-group-0".into(),
            tiering_policy: TieringPolicy::None,
            compressed: true,
            created_at: Utc.with_ymd_and_hms(2026, 2, 26, 21, 5, 22).unwrap(),
            reduction_ratio: Some(1.5),
            raid_level: None,
        }
    }

    #[test]
    fn test_format_volumes_table() {
        let table = format_volumes(&[volume()]);
        let row = table.lines().nth(2).unwrap();
        assert!(row.starts_with("vol-home"));
        assert!(row.contains("Set 1"));
        assert!(row.ends_with("10 GB"));
    }

    #[test]
    fn test_format_volume_details() {
        let text = format_volume(&volume());
        assert!(text.contains("1.50:1"));
        assert!(text.contains("2026-02-26 21:05:22 UTC"));
        assert!(text.lines().any(|l| l.starts_with("RAID:") && l.ends_with('-')));
    }

    #[test]
    fn test_create_params_are_validated_locally() {
        let params = CreateParams {
            name: "   ".into(),
            pool: "pool-set-1".into(),
            capacity_bytes: GIB,
            tiering: None,
            compressed: false,
        };
        assert!(matches!(
            params.into_request(),
            Err(CliError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_create_params_build_request() {
        let request = CreateParams {
            name: "scratch".into(),
            pool: "pool-set-1".into(),
            capacity_bytes: 5 * GIB,
            tiering: Some(TieringPolicy::Auto),
            compressed: true,
        }
        .into_request()
        .unwrap();
        assert_eq!(request.pool_id, "pool-set-1");
        assert_eq!(request.size_gib(), 5);
        assert_eq!(request.tiering_policy, Some(TieringPolicy::Auto));
    }
}
