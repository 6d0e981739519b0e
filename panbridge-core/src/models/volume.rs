//! Volumes and volume creation requests

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ServiceError, ServiceResult};

/// Canonical volume state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeStatus {
    /// Accessible
    Online,
    /// Not accessible
    #[default]
    Offline,
    /// Accessible with warnings
    Degraded,
}

impl VolumeStatus {
    /// Returns the lowercase label
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Degraded => "degraded",
        }
    }
}

impl std::fmt::Display for VolumeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Data tiering policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TieringPolicy {
    /// Appliance-managed tiering
    Auto,
    /// No tiering
    #[default]
    None,
}

/// A volume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    /// Stable id, `vol-<slug>`
    pub id: String,
    /// Volume path as the appliance prints it, e.g. `/home`
    pub name: String,
    /// Current state
    pub status: VolumeStatus,
    /// Hard quota in bytes, 0 when unlimited
    pub capacity_bytes: u64,
    /// Bytes in use
    pub used_bytes: u64,
    /// Id of the owning pool
    pub pool_id: String,
    /// Bladeset name of the owning pool
    pub pool_name: String,
    /// Host mappings; always empty on this appliance
    pub host_mappings: Vec<String>,
    /// I/O group
    pub io_group_id: String,
    /// Tiering policy
    pub tiering_policy: TieringPolicy,
    /// Whether compression is on
    pub compressed: bool,
    /// When the record was produced
    pub created_at: DateTime<Utc>,
    /// Data reduction ratio, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reduction_ratio: Option<f64>,
    /// RAID scheme, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raid_level: Option<String>,
}

impl Volume {
    /// Overlays the fields a `volume details` read produced
    pub fn apply_detail(&mut self, detail: VolumeDetail) {
        if let Some(compressed) = detail.compressed {
            self.compressed = compressed;
        }
        if detail.reduction_ratio.is_some() {
            self.reduction_ratio = detail.reduction_ratio;
        }
        if let Some(status) = detail.status {
            self.status = status;
        }
        if let Some(capacity) = detail.capacity_bytes {
            self.capacity_bytes = capacity;
        }
        if let Some(used) = detail.used_bytes {
            self.used_bytes = used;
        }
    }

    /// Returns true if this volume is the one a create request named
    ///
    /// The list prints volumes as paths, so `data` matches `/data`.
    #[must_use]
    pub fn matches_name(&self, requested: &str) -> bool {
        let requested = requested.trim();
        self.name == requested || self.name.strip_prefix('/') == Some(requested)
    }
}

/// Partial volume data from `volume details <name>`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VolumeDetail {
    /// Compression flag
    pub compressed: Option<bool>,
    /// Data reduction ratio
    pub reduction_ratio: Option<f64>,
    /// State
    pub status: Option<VolumeStatus>,
    /// Capacity
    pub capacity_bytes: Option<u64>,
    /// Used bytes
    pub used_bytes: Option<u64>,
}

/// Input for [`crate::service::VolumeService::create_volume`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateVolumeRequest {
    /// Volume name
    pub name: String,
    /// Requested size in bytes, rounded up to whole GiB
    pub capacity_bytes: u64,
    /// Id of the target pool
    pub pool_id: String,
    /// Tiering policy
    #[serde(default)]
    pub tiering_policy: Option<TieringPolicy>,
    /// Enable compression
    #[serde(default)]
    pub compressed: bool,
}

impl CreateVolumeRequest {
    /// Checks that the request can be turned into a command
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidRequest`] for an empty name or pool,
    /// a zero size, or a name containing a line break or quote.
    pub fn validate(&self) -> ServiceResult<()> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ServiceError::InvalidRequest(
                "volume name must not be empty".into(),
            ));
        }
        if name.contains(['\n', '\r', '"']) {
            return Err(ServiceError::InvalidRequest(format!(
                "volume name contains an unsupported character: {name:?}"
            )));
        }
        if self.pool_id.trim().is_empty() {
            return Err(ServiceError::InvalidRequest("pool id must not be empty".into()));
        }
        if self.capacity_bytes == 0 {
            return Err(ServiceError::InvalidRequest(
                "capacity must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Size in whole GiB, rounded up
    #[must_use]
    pub const fn size_gib(&self) -> u64 {
        self.capacity_bytes.div_ceil(crate::parser::values::GIB)
    }
}
