//! Storage pools (bladesets)

use serde::{Deserialize, Serialize};

/// Canonical pool state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolStatus {
    /// Every OSD reachable
    Online,
    /// Not serving data
    #[default]
    Offline,
    /// Serving data with reduced redundancy
    Degraded,
}

impl PoolStatus {
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

impl std::fmt::Display for PoolStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Media tier of a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolTier {
    /// Flash
    #[default]
    Ssd,
    /// Nearline disk
    Nearline,
    /// Flash and disk
    Hybrid,
}

/// A storage pool, called a bladeset on the appliance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    /// Stable id, `pool-<slug>`
    pub id: String,
    /// Bladeset name as the appliance prints it
    pub name: String,
    /// Current state
    pub status: PoolStatus,
    /// Total capacity in bytes
    pub total_capacity_bytes: u64,
    /// Used capacity in bytes
    pub used_capacity_bytes: u64,
    /// Free capacity in bytes
    pub available_capacity_bytes: u64,
    /// Number of volumes placed on the pool
    pub volume_count: u32,
    /// Number of OSDs (drives)
    pub drive_count: u32,
    /// RAID scheme, `unknown` until enriched
    pub raid_level: String,
    /// Media tier
    pub tier: PoolTier,
    /// Number of storage nodes, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_count: Option<u32>,
    /// Metadata bytes in use, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_used_bytes: Option<u64>,
    /// Metadata capacity, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_total_bytes: Option<u64>,
    /// OSDs the appliance expects
    pub vpod_count: u32,
    /// OSDs currently online
    pub vpods_online: u32,
}

impl Pool {
    /// Overlays the fields a `bladeset detail` read produced
    ///
    /// Available capacity is re-derived whenever total or used changed.
    pub fn apply_detail(&mut self, detail: PoolDetail) {
        let capacity_changed =
            detail.total_capacity_bytes.is_some() || detail.used_capacity_bytes.is_some();

        if let Some(total) = detail.total_capacity_bytes {
            self.total_capacity_bytes = total;
        }
        if let Some(used) = detail.used_capacity_bytes {
            self.used_capacity_bytes = used;
        }
        if capacity_changed {
            self.available_capacity_bytes = self
                .total_capacity_bytes
                .saturating_sub(self.used_capacity_bytes);
        }
        if let Some(raid) = detail.raid_level {
            self.raid_level = raid;
        }
        if let Some(status) = detail.status {
            self.status = status;
        }
        if detail.metadata_used_bytes.is_some() {
            self.metadata_used_bytes = detail.metadata_used_bytes;
        }
        if detail.metadata_total_bytes.is_some() {
            self.metadata_total_bytes = detail.metadata_total_bytes;
        }
        if let Some(drives) = detail.drive_count {
            self.drive_count = drives;
        }
        if detail.node_count.is_some() {
            self.node_count = detail.node_count;
        }
    }
}

/// Partial pool data from `bladeset detail <name>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolDetail {
    /// Total capacity
    pub total_capacity_bytes: Option<u64>,
    /// Used capacity
    pub used_capacity_bytes: Option<u64>,
    /// RAID scheme
    pub raid_level: Option<String>,
    /// State
    pub status: Option<PoolStatus>,
    /// Metadata bytes in use
    pub metadata_used_bytes: Option<u64>,
    /// Metadata capacity
    pub metadata_total_bytes: Option<u64>,
    /// Drive count
    pub drive_count: Option<u32>,
    /// Node count
    pub node_count: Option<u32>,
}
