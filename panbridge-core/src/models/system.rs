//! Nodes and system-wide information

use serde::{Deserialize, Serialize};

/// Canonical node state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    /// Up
    Online,
    /// Down or unreachable
    #[default]
    Offline,
    /// In service or maintenance mode
    Service,
}

impl NodeStatus {
    /// Returns the lowercase label
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Service => "service",
        }
    }
}

impl std::fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Node role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    /// Control plane
    Director,
    /// Data plane
    #[default]
    Storage,
}

impl NodeRole {
    /// Returns the lowercase label
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Director => "director",
            Self::Storage => "storage",
        }
    }
}

/// Capacity figures from `sysmap nodes storage capacity`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeCapacity {
    /// Data bytes in use
    pub data_space_bytes: u64,
    /// Data capacity
    pub data_space_total_bytes: u64,
    /// Metadata bytes in use
    pub metadata_space_bytes: u64,
    /// Metadata capacity
    pub metadata_space_total_bytes: u64,
}

/// One appliance node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Stable id, `node-<slug>`
    pub id: String,
    /// Node name as printed, e.g. `VCH-4,2`
    pub name: String,
    /// Current state
    pub status: NodeStatus,
    /// Hardware serial
    pub serial_number: String,
    /// Firmware version, empty when not reported
    pub firmware_version: String,
    /// CPU usage; not reported by the appliance
    pub cpu_usage_percent: f64,
    /// Memory usage; not reported by the appliance
    pub memory_usage_percent: f64,
    /// Director or storage
    pub role: NodeRole,
    /// Management address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    /// Id of the bladeset the node serves
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_id: Option<String>,
    /// Name of the bladeset the node serves
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_name: Option<String>,
    /// Capacity, after enrichment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<NodeCapacity>,
}

/// Fields from the `about` command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AboutInfo {
    /// Cluster name
    pub cluster_name: String,
    /// Product model
    pub model: String,
    /// System serial
    pub serial_number: String,
    /// Code level
    pub firmware_version: String,
    /// Uptime in seconds
    pub uptime_seconds: u64,
}

/// Aggregated system view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemInfo {
    /// Cluster name
    pub cluster_name: String,
    /// Product model
    pub model: String,
    /// System serial
    pub serial_number: String,
    /// Code level
    pub firmware_version: String,
    /// Raw capacity over storage nodes
    pub total_raw_capacity_bytes: u64,
    /// Usable capacity; equal to raw, the appliance reports no usable figure
    pub total_usable_capacity_bytes: u64,
    /// Used capacity over storage nodes
    pub total_used_capacity_bytes: u64,
    /// Number of nodes
    pub node_count: usize,
    /// All nodes, enriched with capacity
    pub nodes: Vec<Node>,
    /// Uptime in seconds
    pub uptime_seconds: u64,
    /// Director nodes
    pub director_node_count: usize,
    /// Storage nodes
    pub storage_node_count: usize,
}

impl SystemInfo {
    /// Builds the aggregate from the three reads
    #[must_use]
    pub fn assemble(about: AboutInfo, nodes: Vec<Node>) -> Self {
        let storage = nodes.iter().filter(|n| n.role == NodeRole::Storage);
        let (raw, used) = storage.fold((0_u64, 0_u64), |(raw, used), node| {
            let cap = node.capacity.unwrap_or_default();
            (
                raw.saturating_add(cap.data_space_total_bytes),
                used.saturating_add(cap.data_space_bytes),
            )
        });
        let director_node_count = nodes
            .iter()
            .filter(|n| n.role == NodeRole::Director)
            .count();

        Self {
            cluster_name: about.cluster_name,
            model: about.model,
            serial_number: about.serial_number,
            firmware_version: about.firmware_version,
            total_raw_capacity_bytes: raw,
            total_usable_capacity_bytes: raw,
            total_used_capacity_bytes: used,
            node_count: nodes.len(),
            storage_node_count: nodes.len() - director_node_count,
            director_node_count,
            nodes,
            uptime_seconds: about.uptime_seconds,
        }
    }
}
