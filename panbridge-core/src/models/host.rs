//! Host records
//!
//! The appliance is a scale-out file system with no block host mappings;
//! the type exists so the host service has a concrete return type.

use serde::{Deserialize, Serialize};

/// Host state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostStatus {
    /// Logged in
    Online,
    /// Not logged in
    Offline,
    /// Some ports logged in
    Degraded,
}

/// Host attachment protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostType {
    /// iSCSI initiator
    Iscsi,
    /// Fibre Channel
    Fc,
}

/// A block host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    /// Host id
    pub id: String,
    /// Host name
    pub name: String,
    /// State
    pub status: HostStatus,
    /// Attachment protocol
    pub host_type: HostType,
    /// Fibre Channel port names
    pub wwpns: Vec<String>,
    /// iSCSI qualified names
    pub iscsi_names: Vec<String>,
    /// Ids of mapped volumes
    pub mapped_volumes: Vec<String>,
    /// Port count
    pub port_count: u32,
}
