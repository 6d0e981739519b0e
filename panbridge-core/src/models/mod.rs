//! Domain records produced by the parsers and returned by the services
//!
//! All records are plain values. Identity is derived from the appliance's
//! human-readable names via [`crate::parser::values::name_to_id`], so two
//! reads of the same object always agree on its id.

mod alert;
mod host;
mod performance;
mod pool;
mod system;
mod volume;

pub use alert::{Alert, AlertFilter, AlertSeverity, AlertStatus};
pub use host::{Host, HostStatus, HostType};
pub use performance::{MetadataDataPoint, PerformanceDataPoint, PerformanceSummary};
pub use pool::{Pool, PoolDetail, PoolStatus, PoolTier};
pub use system::{AboutInfo, Node, NodeCapacity, NodeRole, NodeStatus, SystemInfo};
pub use volume::{CreateVolumeRequest, TieringPolicy, Volume, VolumeDetail, VolumeStatus};
