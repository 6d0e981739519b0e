//! Domain services over one PanCLI session
//!
//! Each service reads through a [`TtlCache`](crate::cache::TtlCache) and
//! issues commands through a shared [`CommandExecutor`]. Mutations skip the
//! cache, invalidate it, and re-read. "Not found" is a normal outcome
//! (`None` or `false`), never an error.

pub mod alert;
pub mod host;
pub mod performance;
pub mod pool;
pub mod registry;
pub mod system;
pub mod volume;

use async_trait::async_trait;

use crate::error::ServiceResult;
use crate::models::{
    Alert, AlertFilter, CreateVolumeRequest, Host, PerformanceSummary, Pool, SystemInfo, Volume,
};

pub use alert::{AcknowledgementStore, ApplianceAlertService, InMemoryAcknowledgements};
pub use host::ApplianceHostService;
pub use performance::AppliancePerformanceService;
pub use pool::AppliancePoolService;
pub use registry::ApplianceServices;
pub use system::ApplianceSystemService;
pub use volume::ApplianceVolumeService;

/// Storage pools (bladesets)
#[async_trait]
pub trait PoolService: Send + Sync {
    /// All pools
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot run the command.
    async fn list_pools(&self) -> ServiceResult<Vec<Pool>>;

    /// One pool with detail fields, or `None` for an unknown id
    ///
    /// # Errors
    ///
    /// Returns an error if the pool list cannot be read.
    async fn get_pool(&self, id: &str) -> ServiceResult<Option<Pool>>;
}

/// Volumes
#[async_trait]
pub trait VolumeService: Send + Sync {
    /// All volumes
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot run the command.
    async fn list_volumes(&self) -> ServiceResult<Vec<Volume>>;

    /// One volume with detail fields, or `None` for an unknown id
    ///
    /// # Errors
    ///
    /// Returns an error if the volume list cannot be read.
    async fn get_volume(&self, id: &str) -> ServiceResult<Option<Volume>>;

    /// Creates a volume and returns it as re-read from the appliance
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::InvalidRequest` for a bad request and a
    /// session error if the create command fails.
    async fn create_volume(&self, request: &CreateVolumeRequest) -> ServiceResult<Volume>;

    /// Deletes a volume; `false` when the id is unknown
    ///
    /// # Errors
    ///
    /// Returns a session error if the delete command fails.
    async fn delete_volume(&self, id: &str) -> ServiceResult<bool>;
}

/// Block hosts
#[async_trait]
pub trait HostService: Send + Sync {
    /// All hosts
    ///
    /// # Errors
    ///
    /// Implementations backed by the appliance do not fail.
    async fn list_hosts(&self) -> ServiceResult<Vec<Host>>;

    /// One host, or `None` for an unknown id
    ///
    /// # Errors
    ///
    /// Implementations backed by the appliance do not fail.
    async fn get_host(&self, id: &str) -> ServiceResult<Option<Host>>;
}

/// Event log alerts
#[async_trait]
pub trait AlertService: Send + Sync {
    /// Alerts passing `filter`, with local acknowledgements applied
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot run the command.
    async fn list_alerts(&self, filter: AlertFilter) -> ServiceResult<Vec<Alert>>;

    /// Marks an alert acknowledged; `None` for an unknown id
    ///
    /// # Errors
    ///
    /// Returns an error if the alert list cannot be read.
    async fn acknowledge(&self, id: &str) -> ServiceResult<Option<Alert>>;
}

/// Appliance identity and nodes
#[async_trait]
pub trait SystemService: Send + Sync {
    /// About info, nodes and capacity totals
    ///
    /// # Errors
    ///
    /// Returns an error if any of the underlying commands fails.
    async fn system_info(&self) -> ServiceResult<SystemInfo>;
}

/// Throughput and latency
#[async_trait]
pub trait PerformanceService: Send + Sync {
    /// Current figures and history
    ///
    /// # Errors
    ///
    /// Returns an error only when no history exists and the on-demand read
    /// fails.
    async fn summary(&self) -> ServiceResult<PerformanceSummary>;
}
