//! Hosts
//!
//! The appliance exports file systems, not LUNs, and has no host mapping
//! concept. The service exists so callers can treat every backend alike.

use async_trait::async_trait;

use super::HostService;
use crate::error::ServiceResult;
use crate::models::Host;

/// Host service that reports no hosts
#[derive(Debug, Default, Clone, Copy)]
pub struct ApplianceHostService;

impl ApplianceHostService {
    /// Creates the service
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl HostService for ApplianceHostService {
    async fn list_hosts(&self) -> ServiceResult<Vec<Host>> {
        Ok(Vec::new())
    }

    async fn get_host(&self, id: &str) -> ServiceResult<Option<Host>> {
        tracing::trace!(host = id, "Host lookup on appliance without host mappings");
        Ok(None)
    }
}
