//! Wires one session, the accumulator and every service together

use std::sync::Arc;

use super::{
    AlertService, ApplianceAlertService, ApplianceHostService, AppliancePerformanceService,
    AppliancePoolService, ApplianceSystemService, ApplianceVolumeService, HostService,
    PerformanceService, PoolService, SystemService, VolumeService,
};
use crate::config::ApplianceConfig;
use crate::performance::PerformanceAccumulator;
use crate::session::{CommandExecutor, SessionClient, SshProcessTransport, Transport};

/// All services for one appliance, sharing one session
///
/// Must be built inside a Tokio runtime.
pub struct ApplianceServices {
    client: Arc<SessionClient>,
    accumulator: Option<Arc<PerformanceAccumulator>>,
    /// Pools
    pub pools: Arc<dyn PoolService>,
    /// Volumes
    pub volumes: Arc<dyn VolumeService>,
    /// Hosts
    pub hosts: Arc<dyn HostService>,
    /// Alerts
    pub alerts: Arc<dyn AlertService>,
    /// System info
    pub system: Arc<dyn SystemService>,
    /// Performance
    pub performance: Arc<dyn PerformanceService>,
}

impl ApplianceServices {
    /// Builds the services over the system `ssh` client
    #[must_use]
    pub fn connect(config: &ApplianceConfig) -> Self {
        let transport = Arc::new(SshProcessTransport::new(config.to_ssh_target()));
        Self::with_transport(transport, config)
    }

    /// Builds the services over any transport
    ///
    /// A background connect starts immediately; its failure is only logged
    /// and the first command retries.
    #[must_use]
    pub fn with_transport(transport: Arc<dyn Transport>, config: &ApplianceConfig) -> Self {
        let client = Arc::new(SessionClient::new(transport, config.session_config()));
        let executor: Arc<dyn CommandExecutor> = client.clone();

        let eager = Arc::clone(&client);
        tokio::spawn(async move {
            if let Err(e) = eager.connect().await {
                tracing::warn!(host = %eager.target(), error = %e, "Initial connection failed");
            }
        });

        let accumulator = config.perf_poll_interval().map(|interval| {
            Arc::new(PerformanceAccumulator::start(Arc::clone(&executor), interval))
        });

        let ttl = &config.cache_ttl;
        let pools: Arc<dyn PoolService> = Arc::new(AppliancePoolService::with_ttl(
            Arc::clone(&executor),
            ttl.pools(),
        ));
        let volumes = Arc::new(ApplianceVolumeService::with_ttl(
            Arc::clone(&executor),
            Arc::clone(&pools),
            ttl.volumes(),
        ));
        let alerts = Arc::new(ApplianceAlertService::with_store(
            Arc::clone(&executor),
            Arc::new(super::InMemoryAcknowledgements::new()),
            ttl.alerts(),
        ));
        let system = Arc::new(ApplianceSystemService::with_ttl(
            Arc::clone(&executor),
            ttl.system(),
        ));
        let performance = Arc::new(AppliancePerformanceService::with_ttl(
            executor,
            accumulator.clone(),
            ttl.performance(),
        ));

        Self {
            client,
            accumulator,
            pools,
            volumes,
            hosts: Arc::new(ApplianceHostService::new()),
            alerts,
            system,
            performance,
        }
    }

    /// The shared session, for raw commands
    #[must_use]
    pub fn client(&self) -> &Arc<SessionClient> {
        &self.client
    }

    /// The accumulator, when polling is enabled
    #[must_use]
    pub fn accumulator(&self) -> Option<&Arc<PerformanceAccumulator>> {
        self.accumulator.as_ref()
    }

    /// Stops polling and destroys the session
    pub async fn shutdown(&self) {
        if let Some(accumulator) = &self.accumulator {
            accumulator.stop().await;
        }
        self.client.destroy();
        self.client.closed().await;
        tracing::info!(host = %self.client.target(), "Appliance services shut down");
    }
}
