//! Volumes backed by `volume list`, `volume details`, `volume create` and
//! `volume delete`

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tracing::Instrument;

use super::{PoolService, VolumeService};
use crate::cache::{TtlCache, VOLUMES_TTL};
use crate::error::ServiceResult;
use crate::models::{CreateVolumeRequest, TieringPolicy, Volume, VolumeStatus};
use crate::parser::values::{GIB, name_to_id};
use crate::parser::volume::DEFAULT_IO_GROUP;
use crate::parser::{CommandParser, VolumeDetailsParser, VolumeListParser, quote_arg};
use crate::session::CommandExecutor;
use crate::tracing::span_names::SERVICE_MUTATE;

const VOLUMES_KEY: &str = "volumes-all";

/// Volume service over a PanCLI session
pub struct ApplianceVolumeService {
    executor: Arc<dyn CommandExecutor>,
    pools: Arc<dyn PoolService>,
    cache: TtlCache<Vec<Volume>>,
}

impl ApplianceVolumeService {
    /// Creates the service with the default volume TTL
    #[must_use]
    pub fn new(executor: Arc<dyn CommandExecutor>, pools: Arc<dyn PoolService>) -> Self {
        Self::with_ttl(executor, pools, VOLUMES_TTL)
    }

    /// Creates the service with a custom TTL
    #[must_use]
    pub fn with_ttl(
        executor: Arc<dyn CommandExecutor>,
        pools: Arc<dyn PoolService>,
        ttl: Duration,
    ) -> Self {
        Self {
            executor,
            pools,
            cache: TtlCache::new(ttl),
        }
    }

    /// Builds the create command; the size is rounded up to whole GiB
    #[must_use]
    pub fn create_command(request: &CreateVolumeRequest, bladeset: &str) -> String {
        let mut command = format!(
            "volume create {} bladeset {} size {}GB",
            quote_arg(&request.name),
            quote_arg(bladeset),
            request.size_gib()
        );
        if request.compressed {
            command.push_str(" compressed yes");
        }
        command
    }

    async fn bladeset_name(&self, pool_id: &str) -> ServiceResult<String> {
        let pools = self.pools.list_pools().await?;
        Ok(pools
            .into_iter()
            .find(|p| p.id == pool_id)
            .map_or_else(|| pool_id.to_string(), |p| p.name))
    }

    /// Record returned when the new volume is missing from the re-read list
    fn synthesize(request: &CreateVolumeRequest, bladeset: &str) -> Volume {
        let name = request.name.trim();
        Volume {
            id: name_to_id("vol", name),
            name: name.to_string(),
            status: VolumeStatus::Online,
            capacity_bytes: request.size_gib().saturating_mul(GIB),
            used_bytes: 0,
            pool_id: request.pool_id.clone(),
            pool_name: bladeset.to_string(),
            host_mappings: Vec::new(),
            io_group_id: DEFAULT_IO_GROUP.to_string(),
            tiering_policy: request.tiering_policy.unwrap_or(TieringPolicy::None),
            compressed: request.compressed,
            created_at: Utc::now(),
            reduction_ratio: None,
            raid_level: None,
        }
    }
}

#[async_trait]
impl VolumeService for ApplianceVolumeService {
    async fn list_volumes(&self) -> ServiceResult<Vec<Volume>> {
        if let Some(volumes) = self.cache.get(VOLUMES_KEY) {
            return Ok(volumes);
        }

        let output = self.executor.execute(VolumeListParser::COMMAND).await?;
        let volumes = VolumeListParser::parse(&output.output);
        tracing::debug!(count = volumes.len(), "Volumes loaded");
        self.cache.set(VOLUMES_KEY, volumes.clone(), None);
        Ok(volumes)
    }

    async fn get_volume(&self, id: &str) -> ServiceResult<Option<Volume>> {
        let Some(mut volume) = self.list_volumes().await?.into_iter().find(|v| v.id == id) else {
            return Ok(None);
        };

        match self
            .executor
            .execute(&VolumeDetailsParser::command(&volume.name))
            .await
        {
            Ok(output) => volume.apply_detail(VolumeDetailsParser::parse(&output.output)),
            Err(e) => {
                tracing::warn!(volume = %volume.name, error = %e, "Volume details failed, using list data");
            }
        }
        Ok(Some(volume))
    }

    async fn create_volume(&self, request: &CreateVolumeRequest) -> ServiceResult<Volume> {
        request.validate()?;
        let bladeset = self.bladeset_name(&request.pool_id).await?;
        let command = Self::create_command(request, &bladeset);

        tracing::info!(
            volume = %request.name,
            bladeset = %bladeset,
            size_gib = request.size_gib(),
            "Creating volume"
        );
        self.executor
            .execute(&command)
            .instrument(tracing::info_span!(SERVICE_MUTATE, operation = "create", volume = %request.name))
            .await?;
        self.cache.invalidate(VOLUMES_KEY);

        let volumes = self.list_volumes().await?;
        if let Some(volume) = volumes.into_iter().find(|v| v.matches_name(&request.name)) {
            return Ok(volume);
        }

        tracing::warn!(
            volume = %request.name,
            "Created volume not found in volume list, returning unverified record"
        );
        Ok(Self::synthesize(request, &bladeset))
    }

    async fn delete_volume(&self, id: &str) -> ServiceResult<bool> {
        let Some(volume) = self.list_volumes().await?.into_iter().find(|v| v.id == id) else {
            return Ok(false);
        };

        tracing::info!(volume = %volume.name, "Deleting volume");
        self.executor
            .execute_with_confirmation(&format!("volume delete {}", quote_arg(&volume.name)))
            .instrument(tracing::info_span!(SERVICE_MUTATE, operation = "delete", volume = %volume.name))
            .await?;
        self.cache.invalidate(VOLUMES_KEY);
        Ok(true)
    }
}
