//! Pools backed by `bladeset list` and `bladeset detail`

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::PoolService;
use crate::cache::{POOLS_TTL, TtlCache};
use crate::error::ServiceResult;
use crate::models::Pool;
use crate::parser::{BladesetDetailParser, BladesetListParser, CommandParser};
use crate::session::CommandExecutor;

const POOLS_KEY: &str = "pools-all";

/// Pool service over a PanCLI session
pub struct AppliancePoolService {
    executor: Arc<dyn CommandExecutor>,
    cache: TtlCache<Vec<Pool>>,
}

impl AppliancePoolService {
    /// Creates the service with the default pool TTL
    #[must_use]
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        Self::with_ttl(executor, POOLS_TTL)
    }

    /// Creates the service with a custom TTL
    #[must_use]
    pub fn with_ttl(executor: Arc<dyn CommandExecutor>, ttl: Duration) -> Self {
        Self {
            executor,
            cache: TtlCache::new(ttl),
        }
    }

    /// Drops the cached list
    pub fn invalidate(&self) {
        self.cache.invalidate(POOLS_KEY);
    }
}

#[async_trait]
impl PoolService for AppliancePoolService {
    async fn list_pools(&self) -> ServiceResult<Vec<Pool>> {
        if let Some(pools) = self.cache.get(POOLS_KEY) {
            return Ok(pools);
        }

        let output = self.executor.execute(BladesetListParser::COMMAND).await?;
        let pools = BladesetListParser::parse(&output.output);
        tracing::debug!(count = pools.len(), "Pools loaded");
        self.cache.set(POOLS_KEY, pools.clone(), None);
        Ok(pools)
    }

    async fn get_pool(&self, id: &str) -> ServiceResult<Option<Pool>> {
        let Some(mut pool) = self.list_pools().await?.into_iter().find(|p| p.id == id) else {
            return Ok(None);
        };

        match self
            .executor
            .execute(&BladesetDetailParser::command(&pool.name))
            .await
        {
            Ok(output) => pool.apply_detail(BladesetDetailParser::parse(&output.output)),
            Err(e) => {
                tracing::warn!(pool = %pool.name, error = %e, "Bladeset detail failed, using list data");
            }
        }
        Ok(Some(pool))
    }
}
