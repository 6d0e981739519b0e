//! System info from `about` and `sysmap`

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::SystemService;
use crate::cache::{SYSTEM_TTL, TtlCache};
use crate::error::ServiceResult;
use crate::models::SystemInfo;
use crate::parser::sysmap::enrich_nodes;
use crate::parser::{AboutParser, CommandParser, SysmapCapacityParser, SysmapNodesParser};
use crate::session::CommandExecutor;

const SYSTEM_KEY: &str = "system-info";

/// System service over a PanCLI session
pub struct ApplianceSystemService {
    executor: Arc<dyn CommandExecutor>,
    cache: TtlCache<SystemInfo>,
}

impl ApplianceSystemService {
    /// Creates the service with the default system TTL
    #[must_use]
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        Self::with_ttl(executor, SYSTEM_TTL)
    }

    /// Creates the service with a custom TTL
    #[must_use]
    pub fn with_ttl(executor: Arc<dyn CommandExecutor>, ttl: Duration) -> Self {
        Self {
            executor,
            cache: TtlCache::new(ttl),
        }
    }
}

#[async_trait]
impl SystemService for ApplianceSystemService {
    async fn system_info(&self) -> ServiceResult<SystemInfo> {
        if let Some(info) = self.cache.get(SYSTEM_KEY) {
            return Ok(info);
        }

        let (about, nodes, capacity) = tokio::try_join!(
            self.executor.execute(AboutParser::COMMAND),
            self.executor.execute(SysmapNodesParser::COMMAND),
            self.executor.execute(SysmapCapacityParser::COMMAND),
        )?;

        let mut nodes = SysmapNodesParser::parse(&nodes.output);
        enrich_nodes(&mut nodes, &SysmapCapacityParser::parse(&capacity.output));
        let info = SystemInfo::assemble(AboutParser::parse(&about.output), nodes);

        tracing::debug!(nodes = info.nodes.len(), "System info loaded");
        self.cache.set(SYSTEM_KEY, info.clone(), None);
        Ok(info)
    }
}
