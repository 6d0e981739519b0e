//! Performance summary from the accumulator, or an on-demand read

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::PerformanceService;
use crate::cache::{PERFORMANCE_TTL, TtlCache};
use crate::error::ServiceResult;
use crate::models::PerformanceSummary;
use crate::parser::{CommandParser, SysstatStorageParser};
use crate::performance::PerformanceAccumulator;
use crate::session::CommandExecutor;

const PERFORMANCE_KEY: &str = "performance-summary";

/// Performance service over a PanCLI session
///
/// Without an accumulator, or before its first sample, each cache miss
/// reads `sysstat storage` once and reports a single-sample history.
pub struct AppliancePerformanceService {
    executor: Arc<dyn CommandExecutor>,
    accumulator: Option<Arc<PerformanceAccumulator>>,
    cache: TtlCache<PerformanceSummary>,
}

impl AppliancePerformanceService {
    /// Creates the service with the default performance TTL
    #[must_use]
    pub fn new(
        executor: Arc<dyn CommandExecutor>,
        accumulator: Option<Arc<PerformanceAccumulator>>,
    ) -> Self {
        Self::with_ttl(executor, accumulator, PERFORMANCE_TTL)
    }

    /// Creates the service with a custom TTL for on-demand reads
    #[must_use]
    pub fn with_ttl(
        executor: Arc<dyn CommandExecutor>,
        accumulator: Option<Arc<PerformanceAccumulator>>,
        ttl: Duration,
    ) -> Self {
        Self {
            executor,
            accumulator,
            cache: TtlCache::new(ttl),
        }
    }

    /// The background accumulator, when polling is enabled
    #[must_use]
    pub fn accumulator(&self) -> Option<&Arc<PerformanceAccumulator>> {
        self.accumulator.as_ref()
    }
}

#[async_trait]
impl PerformanceService for AppliancePerformanceService {
    async fn summary(&self) -> ServiceResult<PerformanceSummary> {
        if let Some(accumulator) = &self.accumulator
            && !accumulator.is_empty().await
        {
            return Ok(accumulator.summary().await);
        }

        if let Some(summary) = self.cache.get(PERFORMANCE_KEY) {
            return Ok(summary);
        }

        let output = self.executor.execute(SysstatStorageParser::COMMAND).await?;
        let sample = SysstatStorageParser::parse(&output.output);
        let summary = PerformanceSummary::from_history(vec![sample], Vec::new());
        self.cache.set(PERFORMANCE_KEY, summary.clone(), None);
        Ok(summary)
    }
}
