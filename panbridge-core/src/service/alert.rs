//! Alerts from the appliance event log
//!
//! The event log is append-only and has no acknowledgement concept, so
//! acknowledgements live in an [`AcknowledgementStore`] and are overlaid on
//! every read.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::AlertService;
use crate::cache::{ALERTS_TTL, TtlCache};
use crate::error::ServiceResult;
use crate::models::{Alert, AlertFilter, AlertStatus};
use crate::parser::{CommandParser, EventlogParser};
use crate::session::CommandExecutor;

const ALERTS_KEY: &str = "alerts-all";

/// Where acknowledgements are kept
pub trait AcknowledgementStore: Send + Sync {
    /// Records an acknowledgement and returns the effective time
    ///
    /// Acknowledging twice keeps the first time.
    fn acknowledge(&self, id: &str, at: DateTime<Utc>) -> DateTime<Utc>;

    /// When the alert was acknowledged, if it was
    fn acknowledged_at(&self, id: &str) -> Option<DateTime<Utc>>;
}

/// Process-local acknowledgement store; lost on restart
#[derive(Debug, Default)]
pub struct InMemoryAcknowledgements {
    acknowledged: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl InMemoryAcknowledgements {
    /// Creates an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of acknowledged alerts
    #[must_use]
    pub fn len(&self) -> usize {
        self.acknowledged
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if nothing was acknowledged
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AcknowledgementStore for InMemoryAcknowledgements {
    fn acknowledge(&self, id: &str, at: DateTime<Utc>) -> DateTime<Utc> {
        *self
            .acknowledged
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(id.to_string())
            .or_insert(at)
    }

    fn acknowledged_at(&self, id: &str) -> Option<DateTime<Utc>> {
        self.acknowledged
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .copied()
    }
}

/// Alert service over a PanCLI session
pub struct ApplianceAlertService {
    executor: Arc<dyn CommandExecutor>,
    acknowledgements: Arc<dyn AcknowledgementStore>,
    cache: TtlCache<Vec<Alert>>,
}

impl ApplianceAlertService {
    /// Creates the service with an in-memory store and the default TTL
    #[must_use]
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        Self::with_store(executor, Arc::new(InMemoryAcknowledgements::new()), ALERTS_TTL)
    }

    /// Creates the service with a custom store and TTL
    #[must_use]
    pub fn with_store(
        executor: Arc<dyn CommandExecutor>,
        acknowledgements: Arc<dyn AcknowledgementStore>,
        ttl: Duration,
    ) -> Self {
        Self {
            executor,
            acknowledgements,
            cache: TtlCache::new(ttl),
        }
    }

    /// Event log as parsed, without acknowledgements
    async fn raw_alerts(&self) -> ServiceResult<Vec<Alert>> {
        if let Some(alerts) = self.cache.get(ALERTS_KEY) {
            return Ok(alerts);
        }

        let output = self.executor.execute(EventlogParser::COMMAND).await?;
        let alerts = EventlogParser::parse(&output.output);
        tracing::debug!(count = alerts.len(), "Event log loaded");
        self.cache.set(ALERTS_KEY, alerts.clone(), None);
        Ok(alerts)
    }

    fn overlay(&self, mut alert: Alert) -> Alert {
        if let Some(at) = self.acknowledgements.acknowledged_at(&alert.id) {
            alert.acknowledged_at = Some(at);
            if alert.status == AlertStatus::Active {
                alert.status = AlertStatus::Acknowledged;
            }
        }
        alert
    }
}

#[async_trait]
impl AlertService for ApplianceAlertService {
    async fn list_alerts(&self, filter: AlertFilter) -> ServiceResult<Vec<Alert>> {
        Ok(self
            .raw_alerts()
            .await?
            .into_iter()
            .map(|a| self.overlay(a))
            .filter(|a| filter.matches(a))
            .collect())
    }

    async fn acknowledge(&self, id: &str) -> ServiceResult<Option<Alert>> {
        let Some(alert) = self.raw_alerts().await?.into_iter().find(|a| a.id == id) else {
            return Ok(None);
        };
        let at = self.acknowledgements.acknowledge(id, Utc::now());
        tracing::info!(alert = id, acknowledged_at = %at, "Alert acknowledged");
        Ok(Some(self.overlay(alert)))
    }
}
