//! Alerts derived from the appliance event log

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    /// Critical, error or fatal events
    Critical,
    /// Warnings
    Warning,
    /// Everything else
    Info,
}

impl AlertSeverity {
    /// Returns the lowercase label
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl std::str::FromStr for AlertSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "critical" => Ok(Self::Critical),
            "warning" | "warn" => Ok(Self::Warning),
            "info" => Ok(Self::Info),
            other => Err(format!("unknown severity '{other}'")),
        }
    }
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Alert lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    /// Not yet acknowledged
    #[default]
    Active,
    /// Acknowledged locally
    Acknowledged,
    /// Resolved
    Resolved,
}

impl AlertStatus {
    /// Returns the lowercase label
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Acknowledged => "acknowledged",
            Self::Resolved => "resolved",
        }
    }
}

impl std::str::FromStr for AlertStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "acknowledged" | "ack" => Ok(Self::Acknowledged),
            "resolved" => Ok(Self::Resolved),
            other => Err(format!("unknown alert status '{other}'")),
        }
    }
}

impl std::fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One event log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// Stable id, slug of `<code>-<timestamp>`
    pub id: String,
    /// Severity
    pub severity: AlertSeverity,
    /// Lifecycle state
    pub status: AlertStatus,
    /// Event text
    pub message: String,
    /// Component that raised the event, or `system`
    pub source: String,
    /// When the event was logged
    pub timestamp: DateTime<Utc>,
    /// When the alert was acknowledged locally
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acknowledged_at: Option<DateTime<Utc>>,
    /// When the alert was resolved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Filter for [`crate::service::AlertService::list_alerts`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlertFilter {
    /// Keep only this severity
    pub severity: Option<AlertSeverity>,
    /// Keep only this status
    pub status: Option<AlertStatus>,
}

impl AlertFilter {
    /// Returns true if the alert passes every set criterion
    #[must_use]
    pub fn matches(&self, alert: &Alert) -> bool {
        self.severity.is_none_or(|s| alert.severity == s)
            && self.status.is_none_or(|s| alert.status == s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_matches() {
        let alert = Alert {
            id: "alert-1".into(),
            severity: AlertSeverity::Warning,
            status: AlertStatus::Active,
            message: "disk slow".into(),
            source: "system".into(),
            timestamp: Utc::now(),
            acknowledged_at: None,
            resolved_at: None,
        };
        assert!(AlertFilter::default().matches(&alert));
        assert!(
            AlertFilter {
                severity: Some(AlertSeverity::Warning),
                status: Some(AlertStatus::Active),
            }
            .matches(&alert)
        );
        assert!(
            !AlertFilter {
                severity: Some(AlertSeverity::Critical),
                status: None,
            }
            .matches(&alert)
        );
    }

    #[test]
    fn test_severity_from_str() {
        assert_eq!("WARN".parse::<AlertSeverity>(), Ok(AlertSeverity::Warning));
        assert!("loud".parse::<AlertSeverity>().is_err());
    }
}
