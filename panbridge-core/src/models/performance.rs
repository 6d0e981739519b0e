//! Performance samples and summaries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One `sysstat storage` sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceDataPoint {
    /// When the sample was taken
    pub timestamp: DateTime<Utc>,
    /// Read operations per second
    pub read_iops: f64,
    /// Write operations per second
    pub write_iops: f64,
    /// Read throughput in MB/s
    pub read_throughput_mbs: f64,
    /// Write throughput in MB/s
    pub write_throughput_mbs: f64,
    /// Read latency in ms
    pub read_latency_ms: f64,
    /// Write latency in ms
    pub write_latency_ms: f64,
}

/// One `sysstat director` sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataDataPoint {
    /// When the sample was taken
    pub timestamp: DateTime<Utc>,
    /// Create operations per second
    pub creates: f64,
    /// Remove operations per second
    pub removes: f64,
    /// Lookup operations per second
    pub lookups: f64,
    /// Set-attribute mix per second
    pub set_mix: f64,
}

/// Current figures plus history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    /// Read plus write IOPS of the latest sample
    pub current_iops: f64,
    /// Read plus write MB/s of the latest sample
    pub current_throughput_mbs: f64,
    /// Mean of read and write latency, two decimals
    pub current_latency_ms: f64,
    /// Storage samples, oldest first
    pub history: Vec<PerformanceDataPoint>,
    /// Metadata samples, oldest first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metadata_history: Vec<MetadataDataPoint>,
}

impl PerformanceSummary {
    /// Derives the current figures from the last storage sample
    #[must_use]
    pub fn from_history(
        history: Vec<PerformanceDataPoint>,
        metadata_history: Vec<MetadataDataPoint>,
    ) -> Self {
        let (current_iops, current_throughput_mbs, current_latency_ms) =
            history.last().map_or((0.0, 0.0, 0.0), |latest| {
                let latency = (latest.read_latency_ms + latest.write_latency_ms) / 2.0;
                (
                    latest.read_iops + latest.write_iops,
                    latest.read_throughput_mbs + latest.write_throughput_mbs,
                    (latency * 100.0).round() / 100.0,
                )
            });

        Self {
            current_iops,
            current_throughput_mbs,
            current_latency_ms,
            history,
            metadata_history,
        }
    }
}
