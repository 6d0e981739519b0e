//! `sysstat storage` and `sysstat director`
//!
//! Both commands print a statistics table. Older code levels print
//! `Label: value` pairs instead, which is what the key-value fallback reads.

use chrono::{DateTime, Utc};

use super::fields::Fields;
use super::kv::parse_key_values;
use super::tokens::{Aggregate, extract};
use super::values::leading_number;
use super::{CommandParser, ParseStrategy};
use crate::models::{MetadataDataPoint, PerformanceDataPoint};

const STORAGE_FIELDS: [Aggregate; 6] = [
    Aggregate::Sum,
    Aggregate::Sum,
    Aggregate::Sum,
    Aggregate::Sum,
    Aggregate::Mean,
    Aggregate::Mean,
];

const STORAGE_LABELS: [&[&str]; 6] = [
    &["Read IOPS", "ReadIOPS", "Read IO/s"],
    &["Write IOPS", "WriteIOPS", "Write IO/s"],
    &["Read Throughput (MB/s)", "Read Throughput", "ReadThroughput", "Read BW"],
    &["Write Throughput (MB/s)", "Write Throughput", "WriteThroughput", "Write BW"],
    &["Read Latency (ms)", "Read Latency", "ReadLatency", "Read Lat"],
    &["Write Latency (ms)", "Write Latency", "WriteLatency", "Write Lat"],
];

const DIRECTOR_FIELDS: [Aggregate; 4] = [Aggregate::Sum; 4];

const DIRECTOR_LABELS: [&[&str]; 4] = [
    &["Creates", "Create Ops", "CreateOps"],
    &["Removes", "Remove Ops", "RemoveOps", "Deletes"],
    &["Lookups", "Lookup Ops", "LookupOps"],
    &["SetMix", "Set Mix", "SetMixOps", "Mixed Ops"],
];

/// Reads `N` values from a table, or from labelled pairs when no table row fits
fn read_values<const N: usize>(
    raw: &str,
    command: &str,
    fields: &[Aggregate; N],
    labels: &[&[&str]; N],
) -> [f64; N] {
    let mut out = [0.0; N];
    if let Some(values) = extract(raw, fields) {
        out.copy_from_slice(&values[..N]);
        return out;
    }

    tracing::debug!(command, "No statistics row found, reading key-value pairs");
    let kv: Fields = parse_key_values(raw);
    for (slot, keys) in out.iter_mut().zip(labels) {
        *slot = kv.lookup(keys).and_then(leading_number).unwrap_or(0.0);
    }
    out
}

/// Parses storage throughput, IOPS and latency
pub struct SysstatStorageParser;

impl SysstatStorageParser {
    /// Parses a sample stamped with `timestamp`
    #[must_use]
    pub fn parse_at(raw: &str, timestamp: DateTime<Utc>) -> PerformanceDataPoint {
        let [read_iops, write_iops, read_tp, write_tp, read_lat, write_lat] =
            read_values(raw, Self::COMMAND, &STORAGE_FIELDS, &STORAGE_LABELS);
        PerformanceDataPoint {
            timestamp,
            read_iops,
            write_iops,
            read_throughput_mbs: read_tp,
            write_throughput_mbs: write_tp,
            read_latency_ms: read_lat,
            write_latency_ms: write_lat,
        }
    }
}

impl CommandParser for SysstatStorageParser {
    const COMMAND: &'static str = "sysstat storage";
    const STRATEGY: ParseStrategy = ParseStrategy::TokenExtraction;
    type Output = PerformanceDataPoint;

    fn parse(raw: &str) -> PerformanceDataPoint {
        Self::parse_at(raw, Utc::now())
    }
}

/// Parses director metadata operation rates
pub struct SysstatDirectorParser;

impl SysstatDirectorParser {
    /// Parses a sample stamped with `timestamp`
    #[must_use]
    pub fn parse_at(raw: &str, timestamp: DateTime<Utc>) -> MetadataDataPoint {
        let [creates, removes, lookups, set_mix] =
            read_values(raw, Self::COMMAND, &DIRECTOR_FIELDS, &DIRECTOR_LABELS);
        MetadataDataPoint {
            timestamp,
            creates,
            removes,
            lookups,
            set_mix,
        }
    }
}

impl CommandParser for SysstatDirectorParser {
    const COMMAND: &'static str = "sysstat director";
    const STRATEGY: ParseStrategy = ParseStrategy::TokenExtraction;
    type Output = MetadataDataPoint;

    fn parse(raw: &str) -> MetadataDataPoint {
        Self::parse_at(raw, Utc::now())
    }
}
