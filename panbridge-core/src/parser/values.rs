//! Scalar helpers shared by every parser
//!
//! Capacity strings, booleans, status words, timestamps, uptimes and the
//! slug rule that turns appliance names into stable ids.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;

use crate::models::{AlertSeverity, NodeRole, NodeStatus, PoolStatus, VolumeStatus};

/// Bytes in one KiB
pub const KIB: u64 = 1024;
/// Bytes in one MiB
pub const MIB: u64 = KIB * 1024;
/// Bytes in one GiB
pub const GIB: u64 = MIB * 1024;
/// Bytes in one TiB
pub const TIB: u64 = GIB * 1024;
/// Bytes in one PiB
pub const PIB: u64 = TIB * 1024;

static CAPACITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d+(?:\.\d+)?|\.\d+)\s*([KMGTP]i?B|B|bytes?)?$")
        .expect("CAPACITY_RE is a valid regex pattern")
});

static LEADING_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-+]?(\d+(?:\.\d+)?|\.\d+)").expect("LEADING_NUMBER_RE is a valid regex pattern")
});

static SPACE_DATETIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{4}-\d{2}-\d{2})\s+(\d{2}:\d{2}:\d{2})")
        .expect("SPACE_DATETIME_RE is a valid regex pattern")
});

static US_DATETIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2})/(\d{1,2})/(\d{4})\s+(\d{1,2}):(\d{2}):(\d{2})")
        .expect("US_DATETIME_RE is a valid regex pattern")
});

static UPTIME_DAYS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\s*days?").expect("UPTIME_DAYS_RE is a valid regex pattern")
});

static UPTIME_CLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+):(\d+):(\d+)").expect("UPTIME_CLOCK_RE is a valid regex pattern")
});

/// Binary capacity unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapacityUnit {
    /// Bytes
    B,
    /// 1024 bytes
    KB,
    /// 1024 KB
    MB,
    /// 1024 MB
    GB,
    /// 1024 GB
    TB,
    /// 1024 TB
    PB,
}

impl CapacityUnit {
    /// All units, smallest first
    pub const ALL: [Self; 6] = [Self::B, Self::KB, Self::MB, Self::GB, Self::TB, Self::PB];

    /// Bytes per unit
    #[must_use]
    pub const fn multiplier(self) -> u64 {
        match self {
            Self::B => 1,
            Self::KB => KIB,
            Self::MB => MIB,
            Self::GB => GIB,
            Self::TB => TIB,
            Self::PB => PIB,
        }
    }

    /// Unit label as the appliance prints it
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::B => "B",
            Self::KB => "KB",
            Self::MB => "MB",
            Self::GB => "GB",
            Self::TB => "TB",
            Self::PB => "PB",
        }
    }

    /// Expresses a byte count in this unit
    #[must_use]
    pub fn value_of(self, bytes: u64) -> f64 {
        bytes as f64 / self.multiplier() as f64
    }

    fn from_label(label: &str) -> Option<Self> {
        let upper = label.to_ascii_uppercase().replace('I', "");
        match upper.as_str() {
            "B" | "BYTE" | "BYTES" => Some(Self::B),
            "KB" => Some(Self::KB),
            "MB" => Some(Self::MB),
            "GB" => Some(Self::GB),
            "TB" => Some(Self::TB),
            "PB" => Some(Self::PB),
            _ => None,
        }
    }
}

impl std::fmt::Display for CapacityUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses `"<number> <unit>"` into bytes using 1024 multipliers
///
/// A bare number is taken as bytes. Anything unparseable, including the
/// appliance's `--` placeholder, yields 0.
#[must_use]
pub fn parse_capacity(text: &str) -> u64 {
    try_parse_capacity(text).unwrap_or(0)
}

/// Like [`parse_capacity`] but distinguishes "absent" from zero
#[must_use]
pub fn try_parse_capacity(text: &str) -> Option<u64> {
    let caps = CAPACITY_RE.captures(text.trim())?;
    let value: f64 = caps.get(1)?.as_str().parse().ok()?;
    let unit = caps
        .get(2)
        .map_or(Some(CapacityUnit::B), |m| CapacityUnit::from_label(m.as_str()))?;
    let bytes = value * unit.multiplier() as f64;
    if bytes.is_finite() && bytes >= 0.0 {
        Some(bytes.round() as u64)
    } else {
        None
    }
}

/// Formats a byte count in the given unit with up to two decimals
#[must_use]
pub fn format_capacity(bytes: u64, unit: CapacityUnit) -> String {
    let formatted = format!("{:.2}", unit.value_of(bytes));
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {unit}")
}

/// Formats a byte count in the largest unit that keeps the value at or above 1
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    let unit = CapacityUnit::ALL
        .iter()
        .rev()
        .copied()
        .find(|u| bytes >= u.multiplier())
        .unwrap_or(CapacityUnit::B);
    format_capacity(bytes, unit)
}

/// Parses the leading number of a field, like `12` in `12/12`
#[must_use]
pub fn leading_number(text: &str) -> Option<f64> {
    LEADING_NUMBER_RE
        .find(text.trim())
        .and_then(|m| m.as_str().parse().ok())
}

/// Parses the leading integer of a field, or 0
#[must_use]
pub fn parse_count(text: &str) -> u32 {
    leading_number(text).map_or(0, |n| n.max(0.0) as u32)
}

/// `yes`, `true`, `on`, `enabled` and `1` are true; anything else is false
#[must_use]
pub fn parse_bool(text: &str) -> bool {
    matches!(
        text.trim().to_lowercase().as_str(),
        "yes" | "true" | "on" | "enabled" | "1"
    )
}

/// Lowercases a name and collapses every non-alphanumeric run to one `-`
///
/// Leading and trailing separators are dropped, which makes the rule
/// idempotent.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;
    for ch in name.to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(ch);
        } else {
            pending_separator = true;
        }
    }
    slug
}

/// Builds a stable id such as `pool-set-1` from a prefix and a name
#[must_use]
pub fn name_to_id(prefix: &str, name: &str) -> String {
    format!("{prefix}-{}", slugify(name))
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Maps a node state word; `Online (warning)` still counts as online
#[must_use]
pub fn map_node_status(text: &str) -> NodeStatus {
    let s = text.trim().to_lowercase();
    if s.starts_with("online") || matches!(s.as_str(), "up" | "ok" | "active") {
        NodeStatus::Online
    } else if contains_any(&s, &["service", "maintenance"]) {
        NodeStatus::Service
    } else {
        NodeStatus::Offline
    }
}

/// Maps a bladeset state word
#[must_use]
pub fn map_pool_status(text: &str) -> PoolStatus {
    let s = text.trim().to_lowercase();
    if contains_any(&s, &["degraded", "warning"]) {
        PoolStatus::Degraded
    } else if contains_any(&s, &["offline", "not ", "down", "fail"]) {
        PoolStatus::Offline
    } else if s.contains("online") || matches!(s.as_str(), "ok" | "active" | "up") {
        PoolStatus::Online
    } else {
        PoolStatus::Offline
    }
}

/// Maps a volume state word; `Not accessible` is offline
#[must_use]
pub fn map_volume_status(text: &str) -> VolumeStatus {
    let s = text.trim().to_lowercase();
    if contains_any(&s, &["degraded", "warning"]) {
        VolumeStatus::Degraded
    } else if contains_any(&s, &["offline", "not ", "down", "fail", "inaccessible"]) {
        VolumeStatus::Offline
    } else if contains_any(&s, &["online", "accessible"])
        || matches!(s.as_str(), "ok" | "active" | "up")
    {
        VolumeStatus::Online
    } else {
        VolumeStatus::Offline
    }
}

/// Maps an event category to a severity
#[must_use]
pub fn map_severity(category: &str) -> AlertSeverity {
    let s = category.trim().to_lowercase();
    if contains_any(&s, &["critical", "error", "fatal"]) {
        AlertSeverity::Critical
    } else if s.contains("warn") {
        AlertSeverity::Warning
    } else {
        AlertSeverity::Info
    }
}

/// Infers a node role from its type column
#[must_use]
pub fn infer_role(node_type: &str) -> NodeRole {
    let s = node_type.to_lowercase();
    if contains_any(&s, &["director", "dir", "mgmt", "management"]) {
        NodeRole::Director
    } else {
        NodeRole::Storage
    }
}

/// Parses a timestamp, trying RFC 3339 then two appliance layouts
///
/// Layouts without a zone are read as UTC.
#[must_use]
pub fn try_parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Some(caps) = SPACE_DATETIME_RE.captures(text) {
        let joined = format!("{}T{}", &caps[1], &caps[2]);
        if let Ok(naive) = NaiveDateTime::parse_from_str(&joined, "%Y-%m-%dT%H:%M:%S") {
            return Some(naive.and_utc());
        }
    }
    if let Some(caps) = US_DATETIME_RE.captures(text) {
        let num = |i: usize| caps[i].parse::<u32>().ok();
        let year = caps[3].parse::<i32>().ok()?;
        let date = NaiveDate::from_ymd_opt(year, num(1)?, num(2)?)?;
        return date
            .and_hms_opt(num(4)?, num(5)?, num(6)?)
            .map(|naive| naive.and_utc());
    }
    None
}

/// Parses a timestamp, falling back to the current time
#[must_use]
pub fn parse_timestamp(text: &str) -> DateTime<Utc> {
    try_parse_timestamp(text).unwrap_or_else(Utc::now)
}

/// Parses `"<d> days, HH:MM:SS"`, either part alone, or raw seconds
///
/// Values too large for a `u64` second count saturate.
#[must_use]
pub fn parse_uptime(text: &str) -> u64 {
    let text = text.trim();
    if text.is_empty() {
        return 0;
    }
    let mut seconds = 0_u64;
    if let Some(days) = UPTIME_DAYS_RE
        .captures(text)
        .map(|c| c[1].parse::<u64>().unwrap_or(u64::MAX))
    {
        seconds = seconds.saturating_add(days.saturating_mul(86_400));
    }
    if let Some(caps) = UPTIME_CLOCK_RE.captures(text) {
        let part = |i: usize| caps[i].parse::<u64>().unwrap_or(u64::MAX);
        let clock = part(1)
            .saturating_mul(3600)
            .saturating_add(part(2).saturating_mul(60))
            .saturating_add(part(3));
        seconds = seconds.saturating_add(clock);
    }
    if seconds == 0 {
        seconds = leading_number(text).map_or(0, |n| n.max(0.0) as u64);
    }
    seconds
}
