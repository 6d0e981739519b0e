//! `PanBridge` Core Library
//!
//! Drives the PanCLI shell of a VDURA V5000 storage appliance over one
//! persistent interactive SSH session and exposes it as typed domain
//! services.
//!
//! # Crate Structure
//!
//! - [`session`] - Serialized session client, prompt handling, reconnection
//! - [`parser`] - Column, token, key-value and tab parsers per command
//! - [`cache`] - Per-entity TTL cache
//! - [`performance`] - Background polling into rolling histories
//! - [`service`] - Pool, volume, host, alert, system and performance services
//! - [`models`] - Domain records
//! - [`config`] - Appliance settings, file and environment loading
//! - [`tracing`] - Structured logging setup

// Enable missing_docs warning for public API documentation
#![warn(missing_docs)]

pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod parser;
pub mod performance;
pub mod service;
pub mod session;
pub mod tracing;

pub use cache::TtlCache;
pub use config::{ApplianceConfig, CacheTtlConfig, ConfigLoader};
pub use error::{
    ConfigError, ConfigResult, PanbridgeError, ParseError, ParseResult, ServiceError,
    ServiceResult, SessionError, SessionResult,
};
pub use models::{
    AboutInfo, Alert, AlertFilter, AlertSeverity, AlertStatus, CreateVolumeRequest, Host,
    MetadataDataPoint, Node, NodeCapacity, NodeRole, NodeStatus, PerformanceDataPoint,
    PerformanceSummary, Pool, PoolStatus, SystemInfo, TieringPolicy, Volume, VolumeStatus,
};
pub use parser::{CommandParser, ParseStrategy};
pub use performance::{PerformanceAccumulator, RollingWindow};
pub use service::{
    AlertService, ApplianceServices, HostService, PerformanceService, PoolService, SystemService,
    VolumeService,
};
pub use session::{
    CommandExecutor, CommandOutput, RetryConfig, SessionClient, SessionConfig, SessionState,
    ShellChannel, SshProcessTransport, SshTarget, Transport,
};
pub use tracing::{
    TracingConfig, TracingError, TracingLevel, TracingOutput, TracingResult, field_names,
    init_tracing, is_tracing_initialized, span_names,
};
