//! Structured logging setup
//!
//! Library code only emits `tracing` events and spans. A binary installs
//! the subscriber once through [`init_tracing`]; later calls are refused so
//! a second front end cannot silently replace the first one's filter.

use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

static INSTALLED: AtomicBool = AtomicBool::new(false);

/// Why the subscriber could not be installed
#[derive(Debug, Error)]
pub enum TracingError {
    /// `init_tracing` already ran in this process
    #[error("Logging is already initialized")]
    AlreadyInitialized,

    /// The custom filter directive did not parse
    #[error("Invalid log filter '{directive}': {reason}")]
    InvalidFilter {
        /// Directive as given
        directive: String,
        /// Parser message
        reason: String,
    },

    /// The log file could not be opened
    #[error("Cannot open log file {}: {source}", path.display())]
    LogFile {
        /// Requested file
        path: PathBuf,
        /// Underlying failure
        source: io::Error,
    },

    /// Another global subscriber was installed outside this module
    #[error("Failed to install log subscriber: {0}")]
    Install(String),
}

/// Result type for logging setup
pub type TracingResult<T> = Result<T, TracingError>;

/// Minimum level of events that reach the output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TracingLevel {
    /// Failures only
    Error,
    /// Failures, skipped rows, reconnect attempts
    Warn,
    /// Connection lifecycle and banners
    #[default]
    Info,
    /// Per-command timing
    Debug,
    /// Cache traffic and raw prompt matching
    Trace,
}

impl TracingLevel {
    /// Equivalent `tracing` level
    #[must_use]
    pub const fn to_tracing_level(self) -> Level {
        match self {
            Self::Error => Level::ERROR,
            Self::Warn => Level::WARN,
            Self::Info => Level::INFO,
            Self::Debug => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Maps a `-v` repetition count to a level (0 = warn)
    #[must_use]
    pub const fn from_verbosity(count: u8) -> Self {
        match count {
            0 => Self::Warn,
            1 => Self::Info,
            2 => Self::Debug,
            _ => Self::Trace,
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl std::str::FromStr for TracingLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for TracingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where formatted events go
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TracingOutput {
    /// Standard output
    Stdout,
    /// Standard error, keeping stdout free for command output
    #[default]
    Stderr,
    /// A file, truncated on start, written without ANSI colors
    File {
        /// Log file location
        path: PathBuf,
    },
}

/// Subscriber settings
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Level applied to this workspace's crates
    pub level: TracingLevel,
    /// Destination
    pub output: TracingOutput,
    /// Prefix each line with the thread id
    pub thread_ids: bool,
    /// Full `EnvFilter` directive; replaces the level-derived one when set
    pub filter: Option<String>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: TracingLevel::Info,
            output: TracingOutput::Stderr,
            thread_ids: false,
            filter: None,
        }
    }
}

impl TracingConfig {
    /// Info level to stderr
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the level
    #[must_use]
    pub const fn with_level(mut self, level: TracingLevel) -> Self {
        self.level = level;
        self
    }

    /// Sets the destination
    #[must_use]
    pub fn with_output(mut self, output: TracingOutput) -> Self {
        self.output = output;
        self
    }

    /// Turns thread ids on or off
    #[must_use]
    pub const fn with_thread_ids(mut self, enabled: bool) -> Self {
        self.thread_ids = enabled;
        self
    }

    /// Sets a full filter directive such as `panbridge_core=trace,tokio=warn`
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Directive used when no custom filter is set
    #[must_use]
    pub fn default_directive(&self) -> String {
        format!("panbridge_core={0},panbridge={0}", self.level)
    }

    fn env_filter(&self) -> TracingResult<EnvFilter> {
        let directive = self
            .filter
            .clone()
            .unwrap_or_else(|| self.default_directive());
        EnvFilter::try_new(&directive).map_err(|e| TracingError::InvalidFilter {
            directive,
            reason: e.to_string(),
        })
    }

    fn writer(&self) -> TracingResult<(BoxMakeWriter, bool)> {
        Ok(match &self.output {
            TracingOutput::Stdout => (BoxMakeWriter::new(io::stdout), true),
            TracingOutput::Stderr => (BoxMakeWriter::new(io::stderr), true),
            TracingOutput::File { path } => {
                let file = std::fs::File::create(path).map_err(|source| TracingError::LogFile {
                    path: path.clone(),
                    source,
                })?;
                (BoxMakeWriter::new(Mutex::new(file)), false)
            }
        })
    }
}

/// Installs the global subscriber
///
/// # Errors
///
/// Returns [`TracingError::AlreadyInitialized`] on a second call, and
/// another variant when the filter is invalid, the log file cannot be
/// opened, or a foreign subscriber is already installed.
pub fn init_tracing(config: &TracingConfig) -> TracingResult<()> {
    if INSTALLED.swap(true, Ordering::SeqCst) {
        return Err(TracingError::AlreadyInitialized);
    }

    let installed = config.env_filter().and_then(|filter| {
        let (writer, ansi) = config.writer()?;
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(config.thread_ids)
                    .with_ansi(ansi)
                    .with_writer(writer),
            )
            .try_init()
            .map_err(|e| TracingError::Install(e.to_string()))
    });

    if installed.is_err() {
        // Allow a retry with a corrected config
        INSTALLED.store(false, Ordering::SeqCst);
        return installed;
    }

    tracing::debug!(level = %config.level, output = ?config.output, "Logging initialized");
    Ok(())
}

/// Returns true once [`init_tracing`] has succeeded
#[must_use]
pub fn is_tracing_initialized() -> bool {
    INSTALLED.load(Ordering::SeqCst)
}

/// Span names shared by the session, accumulator and services
pub mod span_names {
    /// Opening the transport and reaching the CLI prompt
    pub const SESSION_CONNECT: &str = "session.connect";
    /// Running one queued command
    pub const SESSION_EXECUTE: &str = "session.execute";
    /// One accumulator poll
    pub const PERFORMANCE_POLL: &str = "performance.poll";
    /// A mutating domain-service call
    pub const SERVICE_MUTATE: &str = "service.mutate";
}

/// Field names used on those spans and their events
pub mod field_names {
    /// Appliance host
    pub const HOST: &str = "host";
    /// CLI command text
    pub const COMMAND: &str = "command";
    /// Duration in milliseconds
    pub const DURATION_MS: &str = "duration_ms";
    /// Reconnect attempt number, starting at 1
    pub const ATTEMPT: &str = "attempt";
    /// Error message
    pub const ERROR: &str = "error";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_level_from_str() {
        assert_eq!("error".parse::<TracingLevel>(), Ok(TracingLevel::Error));
        assert_eq!("WARN".parse::<TracingLevel>(), Ok(TracingLevel::Warn));
        assert_eq!(" Info ".parse::<TracingLevel>(), Ok(TracingLevel::Info));
        assert_eq!("debug".parse::<TracingLevel>(), Ok(TracingLevel::Debug));
        assert_eq!("trace".parse::<TracingLevel>(), Ok(TracingLevel::Trace));
        assert!("chatty".parse::<TracingLevel>().is_err());
    }

    #[test]
    fn test_from_verbosity() {
        assert_eq!(TracingLevel::from_verbosity(0), TracingLevel::Warn);
        assert_eq!(TracingLevel::from_verbosity(1), TracingLevel::Info);
        assert_eq!(TracingLevel::from_verbosity(2), TracingLevel::Debug);
        assert_eq!(TracingLevel::from_verbosity(9), TracingLevel::Trace);
    }

    #[test]
    fn test_tracing_config_builder() {
        let config = TracingConfig::new()
            .with_level(TracingLevel::Debug)
            .with_output(TracingOutput::Stdout)
            .with_thread_ids(true)
            .with_filter("panbridge_core=trace");

        assert_eq!(config.level, TracingLevel::Debug);
        assert_eq!(config.output, TracingOutput::Stdout);
        assert!(config.thread_ids);
        assert_eq!(config.filter.as_deref(), Some("panbridge_core=trace"));
    }

    #[test]
    fn test_default_directive_covers_both_crates() {
        let config = TracingConfig::new().with_level(TracingLevel::Debug);
        assert_eq!(
            config.default_directive(),
            "panbridge_core=debug,panbridge=debug"
        );
    }

    #[test]
    fn test_invalid_filter_is_reported_with_directive() {
        let config = TracingConfig::new().with_filter("panbridge_core=loud");
        match config.env_filter() {
            Err(TracingError::InvalidFilter { directive, .. }) => {
                assert_eq!(directive, "panbridge_core=loud");
            }
            other => panic!("expected an invalid filter, got {other:?}"),
        }
    }

    #[test]
    fn test_unwritable_log_file_is_reported() {
        let config = TracingConfig::new().with_output(TracingOutput::File {
            path: PathBuf::from("/nonexistent/dir/panbridge.log"),
        });
        assert!(matches!(config.writer(), Err(TracingError::LogFile { .. })));
    }
}
