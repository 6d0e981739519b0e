//! Error types for `panbridge-core`
//!
//! Each concern has its own error enum and `Result` alias. The umbrella
//! [`PanbridgeError`] converts from all of them for callers that want a
//! single error type (the CLI, mostly).

use std::time::Duration;

use thiserror::Error;

/// Errors raised by the interactive session client
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The transport could not be opened
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Opening the transport took longer than the connect timeout
    #[error("Connection timed out after {}ms", .0.as_millis())]
    ConnectTimeout(Duration),

    /// No prompt matched within the command timeout
    #[error("Timed out waiting for prompt ({pattern}) after {}ms. Buffer tail: {tail:?}", .waited.as_millis())]
    PromptTimeout {
        /// The prompt pattern that was awaited
        pattern: String,
        /// How long the client waited
        waited: Duration,
        /// The last bytes received, for diagnostics
        tail: String,
    },

    /// The remote side closed the channel
    #[error("Shell channel closed by remote")]
    ChannelClosed,

    /// Reading from or writing to the channel failed
    #[error("IO error: {0}")]
    Io(String),

    /// Every reconnection attempt failed
    #[error("Failed to connect after {attempts} attempts: {last_error}")]
    ReconnectExhausted {
        /// Number of attempts made
        attempts: u32,
        /// Error reported by the final attempt
        last_error: String,
    },

    /// The client was shut down
    #[error("Session client has been destroyed")]
    Destroyed,

    /// The worker task stopped without answering
    #[error("Session worker stopped unexpectedly")]
    WorkerGone,
}

impl SessionError {
    /// Returns true for errors that leave the session unusable until
    /// it reconnects
    #[must_use]
    pub const fn invalidates_session(&self) -> bool {
        matches!(
            self,
            Self::PromptTimeout { .. } | Self::ChannelClosed | Self::Io(_)
        )
    }
}

impl From<std::io::Error> for SessionError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type for session operations
pub type SessionResult<T> = std::result::Result<T, SessionError>;

/// A single row or record that could not be parsed
///
/// List parsers never return this; they log it and skip the row.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A data row ended before the last column
    #[error("Row has {found} of {expected} columns: {line:?}")]
    MissingColumns {
        /// Columns defined by the header
        expected: usize,
        /// Columns present in the row
        found: usize,
        /// The offending line
        line: String,
    },

    /// A required field was empty or absent
    #[error("Missing field '{0}'")]
    MissingField(String),

    /// No header line was found
    #[error("No header line found")]
    NoHeader,
}

/// Result type for parse operations
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Errors raised by the domain services
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The underlying session failed
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The caller supplied an unusable request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Result type for domain service operations
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the configuration file failed
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid TOML for this schema
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// A required field has no value
    #[error("Missing required setting: {0}")]
    MissingField(&'static str),

    /// A field has a value outside its valid range
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// The field name
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

/// Result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Umbrella error for the whole crate
#[derive(Debug, Error)]
pub enum PanbridgeError {
    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Session error
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Domain service error
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Tracing setup error
    #[error(transparent)]
    Tracing(#[from] crate::tracing::TracingError),
}
