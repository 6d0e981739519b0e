//! CLI error types and exit codes.

use panbridge_core::error::{ConfigError, PanbridgeError, ServiceError, SessionError};

/// Exit codes for CLI operations
pub mod exit_codes {
    /// General error - configuration, validation, or other non-connection errors
    pub const GENERAL_ERROR: i32 = 1;
    /// Connection failure - the appliance could not be reached or stopped
    /// answering
    pub const CONNECTION_FAILURE: i32 = 2;
}

/// CLI error type
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pool, volume or alert not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rejected argument or request
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Session failure
    #[error("Connection error: {0}")]
    Connection(String),

    /// Output could not be rendered
    #[error("Output error: {0}")]
    Output(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<SessionError> for CliError {
    fn from(err: SessionError) -> Self {
        Self::Connection(err.to_string())
    }
}

impl From<ServiceError> for CliError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Session(e) => e.into(),
            ServiceError::InvalidRequest(msg) => Self::InvalidArgument(msg),
        }
    }
}

impl From<PanbridgeError> for CliError {
    fn from(err: PanbridgeError) -> Self {
        match err {
            PanbridgeError::Config(e) => e.into(),
            PanbridgeError::Session(e) => e.into(),
            PanbridgeError::Service(e) => e.into(),
            PanbridgeError::Tracing(e) => Self::Config(e.to_string()),
        }
    }
}

impl CliError {
    /// Returns the appropriate exit code for this error type.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 1: General error (configuration, validation, not found, IO)
    /// - 2: Connection failure
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Connection(_) => exit_codes::CONNECTION_FAILURE,
            Self::Config(_)
            | Self::NotFound(_)
            | Self::InvalidArgument(_)
            | Self::Output(_)
            | Self::Io(_) => exit_codes::GENERAL_ERROR,
        }
    }
}
