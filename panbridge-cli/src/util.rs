//! Shared utility functions used across command modules.

use std::path::Path;

use panbridge_core::config::{ApplianceConfig, ConfigLoader};
use panbridge_core::parser::values::try_parse_capacity;
use panbridge_core::service::ApplianceServices;

use crate::error::CliError;

/// Loads the settings from `config_path` or the default location
///
/// Background performance polling is switched off: one command never lives
/// long enough to fill a history.
pub fn load_config(config_path: Option<&Path>) -> Result<ApplianceConfig, CliError> {
    let loader = config_path.map_or_else(ConfigLoader::new, ConfigLoader::with_path);
    let config = loader.load()?.with_perf_poll_ms(0);
    tracing::debug!(host = %config.host, port = config.port, "Loaded appliance settings");
    Ok(config)
}

/// Loads the settings, connects, runs `f` and always shuts the session down
pub fn with_services<T>(
    config_path: Option<&Path>,
    f: impl AsyncFnOnce(&ApplianceServices) -> Result<T, CliError>,
) -> Result<T, CliError> {
    let config = load_config(config_path)?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let services = ApplianceServices::connect(&config);
        let result = f(&services).await;
        services.shutdown().await;
        result
    })
}

/// Parses a size such as `500GB` or `2 TB`; a bare number is GiB
pub fn parse_size(text: &str) -> Result<u64, CliError> {
    let trimmed = text.trim();
    let bytes = if trimmed.chars().all(|c| c.is_ascii_digit() || c == '.') {
        try_parse_capacity(&format!("{trimmed} GB"))
    } else {
        try_parse_capacity(trimmed)
    };
    match bytes {
        Some(b) if b > 0 => Ok(b),
        _ => Err(CliError::InvalidArgument(format!(
            "invalid size '{text}', expected e.g. 500GB or 2TB"
        ))),
    }
}
