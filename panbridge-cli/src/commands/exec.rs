//! Raw command passthrough.

use panbridge_core::service::ApplianceServices;
use panbridge_core::session::CommandExecutor;

use crate::error::CliError;

/// Exec command handler; prints the cleaned output unchanged
pub async fn cmd_exec(
    services: &ApplianceServices,
    command: &str,
    confirm: bool,
) -> Result<String, CliError> {
    let command = command.trim();
    if command.is_empty() {
        return Err(CliError::InvalidArgument("command must not be empty".into()));
    }
    let client = services.client();
    let result = if confirm {
        client.execute_with_confirmation(command).await?
    } else {
        client.execute(command).await?
    };
    tracing::debug!(
        command,
        duration_ms = result.duration.as_millis() as u64,
        "Raw command finished"
    );
    Ok(result.output)
}
