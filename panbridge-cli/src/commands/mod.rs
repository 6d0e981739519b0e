//! Command handler modules for the CLI.

mod alerts;
mod completions;
mod exec;
mod perf;
mod pools;
mod system;
mod volumes;

use std::path::Path;

use crate::cli::{AlertCommands, Commands, OutputFormat, VolumeCommands};
use crate::error::CliError;
use crate::util::{parse_size, with_services};

/// Dispatch a CLI command to the appropriate handler.
pub fn dispatch(
    config_path: Option<&Path>,
    format: OutputFormat,
    command: Commands,
) -> Result<(), CliError> {
    let output = match command {
        Commands::Completions { shell } => {
            completions::cmd_completions(shell);
            return Ok(());
        }
        Commands::System => {
            with_services(config_path, async |s| system::cmd_system(s, format).await)?
        }
        Commands::Nodes => {
            with_services(config_path, async |s| system::cmd_nodes(s, format).await)?
        }
        Commands::Pools { id } => with_services(config_path, async |s| {
            pools::cmd_pools(s, id.as_deref(), format).await
        })?,
        Commands::Volumes(VolumeCommands::List) => {
            with_services(config_path, async |s| volumes::cmd_list(s, format).await)?
        }
        Commands::Volumes(VolumeCommands::Show { id }) => {
            with_services(config_path, async |s| volumes::cmd_show(s, &id, format).await)?
        }
        Commands::Volumes(VolumeCommands::Create {
            name,
            pool,
            size,
            tiering,
            compressed,
        }) => {
            let request = volumes::CreateParams {
                name,
                pool,
                capacity_bytes: parse_size(&size)?,
                tiering: tiering.map(Into::into),
                compressed,
            }
            .into_request()?;
            with_services(config_path, async |s| {
                volumes::cmd_create(s, &request, format).await
            })?
        }
        Commands::Volumes(VolumeCommands::Delete { id }) => {
            with_services(config_path, async |s| volumes::cmd_delete(s, &id).await)?
        }
        Commands::Alerts(AlertCommands::List { severity, status }) => {
            let filter = alerts::build_filter(severity.as_deref(), status.as_deref())?;
            with_services(config_path, async |s| alerts::cmd_list(s, filter, format).await)?
        }
        Commands::Alerts(AlertCommands::Ack { id }) => {
            with_services(config_path, async |s| alerts::cmd_ack(s, &id, format).await)?
        }
        Commands::Perf => with_services(config_path, async |s| perf::cmd_perf(s, format).await)?,
        Commands::Exec { command, confirm } => {
            with_services(config_path, async |s| exec::cmd_exec(s, &command, confirm).await)?
        }
    };

    println!("{output}");
    Ok(())
}
