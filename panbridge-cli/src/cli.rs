//! CLI argument parsing types using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// `PanBridge` command-line interface for PanCLI storage appliances
#[derive(Parser)]
#[command(name = "panbridge")]
#[command(author, version, about = "PanBridge command-line interface")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the settings file (defaults to the platform config directory)
    #[arg(short, long, global = true, env = "PANBRIDGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "table", value_enum)]
    pub format: OutputFormat,

    /// Increase output verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show cluster identity and capacity
    #[command(about = "Show cluster identity, capacity and node counts")]
    System,

    /// List cluster nodes
    #[command(about = "List director and storage nodes")]
    Nodes,

    /// List pools, or show one pool in detail
    #[command(about = "List storage pools (bladesets)")]
    Pools {
        /// Pool id such as `pool-set-1`
        id: Option<String>,
    },

    /// Volume operations
    #[command(subcommand)]
    Volumes(VolumeCommands),

    /// Alert operations
    #[command(subcommand)]
    Alerts(AlertCommands),

    /// Show current performance figures
    #[command(about = "Show current IOPS, throughput and latency")]
    Perf,

    /// Run a raw PanCLI command and print its output
    #[command(about = "Run a raw PanCLI command")]
    Exec {
        /// Command line, e.g. "sysstat storage"
        command: String,

        /// Answer `y` when the command asks for confirmation
        #[arg(long)]
        confirm: bool,
    },

    /// Generate shell completions
    #[command(about = "Generate shell completion scripts")]
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Volume subcommands
#[derive(Subcommand)]
pub enum VolumeCommands {
    /// List all volumes
    List,

    /// Show one volume
    Show {
        /// Volume id such as `vol-home`
        id: String,
    },

    /// Create a volume
    Create {
        /// Volume name, with or without the leading `/`
        #[arg(short, long)]
        name: String,

        /// Pool id to place the volume on
        #[arg(short, long)]
        pool: String,

        /// Hard quota, e.g. `500GB` or `2 TB`
        #[arg(short, long)]
        size: String,

        /// Tiering policy
        #[arg(long, value_enum)]
        tiering: Option<TieringArg>,

        /// Enable compression
        #[arg(long)]
        compressed: bool,
    },

    /// Delete a volume
    Delete {
        /// Volume id such as `vol-scratch`
        id: String,
    },
}

/// Alert subcommands
#[derive(Subcommand)]
pub enum AlertCommands {
    /// List alerts, newest first
    List {
        /// Only alerts of this severity (critical, warning, info)
        #[arg(long)]
        severity: Option<String>,

        /// Only alerts in this state (active, acknowledged, resolved)
        #[arg(long)]
        status: Option<String>,
    },

    /// Acknowledge an alert
    Ack {
        /// Alert id
        id: String,
    },
}

/// Output format options
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Display as formatted table
    #[default]
    Table,
    /// Output as JSON
    Json,
}

/// Tiering policy options
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum TieringArg {
    /// Appliance-managed tiering
    Auto,
    /// No tiering
    None,
}

impl From<TieringArg> for panbridge_core::TieringPolicy {
    fn from(arg: TieringArg) -> Self {
        match arg {
            TieringArg::Auto => Self::Auto,
            TieringArg::None => Self::None,
        }
    }
}
