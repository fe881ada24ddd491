//! Clap derive structures for the `nlt` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// nlt -- manage NLT LoRaWAN devices from the command line
#[derive(Debug, Parser)]
#[command(
    name = "nlt",
    version,
    about = "Manage NLT LoRaWAN devices from the command line",
    long_about = "Provision devices, inspect message history, manage forwarding\n\
        connections and queue downlinks on the NLT LoRaWAN network server.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Account profile to use
    #[arg(long, short = 'p', env = "NLT_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API root URL (overrides profile)
    #[arg(long, env = "NLT_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Account email (overrides profile)
    #[arg(long, env = "NLT_EMAIL", global = true)]
    pub email: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "NLT_OUTPUT",
        default_value = "json",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "NLT_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and report the issued token
    Login(LoginArgs),

    /// Provision and manage devices
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Manage message forwarding connections
    #[command(alias = "conn")]
    Connections(ConnectionsArgs),

    /// Browse device message history
    #[command(alias = "msg")]
    Messages(MessagesArgs),

    /// List account tags
    Tags(TagsArgs),

    /// Queue downlinks
    Downlink(DownlinkArgs),
}

// ── Login ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Print the bearer token (for scripting)
    #[arg(long)]
    pub show_token: bool,
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List devices (first 100)
    #[command(alias = "ls")]
    List,

    /// Show a single device
    Get {
        /// Device identifier
        id: String,
    },

    /// Provision a device from a JSON file
    Create {
        /// JSON file holding the creation request
        #[arg(long, short = 'f')]
        file: PathBuf,
    },

    /// Replace a device's settings from a JSON file
    Update {
        /// JSON file holding the full device (dev_eui selects the target)
        #[arg(long, short = 'f')]
        file: PathBuf,
    },

    /// Activate a device
    Activate {
        /// Device identifier
        id: String,
    },

    /// Deactivate a device
    Deactivate {
        /// Device identifier
        id: String,
    },

    /// Delete a device
    #[command(alias = "rm")]
    Delete {
        /// Device identifier
        id: String,
    },
}

// ── Connections ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConnectionsArgs {
    #[command(subcommand)]
    pub command: ConnectionsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConnectionsCommand {
    /// List connections
    #[command(alias = "ls")]
    List,

    /// Create a connection from a JSON file
    Create {
        /// JSON file holding `connections` and `filters`
        #[arg(long, short = 'f')]
        file: PathBuf,
    },

    /// Delete a connection
    #[command(alias = "rm")]
    Delete {
        /// Connection ID
        id: i64,
    },
}

// ── Messages ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct MessagesArgs {
    #[command(subcommand)]
    pub command: MessagesCommand,
}

#[derive(Debug, Subcommand)]
pub enum MessagesCommand {
    /// List messages of one device within a time window
    #[command(alias = "ls")]
    List {
        /// Device EUI
        dev_eui: String,

        /// Message type
        #[arg(long = "type", short = 't', default_value = "uplink")]
        message_type: String,

        /// Window start, "YYYY-MM-DD HH:MM" or "YYYY-MM-DD" (default: 24h ago)
        #[arg(long, value_parser = parse_datetime)]
        from: Option<NaiveDateTime>,

        /// Window end, "YYYY-MM-DD HH:MM" or "YYYY-MM-DD" (default: now)
        #[arg(long, value_parser = parse_datetime)]
        to: Option<NaiveDateTime>,
    },
}

// ── Tags ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TagsArgs {
    #[command(subcommand)]
    pub command: TagsCommand,
}

#[derive(Debug, Subcommand)]
pub enum TagsCommand {
    /// List tags
    #[command(alias = "ls")]
    List,
}

// ── Downlink ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DownlinkArgs {
    #[command(subcommand)]
    pub command: DownlinkCommand,
}

#[derive(Debug, Subcommand)]
pub enum DownlinkCommand {
    /// Queue a downlink for a device
    Send {
        /// Device EUI
        dev_eui: String,

        /// Hex-encoded payload
        #[arg(long)]
        payload: String,

        /// LoRaWAN FPort
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=223))]
        port: u8,

        /// Request a confirmed downlink
        #[arg(long)]
        confirmed: bool,
    },
}

// ── Value parsers ────────────────────────────────────────────────────

fn parse_datetime(s: &str) -> Result<NaiveDateTime, String> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M") {
        return Ok(dt);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| format!("expected \"YYYY-MM-DD HH:MM\" or \"YYYY-MM-DD\", got '{s}'"))
}
