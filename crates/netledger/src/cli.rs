//! Clap derive structures for the `netledger` CLI.
//!
//! Kept free of workspace crates so `build.rs` can include it for man pages.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// netledger -- audit ledger for UniFi networks
#[derive(Debug, Parser)]
#[command(
    name = "netledger",
    version,
    about = "Keep an audit ledger of your UniFi network",
    long_about = "Periodically snapshots access points, clients, WiFi broadcasts and\n\
        client uplinks from a UniFi Network controller, reconciles them into a\n\
        local SQLite ledger, and records every change in an audit log.",
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
    /// Controller profile to use
    #[arg(long, short = 'p', env = "NETLEDGER_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Controller URL (overrides profile)
    #[arg(long, short = 'c', env = "NETLEDGER_CONTROLLER", global = true)]
    pub controller: Option<String>,

    /// Site name, internal reference, or UUID
    #[arg(long, short = 's', env = "NETLEDGER_SITE", global = true)]
    pub site: Option<String>,

    /// Integration API key
    #[arg(long, env = "NETLEDGER_API_KEY", global = true, hide_env = true)]
    pub api_key: Option<String>,

    /// Ledger database file (overrides profile)
    #[arg(long, short = 'd', env = "NETLEDGER_DATABASE", global = true)]
    pub database: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "NETLEDGER_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "NETLEDGER_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "NETLEDGER_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

/// Entity kinds a reconciliation pass can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    AccessPoints,
    WifiBroadcasts,
    Clients,
    Connections,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run reconciliation passes once
    Sync(SyncArgs),

    /// Reconcile and prune on a timer until interrupted
    Run(RunArgs),

    /// Delete audit entries and traffic samples past the retention period
    Prune,

    /// Show or change the retention period
    Retention(RetentionArgs),

    /// Access points in the ledger
    #[command(alias = "ap")]
    Aps(ApsArgs),

    /// Clients in the ledger
    #[command(alias = "cl")]
    Clients(ClientsArgs),

    /// WiFi broadcasts (SSIDs) in the ledger
    #[command(alias = "w")]
    Wifi(WifiArgs),

    /// Client-to-access-point uplinks
    #[command(alias = "conn")]
    Connections,

    /// Recent audit log entries, newest first
    Logs(LogsArgs),

    /// Traffic samples recorded for an access point
    Samples(SamplesArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Reconciliation ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Only run these passes (repeatable; default: all, in dependency order)
    #[arg(long, short = 'K', value_enum)]
    pub kind: Vec<KindArg>,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Seconds between reconciliation cycles (overrides config)
    #[arg(long)]
    pub fetch_interval: Option<u64>,

    /// Seconds between pruning runs (overrides config)
    #[arg(long)]
    pub prune_interval: Option<u64>,

    /// Also write JSON logs to a daily-rolling file in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct RetentionArgs {
    #[command(subcommand)]
    pub command: RetentionCommand,
}

#[derive(Debug, Subcommand)]
pub enum RetentionCommand {
    /// Print the retention period in days
    Show,

    /// Change the retention period
    Set {
        /// Days of history to keep (at least 1)
        days: u32,
    },
}

// ── Entities ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ApsArgs {
    #[command(subcommand)]
    pub command: ApsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ApsCommand {
    /// List access points
    #[command(alias = "ls")]
    List,

    /// Restart an access point
    Restart {
        /// Access point ID (UUID)
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct ClientsArgs {
    #[command(subcommand)]
    pub command: ClientsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ClientsCommand {
    /// List clients, active first
    #[command(alias = "ls")]
    List {
        /// Only show clients currently connected
        #[arg(long)]
        active: bool,
    },
}

#[derive(Debug, Args)]
pub struct WifiArgs {
    #[command(subcommand)]
    pub command: WifiCommand,
}

#[derive(Debug, Subcommand)]
pub enum WifiCommand {
    /// List WiFi broadcasts
    #[command(alias = "ls")]
    List,

    /// Toggle whether an SSID is broadcast (hidden <-> visible)
    Toggle {
        /// WiFi broadcast ID (UUID)
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct LogsArgs {
    /// Max entries to show
    #[arg(long, short = 'l', default_value = "50")]
    pub limit: u32,
}

#[derive(Debug, Args)]
pub struct SamplesArgs {
    /// Access point ID (UUID)
    pub id: String,

    /// Max samples to show
    #[arg(long, short = 'l', default_value = "50")]
    pub limit: u32,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration
    Show,

    /// Print the config file path
    Path,

    /// Set a value on the active profile
    Set {
        /// Profile key (controller, site, platform, api_key_env, insecure, timeout, ca_cert, database)
        key: String,

        /// Value to set
        value: String,
    },

    /// Make a profile the default
    Use {
        /// Profile name
        name: String,
    },

    /// Store the API key for a profile in the system keyring
    SetKey {
        /// Profile name (defaults to the active profile)
        #[arg(long)]
        profile: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
