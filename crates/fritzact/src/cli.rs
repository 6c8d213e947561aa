//! Clap derive structures for the `fritzact` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. Kept
//! free of workspace types so `build.rs` can include it for man pages.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// fritzact -- remote control for FRITZ!Box smart-home actuators
#[derive(Debug, Parser)]
#[command(
    name = "fritzact",
    version,
    about = "Switch FRITZ!DECT outlets and thermostats from the command line",
    long_about = "Lists the smart-home devices known to a FRITZ!Box and sends switch or\n\
        thermostat commands through its AHA HTTP interface.\n\n\
        Without a subcommand, acts on the preferred device or asks which one to use.",
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Option<Command>,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Gateway host name or address (overrides config)
    #[arg(long, short = 'g', global = true)]
    pub gateway: Option<String>,

    /// Gateway user (overrides config)
    #[arg(long, short = 'u', global = true)]
    pub username: Option<String>,

    /// Use HTTPS
    #[arg(long, global = true)]
    pub tls: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides config)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "FRITZACT_OUTPUT",
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
    /// Plain text, one AIN per line (scripting)
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

/// Device type filter for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TypeFilter {
    Switch,
    Thermostat,
    Group,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List smart-home devices
    #[command(alias = "ls")]
    List {
        /// Only show devices of this type
        #[arg(long = "type", short = 't', value_name = "TYPE")]
        device_type: Option<TypeFilter>,
    },

    /// Switch a device on
    On(TargetArgs),

    /// Switch a device off
    Off(TargetArgs),

    /// Toggle a device
    Toggle(TargetArgs),

    /// Change a thermostat's set-point
    Temp {
        /// Actor identification number
        ain: String,

        /// Target temperature (8-28 °C); asks interactively when omitted
        #[arg(long, short = 'c', value_name = "°C", value_parser = parse_celsius)]
        celsius: Option<f64>,
    },

    /// Choose the device the bare `fritzact` call acts on
    Prefer,

    /// Choose devices that must never receive commands
    ReadOnly,

    /// Run one action encoded as a query string
    #[command(after_help = "Example: fritzact invoke 'action=toggle&ain=08761%200000434'")]
    Invoke {
        /// `action=<name>&ain=<id>&type=<type>&param=<value>&label=<text>`
        query: String,
    },

    /// End the cached gateway session
    Logout,

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct TargetArgs {
    /// Actor identification number (e.g. "08761 0000434")
    pub ain: String,
}

/// Any finite number; the gateway range is enforced later by clamping.
fn parse_celsius(s: &str) -> Result<f64, String> {
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("'{s}' is not a temperature in °C"))
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create the config file with guided setup
    Init,

    /// Display the resolved configuration
    Show,

    /// Store the gateway password in the system keyring
    SetPassword,

    /// Print the config file location
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
