//! Clap derive structures for the `bonfwd` CLI.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// bonfwd -- push Bonjour forwarding rules from a spreadsheet to your SSIDs
#[derive(Debug, Parser)]
#[command(
    name = "bonfwd",
    version,
    about = "Apply Bonjour forwarding rules from a CSV file to wireless SSIDs",
    long_about = "Reads a CSV with the columns\n\n    \
        Network Name, SSID Name, Description, VLAN, Services\n\n\
        resolves each network and SSID by name in the dashboard, merges rows\n\
        that target the same SSID, and replaces that SSID's Bonjour forwarding\n\
        rules. The API key is read from MERAKI_DASHBOARD_API_KEY (a .env file\n\
        in the working directory is honoured) or prompted for."
)]
pub struct Cli {
    /// CSV file with the rules (prompted for when omitted)
    #[arg(long, short = 'f', env = "BONFWD_FILE")]
    pub file: Option<PathBuf>,

    /// Organization id or name
    #[arg(long, env = "BONFWD_ORG")]
    pub org: Option<String>,

    /// Dashboard API base URL (overrides config)
    #[arg(long, env = "BONFWD_BASE_URL")]
    pub base_url: Option<String>,

    /// Request timeout in seconds (overrides config)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Config file to read instead of the default location
    #[arg(long, env = "BONFWD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Show the planned changes without updating anything
    #[arg(long, short = 'n')]
    pub dry_run: bool,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// When to use color output
    #[arg(long, default_value = "auto")]
    pub color: ColorMode,
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
