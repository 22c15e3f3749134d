//! Clap derive structures for the `ftthmap` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// ftthmap -- explore FTTH availability data from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "ftthmap",
    version,
    about = "Explore FTTH availability data from the command line",
    long_about = "Aggregate published FTTH availability records into one entry per\n\
        geocoded address, filter them by availability, provider count, street,\n\
        and provider, and export the result as GeoJSON for any web map.",
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
    /// Data file URL or path (overrides the dataset profile)
    #[arg(long, short = 'd', env = "FTTHMAP_DATA", global = true)]
    pub data: Option<String>,

    /// Dataset profile to use
    #[arg(long, short = 'p', env = "FTTHMAP_DATASET", global = true)]
    pub dataset: Option<String>,

    /// Output format [default: from config, else table]
    #[arg(long, short = 'o', env = "FTTHMAP_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

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

    /// Load timeout in seconds [default: none]
    #[arg(long, env = "FTTHMAP_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show address counts by availability and provider count
    #[command(alias = "sum")]
    Summary,

    /// List the addresses that pass the filters
    #[command(alias = "ls")]
    Addresses(AddressesArgs),

    /// List distinct street names
    Streets(StreetsArgs),

    /// List distinct providers
    Providers,

    /// Export the filtered addresses as GeoJSON
    Export(ExportArgs),

    /// Manage configuration and dataset profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Filter Arguments ──────────────────────────────────────────

/// The four filter dimensions. Everything is shown unless hidden.
#[derive(Debug, Default, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct FilterArgs {
    /// Hide addresses where FTTH is available
    #[arg(long)]
    pub hide_available: bool,

    /// Hide addresses where FTTH is unavailable
    #[arg(long)]
    pub hide_unavailable: bool,

    /// Hide addresses served by more than one provider
    #[arg(long)]
    pub hide_multi: bool,

    /// Hide addresses served by a single provider
    #[arg(long)]
    pub hide_single: bool,

    /// Only addresses on this street (exact match)
    #[arg(long, short = 's')]
    pub street: Option<String>,

    /// Only addresses served by this provider (exact match)
    #[arg(long, short = 'P')]
    pub provider: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ADDRESSES / STREETS / EXPORT
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AddressesArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Show at most this many rows
    #[arg(long, short = 'l')]
    pub limit: Option<usize>,
}

#[derive(Debug, Args)]
pub struct StreetsArgs {
    /// Case-insensitive substring to match
    #[arg(long, short = 'S')]
    pub search: Option<String>,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Write to this file instead of stdout
    #[arg(long, short = 'O')]
    pub out: Option<PathBuf>,

    /// Single-line JSON
    #[arg(long)]
    pub compact: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create the config file with a first dataset profile
    Init {
        /// Profile name
        #[arg(long, default_value = "default")]
        name: String,

        /// Data file URL or path (prompted when omitted)
        #[arg(long)]
        source: Option<String>,

        /// Base URL for relative sources
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// Add or replace a dataset profile
    AddDataset {
        /// Profile name
        name: String,

        /// Data file URL or path
        source: String,

        /// Base URL for relative sources
        #[arg(long)]
        base_url: Option<String>,

        /// Free-form description
        #[arg(long)]
        description: Option<String>,

        /// Load timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Also make this the default dataset
        #[arg(long)]
        default: bool,
    },

    /// Set the default dataset
    Use {
        /// Dataset profile name
        name: String,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
