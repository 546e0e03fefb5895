use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::presentation::cli::formatters::table_fmt::SortKey;

/// itmon — single-host system monitor
///
/// Collects host metrics, detects anomalies, explains their likely
/// cause and suggests remediation steps.
#[derive(Parser, Debug)]
#[command(name = "itmon")]
#[command(version, about, long_about)]
pub struct Cli {
    /// Subcommand to execute (default: status)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to custom config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show current system status
    #[command(alias = "s")]
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run a one-shot anomaly scan
    #[command(alias = "sc")]
    Scan {
        /// Use the extended classifier (30 anomaly kinds)
        #[arg(short, long)]
        extended: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Surveillance continue, un rapport complet par passe
    #[command(alias = "w")]
    Watch {
        /// Intervalle en secondes (défaut : config)
        #[arg(short, long)]
        interval: Option<u64>,

        /// Use the extended classifier
        #[arg(short, long)]
        extended: bool,
    },

    /// Surveillance en arrière-plan avec commandes interactives
    #[command(alias = "m")]
    Monitor {
        /// Intervalle en secondes (défaut : config)
        #[arg(short, long)]
        interval: Option<u64>,

        /// Use the extended classifier
        #[arg(short, long)]
        extended: bool,
    },

    /// Export a report to a file
    #[command(alias = "x")]
    Export {
        /// json, csv or html
        #[arg(short, long, default_value = "json")]
        format: String,

        /// Target file (default: generated name in the export directory)
        #[arg(short, long)]
        output: Option<String>,

        /// Use the extended classifier
        #[arg(short, long)]
        extended: bool,
    },

    /// List the heaviest processes
    #[command(alias = "t")]
    Top {
        /// Sort key
        #[arg(long, value_enum, default_value_t = SortKey::Cpu)]
        by: SortKey,

        /// Number of rows
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,
    },

    /// Manage configuration
    #[command(alias = "c")]
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum ConfigAction {
    /// Print the effective configuration (default)
    Show,

    /// Restore default thresholds
    Reset,

    /// Update one threshold, e.g. `set-threshold cpu warning 75`
    SetThreshold {
        /// cpu, memory, swap, disk, disk_io, network_errors, ...
        resource: String,

        /// warning, critical, spike or leak
        level: String,

        value: f64,
    },
}
