//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Record or analyze time usage.
///
/// Appends periods of active computer use to a per-timecard log file and
/// reconstructs billable hours from it later.
#[derive(Debug, Parser)]
#[command(name = "timecard", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the timecard log file (overrides config).
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Clock in and record the active window until stopped.
    Start {
        /// Seconds between observation samples (overrides config).
        #[arg(short, long)]
        interval: Option<u64>,

        /// Note to record right after clocking in.
        #[arg(short, long)]
        note: Option<String>,
    },

    /// Clock out: signal the recording process to close the log.
    Stop {
        /// Note to record before clocking out.
        #[arg(short, long)]
        note: Option<String>,
    },

    /// Append a free-form note to the log.
    Note {
        /// The note text.
        text: String,
    },

    /// Record a manual correction to total worked time.
    Adjust {
        /// Correction in seconds; negative values subtract time.
        #[arg(allow_negative_numbers = true)]
        seconds: i64,
    },

    /// Mark everything up to now as submitted for payment.
    Submit,

    /// Summarize worked and billable hours.
    #[command(alias = "list")]
    Summary {
        /// Time range, e.g. `1w-now`, `lastpaid`, `2024-01-01-2024-02-01`.
        range: Option<String>,

        /// Output JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Attribute recorded time to commands and window titles.
    Analyze {
        /// Output JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Show whether a recording session is active.
    Status,
}
