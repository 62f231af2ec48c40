//! Command-line interface for bmi-tracker.
//!
//! This module provides the CLI structure for the `bmi` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{ConfigCommand, HistoryCommand, OutputFormat, RecordCommand, StatusCommand};

use crate::logging::Verbosity;

/// bmi - Track your body-mass index
///
/// Computes BMI from weight (kg) and height (cm), keeps every result in a
/// local database, and shows a history table with a trend chart.
#[derive(Debug, Parser)]
#[command(name = "bmi")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute a BMI and save it
    Record(RecordCommand),

    /// Show recent BMI records and their trend
    History(HistoryCommand),

    /// Show database status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                2 => Verbosity::Debug,
                _ => Verbosity::Trace,
            }
        }
    }
}
