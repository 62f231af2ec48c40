//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Record command arguments.
#[derive(Debug, Args)]
pub struct RecordCommand {
    /// Weight in kilograms
    #[arg(allow_negative_numbers = true)]
    pub weight: String,

    /// Height in centimeters
    #[arg(allow_negative_numbers = true)]
    pub height: String,

    /// Output the stored record as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// History command arguments.
#[derive(Debug, Args)]
pub struct HistoryCommand {
    /// Maximum number of records to show (defaults to `history.limit`)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Skip the trend chart
    #[arg(long)]
    pub no_chart: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for the history command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Formatted table
    #[default]
    Table,
    /// One `timestamp<TAB>bmi` line per record
    Plain,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Table);
    }

    #[test]
    fn test_record_command_debug() {
        let cmd = RecordCommand {
            weight: "70".to_string(),
            height: "175".to_string(),
            json: false,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("weight"));
        assert!(debug_str.contains("175"));
    }

    #[test]
    fn test_history_command_debug() {
        let cmd = HistoryCommand {
            limit: Some(5),
            format: OutputFormat::Json,
            no_chart: true,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("limit"));
        assert!(debug_str.contains("Json"));
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        assert!(format!("{cmd:?}").contains("Show"));
    }
}
