//! `bmi` - CLI for bmi-tracker
//!
//! This binary is the presentation layer: it turns command-line arguments
//! into calls on the engine and store, and prints what comes back.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::fmt::Display;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use bmi_tracker::cli::{
    Cli, Command, ConfigCommand, HistoryCommand, OutputFormat, RecordCommand, StatusCommand,
};
use bmi_tracker::report::{self, TrendChart, INVALID_INPUT_MESSAGE};
use bmi_tracker::{init_logging, BmiEngine, Config, Result, Storage};

/// Exit status for rejected weight or height input.
const EXIT_INVALID_INPUT: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if err.is_invalid_input() => {
            eprintln!("{INVALID_INPUT_MESSAGE}");
            ExitCode::from(EXIT_INVALID_INPUT)
        }
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    // Validation must report a broken file rather than fail while loading it.
    if let Command::Config(ConfigCommand::Validate { file }) = cli.command {
        handle_validate(file.or(cli.config));
        return Ok(());
    }

    let config = Config::load_from(cli.config.clone())?;

    match cli.command {
        Command::Record(cmd) => handle_record(&config, &cmd),
        Command::History(cmd) => handle_history(&config, &cmd),
        Command::Status(cmd) => handle_status(&config, &cmd),
        Command::Config(cmd) => handle_config(&config, &cmd),
    }
}

/// Open the configured store and bring it to the ready state.
///
/// The returned handle releases the connection when dropped, so early
/// returns through `?` never leak it.
fn open_storage(config: &Config) -> Result<Storage> {
    let mut storage = Storage::open(config.database_path())?;
    storage.initialize()?;
    Ok(storage)
}

fn handle_record(config: &Config, cmd: &RecordCommand) -> Result<()> {
    let storage = open_storage(config)?;
    let record = BmiEngine::new(&storage).record_observation(&cmd.weight, &cmd.height)?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        println!("Your BMI: {:.2}", record.bmi);
    }

    storage.close()
}

fn handle_history(config: &Config, cmd: &HistoryCommand) -> Result<()> {
    let limit = cmd.limit.unwrap_or(config.history.limit);

    let storage = open_storage(config)?;
    let records = BmiEngine::new(&storage).recent_records(limit)?;
    storage.close()?;

    match cmd.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&records)?);
            return Ok(());
        }
        OutputFormat::Plain => print!("{}", report::render_plain(&records)),
        OutputFormat::Table => print!("{}", report::render_table(&records)),
    }

    if !cmd.no_chart {
        println!();
        let chart = TrendChart::from_records(&records);
        print!("{}", chart.render(config.chart.width, config.chart.height));
    }
    Ok(())
}

fn handle_status(config: &Config, cmd: &StatusCommand) -> Result<()> {
    let storage = open_storage(config)?;
    let stats = storage.stats()?;
    let path = storage.path().to_path_buf();
    storage.close()?;

    if cmd.json {
        let status = serde_json::json!({
            "database_path": path,
            "total_records": stats.total_records,
            "oldest_record": stats.oldest_record,
            "newest_record": stats.newest_record,
            "latest_bmi": stats.latest_bmi,
            "db_size_bytes": stats.db_size_bytes,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("bmi status");
        println!("----------");
        println!("Database:      {}", path.display());
        println!("Records:       {}", stats.total_records);
        println!("Oldest:        {}", or_dash(stats.oldest_record));
        println!("Newest:        {}", or_dash(stats.newest_record));
        println!(
            "Latest BMI:    {}",
            or_dash(stats.latest_bmi.map(|bmi| format!("{bmi:.2}")))
        );
        println!("Size (bytes):  {}", stats.db_size_bytes);
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: &ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if *json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:  {}", config.database_path().display());
                println!();
                println!("[History]");
                println!("  Limit:          {}", config.history.limit);
                println!();
                println!("[Chart]");
                println!("  Width:          {}", config.chart.width);
                println!("  Height:         {}", config.chart.height);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => handle_validate(file.clone()),
    }
    Ok(())
}

fn handle_validate(file: Option<PathBuf>) {
    let path = file.unwrap_or_else(Config::default_config_path);
    println!("Validating configuration: {}", path.display());
    match Config::load_from(Some(path)) {
        Ok(_) => println!("Configuration is valid."),
        Err(e) => println!("Configuration error: {e}"),
    }
}

fn or_dash<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}
