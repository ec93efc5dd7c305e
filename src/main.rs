//! Process Miner CLI
//!
//! Loads an order-to-cash event log and case attribute table and
//! writes process-mining metrics as a JSON report.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use process_miner::analysis::{FilterArg, Filters};
use process_miner::commands::{
    display_schema, display_version, execute_analyze, print_values, validate_args,
    validate_report_file, AnalyzeArgs,
};
use process_miner::utils::config::{DEFAULT_CASE_ATTRIBUTES, DEFAULT_EVENT_LOG};

/// Process Miner - event-log aggregation for process mining
#[derive(Parser, Debug)]
#[command(name = "process-miner")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Where to find the two tables
#[derive(clap::Args, Debug)]
struct DataArgs {
    /// Directory or base URL holding the tables
    #[arg(short, long, env = "PROCESS_MINER_DATA", default_value = "data")]
    data: String,

    /// Event log file name
    #[arg(long, default_value = DEFAULT_EVENT_LOG)]
    event_log: String,

    /// Case attributes file name
    #[arg(long, default_value = DEFAULT_CASE_ATTRIBUTES)]
    case_attributes: String,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze the tables and write a report
    Analyze {
        #[command(flatten)]
        data: DataArgs,

        /// TOML file overriding analysis heuristics
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output path for JSON report
        #[arg(short, long, default_value = "report.json")]
        output: PathBuf,

        /// Only analyze rows where field=value (repeatable)
        #[arg(short, long = "filter")]
        filters: Vec<FilterArg>,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// List the distinct values of a field
    Values {
        #[command(flatten)]
        data: DataArgs,

        /// Column name, e.g. company or activity
        #[arg(long)]
        field: String,
    },

    /// Validate a report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Analyze {
            data,
            config,
            output,
            filters,
            summary,
        } => {
            let args = AnalyzeArgs {
                data: data.data,
                event_log: data.event_log,
                case_attributes: data.case_attributes,
                config,
                output_json: output,
                filters: filters.into_iter().collect::<Filters>(),
                print_summary: summary,
            };

            // Validate args first
            validate_args(&args)?;

            execute_analyze(args)?;
        }

        Commands::Values { data, field } => {
            let args = AnalyzeArgs {
                data: data.data,
                event_log: data.event_log,
                case_attributes: data.case_attributes,
                ..Default::default()
            };
            validate_args(&args)?;
            print_values(&args, &field)?;
        }

        Commands::Validate { file } => {
            validate_report_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
