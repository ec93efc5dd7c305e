//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Loads the analysis config
//! 2. Fetches and parses both tables
//! 3. Runs every analysis over the (filtered) rows
//! 4. Writes the JSON report

use super::models::AnalyzeArgs;
use crate::output::{render_summary, write_report};
use crate::source::{open_source, DataSource};
use crate::store::{DataStore, SourcePaths};
use crate::utils::config::{load_analysis_config, AnalysisConfig};
use anyhow::{bail, Context, Result};
use log::{debug, info};
use std::time::Instant;

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Invalid config file
/// * Unreachable or malformed tables
/// * File write errors
pub fn execute_analyze(args: AnalyzeArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Starting analysis of: {}", args.data);

    // Step 1: Config
    info!("Step 1/4: Loading analysis config...");
    let config = match &args.config {
        Some(path) => load_analysis_config(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };

    // Step 2: Load tables
    info!("Step 2/4: Loading tables...");
    let store = open_store(&args, config)?;
    store.load().context("Failed to load source tables")?;

    // Step 3: Analyze
    info!("Step 3/4: Running analyses...");
    if !args.filters.is_empty() {
        debug!("Applying filters: {:?}", args.filters.constraints());
    }
    let report = store.report(&args.filters)?;

    debug!("Top 3 bottlenecks:");
    for (i, b) in report.bottlenecks.iter().take(3).enumerate() {
        debug!(
            "  {}. {} impact {} ({:.1} days)",
            i + 1,
            b.activity,
            b.impact_score,
            b.avg_duration
        );
    }

    // Step 4: Write outputs
    info!("Step 4/4: Writing report...");
    write_report(&report, &args.output_json).context("Failed to write report JSON")?;
    info!("✓ Report written to: {}", args.output_json.display());

    if args.print_summary {
        println!("{}", render_summary(&report));
    }

    info!(
        "Analysis completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Build a store over the args' data location
pub fn open_store(args: &AnalyzeArgs, config: AnalysisConfig) -> Result<DataStore<Box<dyn DataSource>>> {
    let source = open_source(&args.data)
        .with_context(|| format!("Failed to open data source {}", args.data))?;
    let paths = SourcePaths {
        event_log: args.event_log.clone(),
        case_attributes: args.case_attributes.clone(),
    };
    Ok(DataStore::with_paths(source, paths, config))
}

/// Validate analyze arguments
///
/// **Public** - called before execution
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if args.data.trim().is_empty() {
        bail!("Data location cannot be empty");
    }
    if args.event_log.trim().is_empty() || args.case_attributes.trim().is_empty() {
        bail!("Table file names cannot be empty");
    }
    if args.event_log == args.case_attributes {
        bail!("Event log and case attributes must be different files");
    }
    if let Some(ext) = args.output_json.extension() {
        if ext != "json" {
            log::warn!("Output file doesn't have .json extension: {}", args.output_json.display());
        }
    }
    Ok(())
}
