use super::analyze::open_store;
use super::models::AnalyzeArgs;
use crate::output::read_report;
use crate::utils::config::{AnalysisConfig, SCHEMA_VERSION};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Print the distinct values of one column
pub fn print_values(args: &AnalyzeArgs, field: &str) -> Result<()> {
    let store = open_store(args, AnalysisConfig::default())?;
    store.load().context("Failed to load source tables")?;

    let values = store.unique_values(field)?;
    if values.is_empty() {
        println!("No values for field {:?}", field);
    }
    for value in values {
        println!("{}", value);
    }
    Ok(())
}

/// Validate a report JSON file
pub fn validate_report_file(file_path: PathBuf) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(&file_path)?;

    println!("✓ Valid report JSON");
    println!("  Version: {}", report.version);
    println!("  Source: {}", report.source);
    println!("  Events: {}", report.event_count);
    println!("  Cases: {}", report.case_count);
    println!("  Bottlenecks: {}", report.bottlenecks.len());
    println!("  Root causes: {}", report.root_causes.causes.len());

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Process Miner Report Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string               - Schema version (e.g., '1.0.0')");
        println!("  source: string                - Table directory or URL");
        println!("  event_count / case_count      - Rows analyzed");
        println!("  performance: object           - Lead time, on-time rate, case split");
        println!("  lead_time_by_company: array   - Mean lead time, red/green band");
        println!("  process_flow: object          - Activity nodes and transition edges");
        println!("  bottlenecks: array            - Top activities by impact score");
        println!("  activity_durations: array     - Gap statistics per activity");
        println!("  conformance: object           - Conformance rate and deviations");
        println!("  conformance_by_company: array");
        println!("  conformance_by_material_group: array");
        println!("  root_causes: object           - Late-delivery impact by dimension");
        println!("  generated_at: string          - ISO 8601 timestamp");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Process Miner v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Event-log aggregation for order-to-cash process mining.");
}
