use crate::analysis::Filters;
use std::path::PathBuf;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Directory or base URL holding both tables
    pub data: String,

    /// Event log file name within `data`
    pub event_log: String,

    /// Case attributes file name within `data`
    pub case_attributes: String,

    /// Optional TOML file overriding analysis heuristics
    pub config: Option<PathBuf>,

    /// Output path for the JSON report
    pub output_json: PathBuf,

    /// Restrict every analysis to matching rows
    pub filters: Filters,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            data: "data".to_string(),
            event_log: crate::utils::config::DEFAULT_EVENT_LOG.to_string(),
            case_attributes: crate::utils::config::DEFAULT_CASE_ATTRIBUTES.to_string(),
            config: None,
            output_json: PathBuf::from("report.json"),
            filters: Filters::new(),
            print_summary: false,
        }
    }
}
