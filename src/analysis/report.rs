//! Full analysis report schema.
//!
//! This is the structure written to disk by the `analyze` command.
//! Schema is versioned to allow future evolution.

use super::bottleneck::{find_bottlenecks, Bottleneck};
use super::conformance::{check_conformance, conformance_by_group, ConformanceSummary, GroupConformance};
use super::flow::{build_process_flow, ProcessFlow};
use super::metrics::{
    calculate_activity_durations, calculate_lead_time_by_company, calculate_performance_metrics,
    ActivityDuration, CompanyLeadTime, PerformanceMetrics,
};
use super::root_cause::{analyze_root_causes, RootCauseAnalysis, RootCauseTarget};
use crate::parser::{CaseAttribute, EventLogEntry, Field};
use crate::utils::config::{AnalysisConfig, SCHEMA_VERSION};
use log::info;
use serde::{Deserialize, Serialize};

/// Dimensions scanned for root causes in a full report
pub const ROOT_CAUSE_DIMENSIONS: [Field; 5] = [
    Field::Company,
    Field::Region,
    Field::MaterialGroup,
    Field::PaymentTerm,
    Field::Variant,
];

/// Top-level report structure written to JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Where the tables were loaded from
    pub source: String,

    pub event_count: usize,
    pub case_count: usize,

    pub performance: PerformanceMetrics,
    pub lead_time_by_company: Vec<CompanyLeadTime>,
    pub process_flow: ProcessFlow,
    pub bottlenecks: Vec<Bottleneck>,
    pub activity_durations: Vec<ActivityDuration>,
    pub conformance: ConformanceSummary,
    pub conformance_by_company: Vec<GroupConformance>,
    pub conformance_by_material_group: Vec<GroupConformance>,

    /// Drivers of late delivery
    pub root_causes: RootCauseAnalysis,

    /// Timestamp when report was generated
    pub generated_at: String,
}

/// Run every analysis over the given rows
///
/// **Public** - works on any (possibly filtered) view of the tables
pub fn build_report(
    source: impl Into<String>,
    events: &[EventLogEntry],
    cases: &[CaseAttribute],
    config: &AnalysisConfig,
) -> AnalysisReport {
    info!(
        "Building report over {} events and {} cases",
        events.len(),
        cases.len()
    );

    AnalysisReport {
        version: SCHEMA_VERSION.to_string(),
        source: source.into(),
        event_count: events.len(),
        case_count: cases.len(),
        performance: calculate_performance_metrics(cases),
        lead_time_by_company: calculate_lead_time_by_company(cases),
        process_flow: build_process_flow(events, &config.flow),
        bottlenecks: find_bottlenecks(events, &config.bottleneck),
        activity_durations: calculate_activity_durations(events),
        conformance: check_conformance(cases, &config.conformance),
        conformance_by_company: conformance_by_group(cases, Field::Company, &config.conformance),
        conformance_by_material_group: conformance_by_group(
            cases,
            Field::MaterialGroup,
            &config.conformance,
        ),
        root_causes: analyze_root_causes(
            cases,
            &RootCauseTarget::OnTimeDelivery(false),
            &ROOT_CAUSE_DIMENSIONS,
            config,
        ),
        generated_at: chrono::Utc::now().to_rfc3339(),
    }
}
