//! Aggregation of the event log and case tables into derived metrics.
//!
//! Every analysis is a pure function over row slices:
//! - Dimension values and row filters
//! - Process flow graph (activity nodes, transition edges)
//! - Performance metrics, lead time by company, activity durations
//! - Bottleneck and root-cause scoring
//! - Conformance to the expected variant

pub mod bottleneck;
pub mod conformance;
pub mod dimensions;
pub mod flow;
pub mod metrics;
pub mod report;
pub mod root_cause;
pub mod timeline;

// Re-export main types and functions
pub use bottleneck::{find_bottlenecks, Bottleneck};
pub use conformance::{
    check_conformance, conformance_by_group, ConformanceRating, ConformanceSummary, Deviation,
    GroupConformance,
};
pub use dimensions::{unique_values, unique_values_by_name, FilterArg, Filters};
pub use flow::{build_process_flow, FlowEdge, FlowNode, NodeRole, ProcessFlow};
pub use metrics::{
    calculate_activity_durations, calculate_lead_time_by_company, calculate_performance_metrics,
    ActivityDuration, CompanyLeadTime, PerformanceBand, PerformanceMetrics,
};
pub use report::{build_report, AnalysisReport};
pub use root_cause::{analyze_root_causes, GroupAggregate, RootCauseAnalysis, RootCauseTarget};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::parser::{CaseAttribute, EventLogEntry};
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn t0() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    /// Event `days` after 2024-01-01
    pub fn event(case_id: &str, activity: &str, days: f64) -> EventLogEntry {
        EventLogEntry {
            case_id: case_id.to_string(),
            activity: activity.to_string(),
            timestamp: t0() + Duration::milliseconds((days * 86_400_000.0) as i64),
            company: "Drystone UK Ltd".to_string(),
            region: "Europe".to_string(),
            material_group: "Fasteners".to_string(),
            payment_term: "30 days from date of invoice".to_string(),
            variant: "standard_path".to_string(),
        }
    }

    pub fn case(case_id: &str, company: &str, duration: f64, on_time: bool) -> CaseAttribute {
        CaseAttribute {
            case_id: case_id.to_string(),
            company: company.to_string(),
            region: "Europe".to_string(),
            material_group: "Fasteners".to_string(),
            payment_term: "30 days from date of invoice".to_string(),
            variant: "standard_path".to_string(),
            start_time: t0(),
            end_time: Some(t0() + Duration::milliseconds((duration * 86_400_000.0) as i64)),
            case_duration: duration,
            on_time_delivery: on_time,
        }
    }
}
