//! Calculate performance metrics from case attributes and event gaps.
//!
//! Day and percentage values are rounded half-up to one decimal place,
//! so repeated runs over the same tables give identical output.

use super::timeline::{activity_gaps, case_timelines};
use crate::parser::{CaseAttribute, EventLogEntry};
use crate::utils::stats::{mean, median, percentage, round1};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Headline process KPIs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Mean case duration in days
    pub avg_lead_time: f64,

    /// Median case duration in days
    pub median_lead_time: f64,

    /// Share of cases delivered on time, in percent
    pub on_time_delivery_rate: f64,

    pub case_count: usize,
    pub completed_cases: usize,
    pub active_cases: usize,
}

/// Relative standing of a company's lead time within the dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceBand {
    /// Slower half
    Red,
    /// Faster half
    Green,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyLeadTime {
    pub company: String,
    pub avg_lead_time: f64,
    pub case_count: usize,
    pub band: PerformanceBand,
}

/// Gap statistics for one activity, in days
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityDuration {
    pub activity: String,
    pub avg_duration: f64,
    pub median_duration: f64,
    pub min_duration: f64,
    pub max_duration: f64,

    /// Transitions leaving this activity
    pub case_count: usize,
}

/// Calculate headline KPIs over all cases
///
/// **Public** - main entry point for KPI calculation
pub fn calculate_performance_metrics(cases: &[CaseAttribute]) -> PerformanceMetrics {
    if cases.is_empty() {
        return PerformanceMetrics::default();
    }

    let durations: Vec<f64> = cases.iter().map(|c| c.case_duration).collect();
    let on_time = cases.iter().filter(|c| c.on_time_delivery).count();
    let completed = cases.iter().filter(|c| c.is_completed()).count();

    debug!(
        "Calculating performance metrics over {} cases ({} completed)",
        cases.len(),
        completed
    );

    PerformanceMetrics {
        avg_lead_time: round1(mean(&durations)),
        median_lead_time: round1(median(&durations)),
        on_time_delivery_rate: round1(percentage(on_time, cases.len())),
        case_count: cases.len(),
        completed_cases: completed,
        active_cases: cases.len() - completed,
    }
}

/// Mean lead time per company, slowest first
///
/// The first `floor(n / 2)` companies are banded red and the rest green,
/// a split relative to this dataset rather than a fixed threshold.
pub fn calculate_lead_time_by_company(cases: &[CaseAttribute]) -> Vec<CompanyLeadTime> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<f64>)> = Vec::new();

    for case in cases {
        let idx = *index.entry(case.company.as_str()).or_insert_with(|| {
            groups.push((case.company.as_str(), Vec::new()));
            groups.len() - 1
        });
        groups[idx].1.push(case.case_duration);
    }

    let mut result: Vec<CompanyLeadTime> = groups
        .into_iter()
        .map(|(company, durations)| CompanyLeadTime {
            company: company.to_string(),
            avg_lead_time: round1(mean(&durations)),
            case_count: durations.len(),
            band: PerformanceBand::Green,
        })
        .collect();

    result.sort_by(|a, b| b.avg_lead_time.total_cmp(&a.avg_lead_time));

    let midpoint = result.len() / 2;
    for entry in result.iter_mut().take(midpoint) {
        entry.band = PerformanceBand::Red;
    }

    result
}

/// Gap statistics per activity, most frequent first
pub fn calculate_activity_durations(events: &[EventLogEntry]) -> Vec<ActivityDuration> {
    let timelines = case_timelines(events);

    let mut result: Vec<ActivityDuration> = activity_gaps(&timelines)
        .into_iter()
        .map(|entry| {
            let min = entry.gaps.iter().copied().fold(f64::INFINITY, f64::min);
            let max = entry.gaps.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            ActivityDuration {
                activity: entry.activity.to_string(),
                avg_duration: round1(mean(&entry.gaps)),
                median_duration: round1(median(&entry.gaps)),
                min_duration: round1(min),
                max_duration: round1(max),
                case_count: entry.gaps.len(),
            }
        })
        .collect();

    result.sort_by(|a, b| b.case_count.cmp(&a.case_count));
    result
}
