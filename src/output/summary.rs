//! Terminal summary of an analysis report.

use crate::analysis::{AnalysisReport, PerformanceBand};
use colored::*;

/// Render a human-readable summary of a report for the terminal
pub fn render_summary(report: &AnalysisReport) -> String {
    let mut out = String::new();

    out.push_str(&render_header(report));
    out.push_str(&render_performance(report));
    out.push_str(&render_lead_times(report));
    out.push_str(&render_bottlenecks(report));
    out.push_str(&render_conformance(report));
    out.push_str(&render_root_causes(report));

    out
}

fn render_header(report: &AnalysisReport) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str(&"Process Mining Summary".bold().to_string());
    out.push_str("\n---------------------------------------------------\n");
    out.push_str(&format!("Source: {}\n", report.source));
    out.push_str(&format!(
        "Events: {} | Cases: {} | Activities: {}\n",
        report.event_count,
        report.case_count,
        report.process_flow.nodes.len()
    ));
    out.push_str("---------------------------------------------------\n");
    out
}

fn render_performance(report: &AnalysisReport) -> String {
    let p = &report.performance;
    format!(
        "\nLead time: avg {:.1} days, median {:.1} days\nOn-time delivery: {:.1}%\nCompleted: {} | Active: {}\n",
        p.avg_lead_time, p.median_lead_time, p.on_time_delivery_rate, p.completed_cases, p.active_cases
    )
}

fn render_lead_times(report: &AnalysisReport) -> String {
    let mut out = String::new();
    if report.lead_time_by_company.is_empty() {
        return out;
    }

    out.push_str("\nLead time by company:\n");
    for entry in &report.lead_time_by_company {
        let value = format!("{:>6.1} days", entry.avg_lead_time);
        let value = match entry.band {
            PerformanceBand::Red => value.red(),
            PerformanceBand::Green => value.green(),
        };
        out.push_str(&format!("  {} {}\n", value, entry.company));
    }
    out
}

fn render_bottlenecks(report: &AnalysisReport) -> String {
    let mut out = String::new();
    if report.bottlenecks.is_empty() {
        return out;
    }

    out.push_str("\nTop bottlenecks:\n");
    for (i, b) in report.bottlenecks.iter().enumerate() {
        out.push_str(&format!(
            "  {}. {} (impact {}, avg {:.1} days, {} cases)\n",
            i + 1,
            b.activity,
            b.impact_score,
            b.avg_duration,
            b.case_count
        ));
    }
    out
}

fn render_conformance(report: &AnalysisReport) -> String {
    let c = &report.conformance;
    let mut out = format!(
        "\nConformance: {:.1}% ({} of {} cases)\n",
        c.conformance_rate, c.conformant_cases, c.total_cases
    );
    for deviation in c.deviations.iter().take(5) {
        out.push_str(&format!(
            "  - {}: {} cases ({:.1}%)\n",
            deviation.label, deviation.count, deviation.percentage
        ));
    }
    out
}

fn render_root_causes(report: &AnalysisReport) -> String {
    let rc = &report.root_causes;
    let mut out = String::new();
    if rc.causes.is_empty() {
        return out;
    }

    let target = rc
        .target
        .as_ref()
        .map(|t| t.to_string())
        .unwrap_or_default();
    out.push_str(&format!(
        "\nRoot causes for {} (base rate {:.1}%):\n",
        target, rc.base_rate
    ));
    for cause in &rc.causes {
        let impact = format!("{:+.1} pp", cause.impact);
        let impact = if cause.impact > 0.0 { impact.red() } else { impact.green() };
        out.push_str(&format!(
            "  {} {} = {} ({} cases)\n",
            impact, cause.dimension, cause.value, cause.count
        ));
    }
    out
}
