use chrono::{Duration, NaiveDate, NaiveDateTime};
use process_miner::analysis::{
    analyze_root_causes, build_process_flow, find_bottlenecks, unique_values, RootCauseTarget,
};
use process_miner::parser::{CaseAttribute, EventLogEntry, Field};
use process_miner::utils::config::{AnalysisConfig, BottleneckConfig, FlowConfig};
use proptest::prelude::*;

const ACTIVITIES: [&str; 6] = [
    "Create Sales Order",
    "Change Net Price",
    "Create Delivery",
    "Create Invoice",
    "Reject Order",
    "Clear Invoice",
];
const COMPANIES: [&str; 4] = ["Drystone UK Ltd", "Fertiplus", "Nordwerk", ""];
const VARIANTS: [&str; 3] = ["standard_path", "price_change_path", "rejected_order"];

fn t0() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

fn event(case_id: &str, activity: &str, minutes: i64, company: &str) -> EventLogEntry {
    EventLogEntry {
        case_id: case_id.to_string(),
        activity: activity.to_string(),
        timestamp: t0() + Duration::minutes(minutes),
        company: company.to_string(),
        region: "Europe".to_string(),
        material_group: "Fasteners".to_string(),
        payment_term: "30 days".to_string(),
        variant: "standard_path".to_string(),
    }
}

/// Cases that each open with "Receive Purchase Order" followed by later steps
fn event_log_strategy() -> impl Strategy<Value = Vec<EventLogEntry>> {
    prop::collection::vec(
        (
            0usize..COMPANIES.len(),
            prop::collection::vec((0usize..ACTIVITIES.len(), 1i64..20_000), 1..8),
        ),
        1..20,
    )
    .prop_map(|cases| {
        let mut events = Vec::new();
        for (case_idx, (company, steps)) in cases.into_iter().enumerate() {
            let case_id = format!("C{}", case_idx);
            let company = COMPANIES[company];
            events.push(event(&case_id, "Receive Purchase Order", 0, company));
            let mut minutes = 0;
            for (activity, gap) in steps {
                minutes += gap;
                events.push(event(&case_id, ACTIVITIES[activity], minutes, company));
            }
        }
        events
    })
}

fn case_table_strategy() -> impl Strategy<Value = Vec<CaseAttribute>> {
    prop::collection::vec(
        (
            0usize..COMPANIES.len(),
            0usize..VARIANTS.len(),
            any::<bool>(),
            0.0f64..60.0,
        ),
        0..80,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (company, variant, on_time, duration))| CaseAttribute {
                case_id: format!("C{}", i),
                company: COMPANIES[company].to_string(),
                region: "Europe".to_string(),
                material_group: "Fasteners".to_string(),
                payment_term: "30 days".to_string(),
                variant: VARIANTS[variant].to_string(),
                start_time: t0(),
                end_time: Some(t0()),
                case_duration: duration,
                on_time_delivery: on_time,
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_unique_values_sorted_distinct_non_empty(events in event_log_strategy()) {
        let values = unique_values(&events, &[], Field::Company);

        prop_assert!(values.windows(2).all(|pair| pair[0] < pair[1]));
        prop_assert!(values.iter().all(|v| !v.is_empty()));
        for event in events.iter().filter(|e| !e.company.is_empty()) {
            prop_assert!(values.contains(&event.company));
        }
    }

    #[test]
    fn prop_start_outflow_equals_case_count(events in event_log_strategy()) {
        let flow = build_process_flow(&events, &FlowConfig::default());
        let cases = unique_values(&events, &[], Field::CaseId).len();

        prop_assert_eq!(flow.outgoing_count("Receive Purchase Order"), cases);
    }

    #[test]
    fn prop_bottlenecks_bounded_and_split(events in event_log_strategy()) {
        let bottlenecks = find_bottlenecks(&events, &BottleneckConfig::default());

        prop_assert!(bottlenecks.len() <= 5);
        for pair in bottlenecks.windows(2) {
            prop_assert!(pair[0].impact_score >= pair[1].impact_score);
        }
        for b in &bottlenecks {
            prop_assert!(b.impact_score <= 100);
            // three independent one-decimal roundings
            prop_assert!((b.wait_time + b.processing_time - b.avg_duration).abs() <= 0.15 + 1e-9);
        }
    }

    #[test]
    fn prop_root_causes_need_support(cases in case_table_strategy(), late in any::<bool>()) {
        let config = AnalysisConfig::default();
        let analysis = analyze_root_causes(
            &cases,
            &RootCauseTarget::OnTimeDelivery(!late),
            &[Field::Company, Field::Variant],
            &config,
        );

        prop_assert!(analysis.causes.iter().all(|c| c.count > config.root_cause.min_support));
        prop_assert!(analysis.causes.iter().all(|c| !c.value.is_empty()));
        prop_assert!(analysis.causes.len() <= 2 * config.root_cause.top_n);
        for pair in analysis.causes.windows(2) {
            prop_assert!(pair[0].impact.abs() >= pair[1].impact.abs());
        }
    }
}
