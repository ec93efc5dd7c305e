//! Bottleneck scoring.
//!
//! An activity's impact blends how long cases wait after it with how
//! often it occurs. The wait/processing split is a fixed share of the
//! average gap; the event log carries no such distinction.

use super::timeline::{activity_gaps, case_timelines};
use crate::parser::EventLogEntry;
use crate::utils::config::BottleneckConfig;
use crate::utils::stats::{mean, round0, round1};
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bottleneck {
    pub activity: String,

    /// Mean gap to the next event, in days
    pub avg_duration: f64,

    /// Transitions leaving this activity
    pub case_count: usize,

    /// Weighted blend of duration and frequency factors, 0-100
    pub impact_score: u32,

    pub wait_time: f64,
    pub processing_time: f64,
}

/// Impact score from an average gap and an occurrence count
pub fn impact_score(avg_duration: f64, count: usize, config: &BottleneckConfig) -> u32 {
    let duration_factor = (avg_duration * config.duration_scale).min(100.0);
    let frequency_factor = (count as f64 / config.frequency_saturation).min(1.0) * 100.0;
    let blended = duration_factor * config.duration_weight + frequency_factor * config.frequency_weight;
    round0(blended).max(0.0) as u32
}

/// Top activities by impact score, highest first
///
/// **Public** - main entry point for bottleneck detection
pub fn find_bottlenecks(events: &[EventLogEntry], config: &BottleneckConfig) -> Vec<Bottleneck> {
    let timelines = case_timelines(events);
    let gaps = activity_gaps(&timelines);

    debug!("Scoring {} activities for bottlenecks", gaps.len());

    let mut bottlenecks: Vec<Bottleneck> = gaps
        .into_iter()
        .map(|entry| {
            let avg = mean(&entry.gaps);
            let count = entry.gaps.len();
            Bottleneck {
                activity: entry.activity.to_string(),
                avg_duration: round1(avg),
                case_count: count,
                impact_score: impact_score(avg, count, config),
                wait_time: round1(avg * config.wait_share),
                processing_time: round1(avg * (1.0 - config.wait_share)),
            }
        })
        .collect();

    bottlenecks.sort_by(|a, b| b.impact_score.cmp(&a.impact_score));
    bottlenecks.truncate(config.top_n);
    bottlenecks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::event;

    #[test]
    fn test_impact_score_blend() {
        let config = BottleneckConfig::default();
        // duration factor 50, frequency factor 50
        assert_eq!(impact_score(5.0, 500, &config), 50);
        // both capped at 100
        assert_eq!(impact_score(30.0, 5000, &config), 100);
        assert_eq!(impact_score(0.0, 0, &config), 0);
    }

    #[test]
    fn test_longest_wait_ranks_first() {
        let events = vec![
            event("C1", "A", 0.0),
            event("C1", "B", 0.5),
            event("C1", "C", 6.5),
        ];

        let bottlenecks = find_bottlenecks(&events, &BottleneckConfig::default());

        assert_eq!(bottlenecks.len(), 2);
        assert_eq!(bottlenecks[0].activity, "B");
        assert_eq!(bottlenecks[0].avg_duration, 6.0);
        assert_eq!(bottlenecks[0].wait_time, 4.2);
        assert_eq!(bottlenecks[0].processing_time, 1.8);
    }

    #[test]
    fn test_top_n_limit() {
        let events: Vec<_> = (0..10)
            .map(|i| event("C1", &format!("Step {}", i), i as f64))
            .collect();
        let config = BottleneckConfig {
            top_n: 3,
            ..Default::default()
        };

        assert_eq!(find_bottlenecks(&events, &config).len(), 3);
    }
}
