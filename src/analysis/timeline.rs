//! Per-case chronological event sequences.
//!
//! Cases appear in first-seen order. Within a case events are sorted by
//! timestamp with a stable sort, so equal timestamps keep input row order.

use crate::parser::EventLogEntry;
use crate::utils::config::MILLIS_PER_DAY;
use std::collections::HashMap;

/// All events of one case in chronological order
#[derive(Debug, Clone)]
pub struct CaseTimeline<'a> {
    pub case_id: &'a str,
    pub events: Vec<&'a EventLogEntry>,
}

impl<'a> CaseTimeline<'a> {
    /// Adjacent (earlier, later) event pairs
    pub fn transitions(&self) -> impl Iterator<Item = (&'a EventLogEntry, &'a EventLogEntry)> + '_ {
        self.events.windows(2).map(|pair| (pair[0], pair[1]))
    }
}

/// Gaps observed after one activity, in days
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityGaps<'a> {
    pub activity: &'a str,
    pub gaps: Vec<f64>,
}

/// Group events by case and order each case chronologically
pub fn case_timelines(events: &[EventLogEntry]) -> Vec<CaseTimeline<'_>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut timelines: Vec<CaseTimeline<'_>> = Vec::new();

    for event in events {
        let idx = *index.entry(event.case_id.as_str()).or_insert_with(|| {
            timelines.push(CaseTimeline {
                case_id: event.case_id.as_str(),
                events: Vec::new(),
            });
            timelines.len() - 1
        });
        timelines[idx].events.push(event);
    }

    for timeline in &mut timelines {
        timeline.events.sort_by_key(|event| event.timestamp);
    }

    timelines
}

/// Elapsed days between two events
pub fn gap_days(from: &EventLogEntry, to: &EventLogEntry) -> f64 {
    (to.timestamp - from.timestamp).num_milliseconds() as f64 / MILLIS_PER_DAY
}

/// Gaps attributed to the preceding activity of every transition
///
/// Activities are returned in first-seen order; an activity that only
/// ever closes a case has no entry.
pub fn activity_gaps<'a>(timelines: &[CaseTimeline<'a>]) -> Vec<ActivityGaps<'a>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut result: Vec<ActivityGaps<'a>> = Vec::new();

    for timeline in timelines {
        for (from, to) in timeline.transitions() {
            let idx = *index.entry(from.activity.as_str()).or_insert_with(|| {
                result.push(ActivityGaps {
                    activity: from.activity.as_str(),
                    gaps: Vec::new(),
                });
                result.len() - 1
            });
            result[idx].gaps.push(gap_days(from, to));
        }
    }

    result
}
