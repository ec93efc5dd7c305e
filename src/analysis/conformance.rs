//! Conformance of cases to the expected process variant.

use crate::parser::{CaseAttribute, Field, Record};
use crate::utils::config::ConformanceConfig;
use crate::utils::stats::{percentage, round1};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConformanceSummary {
    pub total_cases: usize,
    pub conformant_cases: usize,
    pub non_conformant_cases: usize,

    /// Share of conformant cases, in percent
    pub conformance_rate: f64,

    /// Deviating variants, most frequent first
    pub deviations: Vec<Deviation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deviation {
    pub variant: String,

    /// Readable label, e.g. "price change" for `price_change_path`
    pub label: String,
    pub count: usize,

    /// Share of all cases, in percent
    pub percentage: f64,
    pub impact: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConformanceRating {
    Positive,
    Neutral,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupConformance {
    pub group: String,
    pub total: usize,
    pub conformant: usize,
    pub rate: f64,
    pub rating: ConformanceRating,
}

/// Readable label for a variant name
pub fn variant_label(variant: &str) -> String {
    variant
        .strip_suffix("_path")
        .unwrap_or(variant)
        .replace('_', " ")
}

/// Overall conformance and the deviating variants
pub fn check_conformance(cases: &[CaseAttribute], config: &ConformanceConfig) -> ConformanceSummary {
    let total = cases.len();
    let conformant = cases
        .iter()
        .filter(|case| case.variant == config.conforming_variant)
        .count();

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for case in cases.iter().filter(|c| c.variant != config.conforming_variant) {
        let idx = *index.entry(case.variant.as_str()).or_insert_with(|| {
            counts.push((case.variant.as_str(), 0));
            counts.len() - 1
        });
        counts[idx].1 += 1;
    }

    let mut deviations: Vec<Deviation> = counts
        .into_iter()
        .map(|(variant, count)| Deviation {
            variant: variant.to_string(),
            label: variant_label(variant),
            count,
            percentage: round1(percentage(count, total)),
            impact: config
                .impact_notes
                .get(variant)
                .unwrap_or(&config.default_impact_note)
                .clone(),
        })
        .collect();
    deviations.sort_by(|a, b| b.count.cmp(&a.count));

    ConformanceSummary {
        total_cases: total,
        conformant_cases: conformant,
        non_conformant_cases: total - conformant,
        conformance_rate: round1(percentage(conformant, total)),
        deviations,
    }
}

/// Conformance rate per value of `dimension`, best first
pub fn conformance_by_group(
    cases: &[CaseAttribute],
    dimension: Field,
    config: &ConformanceConfig,
) -> Vec<GroupConformance> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, usize, usize)> = Vec::new();

    for case in cases {
        let Some(value) = case.field(dimension) else {
            return Vec::new();
        };
        if value.is_empty() {
            continue;
        }
        let idx = match index.get(&*value).copied() {
            Some(idx) => idx,
            None => {
                index.insert(value.to_string(), groups.len());
                groups.push((value.into_owned(), 0, 0));
                groups.len() - 1
            }
        };
        groups[idx].1 += 1;
        if case.variant == config.conforming_variant {
            groups[idx].2 += 1;
        }
    }

    let mut result: Vec<GroupConformance> = groups
        .into_iter()
        .map(|(group, total, conformant)| {
            let rate = round1(percentage(conformant, total));
            GroupConformance {
                group,
                total,
                conformant,
                rate,
                rating: rate_conformance(rate, config),
            }
        })
        .collect();

    result.sort_by(|a, b| b.rate.total_cmp(&a.rate));
    result
}

fn rate_conformance(rate: f64, config: &ConformanceConfig) -> ConformanceRating {
    if rate >= config.positive_rate {
        ConformanceRating::Positive
    } else if rate >= config.neutral_rate {
        ConformanceRating::Neutral
    } else {
        ConformanceRating::Negative
    }
}
