//! Root-cause impact analysis.
//!
//! For every value of a dimension, compare the rate of a target outcome
//! among cases with that value to the rate across all cases. The signed
//! difference, in percentage points, is the value's impact.

use crate::parser::{CaseAttribute, Field, Record};
use crate::utils::config::AnalysisConfig;
use crate::utils::stats::{percentage, round1};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Outcome whose rate is compared across groups
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum RootCauseTarget {
    /// `on_time_delivery` equals the given flag
    OnTimeDelivery(bool),
    /// The case followed the given variant
    Variant(String),
    /// The case's variant differs from the conforming variant
    NonConformant,
}

impl RootCauseTarget {
    pub fn matches(&self, case: &CaseAttribute, conforming_variant: &str) -> bool {
        match self {
            RootCauseTarget::OnTimeDelivery(flag) => case.on_time_delivery == *flag,
            RootCauseTarget::Variant(variant) => case.variant == *variant,
            RootCauseTarget::NonConformant => case.variant != conforming_variant,
        }
    }
}

impl fmt::Display for RootCauseTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RootCauseTarget::OnTimeDelivery(flag) => write!(f, "on_time_delivery = {}", flag),
            RootCauseTarget::Variant(variant) => write!(f, "variant = {}", variant),
            RootCauseTarget::NonConformant => f.write_str("non-conformant variant"),
        }
    }
}

/// Target statistics for one value of one dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupAggregate {
    pub dimension: Field,
    pub value: String,

    /// Cases with this value
    pub count: usize,

    /// Cases with this value that hit the target
    pub target_count: usize,

    /// Target rate within the group, in percent
    pub rate: f64,

    /// `rate` minus the base rate, in percentage points
    pub impact: f64,
}

/// Root-cause rows plus the base rate they are measured against
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RootCauseAnalysis {
    pub target: Option<RootCauseTarget>,
    pub base_rate: f64,
    pub case_count: usize,
    pub causes: Vec<GroupAggregate>,
}

/// Target rate across all cases, in percent
pub fn base_rate(cases: &[CaseAttribute], target: &RootCauseTarget, conforming_variant: &str) -> f64 {
    let hits = cases
        .iter()
        .filter(|case| target.matches(case, conforming_variant))
        .count();
    percentage(hits, cases.len())
}

/// Aggregate the target per value of `dimension`, in first-seen order
///
/// No support filter is applied. Empty values and fields the case table
/// lacks produce no groups.
pub fn group_aggregates(
    cases: &[CaseAttribute],
    dimension: Field,
    target: &RootCauseTarget,
    conforming_variant: &str,
) -> Vec<GroupAggregate> {
    let base = base_rate(cases, target, conforming_variant);

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
        if target.matches(case, conforming_variant) {
            groups[idx].2 += 1;
        }
    }

    groups
        .into_iter()
        .map(|(value, count, target_count)| {
            let rate = percentage(target_count, count);
            GroupAggregate {
                dimension,
                value,
                count,
                target_count,
                rate: round1(rate),
                impact: round1(rate - base),
            }
        })
        .collect()
}

/// Rank dimension values by how far their target rate deviates
///
/// **Public** - main entry point for root-cause analysis
///
/// Groups with `min_support` cases or fewer are dropped. Each dimension
/// keeps its `top_n` largest |impact| rows, then all rows are merged and
/// re-sorted by |impact|, largest first.
pub fn analyze_root_causes(
    cases: &[CaseAttribute],
    target: &RootCauseTarget,
    dimensions: &[Field],
    config: &AnalysisConfig,
) -> RootCauseAnalysis {
    let conforming = config.conformance.conforming_variant.as_str();
    let min_support = config.root_cause.min_support;

    let mut causes = Vec::new();
    for &dimension in dimensions {
        let mut rows: Vec<GroupAggregate> = group_aggregates(cases, dimension, target, conforming)
            .into_iter()
            .filter(|row| row.count > min_support)
            .collect();

        debug!(
            "Root causes for {}: {} groups above support {}",
            dimension,
            rows.len(),
            min_support
        );

        sort_by_magnitude(&mut rows);
        rows.truncate(config.root_cause.top_n);
        causes.extend(rows);
    }
    sort_by_magnitude(&mut causes);

    RootCauseAnalysis {
        target: Some(target.clone()),
        base_rate: round1(base_rate(cases, target, conforming)),
        case_count: cases.len(),
        causes,
    }
}

fn sort_by_magnitude(rows: &mut [GroupAggregate]) {
    rows.sort_by(|a, b| b.impact.abs().total_cmp(&a.impact.abs()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::case;
    use crate::utils::config::RootCauseConfig;

    fn late() -> RootCauseTarget {
        RootCauseTarget::OnTimeDelivery(false)
    }

    #[test]
    fn test_balanced_groups_have_zero_impact() {
        let cases = vec![
            case("C1", "X", 1.0, true),
            case("C2", "X", 1.0, false),
            case("C3", "Y", 1.0, true),
            case("C4", "Y", 1.0, false),
        ];

        assert_eq!(base_rate(&cases, &late(), "standard_path"), 50.0);

        let groups = group_aggregates(&cases, Field::Company, &late(), "standard_path");
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].value, "X");
        assert_eq!(groups[0].rate, 50.0);
        assert_eq!(groups[0].impact, 0.0);
    }

    #[test]
    fn test_min_support_filters_small_groups() {
        let mut cases: Vec<_> = (0..6).map(|i| case(&format!("A{}", i), "Big", 1.0, false)).collect();
        cases.extend((0..5).map(|i| case(&format!("B{}", i), "Small", 1.0, true)));

        let analysis = analyze_root_causes(&cases, &late(), &[Field::Company], &AnalysisConfig::default());

        assert_eq!(analysis.causes.len(), 1);
        assert_eq!(analysis.causes[0].value, "Big");
        assert!(analysis.causes.iter().all(|c| c.count > 5));
    }

    #[test]
    fn test_sorted_by_absolute_impact_across_dimensions() {
        let mut cases = Vec::new();
        for i in 0..20 {
            let mut c = case(&format!("C{}", i), if i < 10 { "X" } else { "Y" }, 1.0, i % 4 != 0);
            c.region = if i < 14 { "North".to_string() } else { "South".to_string() };
            if i >= 14 {
                c.on_time_delivery = false;
            }
            cases.push(c);
        }

        let config = AnalysisConfig {
            root_cause: RootCauseConfig {
                min_support: 0,
                top_n: 5,
            },
            ..Default::default()
        };
        let analysis =
            analyze_root_causes(&cases, &late(), &[Field::Company, Field::Region], &config);

        let magnitudes: Vec<f64> = analysis.causes.iter().map(|c| c.impact.abs()).collect();
        let mut sorted = magnitudes.clone();
        sorted.sort_by(|a, b| b.total_cmp(a));
        assert_eq!(magnitudes, sorted);
        assert_eq!(analysis.causes[0].value, "South");
    }

    #[test]
    fn test_event_only_dimension_has_no_groups() {
        let cases = vec![case("C1", "X", 1.0, true)];
        assert!(group_aggregates(&cases, Field::Activity, &late(), "standard_path").is_empty());
    }

    #[test]
    fn test_empty_cases_zero_base_rate() {
        let analysis = analyze_root_causes(&[], &late(), &[Field::Company], &AnalysisConfig::default());
        assert_eq!(analysis.base_rate, 0.0);
        assert!(analysis.causes.is_empty());
    }
}
