//! Configuration and constants for the library and CLI.
//!
//! Analysis heuristics such as role keywords, score weights and support
//! thresholds live in [`AnalysisConfig`] and can be overridden from TOML.

use crate::utils::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default timeout for HTTP source requests
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Current report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Default file name of the event log table
pub const DEFAULT_EVENT_LOG: &str = "event_log.csv";

/// Default file name of the case attributes table
pub const DEFAULT_CASE_ATTRIBUTES: &str = "case_attributes.csv";

/// Milliseconds per day, for inter-event gaps
pub const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Tunable heuristics for every analysis
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub flow: FlowConfig,

    #[serde(default)]
    pub bottleneck: BottleneckConfig,

    #[serde(default)]
    pub root_cause: RootCauseConfig,

    #[serde(default)]
    pub conformance: ConformanceConfig,
}

/// Node role inference for the process flow graph
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Activities that open a case
    pub start_activities: Vec<String>,

    /// Activities that close a case
    pub end_activities: Vec<String>,

    /// Substrings marking a decision point
    pub gateway_keywords: Vec<String>,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            start_activities: vec!["Receive Purchase Order".to_string()],
            end_activities: vec!["Clear Invoice".to_string()],
            gateway_keywords: vec!["Change".to_string()],
        }
    }
}

/// Bottleneck impact scoring
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BottleneckConfig {
    /// Weight of the duration factor in the impact score
    pub duration_weight: f64,

    /// Weight of the frequency factor in the impact score
    pub frequency_weight: f64,

    /// Multiplier turning average days into the 0-100 duration factor
    pub duration_scale: f64,

    /// Occurrence count at which the frequency factor saturates at 100
    pub frequency_saturation: f64,

    /// Share of the average gap reported as wait time (rest is processing)
    pub wait_share: f64,

    /// Number of bottlenecks returned
    pub top_n: usize,
}

impl Default for BottleneckConfig {
    fn default() -> Self {
        Self {
            duration_weight: 0.7,
            frequency_weight: 0.3,
            duration_scale: 10.0,
            frequency_saturation: 1000.0,
            wait_share: 0.7,
            top_n: 5,
        }
    }
}

/// Root-cause impact filtering
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RootCauseConfig {
    /// Groups need strictly more cases than this to be reported
    pub min_support: usize,

    /// Rows kept per dimension before merging
    pub top_n: usize,
}

impl Default for RootCauseConfig {
    fn default() -> Self {
        Self {
            min_support: 5,
            top_n: 5,
        }
    }
}

/// Conformance checking
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ConformanceConfig {
    /// Variant label of the expected path
    pub conforming_variant: String,

    /// Rates at or above this are rated positive
    pub positive_rate: f64,

    /// Rates at or above this (and below positive) are rated neutral
    pub neutral_rate: f64,

    /// Impact note per deviating variant
    pub impact_notes: HashMap<String, String>,

    /// Note used for variants without an entry in `impact_notes`
    pub default_impact_note: String,
}

impl Default for ConformanceConfig {
    fn default() -> Self {
        let impact_notes = [
            ("price_change_path", "Medium impact on process cost (+$45 per case)"),
            ("material_change_path", "Medium impact on process duration (+2.3 days)"),
            (
                "invoice_after_invoice",
                "High impact on process quality (23% higher rejection rate)",
            ),
        ]
        .into_iter()
        .map(|(variant, note)| (variant.to_string(), note.to_string()))
        .collect();

        Self {
            conforming_variant: "standard_path".to_string(),
            positive_rate: 70.0,
            neutral_rate: 50.0,
            impact_notes,
            default_impact_note: "Low impact on process outcome".to_string(),
        }
    }
}

impl AnalysisConfig {
    /// Check weights and shares are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        let b = &self.bottleneck;
        let c = &self.conformance;
        let numbers = [
            ("bottleneck.duration_weight", b.duration_weight),
            ("bottleneck.frequency_weight", b.frequency_weight),
            ("bottleneck.duration_scale", b.duration_scale),
            ("bottleneck.frequency_saturation", b.frequency_saturation),
            ("bottleneck.wait_share", b.wait_share),
            ("conformance.positive_rate", c.positive_rate),
            ("conformance.neutral_rate", c.neutral_rate),
        ];
        if let Some((key, value)) = numbers.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "{} must be a finite number, got {}",
                key, value
            )));
        }

        if !(0.0..=1.0).contains(&b.wait_share) {
            return Err(ConfigError::Invalid(format!(
                "bottleneck.wait_share must be within 0..=1, got {}",
                b.wait_share
            )));
        }
        if b.duration_weight < 0.0 || b.frequency_weight < 0.0 {
            return Err(ConfigError::Invalid(
                "bottleneck weights must not be negative".to_string(),
            ));
        }
        // Impact scores stay within 0..=100 only if the blend is convex
        if b.duration_weight + b.frequency_weight > 1.0 + f64::EPSILON {
            return Err(ConfigError::Invalid(format!(
                "bottleneck weights must sum to at most 1, got {}",
                b.duration_weight + b.frequency_weight
            )));
        }
        if b.duration_scale < 0.0 {
            return Err(ConfigError::Invalid(
                "bottleneck.duration_scale must not be negative".to_string(),
            ));
        }
        if b.frequency_saturation <= 0.0 {
            return Err(ConfigError::Invalid(
                "bottleneck.frequency_saturation must be positive".to_string(),
            ));
        }
        if c.neutral_rate > c.positive_rate {
            return Err(ConfigError::Invalid(
                "conformance.neutral_rate must not exceed positive_rate".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load analysis config from a TOML file
///
/// Missing sections and keys fall back to the defaults.
///
/// # Errors
/// * `ConfigError::Io` - If file cannot be read
/// * `ConfigError::Toml` - If TOML is invalid
/// * `ConfigError::Invalid` - If values are out of range
pub fn load_analysis_config(path: impl AsRef<Path>) -> Result<AnalysisConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: AnalysisConfig = toml::from_str(&contents)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[bottleneck]\ntop_n = 3\n\n[root_cause]\nmin_support = 10").unwrap();

        let config = load_analysis_config(file.path()).unwrap();

        assert_eq!(config.bottleneck.top_n, 3);
        assert_eq!(config.bottleneck.wait_share, 0.7);
        assert_eq!(config.root_cause.min_support, 10);
        assert_eq!(config.root_cause.top_n, 5);
        assert_eq!(config.flow, FlowConfig::default());
    }

    #[test]
    fn test_invalid_wait_share_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[bottleneck]\nwait_share = 1.5").unwrap();

        assert!(matches!(
            load_analysis_config(file.path()),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_weights_summing_above_one_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[bottleneck]\nduration_weight = 1.0\nfrequency_weight = 1.0").unwrap();

        assert!(matches!(
            load_analysis_config(file.path()),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_non_finite_values_rejected() {
        for line in [
            "[bottleneck]\nfrequency_saturation = nan",
            "[bottleneck]\nduration_scale = inf",
            "[conformance]\npositive_rate = nan",
        ] {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            writeln!(file, "{}", line).unwrap();

            assert!(
                matches!(load_analysis_config(file.path()), Err(ConfigError::Invalid(_))),
                "accepted {:?}",
                line
            );
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(AnalysisConfig::default().validate().is_ok());
    }
}
