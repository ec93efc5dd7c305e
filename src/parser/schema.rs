//! Typed rows of the two source tables and the field dispatch table.
//!
//! Field lookups are explicit: every known column name maps to a
//! [`Field`], and each record type answers only for the columns it has.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Display format for timestamps rendered as field values
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// One event: a single activity occurrence within a case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub case_id: String,
    pub activity: String,
    pub timestamp: NaiveDateTime,
    pub company: String,
    pub region: String,
    pub material_group: String,
    pub payment_term: String,
    pub variant: String,
}

/// One case with its dimensions and outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseAttribute {
    pub case_id: String,
    pub company: String,
    pub region: String,
    pub material_group: String,
    pub payment_term: String,
    pub variant: String,
    pub start_time: NaiveDateTime,

    /// `None` while the case is still active
    pub end_time: Option<NaiveDateTime>,

    /// Lead time in days
    pub case_duration: f64,
    pub on_time_delivery: bool,
}

impl CaseAttribute {
    /// A case is completed once it has an end timestamp
    pub fn is_completed(&self) -> bool {
        self.end_time.is_some()
    }
}

/// Every column known to either table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    CaseId,
    Activity,
    Timestamp,
    Company,
    Region,
    MaterialGroup,
    PaymentTerm,
    Variant,
    StartTime,
    EndTime,
    CaseDuration,
    OnTimeDelivery,
}

impl Field {
    pub const ALL: [Field; 12] = [
        Field::CaseId,
        Field::Activity,
        Field::Timestamp,
        Field::Company,
        Field::Region,
        Field::MaterialGroup,
        Field::PaymentTerm,
        Field::Variant,
        Field::StartTime,
        Field::EndTime,
        Field::CaseDuration,
        Field::OnTimeDelivery,
    ];

    /// Column name as it appears in the CSV header
    pub fn name(self) -> &'static str {
        match self {
            Field::CaseId => "case_id",
            Field::Activity => "activity",
            Field::Timestamp => "timestamp",
            Field::Company => "company",
            Field::Region => "region",
            Field::MaterialGroup => "material_group",
            Field::PaymentTerm => "payment_term",
            Field::Variant => "variant",
            Field::StartTime => "start_time",
            Field::EndTime => "end_time",
            Field::CaseDuration => "case_duration",
            Field::OnTimeDelivery => "on_time_delivery",
        }
    }

    /// Dimensions shared by both tables
    pub fn is_dimension(self) -> bool {
        matches!(
            self,
            Field::Company
                | Field::Region
                | Field::MaterialGroup
                | Field::PaymentTerm
                | Field::Variant
        )
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned by [`Field::from_str`] for unknown column names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownField(pub String);

impl fmt::Display for UnknownField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown field: {}", self.0)
    }
}

impl std::error::Error for UnknownField {}

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// Uniform field access across record types
pub trait Record {
    /// String rendering of `field`, or `None` if this record type lacks it
    fn field(&self, field: Field) -> Option<Cow<'_, str>>;
}

impl Record for EventLogEntry {
    fn field(&self, field: Field) -> Option<Cow<'_, str>> {
        let value = match field {
            Field::CaseId => &self.case_id,
            Field::Activity => &self.activity,
            Field::Company => &self.company,
            Field::Region => &self.region,
            Field::MaterialGroup => &self.material_group,
            Field::PaymentTerm => &self.payment_term,
            Field::Variant => &self.variant,
            Field::Timestamp => {
                return Some(Cow::Owned(self.timestamp.format(TIMESTAMP_FORMAT).to_string()))
            }
            Field::StartTime
            | Field::EndTime
            | Field::CaseDuration
            | Field::OnTimeDelivery => return None,
        };
        Some(Cow::Borrowed(value.as_str()))
    }
}

impl Record for CaseAttribute {
    fn field(&self, field: Field) -> Option<Cow<'_, str>> {
        let value = match field {
            Field::CaseId => &self.case_id,
            Field::Company => &self.company,
            Field::Region => &self.region,
            Field::MaterialGroup => &self.material_group,
            Field::PaymentTerm => &self.payment_term,
            Field::Variant => &self.variant,
            Field::StartTime => {
                return Some(Cow::Owned(self.start_time.format(TIMESTAMP_FORMAT).to_string()))
            }
            Field::EndTime => {
                return Some(Cow::Owned(
                    self.end_time
                        .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
                        .unwrap_or_default(),
                ))
            }
            Field::CaseDuration => return Some(Cow::Owned(self.case_duration.to_string())),
            Field::OnTimeDelivery => {
                return Some(Cow::Borrowed(if self.on_time_delivery {
                    "true"
                } else {
                    "false"
                }))
            }
            Field::Activity | Field::Timestamp => return None,
        };
        Some(Cow::Borrowed(value.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_round_trip_through_from_str() {
        for field in Field::ALL {
            assert_eq!(field.name().parse::<Field>(), Ok(field));
        }
        assert!("nope".parse::<Field>().is_err());
    }

    #[test]
    fn test_event_has_no_case_only_fields() {
        let event = EventLogEntry {
            case_id: "C1".to_string(),
            activity: "A".to_string(),
            timestamp: NaiveDateTime::default(),
            company: "X".to_string(),
            region: "Europe".to_string(),
            material_group: "Fasteners".to_string(),
            payment_term: "30 days".to_string(),
            variant: "standard_path".to_string(),
        };

        assert_eq!(event.field(Field::Company).as_deref(), Some("X"));
        assert_eq!(event.field(Field::OnTimeDelivery), None);
        assert_eq!(event.field(Field::CaseDuration), None);
    }

    #[test]
    fn test_timestamp_rendering_keeps_fractional_seconds() {
        let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(6, 30, 0)
            .unwrap();
        let mut event = EventLogEntry {
            case_id: "C1".to_string(),
            activity: "A".to_string(),
            timestamp: base,
            company: "X".to_string(),
            region: "Europe".to_string(),
            material_group: "Fasteners".to_string(),
            payment_term: "30 days".to_string(),
            variant: "standard_path".to_string(),
        };

        assert_eq!(
            event.field(Field::Timestamp).as_deref(),
            Some("2024-01-02 06:30:00")
        );

        event.timestamp = base + chrono::Duration::milliseconds(250);
        assert_eq!(
            event.field(Field::Timestamp).as_deref(),
            Some("2024-01-02 06:30:00.250")
        );
    }
}
