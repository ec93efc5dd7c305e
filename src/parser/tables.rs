//! CSV parsing for the event log and case attribute tables.
//!
//! Cells arrive as text and are typed here: timestamps become
//! `NaiveDateTime`, `case_duration` becomes a number and
//! `on_time_delivery` becomes a bool.

use super::schema::{CaseAttribute, EventLogEntry};
use crate::utils::error::ParseError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::debug;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Accepted timestamp layouts besides RFC 3339
const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

#[derive(Debug, Deserialize)]
struct RawEvent {
    case_id: String,
    activity: String,
    timestamp: String,
    company: String,
    region: String,
    material_group: String,
    payment_term: String,
    variant: String,
}

#[derive(Debug, Deserialize)]
struct RawCase {
    case_id: String,
    company: String,
    region: String,
    material_group: String,
    payment_term: String,
    variant: String,
    start_time: String,
    end_time: String,
    case_duration: String,
    on_time_delivery: String,
}

/// Parse the event log table
///
/// **Public** - main entry point for event log parsing
///
/// # Errors
/// * `ParseError::Csv` - Malformed CSV or missing columns
/// * `ParseError::InvalidTimestamp` - Unparseable `timestamp` cell
pub fn parse_event_log(text: &str) -> Result<Vec<EventLogEntry>, ParseError> {
    let rows: Vec<(usize, RawEvent)> = read_rows(text)?;
    debug!("Parsing {} event log rows", rows.len());

    rows.into_iter()
        .map(|(line, raw)| {
            Ok(EventLogEntry {
                timestamp: require_timestamp(&raw.timestamp, line, "timestamp")?,
                case_id: raw.case_id,
                activity: raw.activity,
                company: raw.company,
                region: raw.region,
                material_group: raw.material_group,
                payment_term: raw.payment_term,
                variant: raw.variant,
            })
        })
        .collect()
}

/// Parse the case attributes table
///
/// **Public** - main entry point for case attribute parsing
///
/// # Errors
/// * `ParseError::Csv` - Malformed CSV or missing columns
/// * `ParseError::InvalidTimestamp` - Unparseable `start_time`/`end_time`
/// * `ParseError::InvalidNumber` - Unparseable `case_duration`
pub fn parse_case_attributes(text: &str) -> Result<Vec<CaseAttribute>, ParseError> {
    let rows: Vec<(usize, RawCase)> = read_rows(text)?;
    debug!("Parsing {} case attribute rows", rows.len());

    rows.into_iter()
        .map(|(line, raw)| {
            let end_time = if raw.end_time.is_empty() {
                None
            } else {
                Some(require_timestamp(&raw.end_time, line, "end_time")?)
            };

            Ok(CaseAttribute {
                start_time: require_timestamp(&raw.start_time, line, "start_time")?,
                end_time,
                case_duration: require_days(&raw.case_duration, line, "case_duration")?,
                on_time_delivery: parse_flag(&raw.on_time_delivery),
                case_id: raw.case_id,
                company: raw.company,
                region: raw.region,
                material_group: raw.material_group,
                payment_term: raw.payment_term,
                variant: raw.variant,
            })
        })
        .collect()
}

/// Deserialize every non-blank row of a headed CSV document
///
/// Each row is paired with the 1-based line it starts on, counting the
/// header and any blank lines.
fn read_rows<T: DeserializeOwned>(text: &str) -> Result<Vec<(usize, T)>, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |pos| pos.line() as usize);
        rows.push((line, record.deserialize(Some(&headers))?));
    }
    Ok(rows)
}

fn require_timestamp(
    value: &str,
    line: usize,
    column: &'static str,
) -> Result<NaiveDateTime, ParseError> {
    parse_timestamp(value).ok_or_else(|| ParseError::InvalidTimestamp {
        line,
        column,
        value: value.to_string(),
    })
}

/// Parse a day count; `NaN` and infinities are rejected
fn require_days(value: &str, line: usize, column: &'static str) -> Result<f64, ParseError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|days| days.is_finite())
        .ok_or_else(|| ParseError::InvalidNumber {
            line,
            column,
            value: value.to_string(),
        })
}

/// Parse a timestamp cell
///
/// Accepts RFC 3339 (normalised to UTC), `YYYY-MM-DD HH:MM:SS[.f]`,
/// the same with a `T` separator, and bare dates (midnight).
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    for format in TIMESTAMP_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Normalise the textual on-time flag
///
/// Only the literal `True` and boolean spellings of true count.
pub fn parse_flag(value: &str) -> bool {
    matches!(value, "True" | "true" | "TRUE")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const EVENTS: &str = "\
case_id,activity,timestamp,company,region,material_group,payment_term,variant
C1,Receive Purchase Order,2024-01-01 00:00:00,Drystone UK Ltd,Europe,Fasteners,30 days from date of invoice,standard_path

C1,Create Sales Order,2024-01-02 06:30:00.250000,Drystone UK Ltd,Europe,Fasteners,30 days from date of invoice,standard_path
";

    #[test]
    fn test_parse_event_log_skips_blank_lines() {
        let events = parse_event_log(EVENTS).unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[1].activity, "Create Sales Order");
        assert_eq!(
            events[1].timestamp,
            NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_milli_opt(6, 30, 0, 250)
                .unwrap()
        );
    }

    #[test]
    fn test_parse_case_attributes_types_fields() {
        let text = "\
case_id,company,region,material_group,payment_term,variant,start_time,end_time,case_duration,on_time_delivery
C1,X,Europe,Fasteners,30 days,standard_path,2024-01-01,2024-01-05,4,True
C2,Y,Americas,Fertilizers,60 days,rejected_order,2024-01-01T08:00:00,,1.5,False
";
        let cases = parse_case_attributes(text).unwrap();

        assert_eq!(cases.len(), 2);
        assert!(cases[0].on_time_delivery);
        assert!(cases[0].is_completed());
        assert_eq!(cases[0].case_duration, 4.0);
        assert!(!cases[1].on_time_delivery);
        assert!(!cases[1].is_completed());
        assert_eq!(cases[1].case_duration, 1.5);
    }

    #[test]
    fn test_bad_timestamp_is_reported_with_line() {
        let text = "\
case_id,activity,timestamp,company,region,material_group,payment_term,variant
C1,A,yesterday,X,R,M,P,V
";
        match parse_event_log(text) {
            Err(ParseError::InvalidTimestamp { line, column, value }) => {
                assert_eq!(line, 2);
                assert_eq!(column, "timestamp");
                assert_eq!(value, "yesterday");
            }
            other => panic!("expected InvalidTimestamp, got {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_duration_is_rejected() {
        for cell in ["NaN", "inf", "-infinity"] {
            let text = format!(
                "\
case_id,company,region,material_group,payment_term,variant,start_time,end_time,case_duration,on_time_delivery
C1,X,Europe,Fasteners,30 days,standard_path,2024-01-01,2024-01-05,4,True

C2,Y,Americas,Fertilizers,60 days,rejected_order,2024-01-01,,{},False
",
                cell
            );

            match parse_case_attributes(&text) {
                Err(ParseError::InvalidNumber { line, column, value }) => {
                    // header, C1, blank line, C2
                    assert_eq!(line, 4);
                    assert_eq!(column, "case_duration");
                    assert_eq!(value, cell);
                }
                other => panic!("expected InvalidNumber for {:?}, got {:?}", cell, other),
            }
        }
    }

    #[test]
    fn test_missing_column_is_csv_error() {
        let text = "case_id,activity\nC1,A\n";
        assert!(matches!(parse_event_log(text), Err(ParseError::Csv(_))));
    }

    #[test]
    fn test_parse_flag_spellings() {
        assert!(parse_flag("True"));
        assert!(parse_flag("true"));
        assert!(!parse_flag("False"));
        assert!(!parse_flag("yes"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn test_rfc3339_normalised_to_utc() {
        let ts = parse_timestamp("2024-03-01T10:00:00+02:00").unwrap();
        assert_eq!(ts.format("%H:%M").to_string(), "08:00");
    }
}
