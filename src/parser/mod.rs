//! Table parsing and row schema definitions.
//!
//! This module handles:
//! - Parsing the event log and case attribute CSV tables
//! - Typing timestamps, durations and on-time flags
//! - Field lookup across both record types

pub mod schema;
pub mod tables;

// Re-export main types
pub use schema::{CaseAttribute, EventLogEntry, Field, Record, UnknownField};
pub use tables::{parse_case_attributes, parse_event_log, parse_timestamp};
