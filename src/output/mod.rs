//! Output writers for analysis reports.
//!
//! This module handles:
//! - JSON reports (pretty)
//! - Text summaries for the terminal

pub mod json;
pub mod summary;

// Re-export main functions
pub use json::{read_report, report_to_string, write_report};
pub use summary::render_summary;
