//! Shared utilities: errors, configuration, numeric helpers.

pub mod config;
pub mod error;
pub mod stats;
