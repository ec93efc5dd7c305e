//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while fetching a source table
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} while fetching {location}")]
    Status { location: String, status: u16 },
}

/// Errors that can occur while parsing a CSV table
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("CSV parsing failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid timestamp on line {line}, column {column}: {value:?}")]
    InvalidTimestamp {
        line: usize,
        column: &'static str,
        value: String,
    },

    #[error("Invalid number on line {line}, column {column}: {value:?}")]
    InvalidNumber {
        line: usize,
        column: &'static str,
        value: String,
    },
}

/// Errors that can occur while loading the data store
///
/// Either table failing leaves the store unloaded.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Source for {table} is unavailable: {source}")]
    SourceUnavailable {
        table: &'static str,
        #[source]
        source: SourceError,
    },

    #[error("Failed to parse {table}: {source}")]
    Parse {
        table: &'static str,
        #[source]
        source: ParseError,
    },

    /// Reported to callers that waited on another caller's failed attempt
    #[error("Concurrent load failed: {message}")]
    Shared { message: String },
}

/// Errors returned by store queries
#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    #[error("Data store is not loaded; call load() first")]
    NotLoaded,
}

/// Errors that can occur while reading analysis configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid analysis config: {0}")]
    Invalid(String),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to read file: {0}")]
    ReadFailed(#[source] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
