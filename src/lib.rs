//! Process Miner
//!
//! Event-log aggregation for order-to-cash process mining.
//!
//! A [`DataStore`](store::DataStore) loads an event log and a case
//! attribute table once from a [`DataSource`](source::DataSource), then
//! answers derived-metric queries: dimension values, the process flow
//! graph, performance metrics, bottlenecks, root causes and conformance.
//!
//! ```ignore
//! use process_miner::{source::FileSource, store::DataStore, utils::config::AnalysisConfig};
//!
//! let store = DataStore::new(FileSource::new("data"), AnalysisConfig::default());
//! store.load()?;
//! let flow = store.process_flow()?;
//! ```

pub mod analysis;
pub mod commands;
pub mod output;
pub mod parser;
pub mod source;
pub mod store;
pub mod utils;
