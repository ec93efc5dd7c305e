//! Caller-owned cache of the two source tables.
//!
//! Loading is explicit: [`DataStore::load`] fetches and parses both tables
//! once, and queries fail with [`StoreError::NotLoaded`] until it has
//! succeeded. Concurrent `load` calls share one in-flight attempt: the
//! first caller fetches, the others wait and receive its outcome.

use crate::analysis::{
    analyze_root_causes, build_process_flow, build_report, calculate_activity_durations,
    calculate_lead_time_by_company, calculate_performance_metrics, check_conformance,
    conformance_by_group, find_bottlenecks, unique_values, unique_values_by_name,
    ActivityDuration, AnalysisReport, Bottleneck, CompanyLeadTime, ConformanceSummary, Filters,
    GroupConformance, PerformanceMetrics, ProcessFlow, RootCauseAnalysis, RootCauseTarget,
};
use crate::parser::{parse_case_attributes, parse_event_log, CaseAttribute, EventLogEntry, Field};
use crate::source::DataSource;
use crate::utils::config::{AnalysisConfig, DEFAULT_CASE_ATTRIBUTES, DEFAULT_EVENT_LOG};
use crate::utils::error::{LoadError, StoreError};
use log::{debug, info, warn};
use std::sync::{Condvar, Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::Instant;

/// Locations of the two tables within a source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePaths {
    pub event_log: String,
    pub case_attributes: String,
}

impl Default for SourcePaths {
    fn default() -> Self {
        Self {
            event_log: DEFAULT_EVENT_LOG.to_string(),
            case_attributes: DEFAULT_CASE_ATTRIBUTES.to_string(),
        }
    }
}

/// Both parsed tables, committed together
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub events: Vec<EventLogEntry>,
    pub cases: Vec<CaseAttribute>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadState {
    Idle,
    Loading(u64),
}

#[derive(Debug)]
struct LoadGate {
    state: LoadState,
    next_attempt: u64,

    /// Attempt id and message of the most recent failure
    last_failure: Option<(u64, String)>,
}

/// Event log and case attribute cache with derived-metric queries
pub struct DataStore<S> {
    source: S,
    paths: SourcePaths,
    config: AnalysisConfig,
    tables: OnceLock<Tables>,
    gate: Mutex<LoadGate>,
    finished: Condvar,
}

impl<S: DataSource> DataStore<S> {
    /// Create an unloaded store reading the default table names
    pub fn new(source: S, config: AnalysisConfig) -> Self {
        Self::with_paths(source, SourcePaths::default(), config)
    }

    pub fn with_paths(source: S, paths: SourcePaths, config: AnalysisConfig) -> Self {
        Self {
            source,
            paths,
            config,
            tables: OnceLock::new(),
            gate: Mutex::new(LoadGate {
                state: LoadState::Idle,
                next_attempt: 0,
                last_failure: None,
            }),
            finished: Condvar::new(),
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn is_loaded(&self) -> bool {
        self.tables.get().is_some()
    }

    /// Fetch and parse both tables, once
    ///
    /// **Public** - must succeed before any query
    ///
    /// Returns immediately once loaded. A caller arriving while another
    /// load is in flight waits for it and shares its result. A failure
    /// commits nothing; the next call starts a fresh attempt.
    ///
    /// # Errors
    /// * `LoadError::SourceUnavailable` - A table could not be fetched
    /// * `LoadError::Parse` - A table is malformed
    /// * `LoadError::Shared` - The in-flight attempt this call waited on failed
    pub fn load(&self) -> Result<(), LoadError> {
        if self.is_loaded() {
            return Ok(());
        }

        let mut gate = self.lock_gate();
        let attempt = loop {
            if self.is_loaded() {
                return Ok(());
            }
            match gate.state {
                LoadState::Idle => {
                    let attempt = gate.next_attempt;
                    gate.next_attempt += 1;
                    gate.state = LoadState::Loading(attempt);
                    break attempt;
                }
                LoadState::Loading(in_flight) => {
                    debug!("Waiting for in-flight load #{}", in_flight);
                    gate = self
                        .finished
                        .wait_while(gate, |g| g.state == LoadState::Loading(in_flight))
                        .unwrap_or_else(PoisonError::into_inner);

                    if let Some((failed, message)) = &gate.last_failure {
                        if *failed == in_flight {
                            return Err(LoadError::Shared {
                                message: message.clone(),
                            });
                        }
                    }
                }
            }
        };
        drop(gate);

        let mut guard = AttemptGuard {
            store: self,
            attempt,
            armed: true,
        };
        let result = self.fetch_tables();
        guard.armed = false;

        let mut gate = self.lock_gate();
        gate.state = LoadState::Idle;
        let outcome = match result {
            Ok(tables) => {
                // Only this attempt can commit: every other caller waits on it.
                let _ = self.tables.set(tables);
                gate.last_failure = None;
                Ok(())
            }
            Err(err) => {
                warn!("Load attempt #{} failed: {}", attempt, err);
                gate.last_failure = Some((attempt, err.to_string()));
                Err(err)
            }
        };
        drop(gate);
        self.finished.notify_all();

        outcome
    }

    fn fetch_tables(&self) -> Result<Tables, LoadError> {
        let start_time = Instant::now();
        info!("Loading tables from {}", self.source.describe());

        let event_text = self
            .source
            .fetch(&self.paths.event_log)
            .map_err(|source| LoadError::SourceUnavailable {
                table: "event log",
                source,
            })?;
        let events = parse_event_log(&event_text).map_err(|source| LoadError::Parse {
            table: "event log",
            source,
        })?;

        let case_text = self
            .source
            .fetch(&self.paths.case_attributes)
            .map_err(|source| LoadError::SourceUnavailable {
                table: "case attributes",
                source,
            })?;
        let cases = parse_case_attributes(&case_text).map_err(|source| LoadError::Parse {
            table: "case attributes",
            source,
        })?;

        info!(
            "Loaded {} events and {} cases in {:.2}s",
            events.len(),
            cases.len(),
            start_time.elapsed().as_secs_f64()
        );

        Ok(Tables { events, cases })
    }

    fn lock_gate(&self) -> MutexGuard<'_, LoadGate> {
        self.gate.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn tables(&self) -> Result<&Tables, StoreError> {
        self.tables.get().ok_or(StoreError::NotLoaded)
    }

    /// Read-only view of the event log
    pub fn event_log(&self) -> Result<&[EventLogEntry], StoreError> {
        Ok(&self.tables()?.events)
    }

    /// Read-only view of the case attributes
    pub fn case_attributes(&self) -> Result<&[CaseAttribute], StoreError> {
        Ok(&self.tables()?.cases)
    }

    pub fn filtered_event_log(&self, filters: &Filters) -> Result<Vec<EventLogEntry>, StoreError> {
        Ok(filters.apply(self.event_log()?))
    }

    pub fn filtered_case_attributes(
        &self,
        filters: &Filters,
    ) -> Result<Vec<CaseAttribute>, StoreError> {
        Ok(filters.apply(self.case_attributes()?))
    }

    /// Sorted distinct values of a column by name; unknown names are empty
    pub fn unique_values(&self, field_name: &str) -> Result<Vec<String>, StoreError> {
        let tables = self.tables()?;
        Ok(unique_values_by_name(&tables.events, &tables.cases, field_name))
    }

    pub fn unique_values_of(&self, field: Field) -> Result<Vec<String>, StoreError> {
        let tables = self.tables()?;
        Ok(unique_values(&tables.events, &tables.cases, field))
    }

    pub fn companies(&self) -> Result<Vec<String>, StoreError> {
        self.unique_values_of(Field::Company)
    }

    pub fn regions(&self) -> Result<Vec<String>, StoreError> {
        self.unique_values_of(Field::Region)
    }

    pub fn material_groups(&self) -> Result<Vec<String>, StoreError> {
        self.unique_values_of(Field::MaterialGroup)
    }

    pub fn variants(&self) -> Result<Vec<String>, StoreError> {
        self.unique_values_of(Field::Variant)
    }

    pub fn activities(&self) -> Result<Vec<String>, StoreError> {
        self.unique_values_of(Field::Activity)
    }

    pub fn process_flow(&self) -> Result<ProcessFlow, StoreError> {
        Ok(build_process_flow(self.event_log()?, &self.config.flow))
    }

    pub fn performance_metrics(&self) -> Result<PerformanceMetrics, StoreError> {
        Ok(calculate_performance_metrics(self.case_attributes()?))
    }

    pub fn lead_time_by_company(&self) -> Result<Vec<CompanyLeadTime>, StoreError> {
        Ok(calculate_lead_time_by_company(self.case_attributes()?))
    }

    pub fn activity_durations(&self) -> Result<Vec<ActivityDuration>, StoreError> {
        Ok(calculate_activity_durations(self.event_log()?))
    }

    pub fn bottlenecks(&self) -> Result<Vec<Bottleneck>, StoreError> {
        Ok(find_bottlenecks(self.event_log()?, &self.config.bottleneck))
    }

    pub fn root_causes(
        &self,
        target: &RootCauseTarget,
        dimensions: &[Field],
    ) -> Result<RootCauseAnalysis, StoreError> {
        Ok(analyze_root_causes(
            self.case_attributes()?,
            target,
            dimensions,
            &self.config,
        ))
    }

    pub fn conformance(&self) -> Result<ConformanceSummary, StoreError> {
        Ok(check_conformance(self.case_attributes()?, &self.config.conformance))
    }

    pub fn conformance_by_group(&self, dimension: Field) -> Result<Vec<GroupConformance>, StoreError> {
        Ok(conformance_by_group(
            self.case_attributes()?,
            dimension,
            &self.config.conformance,
        ))
    }

    /// Every analysis over the rows matching `filters`
    pub fn report(&self, filters: &Filters) -> Result<AnalysisReport, StoreError> {
        let source = self.source.describe();
        if filters.is_empty() {
            let tables = self.tables()?;
            return Ok(build_report(source, &tables.events, &tables.cases, &self.config));
        }

        let events = self.filtered_event_log(filters)?;
        let cases = self.filtered_case_attributes(filters)?;
        debug!(
            "Filters kept {} events and {} cases",
            events.len(),
            cases.len()
        );
        Ok(build_report(source, &events, &cases, &self.config))
    }
}

/// Releases waiters if the loading caller unwinds mid-attempt
struct AttemptGuard<'a, S: DataSource> {
    store: &'a DataStore<S>,
    attempt: u64,
    armed: bool,
}

impl<S: DataSource> Drop for AttemptGuard<'_, S> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut gate = self.store.lock_gate();
        gate.state = LoadState::Idle;
        gate.last_failure = Some((self.attempt, "load attempt panicked".to_string()));
        drop(gate);
        self.store.finished.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::SourceError;

    struct Unreachable;

    impl DataSource for Unreachable {
        fn fetch(&self, location: &str) -> Result<String, SourceError> {
            Err(SourceError::Status {
                location: location.to_string(),
                status: 404,
            })
        }

        fn describe(&self) -> String {
            "nowhere".to_string()
        }
    }

    #[test]
    fn test_queries_fail_fast_before_load() {
        let store = DataStore::new(Unreachable, AnalysisConfig::default());

        assert_eq!(store.event_log().unwrap_err(), StoreError::NotLoaded);
        assert_eq!(store.unique_values("company").unwrap_err(), StoreError::NotLoaded);
        assert_eq!(store.bottlenecks().unwrap_err(), StoreError::NotLoaded);
    }

    #[test]
    fn test_failed_load_leaves_store_unloaded() {
        let store = DataStore::new(Unreachable, AnalysisConfig::default());

        assert!(matches!(
            store.load(),
            Err(LoadError::SourceUnavailable { table: "event log", .. })
        ));
        assert!(!store.is_loaded());
        // A later call tries again rather than replaying the old error
        assert!(matches!(store.load(), Err(LoadError::SourceUnavailable { .. })));
    }
}
