//! Distinct dimension values and row filtering.

use crate::parser::{CaseAttribute, EventLogEntry, Field, Record, UnknownField};
use log::debug;
use std::collections::BTreeSet;
use std::str::FromStr;

/// Sorted distinct non-empty values of `field` across both tables
///
/// A table that lacks the field contributes nothing.
pub fn unique_values(events: &[EventLogEntry], cases: &[CaseAttribute], field: Field) -> Vec<String> {
    let mut values = BTreeSet::new();
    collect_values(events, field, &mut values);
    collect_values(cases, field, &mut values);

    debug!("Found {} distinct values for {}", values.len(), field);
    values.into_iter().collect()
}

/// Like [`unique_values`], keyed by column name
///
/// Unknown names yield an empty list rather than an error.
pub fn unique_values_by_name(
    events: &[EventLogEntry],
    cases: &[CaseAttribute],
    name: &str,
) -> Vec<String> {
    match name.parse::<Field>() {
        Ok(field) => unique_values(events, cases, field),
        Err(_) => {
            debug!("Field {:?} is not present in either table", name);
            Vec::new()
        }
    }
}

fn collect_values<R: Record>(rows: &[R], field: Field, values: &mut BTreeSet<String>) {
    for row in rows {
        match row.field(field) {
            Some(value) if !value.is_empty() => {
                values.insert(value.into_owned());
            }
            Some(_) => {}
            // Field belongs to the other table
            None => return,
        }
    }
}

/// Equality constraints on record fields
///
/// A constraint on a field the record type does not carry is ignored,
/// so one set of filters applies to both tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    constraints: Vec<(Field, String)>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a constraint; empty values are ignored
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.constraints.push((field, value));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn constraints(&self) -> &[(Field, String)] {
        &self.constraints
    }

    /// Whether `record` satisfies every applicable constraint
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        self.constraints
            .iter()
            .all(|(field, expected)| match record.field(*field) {
                Some(actual) => actual == expected.as_str(),
                None => true,
            })
    }

    /// Rows satisfying every constraint, cloned
    pub fn apply<R: Record + Clone>(&self, rows: &[R]) -> Vec<R> {
        rows.iter().filter(|row| self.matches(*row)).cloned().collect()
    }
}

/// A single `field=value` constraint, as given on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterArg {
    pub field: Field,
    pub value: String,
}

impl FromStr for FilterArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, value) = s
            .split_once('=')
            .ok_or_else(|| format!("expected field=value, got {:?}", s))?;
        let field = name
            .trim()
            .parse::<Field>()
            .map_err(|UnknownField(name)| format!("unknown field {:?}", name))?;
        Ok(Self {
            field,
            value: value.trim().to_string(),
        })
    }
}

impl FromIterator<FilterArg> for Filters {
    fn from_iter<I: IntoIterator<Item = FilterArg>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Filters::new(), |filters, arg| filters.with(arg.field, arg.value))
    }
}
