//! Comparison scopes.
//!
//! A scope is the set of rows over which exactly one baseline must exist and
//! speedups are computed. Scopes are data-driven: with a scope key such as
//! `"Latency ms"`, every distinct latency in the filtered table gets its own
//! scope. Rows of *shared* schedulers (typically the synthetic `Ideal`
//! reference curve) join every scope regardless of their key value.
//!
//! Without a scope key the whole table is a single scope.

use crate::error::Result;
use crate::observation::{Observation, ObservationTable};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the table is partitioned into comparison scopes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScopeConfig {
    /// Parameter whose distinct values define the scopes (`None` = one scope)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Key values that do not get a scope of their own (e.g. latency 0)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skip_values: Vec<f64>,

    /// Schedulers whose rows join every scope
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shared_schedulers: Vec<String>,
}

impl ScopeConfig {
    /// A single scope covering the whole table.
    pub fn whole_table() -> Self {
        Self::default()
    }

    /// One scope per distinct value of `key`.
    pub fn by(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..Self::default()
        }
    }

    /// Do not create a scope for `value`.
    pub fn skipping(mut self, value: f64) -> Self {
        self.skip_values.push(value);
        self
    }

    /// Include `scheduler`'s rows in every scope.
    pub fn sharing(mut self, scheduler: impl Into<String>) -> Self {
        self.shared_schedulers.push(scheduler.into());
        self
    }

    fn is_shared(&self, observation: &Observation) -> bool {
        self.shared_schedulers
            .iter()
            .any(|s| *s == observation.scheduler)
    }

    /// Partition `table` into comparison scopes, ordered by ascending key value.
    pub fn partition<'a>(&'a self, table: &'a ObservationTable) -> Result<Vec<ComparisonScope<'a>>> {
        let Some(key) = &self.key else {
            return Ok(vec![ComparisonScope {
                key: None,
                value: None,
                rows: table.iter().collect(),
            }]);
        };

        let mut values = Vec::new();
        for row in table.iter().filter(|o| !self.is_shared(o)) {
            values.push(row.param(key)?);
        }
        values.sort_by(f64::total_cmp);
        values.dedup();
        values.retain(|v| !self.skip_values.contains(v));

        let mut scopes = Vec::with_capacity(values.len());
        for value in values {
            let mut rows = Vec::new();
            for row in table {
                if self.is_shared(row) || row.param(key)? == value {
                    rows.push(row);
                }
            }
            scopes.push(ComparisonScope {
                key: Some(key.as_str()),
                value: Some(value),
                rows,
            });
        }

        log::debug!("Partitioned {} rows into {} scopes by '{}'", table.len(), scopes.len(), key);
        Ok(scopes)
    }
}

/// Rows of one comparison scope, borrowed from the table.
#[derive(Debug, Clone)]
pub struct ComparisonScope<'a> {
    /// Scope key, if the table was partitioned
    pub key: Option<&'a str>,

    /// Key value of this scope
    pub value: Option<f64>,

    /// Rows in scope, in table order
    pub rows: Vec<&'a Observation>,
}

impl ComparisonScope<'_> {
    /// Number of rows in scope.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the scope has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl fmt::Display for ComparisonScope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.key, self.value) {
            (Some(key), Some(value)) => write!(f, "{key} = {value}"),
            _ => write!(f, "all observations"),
        }
    }
}
