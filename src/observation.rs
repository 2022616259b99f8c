//! Observations and the observation table.
//!
//! An [`Observation`] is one Criterion run reduced to what the analysis needs:
//! the scheduler variant it measured, its decoded parameter vector, and the
//! mean wallclock reported upstream. An [`ObservationTable`] is the working
//! unit every pipeline stage consumes and produces.

use crate::error::{AnalysisError, Result};
use crate::params::Parameters;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One benchmark measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Scheduler variant (variant directory name, or a synthetic label)
    pub scheduler: String,

    /// Decoded swept parameters
    pub parameters: Parameters,

    /// Mean point estimate from `estimates.json`
    pub wallclock: f64,
}

impl Observation {
    /// Create a new observation.
    pub fn new(scheduler: impl Into<String>, parameters: Parameters, wallclock: f64) -> Self {
        Self {
            scheduler: scheduler.into(),
            parameters,
            wallclock,
        }
    }

    /// Value of parameter `name`.
    ///
    /// A missing key means this row does not follow the group's schema.
    pub fn param(&self, name: &str) -> Result<f64> {
        self.parameters
            .get(name)
            .copied()
            .ok_or_else(|| AnalysisError::SchemaMismatch {
                scheduler: self.scheduler.clone(),
                expected: vec![name.to_string()],
                found: self.parameters.keys().cloned().collect(),
            })
    }

    /// Copy of this observation under a different scheduler label.
    pub fn relabeled(&self, scheduler: &str) -> Self {
        Self {
            scheduler: scheduler.to_string(),
            parameters: self.parameters.clone(),
            wallclock: self.wallclock,
        }
    }

    /// Parameter names of this observation, sorted.
    pub fn keys(&self) -> BTreeSet<&str> {
        self.parameters.keys().map(String::as_str).collect()
    }
}

/// Ordered collection of observations.
///
/// Stages never shrink a table in place: filtering and augmenting build a new
/// one, so the loaded table stays available for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservationTable {
    rows: Vec<Observation>,
}

impl ObservationTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table from rows, keeping their order.
    pub fn from_rows(rows: Vec<Observation>) -> Self {
        Self { rows }
    }

    /// Append one observation.
    pub fn push(&mut self, observation: Observation) {
        self.rows.push(observation);
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no observations.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All observations, in table order.
    pub fn rows(&self) -> &[Observation] {
        &self.rows
    }

    /// Iterate over observations.
    pub fn iter(&self) -> impl Iterator<Item = &Observation> {
        self.rows.iter()
    }

    /// Consume the table, returning its rows.
    pub fn into_rows(self) -> Vec<Observation> {
        self.rows
    }

    /// Distinct scheduler labels, sorted.
    pub fn schedulers(&self) -> BTreeSet<&str> {
        self.rows.iter().map(|o| o.scheduler.as_str()).collect()
    }

    /// Observations with the given scheduler label.
    pub fn with_scheduler<'a>(&'a self, scheduler: &'a str) -> impl Iterator<Item = &'a Observation> {
        self.rows.iter().filter(move |o| o.scheduler == scheduler)
    }

    /// Distinct values of parameter `name`, ascending.
    pub fn distinct_values(&self, name: &str) -> Result<Vec<f64>> {
        let mut values = Vec::new();
        for row in &self.rows {
            values.push(row.param(name)?);
        }
        values.sort_by(f64::total_cmp);
        values.dedup();
        Ok(values)
    }

    /// Verify every observation has the same parameter key set.
    ///
    /// Returns the shared key set (empty for an empty table). The first row
    /// defines the expected schema; the first deviating row is reported.
    pub fn schema(&self) -> Result<BTreeSet<String>> {
        let Some(first) = self.rows.first() else {
            return Ok(BTreeSet::new());
        };
        let expected: BTreeSet<String> = first.parameters.keys().cloned().collect();

        for row in &self.rows[1..] {
            if row.parameters.len() != expected.len()
                || !row.parameters.keys().all(|k| expected.contains(k))
            {
                return Err(AnalysisError::SchemaMismatch {
                    scheduler: row.scheduler.clone(),
                    expected: expected.iter().cloned().collect(),
                    found: row.parameters.keys().cloned().collect(),
                });
            }
        }

        Ok(expected)
    }
}

impl FromIterator<Observation> for ObservationTable {
    fn from_iter<I: IntoIterator<Item = Observation>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl Extend<Observation> for ObservationTable {
    fn extend<I: IntoIterator<Item = Observation>>(&mut self, iter: I) {
        self.rows.extend(iter);
    }
}

impl<'a> IntoIterator for &'a ObservationTable {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(scheduler: &str, pairs: &[(&str, f64)], wallclock: f64) -> Observation {
        let parameters = pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        Observation::new(scheduler, parameters, wallclock)
    }

    #[test]
    fn test_param_lookup() {
        let o = obs("Classic", &[("Cores", 4.0)], 10.0);
        assert_eq!(o.param("Cores").unwrap(), 4.0);
        assert!(matches!(
            o.param("Latency ms"),
            Err(AnalysisError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_relabeled_copy_leaves_source() {
        let o = obs("Classic", &[("Cores", 4.0)], 10.0);
        let ideal = o.relabeled("Ideal");
        assert_eq!(ideal.scheduler, "Ideal");
        assert_eq!(ideal.parameters, o.parameters);
        assert_eq!(o.scheduler, "Classic");
    }

    #[test]
    fn test_distinct_values_sorted() {
        let table = ObservationTable::from_rows(vec![
            obs("Classic", &[("Cores", 8.0)], 1.0),
            obs("Classic", &[("Cores", 2.0)], 1.0),
            obs("Latency Hiding", &[("Cores", 8.0)], 1.0),
        ]);
        assert_eq!(table.distinct_values("Cores").unwrap(), vec![2.0, 8.0]);
    }

    #[test]
    fn test_schema_consistent() {
        let table = ObservationTable::from_rows(vec![
            obs("Serial", &[("Cores", 1.0), ("Latency ms", 0.0)], 1.0),
            obs("Classic", &[("Latency ms", 0.0), ("Cores", 2.0)], 1.0),
        ]);
        let schema = table.schema().unwrap();
        assert_eq!(schema.len(), 2);
        assert!(schema.contains("Cores"));
    }

    #[test]
    fn test_schema_mismatch_detected() {
        let table = ObservationTable::from_rows(vec![
            obs("Serial", &[("Cores", 1.0), ("Latency ms", 0.0)], 1.0),
            obs("Classic", &[("Cores", 2.0), ("Fib N", 30.0)], 1.0),
        ]);
        match table.schema() {
            Err(AnalysisError::SchemaMismatch { scheduler, .. }) => assert_eq!(scheduler, "Classic"),
            other => panic!("expected schema mismatch, got {other:?}"),
        }

        let subset = ObservationTable::from_rows(vec![
            obs("Serial", &[("Cores", 1.0), ("Latency ms", 0.0)], 1.0),
            obs("Classic", &[("Cores", 2.0)], 1.0),
        ]);
        assert!(subset.schema().is_err());
    }

    #[test]
    fn test_empty_table_schema() {
        assert!(ObservationTable::new().schema().unwrap().is_empty());
    }

    #[test]
    fn test_scheduler_queries() {
        let table: ObservationTable = vec![
            obs("Serial", &[("Cores", 1.0)], 100.0),
            obs("Classic", &[("Cores", 2.0)], 60.0),
            obs("Classic", &[("Cores", 4.0)], 35.0),
        ]
        .into_iter()
        .collect();

        assert_eq!(table.schedulers().len(), 2);
        assert_eq!(table.with_scheduler("Classic").count(), 2);
        assert_eq!(table.with_scheduler("Ideal").count(), 0);
    }
}
