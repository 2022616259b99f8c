//! Speedup derivation.
//!
//! `speedup = baseline_wallclock / observation_wallclock`. Values above 1 mean
//! the scheduler finished faster than the serial baseline.

use crate::error::{AnalysisError, Result};
use crate::params::Parameters;
use crate::scope::ComparisonScope;
use serde::{Deserialize, Serialize};

/// Speedup of one observation relative to its scope's baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedupRecord {
    /// Scheduler label of the observation
    pub scheduler: String,

    /// Value of the scope key for the scope this record was computed in
    pub scope_value: Option<f64>,

    /// Value of the independent variable
    pub x: f64,

    /// `baseline / wallclock`
    pub speedup: f64,

    /// Full parameter vector of the observation
    pub parameters: Parameters,
}

/// Computes speedup records for every non-baseline row of a scope.
#[derive(Debug, Clone)]
pub struct SpeedupCalculator {
    baseline_label: String,
    independent_variable: String,
}

impl SpeedupCalculator {
    /// Create a calculator.
    ///
    /// Rows labelled `baseline_label` are skipped; `independent_variable`
    /// names the parameter copied into [`SpeedupRecord::x`].
    pub fn new(baseline_label: impl Into<String>, independent_variable: impl Into<String>) -> Self {
        Self {
            baseline_label: baseline_label.into(),
            independent_variable: independent_variable.into(),
        }
    }

    /// Name of the independent variable.
    pub fn independent_variable(&self) -> &str {
        &self.independent_variable
    }

    /// One record per non-baseline row of `scope`, in scope order.
    pub fn compute(&self, scope: &ComparisonScope<'_>, baseline: f64) -> Result<Vec<SpeedupRecord>> {
        let mut records = Vec::with_capacity(scope.len());

        for row in scope.rows.iter().filter(|o| o.scheduler != self.baseline_label) {
            if row.wallclock == 0.0 {
                return Err(AnalysisError::DivisionByZero {
                    scheduler: row.scheduler.clone(),
                    scope: scope.to_string(),
                });
            }

            records.push(SpeedupRecord {
                scheduler: row.scheduler.clone(),
                scope_value: scope.value,
                x: row.param(&self.independent_variable)?,
                speedup: baseline / row.wallclock,
                parameters: row.parameters.clone(),
            });
        }

        log::debug!("Computed {} speedup records for [{}]", records.len(), scope);
        Ok(records)
    }
}
