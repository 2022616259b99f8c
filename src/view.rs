//! Views: speedup records shaped for plotting.
//!
//! A [`View`] groups one scope's speedup records by scheduler. Each series is
//! sorted ascending by the independent variable; the order of the series
//! themselves carries no meaning. A [`SpeedupMatrix`] pivots one scheduler's
//! records over two parameters for heatmap-style presentation.

use crate::error::{AnalysisError, Result};
use crate::speedup::SpeedupRecord;
use ahash::AHashMap;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// One plotted point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub x: f64,
    pub speedup: f64,
}

/// Speedup series of one comparison scope, keyed by scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View {
    /// Parameter on the x axis
    pub independent_variable: String,

    /// Scope key the view was partitioned by
    pub scope_key: Option<String>,

    /// Scope key value of this view
    pub scope_value: Option<f64>,

    /// Points per scheduler, each sorted ascending by `x`
    pub series: AHashMap<String, Vec<SeriesPoint>>,
}

impl View {
    /// Series for `scheduler`, if present.
    pub fn series(&self, scheduler: &str) -> Option<&[SeriesPoint]> {
        self.series.get(scheduler).map(Vec::as_slice)
    }

    /// Scheduler labels in this view, sorted for stable presentation.
    pub fn schedulers(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.series.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Total number of points across all series.
    pub fn point_count(&self) -> usize {
        self.series.values().map(Vec::len).sum()
    }

    /// Human-readable scope label (`"Latency ms = 50"` or `"all"`).
    pub fn scope_label(&self) -> String {
        match (&self.scope_key, self.scope_value) {
            (Some(key), Some(value)) => format!("{key} = {value}"),
            _ => "all".to_string(),
        }
    }
}

/// Groups speedup records into a [`View`].
#[derive(Debug, Clone)]
pub struct ViewBuilder {
    independent_variable: String,
    scope_key: Option<String>,
}

impl ViewBuilder {
    pub fn new(independent_variable: impl Into<String>) -> Self {
        Self {
            independent_variable: independent_variable.into(),
            scope_key: None,
        }
    }

    /// Record the scope key on built views.
    pub fn with_scope_key(mut self, key: Option<String>) -> Self {
        self.scope_key = key;
        self
    }

    /// Build the view of one scope.
    ///
    /// Two records of the same scheduler at the same `x` are a
    /// [`AnalysisError::DuplicateObservation`].
    pub fn build(&self, scope_value: Option<f64>, records: &[SpeedupRecord]) -> Result<View> {
        let mut series: AHashMap<String, Vec<SeriesPoint>> = AHashMap::new();
        for record in records {
            series
                .entry(record.scheduler.clone())
                .or_default()
                .push(SeriesPoint {
                    x: record.x,
                    speedup: record.speedup,
                });
        }

        for (scheduler, points) in series.iter_mut() {
            points.sort_by(|a, b| a.x.total_cmp(&b.x));
            if let Some(pair) = points.windows(2).find(|w| w[0].x == w[1].x) {
                return Err(AnalysisError::DuplicateObservation {
                    scheduler: scheduler.clone(),
                    location: format!(
                        "{} = {}{}",
                        self.independent_variable,
                        pair[0].x,
                        self.scope_suffix(scope_value)
                    ),
                });
            }
        }

        Ok(View {
            independent_variable: self.independent_variable.clone(),
            scope_key: self.scope_key.clone(),
            scope_value,
            series,
        })
    }

    fn scope_suffix(&self, scope_value: Option<f64>) -> String {
        match (&self.scope_key, scope_value) {
            (Some(key), Some(value)) => format!(" in scope [{key} = {value}]"),
            _ => String::new(),
        }
    }
}

/// Pivot of one scheduler's speedups over two parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotConfig {
    /// Scheduler whose records are pivoted
    pub scheduler: String,

    /// Parameter on the matrix rows
    pub rows: String,

    /// Parameter on the matrix columns
    pub columns: String,

    /// Order rows descending (largest value in row 0)
    #[serde(default)]
    pub descending_rows: bool,
}

impl PivotConfig {
    pub fn new(scheduler: impl Into<String>, rows: impl Into<String>, columns: impl Into<String>) -> Self {
        Self {
            scheduler: scheduler.into(),
            rows: rows.into(),
            columns: columns.into(),
            descending_rows: false,
        }
    }

    /// Put the largest row value first.
    pub fn descending(mut self) -> Self {
        self.descending_rows = true;
        self
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.scheduler.is_empty() {
            return Err("pivot scheduler must not be empty".to_string());
        }
        if self.rows == self.columns {
            return Err(format!(
                "pivot rows and columns must be different parameters (both '{}')",
                self.rows
            ));
        }
        Ok(())
    }

    /// Pivot the records of the configured scheduler into a matrix.
    ///
    /// Every (row, column) combination of the observed values must be filled
    /// exactly once.
    pub fn pivot(&self, records: &[SpeedupRecord]) -> Result<SpeedupMatrix> {
        let mut cells = Vec::new();
        for record in records.iter().filter(|r| r.scheduler == self.scheduler) {
            let row = self.param(record, &self.rows)?;
            let column = self.param(record, &self.columns)?;
            cells.push((row, column, record.speedup));
        }
        if cells.is_empty() {
            return Err(AnalysisError::IncompletePivot {
                scheduler: self.scheduler.clone(),
                location: "any cell (scheduler has no records)".to_string(),
            });
        }

        let mut row_values: Vec<f64> = cells.iter().map(|c| c.0).collect();
        row_values.sort_by(f64::total_cmp);
        row_values.dedup();
        if self.descending_rows {
            row_values.reverse();
        }

        let mut column_values: Vec<f64> = cells.iter().map(|c| c.1).collect();
        column_values.sort_by(f64::total_cmp);
        column_values.dedup();

        let shape = (row_values.len(), column_values.len());
        let mut values = Array2::from_elem(shape, f64::NAN);
        let mut filled = Array2::from_elem(shape, false);

        for (row, column, speedup) in cells {
            let i = position(&row_values, row);
            let j = position(&column_values, column);
            if filled[[i, j]] {
                return Err(AnalysisError::DuplicateObservation {
                    scheduler: self.scheduler.clone(),
                    location: self.cell_label(row, column),
                });
            }
            filled[[i, j]] = true;
            values[[i, j]] = speedup;
        }

        if let Some(((i, j), _)) = filled.indexed_iter().find(|(_, set)| !**set) {
            return Err(AnalysisError::IncompletePivot {
                scheduler: self.scheduler.clone(),
                location: self.cell_label(row_values[i], column_values[j]),
            });
        }

        log::debug!(
            "Pivoted '{}' into {}x{} matrix ({} x {})",
            self.scheduler,
            shape.0,
            shape.1,
            self.rows,
            self.columns
        );

        Ok(SpeedupMatrix {
            scheduler: self.scheduler.clone(),
            row_variable: self.rows.clone(),
            column_variable: self.columns.clone(),
            row_values,
            column_values,
            values,
        })
    }

    fn param(&self, record: &SpeedupRecord, name: &str) -> Result<f64> {
        record
            .parameters
            .get(name)
            .copied()
            .ok_or_else(|| AnalysisError::SchemaMismatch {
                scheduler: record.scheduler.clone(),
                expected: vec![name.to_string()],
                found: record.parameters.keys().cloned().collect(),
            })
    }

    fn cell_label(&self, row: f64, column: f64) -> String {
        format!("{} = {}, {} = {}", self.rows, row, self.columns, column)
    }
}

// Values come from the same dedup'd list, so the lookup always succeeds.
fn position(values: &[f64], value: f64) -> usize {
    values.iter().position(|v| *v == value).unwrap_or_default()
}

/// Dense speedup matrix with labelled axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedupMatrix {
    pub scheduler: String,
    pub row_variable: String,
    pub column_variable: String,
    pub row_values: Vec<f64>,
    pub column_values: Vec<f64>,
    pub values: Array2<f64>,
}

impl SpeedupMatrix {
    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    /// Speedup at the given parameter values.
    pub fn get(&self, row: f64, column: f64) -> Option<f64> {
        let i = self.row_values.iter().position(|v| *v == row)?;
        let j = self.column_values.iter().position(|v| *v == column)?;
        Some(self.values[[i, j]])
    }
}
