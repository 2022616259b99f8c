//! Data Export Module
//!
//! Writes analysis results for downstream tools.
//!
//! # Modules
//!
//! - **plot**: Plot requests and the [`PlotRenderer`] hand-off
//! - Core exports: views as JSON, pivot matrices as NumPy (.npy), run metadata
//!
//! # Output Layout
//!
//! ```text
//! <output_dir>/views.json                       # every View, series sorted by scheduler
//! <output_dir>/<scheduler>_matrix.npy           # pivot values [rows, columns] (optional)
//! <output_dir>/<scheduler>_matrix_axes.json     # pivot axis labels and values (optional)
//! <output_dir>/metadata.json                    # counts, group, timestamp
//! ```
//!
//! # Example
//!
//! ```ignore
//! use speedup_analysis::export::ViewExporter;
//!
//! let output = pipeline.process()?;
//! ViewExporter::new("results/map_reduce").export(&output)?;
//! ```

pub mod plot;

use crate::config::ExperimentMetadata;
use crate::error::{AnalysisError, Result};
use crate::pipeline::PipelineOutput;
use crate::view::{SeriesPoint, SpeedupMatrix, View};
use ndarray_npy::WriteNpyExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

pub use plot::{
    render_views, JsonPlotRenderer, PlotConfig, PlotDocument, PlotRenderer, PlotRequest,
    PlotSeries, SeriesStyle,
};

/// Metadata about an exported analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    /// Benchmark group name
    pub group: String,

    /// Baseline scheduler label
    pub baseline: String,

    /// Parameter on the x axis
    pub independent_variable: String,

    /// Observations loaded from disk
    pub observations_loaded: usize,

    /// Observations surviving the filters
    pub observations_retained: usize,

    /// Synthetic rows added by augmentation
    pub synthetic_rows: usize,

    /// Speedup records computed
    pub speedup_records: usize,

    /// Views produced (one per comparison scope)
    pub views: usize,

    /// Pivot matrix shape, if a pivot was configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matrix_shape: Option<(usize, usize)>,

    /// Non-fatal validation findings
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,

    /// Experiment metadata from the configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experiment: Option<ExperimentMetadata>,

    /// Export timestamp
    pub export_timestamp: String,
}

/// View as written to `views.json`, with series in scheduler order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewRecord {
    pub independent_variable: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_value: Option<f64>,
    pub series: BTreeMap<String, Vec<SeriesPoint>>,
}

impl From<&View> for ViewRecord {
    fn from(view: &View) -> Self {
        Self {
            independent_variable: view.independent_variable.clone(),
            scope_key: view.scope_key.clone(),
            scope_value: view.scope_value,
            series: view
                .series
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }
}

/// Axis labels of an exported matrix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixAxes {
    pub scheduler: String,
    pub row_variable: String,
    pub row_values: Vec<f64>,
    pub column_variable: String,
    pub column_values: Vec<f64>,
}

/// Files written by one export.
#[derive(Debug, Clone, Default)]
pub struct ExportedFiles {
    pub views: PathBuf,
    pub matrix: Option<PathBuf>,
    pub matrix_axes: Option<PathBuf>,
    pub metadata: PathBuf,
}

/// Exports pipeline output to JSON and NumPy files.
pub struct ViewExporter {
    output_dir: PathBuf,
    experiment: Option<ExperimentMetadata>,
}

impl ViewExporter {
    /// Create new exporter writing under `output_dir`
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            experiment: None,
        }
    }

    /// Copy experiment metadata into `metadata.json`.
    pub fn with_experiment(mut self, experiment: Option<ExperimentMetadata>) -> Self {
        self.experiment = experiment;
        self
    }

    /// Output directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Export views, the optional matrix, and metadata.
    pub fn export(&self, output: &PipelineOutput) -> Result<ExportedFiles> {
        fs::create_dir_all(&self.output_dir)?;

        let views = self.export_views(&output.views)?;

        let (matrix, matrix_axes) = match &output.matrix {
            Some(matrix) => {
                let (values, axes) = self.export_matrix(matrix)?;
                (Some(values), Some(axes))
            }
            None => (None, None),
        };

        let metadata = self.export_metadata(&ExportMetadata {
            group: output.group.clone(),
            baseline: output.baseline.clone(),
            independent_variable: output.independent_variable.clone(),
            observations_loaded: output.loaded,
            observations_retained: output.retained,
            synthetic_rows: output.synthetic,
            speedup_records: output.records.len(),
            views: output.views.len(),
            matrix_shape: output.matrix.as_ref().map(SpeedupMatrix::shape),
            warnings: output.validation.warnings(),
            experiment: self.experiment.clone(),
            export_timestamp: chrono::Utc::now().to_rfc3339(),
        })?;

        Ok(ExportedFiles {
            views,
            matrix,
            matrix_axes,
            metadata,
        })
    }

    /// Export views as a JSON array
    fn export_views(&self, views: &[View]) -> Result<PathBuf> {
        let records: Vec<ViewRecord> = views.iter().map(ViewRecord::from).collect();

        let path = self.output_dir.join("views.json");
        let file = File::create(&path)?;
        serde_json::to_writer_pretty(file, &records)?;

        log::info!("Exported {} views: {}", records.len(), path.display());
        Ok(path)
    }

    /// Export matrix values as a 2D NumPy array and its axes as JSON
    fn export_matrix(&self, matrix: &SpeedupMatrix) -> Result<(PathBuf, PathBuf)> {
        let stem = file_stem(&matrix.scheduler);

        let path = self.output_dir.join(format!("{stem}_matrix.npy"));
        let mut file = File::create(&path)?;
        matrix
            .values
            .write_npy(&mut file)
            .map_err(|e| AnalysisError::Serialization(format!("failed to write {}: {e}", path.display())))?;

        let axes_path = self.output_dir.join(format!("{stem}_matrix_axes.json"));
        let axes = MatrixAxes {
            scheduler: matrix.scheduler.clone(),
            row_variable: matrix.row_variable.clone(),
            row_values: matrix.row_values.clone(),
            column_variable: matrix.column_variable.clone(),
            column_values: matrix.column_values.clone(),
        };
        serde_json::to_writer_pretty(File::create(&axes_path)?, &axes)?;

        let (rows, cols) = matrix.shape();
        log::info!(
            "Exported matrix: {} [{} {} x {} {}]",
            path.display(),
            rows,
            matrix.row_variable,
            cols,
            matrix.column_variable
        );
        Ok((path, axes_path))
    }

    /// Export metadata as JSON
    fn export_metadata(&self, metadata: &ExportMetadata) -> Result<PathBuf> {
        let path = self.output_dir.join("metadata.json");
        let file = File::create(&path)?;
        serde_json::to_writer_pretty(file, metadata)?;

        log::info!("Exported metadata: {}", path.display());
        Ok(path)
    }
}

/// `"Latency Hiding"` → `"latency_hiding"`
fn file_stem(label: &str) -> String {
    label
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("Latency Hiding"), "latency_hiding");
        assert_eq!(file_stem("ProWS-R"), "prows_r");
    }
}
