//! Speedup Analysis
//!
//! Turns Criterion benchmark artifacts of competing schedulers into normalized
//! speedup comparisons and chart-ready tables.
//!
//! # Overview
//!
//! A benchmark group is a directory of scheduler variants, each holding one
//! Criterion run per parameter combination. This library:
//!
//! - **Loads** every run, decoding the swept parameters from the run's
//!   `value_str` descriptor and taking the mean point estimate as wallclock
//! - **Filters** rows before any aggregation
//! - **Derives** synthetic reference variants (e.g. `Ideal`)
//! - **Partitions** rows into comparison scopes, each with exactly one
//!   `Serial` baseline
//! - **Computes** `speedup = baseline / wallclock` and groups the result by
//!   scheduler into sorted series for plotting
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      Speedup Analysis                        │
//! ├──────────────────────────────────────────────────────────────┤
//! │  params/     - Parameter descriptor decoding                 │
//! │  loader/     - Criterion artifact discovery and loading      │
//! │  filter/     - Row predicates                                │
//! │  augment/    - Synthetic variants                            │
//! │  scope/      - Comparison scopes                             │
//! │  baseline/   - Baseline resolution                           │
//! │  speedup/    - Speedup records                               │
//! │  view/       - Views and pivot matrices                      │
//! │  export/     - JSON/NumPy export, plot hand-off              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use speedup_analysis::prelude::*;
//!
//! let config = Preset::LatencyHiding.config("target/criterion");
//! let pipeline = Pipeline::from_config(config)?;
//! let output = pipeline.process()?;
//!
//! ViewExporter::new("results").export(&output)?;
//! ```

pub mod augment;
pub mod baseline;
#[cfg(feature = "parallel")]
pub mod batch;
pub mod builder;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod observation;
pub mod params;
pub mod pipeline;
pub mod prelude;
pub mod presets;
pub mod scope;
pub mod speedup;
pub mod validation;
pub mod view;

// Re-exports - Errors
pub use error::{AnalysisError, Result};

// Re-exports - Data model
pub use observation::{Observation, ObservationTable};
pub use params::{DescriptorFormat, NumericPolicy, Parameters};

// Re-exports - Stages
pub use augment::SyntheticVariant;
pub use baseline::BaselineResolver;
pub use filter::{CompareOp, Condition, FilterRule, ObservationFilter};
pub use loader::{load_run, ObservationLoader, RunLocation};
pub use scope::{ComparisonScope, ScopeConfig};
pub use speedup::{SpeedupCalculator, SpeedupRecord};
pub use view::{PivotConfig, SeriesPoint, SpeedupMatrix, View, ViewBuilder};

// Re-exports - Config
pub use builder::PipelineBuilder;
pub use config::{AnalysisConfig, ExperimentMetadata, GroupConfig};
pub use presets::Preset;

// Re-exports - Export
pub use export::{
    ExportMetadata, JsonPlotRenderer, PlotConfig, PlotRenderer, PlotRequest, SeriesStyle,
    ViewExporter,
};

// Re-exports - Validation
pub use validation::{TableValidator, ValidationLevel, ValidationResult};

// Re-exports - Pipeline
pub use pipeline::{Pipeline, PipelineOutput};
