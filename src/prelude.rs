//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and traits for
//! ergonomic usage of the speedup analysis library.
//!
//! # Usage
//!
//! ```ignore
//! use speedup_analysis::prelude::*;
//!
//! // Now you have access to all common types
//! let config = AnalysisConfig::load_toml("analysis.toml")?;
//! let pipeline = Pipeline::from_config(config)?;
//! let output = pipeline.process()?;
//! ```
//!
//! # What's Included
//!
//! ## Core Pipeline
//! - [`Pipeline`] - Main analysis pipeline
//! - [`PipelineBuilder`] - Fluent configuration
//! - [`AnalysisConfig`] - Serializable analysis configuration
//! - [`Preset`] - Standard analyses
//!
//! ## Stages
//! - [`ObservationLoader`], [`ObservationFilter`], [`SyntheticVariant`],
//!   [`ScopeConfig`], [`BaselineResolver`], [`SpeedupCalculator`], [`ViewBuilder`]
//!
//! ## Export
//! - [`ViewExporter`] - JSON/NumPy export
//! - [`PlotRenderer`] - Plot hand-off trait, [`JsonPlotRenderer`]

// ============================================================================
// Core Pipeline
// ============================================================================

pub use crate::builder::PipelineBuilder;
pub use crate::config::{AnalysisConfig, ExperimentMetadata, GroupConfig};
pub use crate::pipeline::{Pipeline, PipelineOutput};
pub use crate::presets::Preset;

// ============================================================================
// Data Model
// ============================================================================

pub use crate::error::{AnalysisError, Result};
pub use crate::observation::{Observation, ObservationTable};
pub use crate::params::{DescriptorFormat, NumericPolicy, Parameters};

// ============================================================================
// Stages
// ============================================================================

pub use crate::augment::SyntheticVariant;
pub use crate::baseline::BaselineResolver;
pub use crate::filter::{CompareOp, Condition, FilterRule, ObservationFilter};
pub use crate::loader::ObservationLoader;
pub use crate::scope::{ComparisonScope, ScopeConfig};
pub use crate::speedup::{SpeedupCalculator, SpeedupRecord};
pub use crate::view::{PivotConfig, SeriesPoint, SpeedupMatrix, View, ViewBuilder};

// ============================================================================
// Export
// ============================================================================

pub use crate::export::{
    render_views, JsonPlotRenderer, PlotConfig, PlotRenderer, PlotRequest, SeriesStyle,
    ViewExporter,
};

// ============================================================================
// Validation
// ============================================================================

pub use crate::validation::{TableValidator, ValidationLevel, ValidationResult};

// ============================================================================
// Batch Analysis (parallel feature)
// ============================================================================

#[cfg(feature = "parallel")]
pub use crate::batch::{BatchAnalyzer, BatchConfig, BatchOutput, ErrorMode, GroupResult};
