//! Fluent builder for analysis configuration.
//!
//! This module provides a builder pattern for constructing analysis
//! configurations in a clean, readable manner.
//!
//! # Quick Start
//!
//! ```ignore
//! use speedup_analysis::PipelineBuilder;
//!
//! // Whole-table analysis with defaults (Serial baseline, Cores on x)
//! let pipeline = PipelineBuilder::new("MapReduce Fib").build()?;
//! let output = pipeline.process()?;
//! ```
//!
//! # Presets Reference
//!
//! | Preset | Group | Scope key | x axis |
//! |--------|-------|-----------|--------|
//! | `LatencyHiding` | MapReduce Fib | Latency ms | Cores |
//! | `SchedulerOverhead` | MapReduce Fib | none | Cores |
//! | `ParameterSweep` | Fib Parameter Sweep | Work ms | Latency p |
//!
//! # Common Configurations
//!
//! ## One chart per latency with an ideal reference curve
//!
//! ```ignore
//! let pipeline = PipelineBuilder::new("MapReduce Fib")
//!     .exclude(Condition::param_gt("Cores", 35.0))
//!     .synthetic(SyntheticVariant::ideal_from_zero_latency("Classic"))
//!     .scope(ScopeConfig::by("Latency ms").skipping(0.0).sharing("Ideal"))
//!     .build()?;
//! ```
//!
//! ## Preset with an overridden artifact location
//!
//! ```ignore
//! let pipeline = PipelineBuilder::from_preset(Preset::ParameterSweep)
//!     .criterion_dir("/mnt/results/criterion")
//!     .build()?;
//! ```

use crate::augment::SyntheticVariant;
use crate::config::{AnalysisConfig, ExperimentMetadata};
use crate::error::{AnalysisError, Result};
use crate::export::PlotConfig;
use crate::filter::{Condition, FilterRule};
use crate::params::DescriptorFormat;
use crate::pipeline::Pipeline;
use crate::presets::Preset;
use crate::scope::ScopeConfig;
use crate::view::PivotConfig;
use std::path::PathBuf;

/// Fluent builder for creating analysis configurations.
///
/// # Example
///
/// ```ignore
/// use speedup_analysis::PipelineBuilder;
///
/// let pipeline = PipelineBuilder::new("Fib Parameter Sweep")
///     .descriptor(DescriptorFormat::float())
///     .scope_by("Work ms")
///     .independent_variable("Latency p")
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct PipelineBuilder {
    config: AnalysisConfig,
}

impl PipelineBuilder {
    /// Create a new builder for the benchmark group `group`.
    ///
    /// Default configuration:
    /// - Artifacts under `target/criterion`
    /// - `Serial` baseline, `Cores` on the x axis
    /// - Integer descriptors `"Name: Value | ..."`
    /// - No filters, a single comparison scope
    pub fn new(group: impl Into<String>) -> Self {
        Self {
            config: AnalysisConfig::new(group),
        }
    }

    /// Start from a preset.
    pub fn from_preset(preset: Preset) -> Self {
        Self {
            config: preset.config(crate::config::DEFAULT_CRITERION_DIR),
        }
    }

    /// Start from an existing configuration.
    pub fn from_config(config: AnalysisConfig) -> Self {
        Self { config }
    }

    // =========================================================================
    // Artifacts
    // =========================================================================

    /// Set the Criterion output directory.
    pub fn criterion_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.group.criterion_dir = dir.into();
        self
    }

    /// Load only these variants, in this order.
    pub fn variants<I, S>(mut self, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.group.variants = Some(variants.into_iter().map(Into::into).collect());
        self
    }

    /// Set the descriptor format.
    pub fn descriptor(mut self, format: DescriptorFormat) -> Self {
        self.config.descriptor = format;
        self
    }

    /// Read run records sequentially or on the rayon pool.
    pub fn parallel_load(mut self, enabled: bool) -> Self {
        self.config.parallel_load = enabled;
        self
    }

    // =========================================================================
    // Analysis
    // =========================================================================

    /// Drop rows where `when` holds.
    pub fn exclude(mut self, when: Condition) -> Self {
        self.config.filters.push(FilterRule::Exclude { when });
        self
    }

    /// Drop rows where `when` does not hold.
    pub fn require(mut self, when: Condition) -> Self {
        self.config.filters.push(FilterRule::Require { when });
        self
    }

    /// Add a synthetic variant.
    pub fn synthetic(mut self, variant: SyntheticVariant) -> Self {
        self.config.synthetic.push(variant);
        self
    }

    /// Set the scope configuration.
    pub fn scope(mut self, scope: ScopeConfig) -> Self {
        self.config.scope = scope;
        self
    }

    /// One scope per distinct value of `key`.
    pub fn scope_by(self, key: impl Into<String>) -> Self {
        self.scope(ScopeConfig::by(key))
    }

    /// Set the baseline scheduler label.
    pub fn baseline(mut self, label: impl Into<String>) -> Self {
        self.config.baseline = label.into();
        self
    }

    /// Set the parameter on the x axis.
    pub fn independent_variable(mut self, name: impl Into<String>) -> Self {
        self.config.independent_variable = name.into();
        self
    }

    /// Pivot one scheduler's speedups over two parameters.
    pub fn pivot(mut self, pivot: PivotConfig) -> Self {
        self.config.pivot = Some(pivot);
        self
    }

    /// Set presentation metadata.
    pub fn plot(mut self, plot: PlotConfig) -> Self {
        self.config.plot = Some(plot);
        self
    }

    // =========================================================================
    // Metadata
    // =========================================================================

    /// Set experiment metadata.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let builder = PipelineBuilder::new("MapReduce Fib")
    ///     .experiment("latency_v2", "Latency sweep after the deque rewrite");
    /// ```
    pub fn experiment(mut self, name: &str, description: &str) -> Self {
        self.config.metadata = Some(ExperimentMetadata {
            name: name.to_string(),
            description: Some(description.to_string()),
            version: None,
            tags: None,
        });
        self
    }

    /// Set experiment metadata with full control.
    pub fn with_metadata(mut self, metadata: ExperimentMetadata) -> Self {
        self.config.metadata = Some(metadata);
        self
    }

    // =========================================================================
    // Build
    // =========================================================================

    /// Build the analysis configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build_config(self) -> std::result::Result<AnalysisConfig, String> {
        self.config.validate()?;
        Ok(self.config)
    }

    /// Build and return a ready-to-use Pipeline.
    pub fn build(self) -> Result<Pipeline> {
        let config = self.build_config().map_err(AnalysisError::InvalidConfig)?;
        Pipeline::from_config(config)
    }

    /// Get a summary of the current configuration.
    pub fn summary(&self) -> String {
        let scope_desc = match &self.config.scope.key {
            Some(key) => format!("by '{key}'"),
            None => "whole table".to_string(),
        };

        format!(
            "PipelineBuilder Summary:\n\
             - Group: {}\n\
             - Baseline: {}\n\
             - Independent variable: {}\n\
             - Filters: {}\n\
             - Synthetic variants: {}\n\
             - Scope: {}\n\
             - Pivot: {}",
            self.config.group.root().display(),
            self.config.baseline,
            self.config.independent_variable,
            self.config.filters.len(),
            self.config.synthetic.len(),
            scope_desc,
            self.config.pivot.is_some(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_default() {
        let config = PipelineBuilder::new("MapReduce Fib").build_config().unwrap();
        assert_eq!(config.baseline, "Serial");
        assert_eq!(config.independent_variable, "Cores");
        assert!(config.filters.is_empty());
        assert!(config.scope.key.is_none());
    }

    #[test]
    fn test_builder_chain() {
        let config = PipelineBuilder::new("MapReduce Fib")
            .criterion_dir("/tmp/criterion")
            .exclude(Condition::param_gt("Cores", 35.0))
            .require(Condition::param_eq("Fib N", 30.0))
            .synthetic(SyntheticVariant::ideal_from_zero_latency("Classic"))
            .scope(ScopeConfig::by("Latency ms").skipping(0.0).sharing("Ideal"))
            .parallel_load(false)
            .experiment("latency", "test")
            .build_config()
            .unwrap();

        assert_eq!(config.filters.len(), 2);
        assert_eq!(config.synthetic.len(), 1);
        assert!(!config.parallel_load);
        assert_eq!(config.group.criterion_dir, PathBuf::from("/tmp/criterion"));
    }

    #[test]
    fn test_builder_rejects_invalid() {
        let result = PipelineBuilder::new("MapReduce Fib")
            .synthetic(SyntheticVariant::new("Serial", Condition::scheduler_is("Classic")))
            .build();
        assert!(matches!(result, Err(AnalysisError::InvalidConfig(_))));
    }

    #[test]
    fn test_from_preset() {
        let builder = PipelineBuilder::from_preset(Preset::ParameterSweep).criterion_dir("/data");
        let summary = builder.summary();
        assert!(summary.contains("Fib Parameter Sweep"));
        assert!(summary.contains("by 'Work ms'"));
        assert!(builder.build().is_ok());
    }
}
