//! Analysis configuration management.
//!
//! One [`AnalysisConfig`] describes a complete analysis of one benchmark
//! group: where the artifacts live, how descriptors are decoded, which rows
//! are filtered out, which synthetic variants are derived, how the table is
//! partitioned into comparison scopes, and how the result is presented.
//!
//! # Features
//!
//! - **Serialization**: Save/load configurations to TOML or JSON
//! - **Validation**: Ensure configurations are valid before use
//! - **Reproducibility**: Version control friendly configuration files
//!
//! # Example
//!
//! ```ignore
//! use speedup_analysis::config::AnalysisConfig;
//!
//! let config = AnalysisConfig::load_toml("analyses/map_reduce.toml")?;
//! let pipeline = Pipeline::from_config(config)?;
//! let output = pipeline.process()?;
//! ```

use crate::augment::SyntheticVariant;
use crate::baseline::DEFAULT_BASELINE;
use crate::export::PlotConfig;
use crate::filter::FilterRule;
use crate::params::DescriptorFormat;
use crate::scope::ScopeConfig;
use crate::view::PivotConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Default Criterion output directory, relative to the benchmarked crate.
pub const DEFAULT_CRITERION_DIR: &str = "target/criterion";

/// Complete configuration of one benchmark-group analysis.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnalysisConfig {
    /// Baseline scheduler label
    #[serde(default = "default_baseline")]
    pub baseline: String,

    /// Parameter on the x axis of every view
    pub independent_variable: String,

    /// Read run records on the rayon pool (requires the `parallel` feature)
    #[serde(default = "default_parallel_load")]
    pub parallel_load: bool,

    /// Benchmark group location
    pub group: GroupConfig,

    /// Descriptor delimiters and numeric policy
    #[serde(default)]
    pub descriptor: DescriptorFormat,

    /// Filter rules, applied before any aggregation
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<FilterRule>,

    /// Synthetic variants, applied in order after filtering
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub synthetic: Vec<SyntheticVariant>,

    /// Comparison scope partitioning
    #[serde(default)]
    pub scope: ScopeConfig,

    /// Optional two-parameter pivot of one scheduler
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pivot: Option<PivotConfig>,

    /// Presentation metadata handed to the plot renderer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot: Option<PlotConfig>,

    /// Experiment metadata (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ExperimentMetadata>,
}

/// Location of one benchmark group's artifacts.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GroupConfig {
    /// Criterion output directory (`target/criterion`)
    #[serde(default = "default_criterion_dir")]
    pub criterion_dir: PathBuf,

    /// Benchmark group name (directory under `criterion_dir`)
    pub name: String,

    /// Fixed, ordered variant list; every variant directory when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variants: Option<Vec<String>>,
}

/// Experiment metadata for tracking and reproducibility.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExperimentMetadata {
    /// Experiment name
    pub name: String,

    /// Description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Version or git commit of the benchmarked code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Custom tags
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

fn default_baseline() -> String {
    DEFAULT_BASELINE.to_string()
}

fn default_parallel_load() -> bool {
    true
}

fn default_criterion_dir() -> PathBuf {
    PathBuf::from(DEFAULT_CRITERION_DIR)
}

impl GroupConfig {
    /// Group named `name` under the default Criterion directory.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            criterion_dir: default_criterion_dir(),
            name: name.into(),
            variants: None,
        }
    }

    /// Group root directory.
    pub fn root(&self) -> PathBuf {
        self.criterion_dir.join(&self.name)
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            baseline: default_baseline(),
            independent_variable: "Cores".to_string(),
            parallel_load: default_parallel_load(),
            group: GroupConfig::new("MapReduce Fib"),
            descriptor: DescriptorFormat::default(),
            filters: Vec::new(),
            synthetic: Vec::new(),
            scope: ScopeConfig::default(),
            pivot: None,
            plot: None,
            metadata: None,
        }
    }
}

impl AnalysisConfig {
    /// Create a default configuration for the group `name`.
    pub fn new(group: impl Into<String>) -> Self {
        Self {
            group: GroupConfig::new(group),
            ..Self::default()
        }
    }

    /// Set the Criterion output directory.
    pub fn with_criterion_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.group.criterion_dir = dir.into();
        self
    }

    /// Set experiment metadata.
    pub fn with_metadata(mut self, metadata: ExperimentMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Validate the configuration.
    ///
    /// Returns Ok(()) if valid, Err(msg) otherwise.
    pub fn validate(&self) -> Result<(), String> {
        if self.group.name.trim().is_empty() {
            return Err("group name must not be empty".to_string());
        }
        if self.baseline.trim().is_empty() {
            return Err("baseline label must not be empty".to_string());
        }
        if self.independent_variable.trim().is_empty() {
            return Err("independent variable must not be empty".to_string());
        }

        self.descriptor.validate()?;

        if let Some(variants) = &self.group.variants {
            if variants.is_empty() {
                return Err("variant list must not be empty when given".to_string());
            }
            if !variants.iter().any(|v| *v == self.baseline) {
                return Err(format!(
                    "variant list {:?} does not include baseline '{}'",
                    variants, self.baseline
                ));
            }
        }

        for variant in &self.synthetic {
            if variant.label.trim().is_empty() {
                return Err("synthetic variant label must not be empty".to_string());
            }
            // A copy labelled as the baseline would duplicate the baseline row
            if variant.label == self.baseline {
                return Err(format!(
                    "synthetic variant label '{}' equals the baseline label",
                    variant.label
                ));
            }
        }

        if self.scope.shared_schedulers.contains(&self.baseline) {
            return Err(format!(
                "baseline '{}' cannot be a shared scheduler",
                self.baseline
            ));
        }
        if let Some(key) = &self.scope.key {
            if *key == self.independent_variable {
                return Err(format!(
                    "scope key '{key}' cannot also be the independent variable"
                ));
            }
        }

        if let Some(pivot) = &self.pivot {
            pivot.validate()?;
        }
        if let Some(plot) = &self.plot {
            plot.validate()?;
            if self.scope.key.is_some() && !plot.is_scoped() {
                return Err(format!(
                    "plot file name '{}' needs a {{scope}} placeholder when scoping by a key",
                    plot.file_name
                ));
            }
        }

        Ok(())
    }

    /// Save configuration to TOML file.
    ///
    /// # Example
    ///
    /// ```ignore
    /// config.save_toml("analyses/map_reduce.toml")?;
    /// ```
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let toml_string = toml::to_string_pretty(self)?;
        fs::write(path, toml_string)?;
        Ok(())
    }

    /// Load configuration from TOML file.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let config: AnalysisConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let json_string = serde_json::to_string_pretty(self)?;
        fs::write(path, json_string)?;
        Ok(())
    }

    /// Load configuration from JSON file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let config: AnalysisConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }
}
