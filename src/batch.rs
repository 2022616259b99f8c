//! Parallel batch analysis of several benchmark groups.
//!
//! Each configuration is analyzed on its own worker of a local Rayon pool,
//! with its own [`Pipeline`] instance, so there is no shared mutable state.
//! Errors never cross group boundaries: one group failing does not touch the
//! views of another. Whether a failure aborts the batch is the [`ErrorMode`].
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                    BatchAnalyzer                      │
//! │  ┌────────────────────────────────────────────────┐  │
//! │  │               Rayon Thread Pool                 │  │
//! │  │  Thread 1        Thread 2        Thread N       │  │
//! │  │  ┌─────────┐    ┌─────────┐    ┌─────────┐      │  │
//! │  │  │Pipeline │    │Pipeline │    │Pipeline │      │  │
//! │  │  └────┬────┘    └────┬────┘    └────┬────┘      │  │
//! │  │  latency         overhead        sweep          │  │
//! │  │       ▼              ▼              ▼           │  │
//! │  │  GroupResult    GroupResult    GroupResult      │  │
//! │  └──────────────────────┬─────────────────────────┘  │
//! │                         ▼                             │
//! │                    BatchOutput                        │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use speedup_analysis::batch::{BatchAnalyzer, BatchConfig, ErrorMode};
//!
//! let configs: Vec<_> = Preset::ALL.iter().map(|p| p.config("target/criterion")).collect();
//! let analyzer = BatchAnalyzer::new(BatchConfig::new().with_error_mode(ErrorMode::CollectErrors));
//! let output = analyzer.process(&configs)?;
//!
//! println!("{} analyses succeeded in {:?}", output.successful_count(), output.elapsed);
//! ```

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::pipeline::{Pipeline, PipelineOutput};
use rayon::prelude::*;
use std::time::{Duration, Instant};

// ============================================================================
// Configuration
// ============================================================================

/// Error handling mode for batch analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Return the first failure, in input order (default).
    #[default]
    FailFast,

    /// Analyze every group and collect the failures.
    CollectErrors,
}

/// Configuration for batch analysis.
#[derive(Debug, Clone, Default)]
pub struct BatchConfig {
    /// Number of threads to use.
    ///
    /// - `None`: Use Rayon default (typically num_cpus)
    /// - `Some(n)`: Use exactly n threads
    pub num_threads: Option<usize>,

    /// How to handle failed groups.
    pub error_mode: ErrorMode,
}

impl BatchConfig {
    /// Create a new batch configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of threads to use.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.num_threads = Some(threads);
        self
    }

    /// Set the error handling mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Get effective thread count.
    pub fn effective_threads(&self) -> usize {
        self.num_threads.unwrap_or_else(rayon::current_num_threads)
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.num_threads == Some(0) {
            return Err("thread count must be > 0".to_string());
        }
        Ok(())
    }
}

// ============================================================================
// Results
// ============================================================================

/// Result of one successful group analysis.
#[derive(Debug, Clone)]
pub struct GroupResult {
    /// Position of the configuration in the input slice
    pub index: usize,

    /// Analysis name (experiment name, else group name)
    pub name: String,

    pub output: PipelineOutput,

    pub elapsed: Duration,
}

/// A failed group analysis.
#[derive(Debug)]
pub struct GroupError {
    pub index: usize,
    pub name: String,
    pub error: AnalysisError,
}

/// Aggregated results from batch analysis.
#[derive(Debug)]
pub struct BatchOutput {
    /// Successful analyses, in input order.
    pub results: Vec<GroupResult>,

    /// Failed analyses, in input order (only populated with `CollectErrors`).
    pub errors: Vec<GroupError>,

    /// Total wall clock time.
    pub elapsed: Duration,

    /// Number of threads used.
    pub threads_used: usize,
}

impl BatchOutput {
    pub fn successful_count(&self) -> usize {
        self.results.len()
    }

    pub fn failed_count(&self) -> usize {
        self.errors.len()
    }

    pub fn all_successful(&self) -> bool {
        self.errors.is_empty()
    }

    /// Total views across all successful analyses.
    pub fn total_views(&self) -> usize {
        self.results.iter().map(|r| r.output.views.len()).sum()
    }

    /// Result for the analysis named `name`.
    pub fn get(&self, name: &str) -> Option<&GroupResult> {
        self.results.iter().find(|r| r.name == name)
    }
}

// ============================================================================
// Analyzer
// ============================================================================

/// Runs several analyses in parallel.
#[derive(Debug, Clone, Default)]
pub struct BatchAnalyzer {
    batch_config: BatchConfig,
}

impl BatchAnalyzer {
    pub fn new(batch_config: BatchConfig) -> Self {
        Self { batch_config }
    }

    pub fn batch_config(&self) -> &BatchConfig {
        &self.batch_config
    }

    /// Analyze every configuration.
    ///
    /// With [`ErrorMode::FailFast`] the first failure (in input order) is
    /// returned; the other groups still ran but their results are dropped.
    pub fn process(&self, configs: &[AnalysisConfig]) -> Result<BatchOutput> {
        self.batch_config
            .validate()
            .map_err(AnalysisError::InvalidConfig)?;

        let start = Instant::now();
        let threads_used = self.batch_config.effective_threads();

        // Local pool: build_global() only works once per process
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads_used)
            .build()
            .map_err(|e| AnalysisError::InvalidConfig(format!("failed to create thread pool: {e}")))?;

        let outcomes: Vec<(usize, String, Duration, Result<PipelineOutput>)> = pool.install(|| {
            configs
                .par_iter()
                .enumerate()
                .map(|(index, config)| {
                    let name = analysis_name(config);
                    let started = Instant::now();
                    let result = Pipeline::from_config(config.clone()).and_then(|p| p.process());
                    (index, name, started.elapsed(), result)
                })
                .collect()
        });

        let mut results = Vec::new();
        let mut errors = Vec::new();
        for (index, name, elapsed, result) in outcomes {
            match result {
                Ok(output) => results.push(GroupResult {
                    index,
                    name,
                    output,
                    elapsed,
                }),
                Err(error) => {
                    log::warn!("Analysis '{name}' failed: {error}");
                    if self.batch_config.error_mode == ErrorMode::FailFast {
                        return Err(error);
                    }
                    errors.push(GroupError { index, name, error });
                }
            }
        }

        log::info!(
            "Batch finished: {} succeeded, {} failed on {} threads in {:?}",
            results.len(),
            errors.len(),
            threads_used,
            start.elapsed()
        );

        Ok(BatchOutput {
            results,
            errors,
            elapsed: start.elapsed(),
            threads_used,
        })
    }
}

fn analysis_name(config: &AnalysisConfig) -> String {
    match &config.metadata {
        Some(metadata) => metadata.name.clone(),
        None => config.group.name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_config_builder() {
        let config = BatchConfig::new()
            .with_threads(4)
            .with_error_mode(ErrorMode::CollectErrors);
        assert_eq!(config.effective_threads(), 4);
        assert_eq!(config.error_mode, ErrorMode::CollectErrors);
        assert!(BatchConfig::new().with_threads(0).validate().is_err());
    }

    #[test]
    fn test_missing_groups_fail_fast() {
        let configs = vec![AnalysisConfig::new("Missing Group").with_criterion_dir("/nonexistent")];
        let err = BatchAnalyzer::default().process(&configs).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingArtifact { .. }));
    }

    #[test]
    fn test_missing_groups_collected() {
        let configs = vec![
            AnalysisConfig::new("A").with_criterion_dir("/nonexistent"),
            AnalysisConfig::new("B").with_criterion_dir("/nonexistent"),
        ];
        let analyzer = BatchAnalyzer::new(
            BatchConfig::new()
                .with_threads(2)
                .with_error_mode(ErrorMode::CollectErrors),
        );
        let output = analyzer.process(&configs).unwrap();
        assert_eq!(output.failed_count(), 2);
        assert_eq!(output.errors[0].name, "A");
        assert_eq!(output.errors[1].index, 1);
        assert!(!output.all_successful());
    }
}
