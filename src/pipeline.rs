//! Unified Pipeline for Speedup Analysis
//!
//! This module connects every stage of one benchmark-group analysis:
//! - Observation loading (Criterion `benchmark.json` / `estimates.json`)
//! - Filtering (exclusions/requirements over parameters and schedulers)
//! - Synthetic variants (relabeled reference curves such as `Ideal`)
//! - Scope partitioning, baseline resolution, speedup derivation
//! - View building (and an optional two-parameter pivot)
//!
//! # Architecture
//!
//! ```text
//! group root → ObservationLoader → ObservationTable
//!                                      ↓ schema check
//!                               ObservationFilter → retained table
//!                                      ↓
//!                              SyntheticVariant(s) → augmented table
//!                                      ↓
//!                              ScopeConfig::partition → ComparisonScope*
//!                                      ↓ per scope
//!                 BaselineResolver → SpeedupCalculator → ViewBuilder
//!                                      ↓
//!                             Vec<View> (+ SpeedupMatrix)
//! ```
//!
//! Every error is fatal for the group: the first one aborts the analysis and
//! no views are returned. A scope key that yields no scopes (empty group,
//! every row filtered away, every value skipped) is a missing baseline.
//!
//! # Example
//!
//! ```ignore
//! use speedup_analysis::prelude::*;
//!
//! let pipeline = PipelineBuilder::new("MapReduce Fib")
//!     .criterion_dir("target/criterion")
//!     .exclude(Condition::param_gt("Cores", 35.0))
//!     .scope_by("Latency ms")
//!     .build()?;
//!
//! let output = pipeline.process()?;
//! for view in &output.views {
//!     println!("{}: {} series", view.scope_label(), view.series.len());
//! }
//! ```
//!
//! # Output Structure
//!
//! | Field | Type | Description |
//! |-------|------|-------------|
//! | `views` | `Vec<View>` | One view per comparison scope |
//! | `records` | `Vec<SpeedupRecord>` | Every speedup, in scope order |
//! | `matrix` | `Option<SpeedupMatrix>` | Pivot, if configured |
//! | `loaded` / `retained` / `synthetic` | `usize` | Row counts per stage |

use crate::augment::augment_all;
use crate::baseline::BaselineResolver;
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::filter::ObservationFilter;
use crate::loader::ObservationLoader;
use crate::observation::ObservationTable;
use crate::speedup::{SpeedupCalculator, SpeedupRecord};
use crate::validation::{TableValidator, ValidationResult};
use crate::view::{SpeedupMatrix, View, ViewBuilder};

/// Output from pipeline processing
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Benchmark group name
    pub group: String,

    /// Baseline scheduler label
    pub baseline: String,

    /// Parameter on the x axis of every view
    pub independent_variable: String,

    /// Observations loaded
    pub loaded: usize,

    /// Observations kept by the filters
    pub retained: usize,

    /// Synthetic rows added
    pub synthetic: usize,

    /// Filtered and augmented table the speedups were computed from
    pub table: ObservationTable,

    /// All speedup records, scope by scope
    pub records: Vec<SpeedupRecord>,

    /// One view per comparison scope, in ascending scope-value order
    pub views: Vec<View>,

    /// Pivot matrix, if configured
    pub matrix: Option<SpeedupMatrix>,

    /// Non-fatal findings
    pub validation: ValidationResult,
}

impl PipelineOutput {
    /// View of the scope whose key equals `value`.
    pub fn view_for(&self, value: f64) -> Option<&View> {
        self.views.iter().find(|v| v.scope_value == Some(value))
    }
}

/// Main Pipeline - connects all stages of one group analysis
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: AnalysisConfig,
    filter: ObservationFilter,
    resolver: BaselineResolver,
    calculator: SpeedupCalculator,
    view_builder: ViewBuilder,
}

impl Pipeline {
    /// Create pipeline from configuration
    pub fn from_config(config: AnalysisConfig) -> Result<Self> {
        config.validate().map_err(AnalysisError::InvalidConfig)?;

        let filter = ObservationFilter::from_rules(config.filters.clone());
        let resolver = BaselineResolver::new(config.baseline.clone());
        let calculator =
            SpeedupCalculator::new(config.baseline.clone(), config.independent_variable.clone());
        let view_builder = ViewBuilder::new(config.independent_variable.clone())
            .with_scope_key(config.scope.key.clone());

        Ok(Self {
            config,
            filter,
            resolver,
            calculator,
            view_builder,
        })
    }

    /// Configuration this pipeline runs.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Loader for the configured group.
    pub fn loader(&self) -> ObservationLoader {
        let group = &self.config.group;
        let mut loader = ObservationLoader::new(group.root(), self.config.descriptor)
            .with_parallel(self.config.parallel_load);
        if let Some(variants) = &group.variants {
            loader = loader.with_variants(variants.iter().cloned());
        }
        loader
    }

    /// Load the configured group from disk and analyze it.
    pub fn process(&self) -> Result<PipelineOutput> {
        let table = self.loader().load()?;
        self.process_table(&table)
    }

    /// Analyze an already-loaded table.
    pub fn process_table(&self, loaded: &ObservationTable) -> Result<PipelineOutput> {
        loaded.schema()?;

        let retained = self.filter.apply(loaded)?;
        let validation = TableValidator::new(
            self.config.baseline.clone(),
            self.config.independent_variable.clone(),
        )
        .validate(loaded, &retained);
        validation.log();

        let table = augment_all(&retained, &self.config.synthetic)?;
        let synthetic = table.len() - retained.len();

        let scopes = self.config.scope.partition(&table)?;
        if scopes.is_empty() {
            return Err(AnalysisError::BaselineNotFound {
                baseline: self.config.baseline.clone(),
                scope: format!(
                    "no '{}' values among {} rows",
                    self.config.scope.key.as_deref().unwrap_or_default(),
                    table.len()
                ),
            });
        }

        let mut records = Vec::new();
        let mut views = Vec::with_capacity(scopes.len());
        for scope in &scopes {
            let baseline = self.resolver.resolve(scope)?;
            let scope_records = self.calculator.compute(scope, baseline)?;
            views.push(self.view_builder.build(scope.value, &scope_records)?);
            records.extend(scope_records);
        }

        let matrix = match &self.config.pivot {
            Some(pivot) => Some(pivot.pivot(&records)?),
            None => None,
        };

        log::info!(
            "Analyzed '{}': {} loaded, {} retained, {} synthetic, {} records in {} views",
            self.config.group.name,
            loaded.len(),
            retained.len(),
            synthetic,
            records.len(),
            views.len()
        );

        Ok(PipelineOutput {
            group: self.config.group.name.clone(),
            baseline: self.config.baseline.clone(),
            independent_variable: self.config.independent_variable.clone(),
            loaded: loaded.len(),
            retained: retained.len(),
            synthetic,
            table,
            records,
            views,
            matrix,
            validation,
        })
    }
}
