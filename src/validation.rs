//! Table Validation Module
//!
//! Non-fatal diagnostics over loaded and filtered observation tables. Fatal
//! integrity problems (ambiguous baselines, schema mismatches) are errors in
//! [`crate::error`]; this module reports the things that still produce views
//! but probably not the ones you wanted: a variant whose runs were all
//! filtered away, a sweep one scheduler covers only partially, a zero
//! baseline.
//!
//! # Usage
//!
//! ```ignore
//! use speedup_analysis::validation::TableValidator;
//!
//! let validator = TableValidator::new("Serial", "Cores");
//! let result = validator.validate(&loaded, &retained);
//!
//! for warning in result.warnings() {
//!     println!("Warning: {}", warning);
//! }
//! ```

use crate::observation::ObservationTable;
use std::collections::BTreeMap;
use std::fmt;

/// Validation result for a single check.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationLevel {
    /// Data is valid
    Valid,
    /// Data has minor issues (warnings)
    Warning(String),
    /// Data has serious issues (errors)
    Error(String),
}

impl ValidationLevel {
    /// Check if this result indicates valid data.
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationLevel::Valid)
    }

    /// Check if this result is a warning.
    pub fn is_warning(&self) -> bool {
        matches!(self, ValidationLevel::Warning(_))
    }

    /// Check if this result is an error.
    pub fn is_error(&self) -> bool {
        matches!(self, ValidationLevel::Error(_))
    }
}

impl fmt::Display for ValidationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationLevel::Valid => write!(f, "Valid"),
            ValidationLevel::Warning(msg) => write!(f, "Warning: {msg}"),
            ValidationLevel::Error(msg) => write!(f, "Error: {msg}"),
        }
    }
}

/// Aggregated validation result.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    results: Vec<(String, ValidationLevel)>,
}

impl ValidationResult {
    /// Create a new empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a validation result.
    pub fn add(&mut self, check_name: &str, level: ValidationLevel) {
        self.results.push((check_name.to_string(), level));
    }

    /// Check if all validations passed (no errors or warnings).
    pub fn is_valid(&self) -> bool {
        self.results.iter().all(|(_, level)| level.is_valid())
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        self.results.iter().any(|(_, level)| level.is_error())
    }

    /// Check if there are any warnings.
    pub fn has_warnings(&self) -> bool {
        self.results.iter().any(|(_, level)| level.is_warning())
    }

    /// All warnings as `"check: message"`.
    pub fn warnings(&self) -> Vec<String> {
        self.results
            .iter()
            .filter_map(|(name, level)| match level {
                ValidationLevel::Warning(msg) => Some(format!("{name}: {msg}")),
                _ => None,
            })
            .collect()
    }

    /// All errors as `"check: message"`.
    pub fn errors(&self) -> Vec<String> {
        self.results
            .iter()
            .filter_map(|(name, level)| match level {
                ValidationLevel::Error(msg) => Some(format!("{name}: {msg}")),
                _ => None,
            })
            .collect()
    }

    /// Get all results.
    pub fn all_results(&self) -> &[(String, ValidationLevel)] {
        &self.results
    }

    /// Get the number of checks performed.
    pub fn check_count(&self) -> usize {
        self.results.len()
    }

    /// Get the number of passed checks.
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|(_, l)| l.is_valid()).count()
    }

    /// Emit every warning and error through `log`.
    pub fn log(&self) {
        for (name, level) in &self.results {
            match level {
                ValidationLevel::Valid => {}
                ValidationLevel::Warning(msg) => log::warn!("{name}: {msg}"),
                ValidationLevel::Error(msg) => log::error!("{name}: {msg}"),
            }
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let passed = self.passed_count();
        let total = self.check_count();
        writeln!(f, "Validation: {passed}/{total} checks passed")?;

        for (name, level) in &self.results {
            if !level.is_valid() {
                writeln!(f, "  - {name}: {level}")?;
            }
        }

        Ok(())
    }
}

/// Diagnostics over a loaded table and its filtered counterpart.
#[derive(Debug, Clone)]
pub struct TableValidator {
    baseline: String,
    independent_variable: String,
}

impl TableValidator {
    pub fn new(baseline: impl Into<String>, independent_variable: impl Into<String>) -> Self {
        Self {
            baseline: baseline.into(),
            independent_variable: independent_variable.into(),
        }
    }

    /// Run every check.
    pub fn validate(&self, loaded: &ObservationTable, retained: &ObservationTable) -> ValidationResult {
        let mut result = ValidationResult::new();
        result.add("non_empty", self.check_non_empty(loaded, retained));
        result.add("filtered_variants", self.check_filtered_variants(loaded, retained));
        result.add("baseline_present", self.check_baseline_present(retained));
        result.add("zero_baseline", self.check_zero_baseline(retained));
        result.add("sweep_coverage", self.check_sweep_coverage(retained));
        result
    }

    fn check_non_empty(&self, loaded: &ObservationTable, retained: &ObservationTable) -> ValidationLevel {
        if loaded.is_empty() {
            ValidationLevel::Error("no runs were loaded".to_string())
        } else if retained.is_empty() {
            ValidationLevel::Error(format!("filters removed all {} observations", loaded.len()))
        } else {
            ValidationLevel::Valid
        }
    }

    fn check_filtered_variants(&self, loaded: &ObservationTable, retained: &ObservationTable) -> ValidationLevel {
        let kept = retained.schedulers();
        let dropped: Vec<&str> = loaded
            .schedulers()
            .into_iter()
            .filter(|s| !kept.contains(s))
            .collect();

        if dropped.is_empty() {
            ValidationLevel::Valid
        } else {
            ValidationLevel::Warning(format!("filters removed every run of {dropped:?}"))
        }
    }

    fn check_baseline_present(&self, retained: &ObservationTable) -> ValidationLevel {
        if retained.with_scheduler(&self.baseline).next().is_some() {
            ValidationLevel::Valid
        } else {
            ValidationLevel::Error(format!("no '{}' rows after filtering", self.baseline))
        }
    }

    fn check_zero_baseline(&self, retained: &ObservationTable) -> ValidationLevel {
        let zeros = retained
            .with_scheduler(&self.baseline)
            .filter(|o| o.wallclock == 0.0)
            .count();
        if zeros == 0 {
            ValidationLevel::Valid
        } else {
            ValidationLevel::Warning(format!(
                "{zeros} '{}' rows have a zero wallclock; their scopes will report zero speedup",
                self.baseline
            ))
        }
    }

    fn check_sweep_coverage(&self, retained: &ObservationTable) -> ValidationLevel {
        let mut sweep: Vec<f64> = Vec::new();
        let mut covered: BTreeMap<&str, Vec<f64>> = BTreeMap::new();

        for row in retained.iter().filter(|o| o.scheduler != self.baseline) {
            let Some(x) = row.parameters.get(&self.independent_variable).copied() else {
                return ValidationLevel::Warning(format!(
                    "'{}' is missing from '{}' observations",
                    self.independent_variable, row.scheduler
                ));
            };
            if !sweep.contains(&x) {
                sweep.push(x);
            }
            let seen = covered.entry(row.scheduler.as_str()).or_default();
            if !seen.contains(&x) {
                seen.push(x);
            }
        }

        let partial: Vec<&str> = covered
            .iter()
            .filter(|(_, seen)| seen.len() < sweep.len())
            .map(|(scheduler, _)| *scheduler)
            .collect();

        if partial.is_empty() {
            ValidationLevel::Valid
        } else {
            ValidationLevel::Warning(format!(
                "{partial:?} do not cover every '{}' value of the sweep",
                self.independent_variable
            ))
        }
    }
}
