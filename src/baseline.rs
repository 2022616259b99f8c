//! Baseline resolution.

use crate::error::{AnalysisError, Result};
use crate::observation::Observation;
use crate::scope::ComparisonScope;

/// Default baseline scheduler label.
pub const DEFAULT_BASELINE: &str = "Serial";

/// Finds the single baseline row of a comparison scope.
#[derive(Debug, Clone)]
pub struct BaselineResolver {
    label: String,
}

impl Default for BaselineResolver {
    fn default() -> Self {
        Self::new(DEFAULT_BASELINE)
    }
}

impl BaselineResolver {
    /// Resolve baselines labelled `label`.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    /// Baseline scheduler label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The unique baseline observation of `scope`.
    ///
    /// Zero matches is [`AnalysisError::BaselineNotFound`]; more than one is
    /// [`AnalysisError::AmbiguousBaseline`]. The first match is never picked
    /// silently.
    pub fn find<'a>(&self, scope: &ComparisonScope<'a>) -> Result<&'a Observation> {
        let mut matches = scope.rows.iter().filter(|o| o.scheduler == self.label);

        let Some(first) = matches.next() else {
            return Err(AnalysisError::BaselineNotFound {
                baseline: self.label.clone(),
                scope: scope.to_string(),
            });
        };

        let extra = matches.count();
        if extra > 0 {
            return Err(AnalysisError::AmbiguousBaseline {
                baseline: self.label.clone(),
                scope: scope.to_string(),
                count: extra + 1,
            });
        }

        Ok(*first)
    }

    /// Wallclock of the unique baseline observation of `scope`.
    pub fn resolve(&self, scope: &ComparisonScope<'_>) -> Result<f64> {
        let baseline = self.find(scope)?;
        log::debug!(
            "Baseline '{}' for [{}]: {}",
            self.label,
            scope,
            baseline.wallclock
        );
        Ok(baseline.wallclock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Parameters;

    fn obs(scheduler: &str, wallclock: f64) -> Observation {
        let mut parameters = Parameters::new();
        parameters.insert("Cores".to_string(), 1.0);
        Observation::new(scheduler, parameters, wallclock)
    }

    fn scope(rows: &[Observation]) -> ComparisonScope<'_> {
        ComparisonScope {
            key: None,
            value: None,
            rows: rows.iter().collect(),
        }
    }

    #[test]
    fn test_resolves_unique_baseline() {
        let rows = vec![obs("Classic", 60.0), obs("Serial", 100.0)];
        let resolver = BaselineResolver::default();
        assert_eq!(resolver.resolve(&scope(&rows)).unwrap(), 100.0);
    }

    #[test]
    fn test_missing_baseline() {
        let rows = vec![obs("Classic", 60.0)];
        let err = BaselineResolver::default()
            .resolve(&scope(&rows))
            .unwrap_err();
        assert!(matches!(err, AnalysisError::BaselineNotFound { .. }));
    }

    #[test]
    fn test_ambiguous_baseline_is_not_resolved() {
        let rows = vec![obs("Serial", 100.0), obs("Serial", 90.0), obs("Serial", 80.0)];
        match BaselineResolver::default().resolve(&scope(&rows)) {
            Err(AnalysisError::AmbiguousBaseline { count, .. }) => assert_eq!(count, 3),
            other => panic!("expected ambiguous baseline, got {other:?}"),
        }
    }

    #[test]
    fn test_custom_label() {
        let rows = vec![obs("Serial", 100.0), obs("Classic", 60.0)];
        let resolver = BaselineResolver::new("Classic");
        assert_eq!(resolver.label(), "Classic");
        assert_eq!(resolver.resolve(&scope(&rows)).unwrap(), 60.0);
    }

    #[test]
    fn test_zero_baseline_is_accepted() {
        let rows = vec![obs("Serial", 0.0)];
        assert_eq!(
            BaselineResolver::default().resolve(&scope(&rows)).unwrap(),
            0.0
        );
    }
}
