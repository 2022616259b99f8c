//! Analysis presets.
//!
//! Each preset reproduces one of the standard scheduler comparisons run over
//! the work-stealing benchmarks. Only the Criterion directory varies between
//! machines; everything else (group, filters, scopes, presentation) is fixed.
//!
//! | Preset | Group | Scope | x axis | Extras |
//! |--------|-------|-------|--------|--------|
//! | `LatencyHiding` | MapReduce Fib | Latency ms (≠ 0) | Cores | `Ideal` curve |
//! | `SchedulerOverhead` | MapReduce Fib | whole table | Cores | latency 0 only |
//! | `ParameterSweep` | Fib Parameter Sweep | Work ms | Latency p | pivot matrix |

use crate::augment::SyntheticVariant;
use crate::config::{AnalysisConfig, ExperimentMetadata, GroupConfig};
use crate::export::{PlotConfig, SeriesStyle};
use crate::filter::{Condition, FilterRule};
use crate::params::DescriptorFormat;
use crate::scope::ScopeConfig;
use crate::view::PivotConfig;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Latency-hiding scheduler label as it appears on disk.
pub const LATENCY_HIDING: &str = "Latency Hiding";

/// Classic work-stealing scheduler label.
pub const CLASSIC: &str = "Classic";

/// Synthetic zero-latency reference label.
pub const IDEAL: &str = "Ideal";

/// Standard analyses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Preset {
    /// Speedup vs. worker threads, one chart per injected latency
    ///
    /// - Group: `MapReduce Fib`
    /// - Drops runs with more than 35 cores and `Fib N == 35`
    /// - `Classic` at zero latency is copied as `Ideal` into every chart
    #[default]
    LatencyHiding,

    /// Scheduler overhead without injected latency
    ///
    /// - Group: `MapReduce Fib`
    /// - Loads only `Serial`, `Classic` and `Latency Hiding`
    /// - Keeps only `Latency ms == 0`; drops the 140-core and `Fib N == 35` runs
    SchedulerOverhead,

    /// Work-size / latency-probability sweep
    ///
    /// - Group: `Fib Parameter Sweep` (float parameters)
    /// - One scope per `Work ms`; pivot of `Latency Hiding` speedups
    ParameterSweep,
}

impl Preset {
    /// Every preset.
    pub const ALL: [Preset; 3] = [
        Preset::LatencyHiding,
        Preset::SchedulerOverhead,
        Preset::ParameterSweep,
    ];

    /// Kebab-case name used on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Preset::LatencyHiding => "latency-hiding",
            Preset::SchedulerOverhead => "scheduler-overhead",
            Preset::ParameterSweep => "parameter-sweep",
        }
    }

    /// Full configuration of this preset for artifacts under `criterion_dir`.
    pub fn config<P: AsRef<Path>>(self, criterion_dir: P) -> AnalysisConfig {
        let mut config = match self {
            Preset::LatencyHiding => latency_hiding(),
            Preset::SchedulerOverhead => scheduler_overhead(),
            Preset::ParameterSweep => parameter_sweep(),
        };
        config.group.criterion_dir = criterion_dir.as_ref().to_path_buf();
        config.metadata = Some(ExperimentMetadata {
            name: self.name().to_string(),
            description: Some(self.to_string()),
            version: None,
            tags: None,
        });
        config
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self {
            Preset::LatencyHiding => "MapReduce Fib speedup per injected latency",
            Preset::SchedulerOverhead => "MapReduce Fib scheduler overhead at zero latency",
            Preset::ParameterSweep => "Fib parameter sweep over work size and latency probability",
        };
        f.write_str(description)
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = Preset::ALL.iter().map(|p| p.name()).collect();
                format!("unknown preset '{s}', expected one of {names:?}")
            })
    }
}

fn map_reduce_group() -> GroupConfig {
    GroupConfig::new("MapReduce Fib")
}

/// `group` restricted to the baseline and the two work-stealing schedulers.
fn compared_variants(mut group: GroupConfig) -> GroupConfig {
    group.variants = Some(vec![
        "Serial".to_string(),
        CLASSIC.to_string(),
        LATENCY_HIDING.to_string(),
    ]);
    group
}

fn latency_hiding() -> AnalysisConfig {
    AnalysisConfig {
        group: map_reduce_group(),
        filters: vec![
            FilterRule::Exclude {
                when: Condition::param_gt("Cores", 35.0),
            },
            FilterRule::Exclude {
                when: Condition::param_eq("Fib N", 35.0),
            },
        ],
        synthetic: vec![SyntheticVariant::ideal_from_zero_latency(CLASSIC)],
        scope: ScopeConfig::by("Latency ms").skipping(0.0).sharing(IDEAL),
        independent_variable: "Cores".to_string(),
        plot: Some(
            PlotConfig::new(
                "MapReduceFib with Latency: {scope}ms",
                "map_reduce_plot_latency_{scope}.png",
            )
            .with_x_label("Worker Threads")
            .with_series(SeriesStyle::new(CLASSIC, CLASSIC, "D"))
            .with_series(SeriesStyle::new(LATENCY_HIDING, "ProWS-R", "^"))
            .with_series(SeriesStyle::new(IDEAL, IDEAL, "o")),
        ),
        ..AnalysisConfig::default()
    }
}

fn scheduler_overhead() -> AnalysisConfig {
    AnalysisConfig {
        group: compared_variants(map_reduce_group()),
        filters: vec![
            FilterRule::Exclude {
                when: Condition::param_eq("Cores", 140.0),
            },
            FilterRule::Exclude {
                when: Condition::param_ne("Latency ms", 0.0),
            },
            FilterRule::Exclude {
                when: Condition::param_eq("Fib N", 35.0),
            },
        ],
        scope: ScopeConfig::whole_table(),
        independent_variable: "Cores".to_string(),
        plot: Some(
            PlotConfig::new(
                "Scheduler Overhead Compared to Classic Work Stealing",
                "overhead_plot.png",
            )
            .with_x_label("Logical Cores")
            .with_series(SeriesStyle::new(CLASSIC, CLASSIC, "D"))
            .with_series(SeriesStyle::new(LATENCY_HIDING, LATENCY_HIDING, "^")),
        ),
        ..AnalysisConfig::default()
    }
}

fn parameter_sweep() -> AnalysisConfig {
    AnalysisConfig {
        group: compared_variants(GroupConfig::new("Fib Parameter Sweep")),
        descriptor: DescriptorFormat::float(),
        scope: ScopeConfig::by("Work ms"),
        independent_variable: "Latency p".to_string(),
        pivot: Some(PivotConfig::new(LATENCY_HIDING, "Latency p", "Work ms").descending()),
        plot: Some(
            PlotConfig::new(
                "Fib Parameter Sweep with Work: {scope}ms",
                "param_sweep_work_{scope}.png",
            )
            .with_x_label("Latency p")
            .with_series(SeriesStyle::new(CLASSIC, CLASSIC, "D"))
            .with_series(SeriesStyle::new(LATENCY_HIDING, "ProWS-R", "^")),
        ),
        ..AnalysisConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        for preset in Preset::ALL {
            let config = preset.config("target/criterion");
            assert!(config.validate().is_ok(), "{}: {:?}", preset.name(), config.validate());
        }
    }

    #[test]
    fn test_preset_names_round_trip() {
        for preset in Preset::ALL {
            assert_eq!(preset.name().parse::<Preset>().unwrap(), preset);
        }
        assert!("overhead".parse::<Preset>().is_err());
    }

    #[test]
    fn test_latency_preset_shape() {
        let config = Preset::LatencyHiding.config("/data/criterion");
        assert_eq!(config.group.root(), Path::new("/data/criterion/MapReduce Fib"));
        assert_eq!(config.scope.key.as_deref(), Some("Latency ms"));
        assert_eq!(config.scope.shared_schedulers, vec![IDEAL.to_string()]);
        assert_eq!(config.synthetic.len(), 1);
        assert_eq!(config.metadata.unwrap().name, "latency-hiding");
    }

    #[test]
    fn test_overhead_preset_loads_fixed_variants() {
        let config = Preset::SchedulerOverhead.config("target/criterion");
        assert_eq!(
            config.group.variants.unwrap(),
            vec!["Serial", CLASSIC, LATENCY_HIDING]
        );
        // The latency charts take every variant directory
        assert!(Preset::LatencyHiding.config("target/criterion").group.variants.is_none());
    }

    #[test]
    fn test_sweep_preset_uses_float_descriptors() {
        let config = Preset::ParameterSweep.config("target/criterion");
        assert_eq!(config.descriptor, DescriptorFormat::float());
        assert!(config.pivot.unwrap().descending_rows);
    }
}
