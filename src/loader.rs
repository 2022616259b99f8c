//! Observation loading from a Criterion benchmark-group directory.
//!
//! # Layout
//!
//! ```text
//! <group-root>/
//! ├── report/                          (reserved, skipped)
//! ├── Serial/
//! │   ├── report/                      (reserved, skipped)
//! │   └── <run>/new/benchmark.json     { "value_str": "Cores: 1 | ..." }
//! │       <run>/new/estimates.json     { "mean": { "point_estimate": 1.2e9 } }
//! ├── Classic/...
//! └── Latency Hiding/...
//! ```
//!
//! Every run directory becomes one [`Observation`] whose scheduler is the
//! variant directory name. Run directory names are opaque.
//!
//! Runs are discovered sequentially and sorted by (variant, run) name, so the
//! loaded table has the same order on every filesystem. Record reads can run
//! on the rayon pool (`parallel` feature); results are reassembled in
//! discovery order before the first error is reported.

use crate::error::{AnalysisError, Result};
use crate::observation::{Observation, ObservationTable};
use crate::params::DescriptorFormat;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Directory name Criterion uses for HTML reports; never a variant or run.
pub const REPORT_DIR: &str = "report";

/// Subdirectory of a run holding the latest measurement.
pub const MEASUREMENT_DIR: &str = "new";

/// Record holding the run's parameter descriptor.
pub const BENCHMARK_RECORD: &str = "benchmark.json";

/// Record holding the run's timing statistics.
pub const ESTIMATES_RECORD: &str = "estimates.json";

// ============================================================================
// Raw Criterion JSON shapes
// ============================================================================

#[derive(Deserialize)]
struct BenchmarkRecord {
    value_str: Option<String>,
}

#[derive(Deserialize)]
struct Estimate {
    point_estimate: f64,
}

#[derive(Deserialize)]
struct EstimatesRecord {
    mean: Option<Estimate>,
}

// ============================================================================
// Loader
// ============================================================================

/// One discovered run directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLocation {
    /// Variant directory name
    pub scheduler: String,

    /// Path to the run directory
    pub run_dir: PathBuf,
}

impl RunLocation {
    /// Path of the parameter descriptor record.
    pub fn benchmark_record(&self) -> PathBuf {
        self.run_dir.join(MEASUREMENT_DIR).join(BENCHMARK_RECORD)
    }

    /// Path of the timing statistics record.
    pub fn estimates_record(&self) -> PathBuf {
        self.run_dir.join(MEASUREMENT_DIR).join(ESTIMATES_RECORD)
    }
}

/// Loads every run of one benchmark group into an [`ObservationTable`].
///
/// # Example
///
/// ```ignore
/// use speedup_analysis::loader::ObservationLoader;
/// use speedup_analysis::params::DescriptorFormat;
///
/// let table = ObservationLoader::new("target/criterion/MapReduce Fib", DescriptorFormat::integer())
///     .with_variants(["Serial", "Classic", "Latency Hiding"])
///     .load()?;
/// ```
#[derive(Debug, Clone)]
pub struct ObservationLoader {
    root: PathBuf,
    format: DescriptorFormat,
    variants: Option<Vec<String>>,
    parallel: bool,
}

impl ObservationLoader {
    /// Create a loader for the group at `root`.
    pub fn new<P: AsRef<Path>>(root: P, format: DescriptorFormat) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            format,
            variants: None,
            parallel: false,
        }
    }

    /// Restrict loading to a fixed, ordered list of variants.
    ///
    /// Each listed variant directory must exist.
    pub fn with_variants<I, S>(mut self, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.variants = Some(variants.into_iter().map(Into::into).collect());
        self
    }

    /// Read run records on the rayon pool.
    ///
    /// Without the `parallel` feature this setting has no effect.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Group root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Find every run directory of the group.
    pub fn discover(&self) -> Result<Vec<RunLocation>> {
        if !self.root.is_dir() {
            return Err(AnalysisError::missing(&self.root));
        }

        let variant_dirs: Vec<(String, PathBuf)> = match &self.variants {
            Some(variants) => {
                let mut dirs = Vec::with_capacity(variants.len());
                for name in variants {
                    let dir = self.root.join(name);
                    if !dir.is_dir() {
                        return Err(AnalysisError::missing(dir));
                    }
                    dirs.push((name.clone(), dir));
                }
                dirs
            }
            None => list_subdirectories(&self.root)?,
        };

        let mut runs = Vec::new();
        for (scheduler, dir) in variant_dirs {
            let run_dirs = list_subdirectories(&dir)?;
            if run_dirs.is_empty() {
                log::warn!("Variant '{}' has no runs", scheduler);
            }
            log::debug!(
                "Variant '{}': {} run directories",
                scheduler,
                run_dirs.len()
            );
            runs.extend(run_dirs.into_iter().map(|(_, run_dir)| RunLocation {
                scheduler: scheduler.clone(),
                run_dir,
            }));
        }

        Ok(runs)
    }

    /// Load every run of the group.
    pub fn load(&self) -> Result<ObservationTable> {
        let runs = self.discover()?;
        let results = self.read_runs(&runs);

        let mut table = ObservationTable::new();
        for result in results {
            table.push(result?);
        }

        log::info!(
            "Loaded {} observations ({} variants) from {}",
            table.len(),
            table.schedulers().len(),
            self.root.display()
        );
        Ok(table)
    }

    #[cfg(feature = "parallel")]
    fn read_runs(&self, runs: &[RunLocation]) -> Vec<Result<Observation>> {
        if self.parallel {
            runs.par_iter()
                .map(|run| load_run(run, &self.format))
                .collect()
        } else {
            runs.iter().map(|run| load_run(run, &self.format)).collect()
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn read_runs(&self, runs: &[RunLocation]) -> Vec<Result<Observation>> {
        runs.iter().map(|run| load_run(run, &self.format)).collect()
    }
}

/// Load a single run into an observation.
pub fn load_run(run: &RunLocation, format: &DescriptorFormat) -> Result<Observation> {
    let benchmark_path = run.benchmark_record();
    let estimates_path = run.estimates_record();

    let benchmark: BenchmarkRecord = read_record(&benchmark_path)?;
    let estimates: EstimatesRecord = read_record(&estimates_path)?;

    let descriptor = benchmark
        .value_str
        .ok_or_else(|| AnalysisError::malformed_record(&benchmark_path, "no \"value_str\""))?;
    let parameters = format.decode(&descriptor)?;

    let wallclock = estimates
        .mean
        .map(|m| m.point_estimate)
        .ok_or_else(|| AnalysisError::malformed_record(&estimates_path, "no \"mean\" estimate"))?;
    if !wallclock.is_finite() || wallclock < 0.0 {
        return Err(AnalysisError::malformed_record(
            &estimates_path,
            format!("mean point estimate {wallclock} is not a non-negative number"),
        ));
    }

    Ok(Observation::new(run.scheduler.clone(), parameters, wallclock))
}

fn read_record<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    if !path.is_file() {
        return Err(AnalysisError::missing(path));
    }
    let contents = fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| AnalysisError::malformed_record(path, e.to_string()))
}

/// Immediate subdirectories of `dir` except [`REPORT_DIR`], sorted by name.
///
/// Symlinks to directories count as subdirectories.
fn list_subdirectories(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        // Follows symlinks
        if !entry.path().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if name == REPORT_DIR {
            continue;
        }
        dirs.push((name, entry.path()));
    }
    dirs.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(dirs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_run(root: &Path, scheduler: &str, run: &str, descriptor: &str, mean: f64) {
        let dir = root.join(scheduler).join(run).join(MEASUREMENT_DIR);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join(BENCHMARK_RECORD),
            serde_json::json!({ "group_id": "G", "value_str": descriptor }).to_string(),
        )
        .unwrap();
        fs::write(
            dir.join(ESTIMATES_RECORD),
            serde_json::json!({ "mean": { "point_estimate": mean } }).to_string(),
        )
        .unwrap();
    }

    #[test]
    fn test_load_skips_report_directories() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write_run(root, "Serial", "a", "Cores: 1", 100.0);
        write_run(root, "Classic", "b", "Cores: 2", 60.0);
        fs::create_dir_all(root.join(REPORT_DIR)).unwrap();
        fs::create_dir_all(root.join("Classic").join(REPORT_DIR)).unwrap();
        fs::write(root.join("stray.txt"), "not a variant").unwrap();

        let table = ObservationLoader::new(root, DescriptorFormat::integer())
            .load()
            .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].scheduler, "Classic");
        assert_eq!(table.rows()[1].scheduler, "Serial");
        assert_eq!(table.rows()[1].wallclock, 100.0);
    }

    #[test]
    fn test_fixed_variant_list() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write_run(root, "Serial", "a", "Cores: 1", 100.0);
        write_run(root, "Classic", "b", "Cores: 2", 60.0);
        write_run(root, "Old Rayon", "c", "Cores: 2", 70.0);

        let table = ObservationLoader::new(root, DescriptorFormat::integer())
            .with_variants(["Serial", "Classic"])
            .load()
            .unwrap();
        assert_eq!(table.len(), 2);
        assert!(!table.schedulers().contains("Old Rayon"));

        let err = ObservationLoader::new(root, DescriptorFormat::integer())
            .with_variants(["Serial", "Latency Hiding"])
            .load()
            .unwrap_err();
        assert!(matches!(err, AnalysisError::MissingArtifact { .. }));
    }

    #[test]
    fn test_missing_root() {
        let temp = TempDir::new().unwrap();
        let err = ObservationLoader::new(temp.path().join("nope"), DescriptorFormat::integer())
            .load()
            .unwrap_err();
        assert!(matches!(err, AnalysisError::MissingArtifact { .. }));
    }

    #[test]
    fn test_missing_value_str_is_malformed() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("Serial").join("a").join(MEASUREMENT_DIR);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(BENCHMARK_RECORD), r#"{"group_id": "G"}"#).unwrap();
        fs::write(dir.join(ESTIMATES_RECORD), r#"{"mean": {"point_estimate": 1.0}}"#).unwrap();

        let err = ObservationLoader::new(temp.path(), DescriptorFormat::integer())
            .load()
            .unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedRecord { .. }));
    }

    #[test]
    fn test_negative_estimate_is_malformed() {
        let temp = TempDir::new().unwrap();
        write_run(temp.path(), "Serial", "a", "Cores: 1", -5.0);
        let err = ObservationLoader::new(temp.path(), DescriptorFormat::integer())
            .load()
            .unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedRecord { .. }));
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let temp = TempDir::new().unwrap();
        write_run(temp.path(), "Serial", "a", "Cores: 1", 1.0);
        let estimates = temp
            .path()
            .join("Serial/a")
            .join(MEASUREMENT_DIR)
            .join(ESTIMATES_RECORD);
        fs::write(estimates, "{ not json").unwrap();

        let err = ObservationLoader::new(temp.path(), DescriptorFormat::integer())
            .load()
            .unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedRecord { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_runs_and_variants_are_loaded() {
        use std::os::unix::fs::symlink;

        let store = TempDir::new().unwrap();
        write_run(store.path(), "Classic", "8", "Cores: 8", 20.0);
        write_run(store.path(), "Latency Hiding", "2", "Cores: 2", 55.0);

        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write_run(root, "Serial", "a", "Cores: 1", 100.0);
        write_run(root, "Classic", "2", "Cores: 2", 60.0);
        symlink(store.path().join("Classic/8"), root.join("Classic/8")).unwrap();
        symlink(store.path().join("Latency Hiding"), root.join("Latency Hiding")).unwrap();

        let table = ObservationLoader::new(root, DescriptorFormat::integer())
            .load()
            .unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.with_scheduler("Classic").count(), 2);
        assert_eq!(table.with_scheduler("Latency Hiding").count(), 1);
    }

    #[test]
    fn test_run_location_paths() {
        let run = RunLocation {
            scheduler: "Serial".to_string(),
            run_dir: PathBuf::from("/g/Serial/run"),
        };
        assert_eq!(
            run.benchmark_record(),
            PathBuf::from("/g/Serial/run/new/benchmark.json")
        );
        assert_eq!(
            run.estimates_record(),
            PathBuf::from("/g/Serial/run/new/estimates.json")
        );
    }
}
