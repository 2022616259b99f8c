//! Shared fixtures: Criterion-shaped benchmark groups in a temporary directory.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A benchmark group being written under a temporary Criterion directory.
pub struct GroupFixture {
    pub temp: TempDir,
    pub group: String,
}

impl GroupFixture {
    pub fn new(group: &str) -> Self {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(group)).unwrap();
        Self {
            temp,
            group: group.to_string(),
        }
    }

    /// Criterion output directory (parent of the group).
    pub fn criterion_dir(&self) -> &Path {
        self.temp.path()
    }

    /// Group root directory.
    pub fn root(&self) -> PathBuf {
        self.temp.path().join(&self.group)
    }

    /// Write `<root>/<scheduler>/<run>/new/{benchmark,estimates}.json`.
    pub fn run(&self, scheduler: &str, run: &str, descriptor: &str, mean: f64) -> &Self {
        let dir = self.measurement_dir(scheduler, run);
        fs::write(
            dir.join("benchmark.json"),
            serde_json::json!({
                "group_id": self.group,
                "function_id": scheduler,
                "value_str": descriptor,
            })
            .to_string(),
        )
        .unwrap();
        fs::write(
            dir.join("estimates.json"),
            serde_json::json!({
                "mean": { "point_estimate": mean, "standard_error": 1.0 },
                "median": { "point_estimate": mean },
            })
            .to_string(),
        )
        .unwrap();
        self
    }

    /// Write a run whose `estimates.json` is missing.
    pub fn run_without_estimates(&self, scheduler: &str, run: &str, descriptor: &str) -> &Self {
        let dir = self.measurement_dir(scheduler, run);
        fs::write(
            dir.join("benchmark.json"),
            serde_json::json!({ "value_str": descriptor }).to_string(),
        )
        .unwrap();
        self
    }

    /// Add a Criterion HTML report directory to the group and to `scheduler`.
    pub fn reports(&self, scheduler: &str) -> &Self {
        fs::create_dir_all(self.root().join("report")).unwrap();
        fs::create_dir_all(self.root().join(scheduler).join("report")).unwrap();
        fs::write(self.root().join("report").join("index.html"), "<html/>").unwrap();
        self
    }

    fn measurement_dir(&self, scheduler: &str, run: &str) -> PathBuf {
        let dir = self.root().join(scheduler).join(run).join("new");
        fs::create_dir_all(&dir).unwrap();
        dir
    }
}

/// Serial 100; Classic 60/35 and Latency Hiding 55/30 at 2 and 4 cores.
pub fn basic_group() -> GroupFixture {
    let fixture = GroupFixture::new("MapReduce Fib");
    fixture
        .run("Serial", "1", "Cores: 1", 100.0)
        .run("Classic", "2", "Cores: 2", 60.0)
        .run("Classic", "4", "Cores: 4", 35.0)
        .run("Latency Hiding", "2", "Cores: 2", 55.0)
        .run("Latency Hiding", "4", "Cores: 4", 30.0);
    fixture
}

/// MapReduce Fib shaped like the real latency sweep.
///
/// Latencies 0 and 50, cores 1..=4 plus a 40-core run, and a `Fib N == 35`
/// run that the presets drop.
pub fn latency_group() -> GroupFixture {
    let fixture = GroupFixture::new("MapReduce Fib");
    for latency in [0u32, 50] {
        let slow = 1.0 + latency as f64 / 50.0;
        fixture.run(
            "Serial",
            &format!("s_{latency}"),
            &format!("Cores: 1 | Latency ms: {latency} | Fib N: 30"),
            100.0 * slow,
        );
        for cores in [1u32, 2, 4, 40] {
            fixture.run(
                "Classic",
                &format!("c_{cores}_{latency}"),
                &format!("Cores: {cores} | Latency ms: {latency} | Fib N: 30"),
                100.0 * slow / cores as f64,
            );
            fixture.run(
                "Latency Hiding",
                &format!("l_{cores}_{latency}"),
                &format!("Cores: {cores} | Latency ms: {latency} | Fib N: 30"),
                90.0 / cores as f64 + latency as f64 / 10.0,
            );
        }
        fixture.run(
            "Classic",
            &format!("big_{latency}"),
            &format!("Cores: 2 | Latency ms: {latency} | Fib N: 35"),
            5000.0,
        );
    }
    fixture
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
