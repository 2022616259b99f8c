//! Parallel batch analysis over several benchmark groups.

#![cfg(feature = "parallel")]

mod common;

use common::{basic_group, latency_group};
use speedup_analysis::prelude::*;

#[test]
fn test_batch_runs_every_preset() {
    let fixture = latency_group();
    let configs: Vec<AnalysisConfig> = [Preset::LatencyHiding, Preset::SchedulerOverhead]
        .into_iter()
        .map(|p| p.config(fixture.criterion_dir()))
        .collect();

    let output = BatchAnalyzer::new(BatchConfig::new().with_threads(2))
        .process(&configs)
        .unwrap();

    assert!(output.all_successful());
    assert_eq!(output.successful_count(), 2);
    assert_eq!(output.threads_used, 2);
    assert_eq!(output.total_views(), 2);
    assert_eq!(output.results[0].name, "latency-hiding");
    assert_eq!(output.get("scheduler-overhead").unwrap().index, 1);
}

#[test]
fn test_batch_matches_sequential_pipeline() {
    let fixture = latency_group();
    let config = Preset::LatencyHiding.config(fixture.criterion_dir());

    let expected = Pipeline::from_config(config.clone()).unwrap().process().unwrap();
    let batch = BatchAnalyzer::default().process(&[config]).unwrap();

    assert_eq!(batch.results[0].output.records, expected.records);
    assert_eq!(batch.results[0].output.views, expected.views);
}

#[test]
fn test_failing_group_isolated_with_collect_errors() {
    let good = basic_group();
    let bad = basic_group();
    bad.run("Serial", "dup", "Cores: 1", 90.0);

    let configs = vec![
        AnalysisConfig::new("MapReduce Fib").with_criterion_dir(bad.criterion_dir()),
        AnalysisConfig::new("MapReduce Fib").with_criterion_dir(good.criterion_dir()),
    ];

    let output = BatchAnalyzer::new(BatchConfig::new().with_error_mode(ErrorMode::CollectErrors))
        .process(&configs)
        .unwrap();
    assert_eq!(output.successful_count(), 1);
    assert_eq!(output.results[0].index, 1);
    assert_eq!(output.failed_count(), 1);
    assert!(matches!(
        output.errors[0].error,
        AnalysisError::AmbiguousBaseline { .. }
    ));

    let err = BatchAnalyzer::default().process(&configs).unwrap_err();
    assert!(matches!(err, AnalysisError::AmbiguousBaseline { .. }));
}
