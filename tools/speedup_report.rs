//! Speedup Report Tool
//!
//! Analyzes a Criterion benchmark group and writes chart-ready output.
//!
//! # Output
//!
//! - `views.json` - One view per comparison scope
//! - `<scheduler>_matrix.npy` + `_axes.json` - Pivot matrix (if configured)
//! - `metadata.json` - Row counts, warnings, timestamp
//! - `<plot file>.json` - One plot request per view (if the analysis has a plot section)
//!
//! # Usage
//!
//! ```bash
//! # From TOML config
//! cargo run --release --bin speedup_report -- --config analyses/map_reduce.toml
//!
//! # From presets (several presets run in parallel)
//! cargo run --release --bin speedup_report -- \
//!     --preset latency-hiding --preset scheduler-overhead --criterion-dir target/criterion
//!
//! # Generate a config to edit
//! cargo run --release --bin speedup_report -- --generate-config analysis.toml --preset parameter-sweep
//! ```

use clap::Parser;
use speedup_analysis::export::{render_views, JsonPlotRenderer, ViewExporter};
use speedup_analysis::{AnalysisConfig, Pipeline, PipelineOutput, Preset};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "speedup_report")]
#[command(about = "Speedup analysis of Criterion scheduler benchmarks")]
struct Cli {
    /// Analysis configuration (TOML)
    #[arg(long, conflicts_with = "preset")]
    config: Option<PathBuf>,

    /// Standard analysis to run; repeat to run several
    #[arg(long)]
    preset: Vec<Preset>,

    /// Criterion output directory used with --preset
    #[arg(long, default_value = "target/criterion")]
    criterion_dir: PathBuf,

    /// Output directory
    #[arg(long, short, default_value = "plotting/plots")]
    output: PathBuf,

    /// Write the selected preset's configuration to this path and exit
    #[arg(long)]
    generate_config: Option<PathBuf>,

    /// Debug logging (RUST_LOG overrides)
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    if let Some(path) = &cli.generate_config {
        return generate_config(cli, path);
    }

    let configs = if let Some(path) = &cli.config {
        vec![AnalysisConfig::load_toml(path)?]
    } else if !cli.preset.is_empty() {
        cli.preset
            .iter()
            .map(|p| p.config(&cli.criterion_dir))
            .collect()
    } else {
        return Err("one of --config or --preset is required".into());
    };

    let outputs = analyze(&configs)?;
    let nested = outputs.len() > 1;
    for (config, output) in configs.iter().zip(&outputs) {
        let dir = if nested {
            cli.output.join(analysis_dir(config))
        } else {
            cli.output.clone()
        };
        write_outputs(config, output, &dir)?;
    }

    Ok(())
}

#[cfg(feature = "parallel")]
fn analyze(configs: &[AnalysisConfig]) -> Result<Vec<PipelineOutput>, Box<dyn Error>> {
    use speedup_analysis::batch::{BatchAnalyzer, BatchConfig};

    if configs.len() == 1 {
        return Ok(vec![Pipeline::from_config(configs[0].clone())?.process()?]);
    }
    let batch = BatchAnalyzer::new(BatchConfig::new()).process(configs)?;
    Ok(batch.results.into_iter().map(|r| r.output).collect())
}

#[cfg(not(feature = "parallel"))]
fn analyze(configs: &[AnalysisConfig]) -> Result<Vec<PipelineOutput>, Box<dyn Error>> {
    let mut outputs = Vec::with_capacity(configs.len());
    for config in configs {
        outputs.push(Pipeline::from_config(config.clone())?.process()?);
    }
    Ok(outputs)
}

fn write_outputs(config: &AnalysisConfig, output: &PipelineOutput, dir: &Path) -> Result<(), Box<dyn Error>> {
    print_summary(output);

    let files = ViewExporter::new(dir)
        .with_experiment(config.metadata.clone())
        .export(output)?;
    println!("✅ Views: {}", files.views.display());
    if let Some(matrix) = &files.matrix {
        println!("✅ Matrix: {}", matrix.display());
    }

    if let Some(plot) = &config.plot {
        let written = render_views(&JsonPlotRenderer, plot, &output.views, dir)?;
        println!("✅ Plot requests: {}", written.len());
    }

    Ok(())
}

fn print_summary(output: &PipelineOutput) {
    println!("┌─ {} ", output.group);
    println!(
        "│ Observations: {} loaded, {} retained, {} synthetic",
        output.loaded, output.retained, output.synthetic
    );
    for view in &output.views {
        println!("│ [{}]", view.scope_label());
        for scheduler in view.schedulers() {
            let points = view.series(scheduler).unwrap_or_default();
            let best = points.iter().map(|p| p.speedup).fold(f64::NAN, f64::max);
            println!("│   {:<16} {:>3} points, max speedup {:.2}", scheduler, points.len(), best);
        }
    }
    if let Some(matrix) = &output.matrix {
        let (rows, cols) = matrix.shape();
        println!(
            "│ Pivot '{}': {} x {} ({} x {})",
            matrix.scheduler, rows, cols, matrix.row_variable, matrix.column_variable
        );
    }
    for warning in output.validation.warnings() {
        println!("│ ⚠ {warning}");
    }
    println!("└─");
}

fn generate_config(cli: &Cli, path: &Path) -> Result<(), Box<dyn Error>> {
    let preset = cli.preset.first().copied().unwrap_or_default();
    preset.config(&cli.criterion_dir).save_toml(path)?;
    println!("✅ Generated {} config: {}", preset.name(), path.display());
    Ok(())
}

fn analysis_dir(config: &AnalysisConfig) -> String {
    match &config.metadata {
        Some(metadata) => metadata.name.clone(),
        None => config.group.name.replace(' ', "_"),
    }
}
