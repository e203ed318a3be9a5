//! secom-impute CLI
//!
//! Command-line interface for profiling missing values and running the
//! imputation comparison.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::dataset::{SensorDataset, BAND_LABELS};
use crate::pipeline::{ImputationPipeline, PipelineConfig, StrategyKind};

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString {
    s.truecolor(100, 100, 100)
}
fn accent(s: &str) -> ColoredString {
    s.truecolor(120, 170, 255)
}
fn muted(s: &str) -> ColoredString {
    s.truecolor(140, 140, 140)
}
fn ok(s: &str) -> ColoredString {
    s.truecolor(100, 210, 120)
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "secom-impute")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Missing-value imputation comparison for the UCI-SECOM dataset")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Profile missing values in a dataset
    Analyze {
        /// Input data file (CSV with a header row)
        #[arg(short, long)]
        data: PathBuf,

        /// How many of the worst columns to list
        #[arg(long, default_value = "20")]
        top: usize,

        /// Emit the full profile as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Run the imputation strategies and write one CSV per variant
    Impute {
        /// Input data file (CSV with a header row)
        #[arg(short, long)]
        data: PathBuf,

        /// Output directory for the variant CSVs
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// Drop feature columns with missing ratio above this
        #[arg(long, default_value = "0.7")]
        drop_threshold: f64,

        /// Hybrid split threshold
        #[arg(long, default_value = "0.1")]
        split_threshold: f64,

        /// Neighbor count for KNN imputation
        #[arg(long, default_value = "5")]
        neighbors: usize,

        /// Pass budget for iterative imputation
        #[arg(long, default_value = "10")]
        max_iter: usize,

        /// RNG seed for iterative imputation
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Strategies to run (default: all of mean, median, ffill_bfill,
        /// knn, mice, hybrid)
        #[arg(long, value_delimiter = ',')]
        strategies: Vec<String>,
    },

    /// Show basic dataset information
    Info {
        /// Input data file
        #[arg(short, long)]
        data: PathBuf,
    },
}

// ─── Commands ──────────────────────────────────────────────────────────────────

fn load(path: &Path) -> anyhow::Result<SensorDataset> {
    step_run("Loading data");
    let start = Instant::now();
    let ds = SensorDataset::from_csv(path)?;
    step_done(&format!(
        "{} rows × {} features in {:?}",
        ds.n_rows(),
        ds.n_features(),
        start.elapsed()
    ));
    Ok(ds)
}

pub fn cmd_analyze(data_path: &Path, top: usize, json: bool) -> anyhow::Result<()> {
    if json {
        let ds = SensorDataset::from_csv(data_path)?;
        println!("{}", serde_json::to_string_pretty(&ds.profile())?);
        return Ok(());
    }

    section("Analyze");
    let ds = load(data_path)?;
    let profile = ds.profile();

    println!();
    println!("  {:<26} {}", muted("Rows"), profile.n_rows);
    println!("  {:<26} {}", muted("Feature columns"), profile.n_columns);
    println!(
        "  {:<26} {} ({:.2}%)",
        muted("Missing cells"),
        profile.total_missing,
        profile.overall_ratio * 100.0
    );
    println!(
        "  {:<26} {}",
        muted("Columns with missing"),
        profile.columns_with_missing
    );
    println!(
        "  {:<26} {}",
        muted("Columns complete"),
        profile.columns_complete
    );

    section("Worst columns");
    println!(
        "  {:<24} {:>8} {:>10}",
        muted("Column"),
        muted("Missing"),
        muted("Ratio")
    );
    println!("  {}", dim(&"─".repeat(44)));
    for col in profile.top_columns(top) {
        println!(
            "  {:<24} {:>8} {:>9.2}%",
            col.name,
            col.missing,
            col.ratio * 100.0
        );
    }

    section("Missing-ratio bands");
    for (&label, count) in BAND_LABELS.iter().zip(profile.band_counts.iter()) {
        println!("  {:<12} {}", muted(label), count);
    }

    section("Rows");
    println!(
        "  {:<26} {:.2}",
        muted("Mean missing per row"),
        profile.rows.mean
    );
    println!("  {:<26} {}", muted("Max missing per row"), profile.rows.max);
    println!("  {:<26} {}", muted("Min missing per row"), profile.rows.min);
    println!(
        "  {:<26} {}",
        muted("Fully observed rows"),
        profile.rows.complete_rows
    );

    let (high, medium, low) = profile.threshold_bands();
    section("Recommendation");
    println!(
        "  {:<26} {}  {}",
        muted(">50% missing"),
        high,
        dim("drop or handle with domain knowledge")
    );
    println!(
        "  {:<26} {}  {}",
        muted("10-50% missing"),
        medium,
        dim("KNN / iterative imputation")
    );
    println!(
        "  {:<26} {}  {}",
        muted("0-10% missing"),
        low,
        dim("mean/median or forward/backward fill")
    );

    println!();
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_impute(
    data_path: &Path,
    out_dir: &Path,
    drop_threshold: f64,
    split_threshold: f64,
    neighbors: usize,
    max_iter: usize,
    seed: u64,
    strategy_names: &[String],
) -> anyhow::Result<()> {
    section("Impute");

    let strategies = if strategy_names.is_empty() {
        StrategyKind::ALL.to_vec()
    } else {
        strategy_names
            .iter()
            .map(|s| {
                StrategyKind::parse(s)
                    .ok_or_else(|| anyhow::anyhow!("unknown strategy: {}", s))
            })
            .collect::<anyhow::Result<Vec<_>>>()?
    };

    let config = PipelineConfig {
        drop_threshold,
        split_threshold,
        n_neighbors: neighbors,
        max_iter,
        seed,
        strategies,
    };

    let ds = load(data_path)?;

    step_run(&format!(
        "Dropping columns with >{:.0}% missing",
        config.drop_threshold * 100.0
    ));
    let filtered = ds.drop_high_missing(config.drop_threshold);
    step_done(&format!(
        "{} of {} columns kept",
        filtered.n_features(),
        ds.n_features()
    ));

    let stem = data_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("dataset");

    std::fs::create_dir_all(out_dir)?;

    // Baseline: the filtered-but-unimputed table (missing cells stay empty)
    let baseline = filtered.write_variant(
        filtered.features(),
        out_dir,
        stem,
        "drop_high_missing",
    )?;
    println!("  {} {}", ok("✓"), dim(&baseline.display().to_string()));

    let pipeline = ImputationPipeline::new(config);
    let variants = pipeline.run(filtered.features())?;

    println!();
    println!(
        "  {:<24} {:>10} {:>10}   {}",
        muted("Strategy"),
        muted("Time"),
        muted("Residual"),
        muted("Output")
    );
    println!("  {}", dim(&"─".repeat(70)));

    for variant in &variants {
        let path = filtered.write_variant(
            &variant.data,
            out_dir,
            stem,
            variant.strategy.id(),
        )?;
        println!(
            "  {:<24} {:>10.2?} {:>10}   {}",
            variant.strategy.label(),
            variant.elapsed,
            variant.residual_filled,
            dim(&path.display().to_string())
        );
    }

    println!("  {}", dim(&"─".repeat(70)));
    println!(
        "  {} {} variants written, all with zero missing cells",
        ok("✓"),
        variants.len()
    );
    println!();

    Ok(())
}

pub fn cmd_info(data_path: &Path) -> anyhow::Result<()> {
    section("Data Info");

    let ds = SensorDataset::from_csv(data_path)?;
    let profile = ds.profile();

    println!("  {:<16} {}", muted("File"), data_path.display());
    println!("  {:<16} {}", muted("Rows"), ds.n_rows());
    println!("  {:<16} {}", muted("Features"), ds.n_features());
    println!(
        "  {:<16} {}",
        muted("Identifier"),
        if ds.id().is_some() { "Time" } else { "-" }
    );
    println!(
        "  {:<16} {}",
        muted("Label"),
        if ds.label().is_some() { "Pass/Fail" } else { "-" }
    );
    println!(
        "  {:<16} {:.2}%",
        muted("Missing"),
        profile.overall_ratio * 100.0
    );

    println!();
    Ok(())
}
