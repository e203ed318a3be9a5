//! Multi-strategy imputation pipeline
//!
//! An explicit, ordered list of named strategies run sequentially against
//! independent copies of the filtered feature matrix. Each run is timed,
//! residual-filled and verified against the zero-missing invariant before
//! its variant is handed back for persistence.

use crate::error::{Result, SecomError};
use crate::imputation::{
    mean_fill, missing_cell_count, DirectionalFill, EstimatorKind, HybridImputer, Imputer,
    IterativeImputer, KnnImputer, SimpleImputer, SimpleStrategy,
};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::info;

/// The named strategies the pipeline can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyKind {
    Mean,
    Median,
    FfillBfill,
    Knn,
    Mice,
    Hybrid,
}

impl StrategyKind {
    /// Every strategy, in the order the SECOM comparison runs them
    pub const ALL: [StrategyKind; 6] = [
        StrategyKind::Mean,
        StrategyKind::Median,
        StrategyKind::FfillBfill,
        StrategyKind::Knn,
        StrategyKind::Mice,
        StrategyKind::Hybrid,
    ];

    /// Stable identifier, used in output file names
    pub fn id(&self) -> &'static str {
        match self {
            StrategyKind::Mean => "mean",
            StrategyKind::Median => "median",
            StrategyKind::FfillBfill => "ffill_bfill",
            StrategyKind::Knn => "knn",
            StrategyKind::Mice => "mice",
            StrategyKind::Hybrid => "hybrid",
        }
    }

    /// Human-readable label for console output
    pub fn label(&self) -> &'static str {
        match self {
            StrategyKind::Mean => "Mean",
            StrategyKind::Median => "Median",
            StrategyKind::FfillBfill => "Forward/Backward Fill",
            StrategyKind::Knn => "KNN",
            StrategyKind::Mice => "Iterative (MICE)",
            StrategyKind::Hybrid => "Hybrid",
        }
    }

    /// Parse a strategy id as used on the command line
    pub fn parse(s: &str) -> Option<StrategyKind> {
        match s {
            "mean" => Some(StrategyKind::Mean),
            "median" => Some(StrategyKind::Median),
            "ffill_bfill" | "ffill" => Some(StrategyKind::FfillBfill),
            "knn" => Some(StrategyKind::Knn),
            "mice" | "iterative" => Some(StrategyKind::Mice),
            "hybrid" => Some(StrategyKind::Hybrid),
            _ => None,
        }
    }

    fn build(&self, config: &PipelineConfig) -> Box<dyn Imputer> {
        match self {
            StrategyKind::Mean => Box::new(SimpleImputer::new(SimpleStrategy::Mean)),
            StrategyKind::Median => Box::new(SimpleImputer::new(SimpleStrategy::Median)),
            StrategyKind::FfillBfill => Box::new(DirectionalFill::new()),
            StrategyKind::Knn => Box::new(KnnImputer::new(config.n_neighbors)),
            StrategyKind::Mice => Box::new(
                IterativeImputer::new(EstimatorKind::Linear)
                    .with_max_iter(config.max_iter)
                    .with_seed(config.seed),
            ),
            StrategyKind::Hybrid => Box::new(
                HybridImputer::new(config.split_threshold).with_n_neighbors(config.n_neighbors),
            ),
        }
    }
}

/// Pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Column Filter threshold: columns with missing ratio above this are
    /// dropped before any strategy runs
    pub drop_threshold: f64,
    /// Hybrid split threshold
    pub split_threshold: f64,
    /// Neighbor count for KNN
    pub n_neighbors: usize,
    /// Pass budget for iterative imputation
    pub max_iter: usize,
    /// RNG seed for iterative imputation
    pub seed: u64,
    /// Strategies to run, in order
    pub strategies: Vec<StrategyKind>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            drop_threshold: 0.7,
            split_threshold: 0.1,
            n_neighbors: 5,
            max_iter: 10,
            seed: 42,
            strategies: StrategyKind::ALL.to_vec(),
        }
    }
}

/// One fully imputed copy of the feature matrix
#[derive(Debug, Clone)]
pub struct ImputedVariant {
    pub strategy: StrategyKind,
    pub data: Array2<f64>,
    /// Wall-clock time of the strategy run (including the residual pass)
    pub elapsed: Duration,
    /// Cells the residual mean pass had to fill after the strategy ran
    pub residual_filled: usize,
}

/// Sequential multi-strategy runner
#[derive(Debug, Clone, Default)]
pub struct ImputationPipeline {
    config: PipelineConfig,
}

impl ImputationPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every configured strategy against its own copy of `x`.
    ///
    /// Each variant is residual-filled and checked: a variant with any
    /// missing cell left is a validation error, never returned.
    pub fn run(&self, x: &Array2<f64>) -> Result<Vec<ImputedVariant>> {
        let mut variants = Vec::with_capacity(self.config.strategies.len());

        for &kind in &self.config.strategies {
            let start = Instant::now();

            let mut imputer = kind.build(&self.config);
            let mut data = imputer.fit_transform(x)?;
            let residual_filled = mean_fill(&mut data);

            let elapsed = start.elapsed();

            let remaining = missing_cell_count(&data);
            if remaining > 0 {
                return Err(SecomError::ValidationError(format!(
                    "strategy '{}' left {} missing cells after the residual pass",
                    kind.id(),
                    remaining
                )));
            }

            info!(
                strategy = kind.id(),
                elapsed_ms = elapsed.as_millis() as u64,
                residual_filled,
                "strategy complete"
            );

            variants.push(ImputedVariant {
                strategy: kind,
                data,
                elapsed,
                residual_filled,
            });
        }

        Ok(variants)
    }
}
