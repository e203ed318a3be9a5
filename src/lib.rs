//! secom-impute - Missing-value imputation for the UCI-SECOM sensor dataset
//!
//! One-shot batch tooling for comparing imputation strategies on a wide,
//! sparse sensor table:
//! - Missing-value profiling (per-column and per-row statistics)
//! - Column filtering by missing ratio
//! - Mean, median, forward/backward-fill, KNN and iterative (MICE-style)
//!   imputation, plus a hybrid strategy that routes columns by missing ratio
//! - One output CSV per strategy, with identifier/label columns reattached
//!
//! # Modules
//!
//! - [`dataset`] - CSV loading, Time/Pass-Fail splitting, variant persistence
//! - [`imputation`] - The [`imputation::Imputer`] trait and all strategies
//! - [`pipeline`] - Ordered multi-strategy runs with timing and verification
//! - [`cli`] - Command-line interface

pub mod error;

pub mod dataset;
pub mod imputation;
pub mod pipeline;

pub mod cli;

pub use error::{Result, SecomError};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{Result, SecomError};

    pub use crate::dataset::{MissingProfile, SensorDataset};

    pub use crate::imputation::{
        filter_columns, is_missing, mean_fill, missing_cell_count, missing_ratios,
        DirectionalFill, DistanceMetric, EstimatorKind, HybridImputer, Imputer, IterativeImputer,
        KnnImputer, NeighborWeighting, SimpleImputer, SimpleStrategy, VisitOrder,
    };

    pub use crate::pipeline::{ImputationPipeline, ImputedVariant, PipelineConfig, StrategyKind};
}
