//! Missing-value imputation strategies
//!
//! Every strategy consumes a feature matrix (`Array2<f64>`, NaN marks a
//! missing cell) and produces a matrix of the same shape. Strategies are
//! independent of each other; the pipeline runs each one against its own
//! copy of the input.

mod simple;
mod fill;
mod knn;
mod iterative;
mod hybrid;

pub use simple::{SimpleImputer, SimpleStrategy};
pub use fill::DirectionalFill;
pub use knn::{DistanceMetric, KnnImputer, NeighborWeighting};
pub use iterative::{EstimatorKind, IterativeImputer, VisitOrder};
pub use hybrid::HybridImputer;

use crate::error::Result;
use ndarray::{Array2, Axis};

/// Trait for imputers
pub trait Imputer: Send + Sync {
    /// Fit the imputer on data with missing values
    fn fit(&mut self, x: &Array2<f64>) -> Result<()>;

    /// Transform data by imputing missing values
    fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>>;

    /// Fit and transform in one step
    fn fit_transform(&mut self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.fit(x)?;
        self.transform(x)
    }
}

/// Check if value is missing (NaN)
#[inline]
pub fn is_missing(v: f64) -> bool {
    v.is_nan()
}

/// Number of missing cells in the whole matrix
pub fn missing_cell_count(x: &Array2<f64>) -> usize {
    x.iter().filter(|v| is_missing(**v)).count()
}

/// Missing ratio per column: `missing_count(c) / row_count`.
///
/// An empty matrix (zero rows) yields 0.0 for every column.
pub fn missing_ratios(x: &Array2<f64>) -> Vec<f64> {
    let n_rows = x.nrows();
    if n_rows == 0 {
        return vec![0.0; x.ncols()];
    }
    x.axis_iter(Axis(1))
        .map(|col| col.iter().filter(|v| is_missing(**v)).count() as f64 / n_rows as f64)
        .collect()
}

/// Mean of the observed values in a column, or `None` if every value is
/// missing.
pub fn observed_mean(column: &[f64]) -> Option<f64> {
    let mut count = 0usize;
    let mut sum = 0.0f64;
    for &v in column {
        if !is_missing(v) {
            count += 1;
            sum += v;
        }
    }
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Column Filter: keep exactly the columns whose missing ratio is `<=
/// threshold` (inclusive boundary).
///
/// Returns the filtered matrix together with the original indices of the
/// retained columns, so callers can map back to column names.
pub fn filter_columns(x: &Array2<f64>, threshold: f64) -> (Array2<f64>, Vec<usize>) {
    let ratios = missing_ratios(x);
    let kept: Vec<usize> = ratios
        .iter()
        .enumerate()
        .filter(|(_, r)| **r <= threshold)
        .map(|(i, _)| i)
        .collect();

    let filtered = x.select(Axis(1), &kept);
    (filtered, kept)
}

/// Residual mean fill: replace every remaining missing cell with its
/// column's mean over observed values.
///
/// A column with zero observed values is filled with 0.0 (the mean is
/// undefined there; see DESIGN.md). Returns the number of cells filled.
pub fn mean_fill(x: &mut Array2<f64>) -> usize {
    let mut filled = 0usize;
    for mut col in x.axis_iter_mut(Axis(1)) {
        let values: Vec<f64> = col.iter().copied().collect();
        let fallback = observed_mean(&values).unwrap_or(0.0);
        for v in col.iter_mut() {
            if is_missing(*v) {
                *v = fallback;
                filled += 1;
            }
        }
    }
    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_missing_ratios() {
        let x = array![[1.0, f64::NAN], [2.0, f64::NAN], [3.0, 5.0], [4.0, 6.0]];
        assert_eq!(missing_ratios(&x), vec![0.0, 0.5]);
    }

    #[test]
    fn test_filter_columns_inclusive_boundary() {
        // 100 rows, 5 columns with missing ratios 0.0, 0.5, 0.70, 0.71, 1.0
        let n = 100;
        let mut x = Array2::zeros((n, 5));
        for i in 0..n {
            x[[i, 0]] = i as f64;
            x[[i, 1]] = if i < 50 { f64::NAN } else { i as f64 };
            x[[i, 2]] = if i < 70 { f64::NAN } else { i as f64 };
            x[[i, 3]] = if i < 71 { f64::NAN } else { i as f64 };
            x[[i, 4]] = f64::NAN;
        }

        let (filtered, kept) = filter_columns(&x, 0.7);
        // 0.70 is kept (inclusive), 0.71 and 1.0 are not
        assert_eq!(kept, vec![0, 1, 2]);
        assert_eq!(filtered.ncols(), 3);
        assert_eq!(filtered.nrows(), n);
    }

    #[test]
    fn test_mean_fill_fills_everything() {
        let mut x = array![
            [1.0, f64::NAN, f64::NAN],
            [f64::NAN, f64::NAN, f64::NAN],
            [3.0, f64::NAN, f64::NAN],
        ];
        let filled = mean_fill(&mut x);
        assert_eq!(filled, 5);
        assert_eq!(missing_cell_count(&x), 0);
        // observed mean of column 0 is 2.0
        assert_eq!(x[[1, 0]], 2.0);
        // all-missing columns fall back to 0.0
        assert_eq!(x[[0, 1]], 0.0);
        assert_eq!(x[[2, 2]], 0.0);
    }
}
