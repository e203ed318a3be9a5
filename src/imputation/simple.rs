//! Mean and median imputation

use crate::error::{Result, SecomError};
use crate::imputation::{is_missing, Imputer};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Statistic used by [`SimpleImputer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimpleStrategy {
    /// Column arithmetic mean over observed values
    Mean,
    /// Column median over observed values
    Median,
}

/// Per-column constant imputer (mean or median of the observed values).
///
/// A column with zero observed values has no defined statistic; such columns
/// are filled with 0.0.
#[derive(Debug, Clone)]
pub struct SimpleImputer {
    strategy: SimpleStrategy,
    /// Fill value per column, computed during fit
    fill_values: Option<Array1<f64>>,
}

impl SimpleImputer {
    /// Create a new imputer with the given strategy
    pub fn new(strategy: SimpleStrategy) -> Self {
        Self {
            strategy,
            fill_values: None,
        }
    }

    /// The configured strategy
    pub fn strategy(&self) -> SimpleStrategy {
        self.strategy
    }

    fn column_statistic(&self, column: &[f64]) -> f64 {
        let mut observed: Vec<f64> = column.iter().filter(|v| !is_missing(**v)).copied().collect();

        if observed.is_empty() {
            return 0.0;
        }

        match self.strategy {
            SimpleStrategy::Mean => observed.iter().sum::<f64>() / observed.len() as f64,
            SimpleStrategy::Median => {
                observed.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
                let mid = observed.len() / 2;
                if observed.len() % 2 == 0 {
                    (observed[mid - 1] + observed[mid]) / 2.0
                } else {
                    observed[mid]
                }
            }
        }
    }
}

impl Imputer for SimpleImputer {
    fn fit(&mut self, x: &Array2<f64>) -> Result<()> {
        let fill_values: Vec<f64> = (0..x.ncols())
            .map(|j| {
                let column: Vec<f64> = x.column(j).iter().copied().collect();
                self.column_statistic(&column)
            })
            .collect();

        self.fill_values = Some(Array1::from_vec(fill_values));
        Ok(())
    }

    fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let fill_values = self.fill_values.as_ref().ok_or(SecomError::NotFitted)?;

        if fill_values.len() != x.ncols() {
            return Err(SecomError::ShapeError {
                expected: format!("{} columns", fill_values.len()),
                actual: format!("{} columns", x.ncols()),
            });
        }

        let mut result = x.clone();
        for ((_, j), v) in result.indexed_iter_mut() {
            if is_missing(*v) {
                *v = fill_values[j];
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_mean_imputation() {
        let x = array![[1.0], [f64::NAN], [3.0]];
        let mut imputer = SimpleImputer::new(SimpleStrategy::Mean);
        let result = imputer.fit_transform(&x).unwrap();
        assert_eq!(result.column(0).to_vec(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_median_even_count() {
        let x = array![[1.0], [2.0], [10.0], [20.0], [f64::NAN]];
        let mut imputer = SimpleImputer::new(SimpleStrategy::Median);
        let result = imputer.fit_transform(&x).unwrap();
        // median of {1, 2, 10, 20} = 6
        assert_eq!(result[[4, 0]], 6.0);
    }

    #[test]
    fn test_median_odd_count() {
        let x = array![[1.0], [5.0], [100.0], [f64::NAN]];
        let mut imputer = SimpleImputer::new(SimpleStrategy::Median);
        let result = imputer.fit_transform(&x).unwrap();
        assert_eq!(result[[3, 0]], 5.0);
    }

    #[test]
    fn test_all_missing_column_filled_with_zero() {
        let x = array![[f64::NAN, 1.0], [f64::NAN, 2.0]];
        let mut imputer = SimpleImputer::new(SimpleStrategy::Mean);
        let result = imputer.fit_transform(&x).unwrap();
        assert_eq!(result[[0, 0]], 0.0);
        assert_eq!(result[[1, 0]], 0.0);
    }

    #[test]
    fn test_transform_requires_fit() {
        let x = array![[1.0], [f64::NAN]];
        let imputer = SimpleImputer::new(SimpleStrategy::Mean);
        assert!(imputer.transform(&x).is_err());
    }
}
