//! Forward/backward fill imputation
//!
//! Row order is treated as a time-ordered sequence: each missing cell takes
//! the nearest preceding observed value in its column, leading gaps take the
//! nearest following value, and a column with no observed values at all falls
//! back to the column mean pass (which fills it with 0.0).

use crate::error::Result;
use crate::imputation::{is_missing, observed_mean, Imputer};
use ndarray::{Array2, Axis};

/// Forward fill, then backward fill, then column-mean residual.
///
/// Stateless: `fit` is a no-op, every statistic is taken from the matrix
/// being transformed (propagated values depend on the row order of that
/// matrix, not of the fit data).
#[derive(Debug, Clone, Default)]
pub struct DirectionalFill;

impl DirectionalFill {
    pub fn new() -> Self {
        Self
    }

    /// Fill one column in place, returning whether any cell remains missing
    fn fill_column(column: &mut [f64]) {
        // Forward pass
        let mut last_observed = f64::NAN;
        for v in column.iter_mut() {
            if is_missing(*v) {
                *v = last_observed;
            } else {
                last_observed = *v;
            }
        }

        // Backward pass for leading gaps
        let mut next_observed = f64::NAN;
        for v in column.iter_mut().rev() {
            if is_missing(*v) {
                *v = next_observed;
            } else {
                next_observed = *v;
            }
        }
    }
}

impl Imputer for DirectionalFill {
    fn fit(&mut self, _x: &Array2<f64>) -> Result<()> {
        Ok(())
    }

    fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let mut result = x.clone();

        for mut col in result.axis_iter_mut(Axis(1)) {
            let mut values: Vec<f64> = col.iter().copied().collect();
            Self::fill_column(&mut values);

            // Residual mean for all-missing columns
            if values.iter().any(|v| is_missing(*v)) {
                let fallback = observed_mean(&values).unwrap_or(0.0);
                for v in &mut values {
                    if is_missing(*v) {
                        *v = fallback;
                    }
                }
            }

            for (v, filled) in col.iter_mut().zip(values.iter()) {
                *v = *filled;
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
    fn test_ffill_then_bfill() {
        let x = array![[f64::NAN], [2.0], [f64::NAN], [4.0], [f64::NAN]];
        let result = DirectionalFill::new().fit_transform(&x).unwrap();
        assert_eq!(result.column(0).to_vec(), vec![2.0, 2.0, 2.0, 4.0, 4.0]);
    }

    #[test]
    fn test_leading_gap_uses_backward_fill() {
        let x = array![[f64::NAN], [f64::NAN], [7.0], [8.0]];
        let result = DirectionalFill::new().fit_transform(&x).unwrap();
        assert_eq!(result.column(0).to_vec(), vec![7.0, 7.0, 7.0, 8.0]);
    }

    #[test]
    fn test_all_missing_column() {
        let x = array![[f64::NAN, 1.0], [f64::NAN, f64::NAN], [f64::NAN, 3.0]];
        let result = DirectionalFill::new().fit_transform(&x).unwrap();
        assert!(!result.iter().any(|v| v.is_nan()));
        assert_eq!(result[[0, 0]], 0.0);
        // second column is filled by propagation, not by the fallback
        assert_eq!(result[[1, 1]], 1.0);
    }
}
