//! Hybrid imputation: route columns by missing ratio
//!
//! Columns with a low missing ratio keep their time-series structure via
//! forward/backward fill; sparser columns go through one joint KNN call so
//! the distance metric sees that whole partition at once. Whatever survives
//! both passes is filled with the column mean.

use crate::error::Result;
use crate::imputation::{
    is_missing, mean_fill, missing_ratios, DirectionalFill, Imputer, KnnImputer,
};
use ndarray::{Array2, Axis};

/// Hybrid composer over [`DirectionalFill`] and [`KnnImputer`].
///
/// Partitioning happens at fit time from the fit data's missing ratios.
#[derive(Debug, Clone)]
pub struct HybridImputer {
    split_threshold: f64,
    n_neighbors: usize,
    /// Column indices routed to forward/backward fill
    fill_columns: Option<Vec<usize>>,
    /// Column indices routed to the joint KNN call
    knn_columns: Option<Vec<usize>>,
}

impl HybridImputer {
    /// Create a hybrid imputer with the given split threshold (columns with
    /// missing ratio `<= split_threshold` are forward/backward filled, the
    /// rest are KNN-imputed)
    pub fn new(split_threshold: f64) -> Self {
        Self {
            split_threshold,
            n_neighbors: 5,
            fill_columns: None,
            knn_columns: None,
        }
    }

    /// Set the neighbor count for the KNN partition
    pub fn with_n_neighbors(mut self, n: usize) -> Self {
        self.n_neighbors = n.max(1);
        self
    }

    /// Columns routed to forward/backward fill (after fit)
    pub fn fill_columns(&self) -> Option<&[usize]> {
        self.fill_columns.as_deref()
    }

    /// Columns routed to KNN (after fit)
    pub fn knn_columns(&self) -> Option<&[usize]> {
        self.knn_columns.as_deref()
    }
}

impl Default for HybridImputer {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl Imputer for HybridImputer {
    fn fit(&mut self, x: &Array2<f64>) -> Result<()> {
        let ratios = missing_ratios(x);

        let (fill_cols, knn_cols): (Vec<usize>, Vec<usize>) =
            (0..x.ncols()).partition(|&j| ratios[j] <= self.split_threshold);

        self.fill_columns = Some(fill_cols);
        self.knn_columns = Some(knn_cols);
        Ok(())
    }

    fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let fill_cols = self
            .fill_columns
            .as_ref()
            .ok_or(crate::error::SecomError::NotFitted)?;
        let knn_cols = self
            .knn_columns
            .as_ref()
            .ok_or(crate::error::SecomError::NotFitted)?;

        let mut result = x.clone();

        // Low-missing partition: forward/backward fill, column by column
        if !fill_cols.is_empty() {
            let sub = result.select(Axis(1), fill_cols);
            let filled = DirectionalFill::new().fit_transform(&sub)?;
            for (sub_j, &j) in fill_cols.iter().enumerate() {
                result.column_mut(j).assign(&filled.column(sub_j));
            }
        }

        // High-missing partition: one joint KNN call over the partition
        if !knn_cols.is_empty() {
            let sub = result.select(Axis(1), knn_cols);
            let imputed = KnnImputer::new(self.n_neighbors).fit_transform(&sub)?;
            for (sub_j, &j) in knn_cols.iter().enumerate() {
                result.column_mut(j).assign(&imputed.column(sub_j));
            }
        }

        // Residual global column-mean fill
        if result.iter().any(|&v| is_missing(v)) {
            mean_fill(&mut result);
        }

        Ok(result)
    }
}
