//! KNN-based imputation

use crate::error::{Result, SecomError};
use crate::imputation::{is_missing, Imputer};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Distance metric over mutually observed features
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceMetric {
    Euclidean,
    Manhattan,
}

/// How neighbor values are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NeighborWeighting {
    /// Simple average of neighbor values
    Uniform,
    /// Inverse-distance weighted average
    Distance,
}

/// Ordered float for the neighbor heap
#[derive(Debug, Clone, Copy)]
struct DistanceIdx(f64, usize);

impl PartialEq for DistanceIdx {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for DistanceIdx {}

impl PartialOrd for DistanceIdx {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DistanceIdx {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max heap by distance, so the worst neighbor is popped first
        self.0.partial_cmp(&other.0).unwrap_or(Ordering::Equal)
    }
}

/// KNN-based imputer.
///
/// Donors are the fully observed rows of the fit data. Each missing cell is
/// estimated from the `k` donors nearest to its row, with distances averaged
/// over the features observed on both sides. When no usable donor exists the
/// observed-value column mean is used (0.0 for an all-missing column), so a
/// fitted transform always fully populates the matrix.
#[derive(Debug, Clone)]
pub struct KnnImputer {
    n_neighbors: usize,
    metric: DistanceMetric,
    weighting: NeighborWeighting,
    /// Fully observed rows of the fit data
    donors: Option<Array2<f64>>,
    /// Observed-value mean per column, for fallback
    column_means: Option<Array1<f64>>,
}

impl KnnImputer {
    /// Create a new KNN imputer with distance weighting (the configuration
    /// the SECOM comparison uses)
    pub fn new(n_neighbors: usize) -> Self {
        Self {
            n_neighbors: n_neighbors.max(1),
            metric: DistanceMetric::Euclidean,
            weighting: NeighborWeighting::Distance,
            donors: None,
            column_means: None,
        }
    }

    /// Set the distance metric
    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Set the weighting scheme
    pub fn with_weighting(mut self, weighting: NeighborWeighting) -> Self {
        self.weighting = weighting;
        self
    }

    /// Distance between two rows over their mutually observed features.
    /// Infinite when the rows share no observed feature.
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        let mut count = 0usize;
        let mut accum = 0.0f64;

        for (&ai, &bi) in a.iter().zip(b.iter()) {
            if is_missing(ai) || is_missing(bi) {
                continue;
            }
            count += 1;
            match self.metric {
                DistanceMetric::Manhattan => accum += (ai - bi).abs(),
                DistanceMetric::Euclidean => {
                    let d = ai - bi;
                    accum += d * d;
                }
            }
        }

        if count == 0 {
            return f64::INFINITY;
        }

        match self.metric {
            DistanceMetric::Manhattan => accum / count as f64,
            DistanceMetric::Euclidean => (accum / count as f64).sqrt(),
        }
    }

    /// The k nearest donors to `sample`, as (donor row index, distance)
    fn find_neighbors(&self, donors: &Array2<f64>, sample: &[f64], k: usize) -> Vec<(usize, f64)> {
        let mut heap: BinaryHeap<DistanceIdx> = BinaryHeap::with_capacity(k + 1);

        let mut row_buf: Vec<f64> = Vec::with_capacity(donors.ncols());
        for (i, row) in donors.rows().into_iter().enumerate() {
            let dist = match row.as_slice() {
                Some(s) => self.distance(sample, s),
                None => {
                    row_buf.clear();
                    row_buf.extend(row.iter().copied());
                    self.distance(sample, &row_buf)
                }
            };

            if dist.is_finite() {
                if heap.len() < k {
                    heap.push(DistanceIdx(dist, i));
                } else if let Some(&DistanceIdx(max_dist, _)) = heap.peek() {
                    if dist < max_dist {
                        heap.pop();
                        heap.push(DistanceIdx(dist, i));
                    }
                }
            }
        }

        heap.into_iter().map(|DistanceIdx(d, i)| (i, d)).collect()
    }

    /// Combine neighbor values for one feature, falling back to the column
    /// mean when there are no neighbors
    fn impute_value(
        &self,
        donors: &Array2<f64>,
        means: &Array1<f64>,
        neighbors: &[(usize, f64)],
        feature_idx: usize,
    ) -> f64 {
        if neighbors.is_empty() {
            return means[feature_idx];
        }

        match self.weighting {
            NeighborWeighting::Distance => {
                let mut weighted_sum = 0.0;
                let mut weight_sum = 0.0;

                for &(idx, dist) in neighbors {
                    let weight = if dist < 1e-10 { 1e10 } else { 1.0 / dist };
                    weighted_sum += donors[[idx, feature_idx]] * weight;
                    weight_sum += weight;
                }

                if weight_sum > 0.0 {
                    weighted_sum / weight_sum
                } else {
                    means[feature_idx]
                }
            }
            NeighborWeighting::Uniform => {
                let sum: f64 = neighbors
                    .iter()
                    .map(|&(idx, _)| donors[[idx, feature_idx]])
                    .sum();
                sum / neighbors.len() as f64
            }
        }
    }
}

impl Default for KnnImputer {
    fn default() -> Self {
        Self::new(5)
    }
}

impl Imputer for KnnImputer {
    fn fit(&mut self, x: &Array2<f64>) -> Result<()> {
        let complete_rows: Vec<usize> = x
            .rows()
            .into_iter()
            .enumerate()
            .filter(|(_, row)| !row.iter().any(|&v| is_missing(v)))
            .map(|(i, _)| i)
            .collect();

        // The donor pool may be empty; the column-mean fallback then covers
        // every missing cell instead of aborting the batch.
        let donors = x.select(Axis(0), &complete_rows);

        let column_means: Vec<f64> = (0..x.ncols())
            .map(|j| {
                let column: Vec<f64> = x.column(j).iter().copied().collect();
                crate::imputation::observed_mean(&column).unwrap_or(0.0)
            })
            .collect();

        self.donors = Some(donors);
        self.column_means = Some(Array1::from_vec(column_means));

        Ok(())
    }

    fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let donors = self.donors.as_ref().ok_or(SecomError::NotFitted)?;
        let means = self.column_means.as_ref().ok_or(SecomError::NotFitted)?;

        if means.len() != x.ncols() {
            return Err(SecomError::ShapeError {
                expected: format!("{} columns", means.len()),
                actual: format!("{} columns", x.ncols()),
            });
        }

        let mut result = x.clone();
        let n_features = x.ncols();
        let mut row_buf: Vec<f64> = Vec::with_capacity(n_features);

        for (row_idx, row) in x.rows().into_iter().enumerate() {
            if !row.iter().any(|&v| is_missing(v)) {
                continue;
            }

            let row_slice = match row.as_slice() {
                Some(s) => s,
                None => {
                    row_buf.clear();
                    row_buf.extend(row.iter().copied());
                    &row_buf
                }
            };

            let neighbors = self.find_neighbors(donors, row_slice, self.n_neighbors);

            for j in 0..n_features {
                if is_missing(row_slice[j]) {
                    result[[row_idx, j]] = self.impute_value(donors, means, &neighbors, j);
                }
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_knn_imputer_basic() {
        let data = Array2::from_shape_vec(
            (6, 2),
            vec![
                1.0,
                10.0,
                2.0,
                20.0,
                3.0,
                30.0,
                4.0,
                40.0,
                f64::NAN,
                25.0,
                2.5,
                f64::NAN,
            ],
        )
        .unwrap();

        let mut imputer = KnnImputer::new(3);
        let result = imputer.fit_transform(&data).unwrap();

        assert!(!result.iter().any(|&v| v.is_nan()));
        assert!(result[[4, 0]] >= 1.0 && result[[4, 0]] <= 4.0);
        assert!(result[[5, 1]] >= 10.0 && result[[5, 1]] <= 40.0);
    }

    #[test]
    fn test_knn_distance_weighting_favors_close_rows() {
        let data = Array2::from_shape_vec(
            (5, 2),
            vec![0.0, 0.0, 1.0, 1.0, 2.0, 2.0, 3.0, 3.0, 0.1, f64::NAN],
        )
        .unwrap();

        let mut imputer = KnnImputer::new(3);
        let result = imputer.fit_transform(&data).unwrap();

        // Heavily weighted towards the first row's value
        assert!(result[[4, 1]].abs() < 1.0);
    }

    #[test]
    fn test_knn_no_complete_rows_falls_back_to_means() {
        // Every row has a gap, so the donor pool is empty
        let data = Array2::from_shape_vec(
            (3, 2),
            vec![1.0, f64::NAN, f64::NAN, 10.0, 3.0, f64::NAN],
        )
        .unwrap();

        let mut imputer = KnnImputer::new(5);
        let result = imputer.fit_transform(&data).unwrap();

        assert!(!result.iter().any(|&v| v.is_nan()));
        // column 0 observed mean = 2.0, column 1 observed mean = 10.0
        assert_eq!(result[[1, 0]], 2.0);
        assert_eq!(result[[0, 1]], 10.0);
        assert_eq!(result[[2, 1]], 10.0);
    }

    #[test]
    fn test_knn_manhattan() {
        let data = Array2::from_shape_vec(
            (4, 2),
            vec![1.0, 1.0, 2.0, 2.0, 3.0, 3.0, 1.5, f64::NAN],
        )
        .unwrap();

        let mut imputer = KnnImputer::new(2).with_metric(DistanceMetric::Manhattan);
        let result = imputer.fit_transform(&data).unwrap();
        assert!(!result.iter().any(|&v| v.is_nan()));
    }

    #[test]
    fn test_knn_uniform_weighting() {
        let data = Array2::from_shape_vec(
            (4, 2),
            vec![1.0, 10.0, 2.0, 20.0, 3.0, 30.0, 2.0, f64::NAN],
        )
        .unwrap();

        let mut imputer = KnnImputer::new(3).with_weighting(NeighborWeighting::Uniform);
        let result = imputer.fit_transform(&data).unwrap();
        // plain average of all three donors
        assert!((result[[3, 1]] - 20.0).abs() < 1e-9);
    }
}
