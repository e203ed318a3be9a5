//! Missing-value profiling
//!
//! Everything the operator needs to pick a drop threshold and a split
//! threshold: per-column missing ratios, the ratio-band distribution, and
//! per-row coverage.

use crate::imputation::is_missing;
use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

/// Labels for the 10-percentage-point missing-ratio bands
pub const BAND_LABELS: [&str; 10] = [
    "0-10%", "10-20%", "20-30%", "30-40%", "40-50%", "50-60%", "60-70%", "70-80%", "80-90%",
    "90-100%",
];

/// Missing statistics for one column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnMissing {
    pub name: String,
    pub missing: usize,
    pub ratio: f64,
}

/// Per-row missing statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowMissingStats {
    /// Mean missing cells per row
    pub mean: f64,
    /// Most missing cells in any row
    pub max: usize,
    /// Fewest missing cells in any row
    pub min: usize,
    /// Rows with no missing cell at all
    pub complete_rows: usize,
}

/// Missing-value profile of a feature matrix
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissingProfile {
    pub n_rows: usize,
    pub n_columns: usize,
    pub total_missing: usize,
    /// Missing cells over all cells
    pub overall_ratio: f64,
    pub columns_with_missing: usize,
    pub columns_complete: usize,
    /// Per-column statistics, sorted by ratio descending
    pub columns: Vec<ColumnMissing>,
    /// Column count per 10-percentage-point ratio band; zero-missing columns
    /// are not banded
    pub band_counts: [usize; 10],
    pub rows: RowMissingStats,
}

impl MissingProfile {
    /// Compute the profile for a feature matrix. `names` must have one entry
    /// per column.
    pub fn compute(x: &Array2<f64>, names: &[String]) -> Self {
        let n_rows = x.nrows();
        let n_columns = x.ncols();

        let mut columns: Vec<ColumnMissing> = x
            .axis_iter(Axis(1))
            .zip(names.iter())
            .map(|(col, name)| {
                let missing = col.iter().filter(|v| is_missing(**v)).count();
                let ratio = if n_rows > 0 {
                    missing as f64 / n_rows as f64
                } else {
                    0.0
                };
                ColumnMissing {
                    name: name.clone(),
                    missing,
                    ratio,
                }
            })
            .collect();

        let total_missing: usize = columns.iter().map(|c| c.missing).sum();
        let columns_with_missing = columns.iter().filter(|c| c.missing > 0).count();

        let mut band_counts = [0usize; 10];
        for col in &columns {
            if col.ratio > 0.0 {
                let band = (((col.ratio * 10.0).ceil() as usize).saturating_sub(1)).min(9);
                band_counts[band] += 1;
            }
        }

        columns.sort_by(|a, b| {
            b.ratio
                .partial_cmp(&a.ratio)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let row_missing: Vec<usize> = x
            .axis_iter(Axis(0))
            .map(|row| row.iter().filter(|v| is_missing(**v)).count())
            .collect();

        let rows = RowMissingStats {
            mean: if n_rows > 0 {
                row_missing.iter().sum::<usize>() as f64 / n_rows as f64
            } else {
                0.0
            },
            max: row_missing.iter().copied().max().unwrap_or(0),
            min: row_missing.iter().copied().min().unwrap_or(0),
            complete_rows: row_missing.iter().filter(|&&m| m == 0).count(),
        };

        let cells = n_rows * n_columns;

        Self {
            n_rows,
            n_columns,
            total_missing,
            overall_ratio: if cells > 0 {
                total_missing as f64 / cells as f64
            } else {
                0.0
            },
            columns_with_missing,
            columns_complete: n_columns - columns_with_missing,
            columns,
            band_counts,
            rows,
        }
    }

    /// The `n` columns with the highest missing ratios
    pub fn top_columns(&self, n: usize) -> &[ColumnMissing] {
        &self.columns[..n.min(self.columns.len())]
    }

    /// Column counts in the bands the threshold recommendation uses:
    /// (>50%, >10% and <=50%, >0% and <=10%)
    pub fn threshold_bands(&self) -> (usize, usize, usize) {
        let high = self.columns.iter().filter(|c| c.ratio > 0.5).count();
        let medium = self
            .columns
            .iter()
            .filter(|c| c.ratio > 0.1 && c.ratio <= 0.5)
            .count();
        let low = self
            .columns
            .iter()
            .filter(|c| c.ratio > 0.0 && c.ratio <= 0.1)
            .count();
        (high, medium, low)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("s{i}")).collect()
    }

    #[test]
    fn test_profile_counts() {
        let x = array![
            [1.0, f64::NAN, f64::NAN],
            [2.0, 5.0, f64::NAN],
            [3.0, 6.0, f64::NAN],
            [4.0, 7.0, f64::NAN],
        ];
        let p = MissingProfile::compute(&x, &names(3));

        assert_eq!(p.n_rows, 4);
        assert_eq!(p.total_missing, 5);
        assert_eq!(p.columns_with_missing, 2);
        assert_eq!(p.columns_complete, 1);
        assert!((p.overall_ratio - 5.0 / 12.0).abs() < 1e-12);

        // sorted descending: s2 (1.0), s1 (0.25), s0 (0.0)
        assert_eq!(p.columns[0].name, "s2");
        assert_eq!(p.columns[0].ratio, 1.0);
        assert_eq!(p.columns[2].missing, 0);
    }

    #[test]
    fn test_profile_bands() {
        let x = array![
            [1.0, f64::NAN, f64::NAN],
            [2.0, 5.0, f64::NAN],
            [3.0, 6.0, f64::NAN],
            [4.0, 7.0, f64::NAN],
        ];
        let p = MissingProfile::compute(&x, &names(3));

        // ratio 0.25 lands in 20-30%, ratio 1.0 in 90-100%
        assert_eq!(p.band_counts[2], 1);
        assert_eq!(p.band_counts[9], 1);
        assert_eq!(p.band_counts.iter().sum::<usize>(), 2);
    }

    #[test]
    fn test_profile_rows() {
        let x = array![[1.0, 2.0], [f64::NAN, f64::NAN], [3.0, f64::NAN]];
        let p = MissingProfile::compute(&x, &names(2));

        assert_eq!(p.rows.max, 2);
        assert_eq!(p.rows.min, 0);
        assert_eq!(p.rows.complete_rows, 1);
        assert!((p.rows.mean - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_threshold_bands() {
        let mut x = Array2::zeros((100, 3));
        for i in 0..100 {
            x[[i, 0]] = if i < 60 { f64::NAN } else { 1.0 }; // 0.6 -> high
            x[[i, 1]] = if i < 30 { f64::NAN } else { 1.0 }; // 0.3 -> medium
            x[[i, 2]] = if i < 5 { f64::NAN } else { 1.0 }; // 0.05 -> low
        }
        let p = MissingProfile::compute(&x, &names(3));
        assert_eq!(p.threshold_bands(), (1, 1, 1));
    }
}
