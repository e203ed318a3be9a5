//! Dataset loading and variant persistence
//!
//! The SECOM table is a numeric sensor matrix with two optional non-feature
//! columns: `Time` (row identifier) and `Pass/Fail` (label). Both are split
//! off once at load time; the strategies only ever see the feature matrix.

pub mod profile;

pub use profile::{ColumnMissing, MissingProfile, RowMissingStats, BAND_LABELS};

use crate::error::{Result, SecomError};
use crate::imputation::{filter_columns, is_missing};
use ndarray::Array2;
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Identifier column name, excluded from imputation when present
pub const ID_COLUMN: &str = "Time";

/// Label column name, excluded from imputation when present
pub const LABEL_COLUMN: &str = "Pass/Fail";

/// A loaded sensor table: feature matrix plus the optional identifier and
/// label columns that are reattached on write.
#[derive(Debug, Clone)]
pub struct SensorDataset {
    features: Array2<f64>,
    feature_names: Vec<String>,
    id: Option<Column>,
    label: Option<Column>,
}

impl SensorDataset {
    /// Load a delimited file with a header row
    pub fn from_csv(path: &Path) -> Result<Self> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(1000))
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()?;

        Self::from_dataframe(df)
    }

    /// Split the optional identifier/label columns and convert the rest to a
    /// feature matrix with NaN marking absent cells
    pub fn from_dataframe(df: DataFrame) -> Result<Self> {
        let mut df = df;

        let id = df.column(ID_COLUMN).ok().cloned();
        if id.is_some() {
            df = df.drop(ID_COLUMN)?;
        }

        let label = df.column(LABEL_COLUMN).ok().cloned();
        if label.is_some() {
            df = df.drop(LABEL_COLUMN)?;
        }

        let n_rows = df.height();
        let n_cols = df.width();

        let mut feature_names = Vec::with_capacity(n_cols);
        let mut features = Array2::from_elem((n_rows, n_cols), f64::NAN);

        for (j, col) in df.get_columns().iter().enumerate() {
            let name = col.name().to_string();
            match col.dtype() {
                DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::UInt8
                | DataType::UInt16
                | DataType::UInt32
                | DataType::UInt64
                | DataType::Float32
                | DataType::Float64
                | DataType::Null => {}
                // CSV inference can give an all-empty column a string dtype;
                // it is still a (fully missing) sensor column
                DataType::String if col.null_count() == n_rows => {}
                other => {
                    return Err(SecomError::DataError(format!(
                        "feature column '{}' is not numeric (found {:?})",
                        name, other
                    )));
                }
            }
            let casted = col.cast(&DataType::Float64)?;
            let series = casted.as_materialized_series();
            let values = series.f64()?;

            for (i, v) in values.into_iter().enumerate() {
                if let Some(v) = v {
                    features[[i, j]] = v;
                }
            }
            feature_names.push(name);
        }

        Ok(Self {
            features,
            feature_names,
            id,
            label,
        })
    }

    /// The feature matrix (NaN = missing)
    pub fn features(&self) -> &Array2<f64> {
        &self.features
    }

    /// Feature column names, in input order
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// The identifier column, when the input had one
    pub fn id(&self) -> Option<&Column> {
        self.id.as_ref()
    }

    /// The label column, when the input had one
    pub fn label(&self) -> Option<&Column> {
        self.label.as_ref()
    }

    pub fn n_rows(&self) -> usize {
        self.features.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    /// Missing-value profile of the feature matrix
    pub fn profile(&self) -> MissingProfile {
        MissingProfile::compute(&self.features, &self.feature_names)
    }

    /// Drop feature columns whose missing ratio exceeds `threshold`
    /// (inclusive boundary: a column at exactly `threshold` is kept)
    pub fn drop_high_missing(&self, threshold: f64) -> Self {
        let (features, kept) = filter_columns(&self.features, threshold);
        let feature_names = kept
            .iter()
            .map(|&j| self.feature_names[j].clone())
            .collect();

        Self {
            features,
            feature_names,
            id: self.id.clone(),
            label: self.label.clone(),
        }
    }

    /// Reassemble a full table from a (possibly imputed) feature matrix:
    /// identifier first, features in order, label last. NaN cells become
    /// nulls so they are written as empty fields.
    pub fn to_dataframe(&self, data: &Array2<f64>) -> Result<DataFrame> {
        if data.nrows() != self.n_rows() || data.ncols() != self.n_features() {
            return Err(SecomError::ShapeError {
                expected: format!("{} x {}", self.n_rows(), self.n_features()),
                actual: format!("{} x {}", data.nrows(), data.ncols()),
            });
        }

        let mut columns: Vec<Column> = Vec::with_capacity(self.n_features() + 2);

        if let Some(id) = &self.id {
            columns.push(id.clone());
        }

        for (j, name) in self.feature_names.iter().enumerate() {
            let values: Vec<Option<f64>> = data
                .column(j)
                .iter()
                .map(|&v| if is_missing(v) { None } else { Some(v) })
                .collect();
            columns.push(Column::new(name.as_str().into(), values));
        }

        if let Some(label) = &self.label {
            columns.push(label.clone());
        }

        Ok(DataFrame::new(columns)?)
    }

    /// Persist one variant as `<stem>_<strategy_id>.csv` under `out_dir`,
    /// returning the written path
    pub fn write_variant(
        &self,
        data: &Array2<f64>,
        out_dir: &Path,
        stem: &str,
        strategy_id: &str,
    ) -> Result<PathBuf> {
        let mut df = self.to_dataframe(data)?;
        let path = out_dir.join(format!("{stem}_{strategy_id}.csv"));

        let mut file = File::create(&path)?;
        CsvWriter::new(&mut file).finish(&mut df)?;

        Ok(path)
    }
}
