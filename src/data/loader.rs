//! CSV Data Loader Module
//! Handles CSV file loading and table inspection using Polars.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Cell text read as missing, in addition to empty fields.
pub const NA_VALUES: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("CSV file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
}

/// Name, type and missing-value count of one column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub name: String,
    pub dtype: DataType,
    pub null_count: usize,
}

/// Snapshot of a freshly loaded table: preview rows plus per-column metadata.
#[derive(Debug, Clone)]
pub struct TableProfile {
    pub head_rows: usize,
    pub head: DataFrame,
    pub columns: Vec<ColumnInfo>,
}

/// Handles CSV file loading with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file with a header row, keeping row order and column names verbatim.
    ///
    /// Column types are inferred from every row, so a stray non-numeric cell
    /// anywhere turns its column into text instead of failing the load.
    pub fn load_csv(file_path: &Path) -> Result<DataFrame, LoaderError> {
        if !file_path.is_file() {
            return Err(LoaderError::NotFound(file_path.to_path_buf()));
        }

        let null_values =
            NullValues::AllColumns(NA_VALUES.iter().map(|v| (*v).into()).collect());
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(None)
            .with_parse_options(CsvParseOptions::default().with_null_values(Some(null_values)))
            .try_into_reader_with_file_path(Some(file_path.to_path_buf()))?
            .finish()?;

        info!(
            path = %file_path.display(),
            rows = df.height(),
            columns = df.width(),
            "loaded csv"
        );
        Ok(df)
    }

    /// Collect the preview rows, column types and missing-value counts.
    pub fn profile(df: &DataFrame, head_rows: usize) -> TableProfile {
        let columns: Vec<ColumnInfo> = df
            .get_columns()
            .iter()
            .map(|col| ColumnInfo {
                name: col.name().to_string(),
                dtype: col.dtype().clone(),
                null_count: col.null_count(),
            })
            .collect();

        debug!(
            missing = columns.iter().map(|c| c.null_count).sum::<usize>(),
            "profiled table"
        );

        TableProfile {
            head_rows,
            head: df.head(Some(head_rows)),
            columns,
        }
    }
}
