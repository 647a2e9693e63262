//! Data Processor Module
//! Handles data cleaning and derived-column construction.

use crate::config::{
    AnalysisSettings, MARKETING_SPEND_COL, NUMERIC_COLUMNS, PRODUCT_COL, REVENUE_COL, SALES_COL,
    SPEND_COLUMNS, UNITS_SOLD_COL, UNIT_PRICE_COL, WEEK_COL,
};
use polars::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Required column '{0}' is missing")]
    MissingColumn(String),
}

/// Parse one cell as a number. Anything that does not parse becomes missing.
pub fn parse_numeric(cell: &str) -> Option<f64> {
    cell.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| !value.is_nan())
}

/// Handles data cleaning and transformation operations.
pub struct DataProcessor;

impl DataProcessor {
    /// Convert a column to Float64, marking unconvertible cells as null.
    pub fn coerce_numeric(column: &Column) -> Result<Column, ProcessorError> {
        let values: Vec<Option<f64>> = match column.dtype() {
            DataType::Boolean
            | DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64 => {
                let as_f64 = column.cast(&DataType::Float64)?;
                as_f64
                    .f64()?
                    .into_iter()
                    .map(|v| v.filter(|x| !x.is_nan()))
                    .collect()
            }
            _ => {
                let as_str = column.cast(&DataType::String)?;
                as_str
                    .as_materialized_series()
                    .str()?
                    .into_iter()
                    .map(|cell| cell.and_then(parse_numeric))
                    .collect()
            }
        };

        Ok(Column::new(column.name().clone(), values))
    }

    /// Drop every row holding a null or a float NaN in any column, not only
    /// the coerced ones.
    pub fn drop_incomplete_rows(df: &DataFrame) -> Result<DataFrame, ProcessorError> {
        let mut mask = BooleanChunked::full("complete".into(), true, df.height());
        for column in df.get_columns() {
            let present = column.as_materialized_series().is_not_null();
            mask = &mask & &present;

            if matches!(column.dtype(), DataType::Float32 | DataType::Float64) {
                let as_f64 = column.cast(&DataType::Float64)?;
                let not_nan: BooleanChunked = as_f64
                    .f64()?
                    .into_iter()
                    .map(|v| Some(!v.is_some_and(|x| x.is_nan())))
                    .collect();
                mask = &mask & &not_nan;
            }
        }
        Ok(df.filter(&mask)?)
    }

    /// Coerce the spend and sales columns, drop incomplete rows, and append
    /// Units_Sold, Unit_Price, Revenue, Week and Product.
    pub fn clean(df: &DataFrame, settings: &AnalysisSettings) -> Result<DataFrame, ProcessorError> {
        let mut columns = df.get_columns().to_vec();
        for name in NUMERIC_COLUMNS {
            let idx = df
                .get_column_index(name)
                .ok_or_else(|| ProcessorError::MissingColumn(name.to_string()))?;
            columns[idx] = Self::coerce_numeric(&columns[idx])?;
        }
        let coerced = DataFrame::new(columns)?;

        let kept = Self::drop_incomplete_rows(&coerced)?;
        info!(
            kept = kept.height(),
            dropped = coerced.height() - kept.height(),
            "dropped incomplete rows"
        );

        let n = kept.height();
        let units = Self::numeric_values(&kept, SALES_COL)?;
        let revenue: Vec<f64> = units
            .iter()
            .map(|u| u * settings.unit_price as f64)
            .collect();
        // Week follows the post-drop row order
        let weeks: Vec<i64> = (1..=n as i64).collect();

        let mut columns = kept.get_columns().to_vec();
        columns.push(Column::new(UNITS_SOLD_COL.into(), units));
        columns.push(Column::new(UNIT_PRICE_COL.into(), vec![settings.unit_price; n]));
        columns.push(Column::new(REVENUE_COL.into(), revenue));
        columns.push(Column::new(WEEK_COL.into(), weeks));
        columns.push(Column::new(
            PRODUCT_COL.into(),
            vec![settings.product_label.as_str(); n],
        ));

        Ok(DataFrame::new(columns)?)
    }

    /// Return a copy of the table with Marketing_Spend = TV + Radio + Newspaper.
    pub fn with_marketing_spend(df: &DataFrame) -> Result<DataFrame, ProcessorError> {
        let mut spend = vec![0.0; df.height()];
        for name in SPEND_COLUMNS {
            if df.get_column_index(name).is_none() {
                return Err(ProcessorError::MissingColumn(name.to_string()));
            }
            for (total, value) in spend.iter_mut().zip(Self::numeric_values(df, name)?) {
                *total += value;
            }
        }
        debug!(rows = spend.len(), "derived marketing spend");

        let mut columns = df.get_columns().to_vec();
        columns.push(Column::new(MARKETING_SPEND_COL.into(), spend));
        Ok(DataFrame::new(columns)?)
    }

    /// Read a column as f64 values in row order, skipping nulls.
    pub fn numeric_values(df: &DataFrame, column: &str) -> PolarsResult<Vec<f64>> {
        let as_f64 = df.column(column)?.cast(&DataType::Float64)?;
        Ok(as_f64.f64()?.into_iter().flatten().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_table(sales: Vec<Option<&str>>) -> DataFrame {
        let n = sales.len();
        df!(
            "TV" => vec![Some(1.0); n],
            "Radio" => vec![Some(2.0); n],
            "Newspaper" => vec![Some(3.0); n],
            "Sales" => sales,
        )
        .unwrap()
    }

    fn strings(df: &DataFrame, name: &str) -> Vec<String> {
        df.column(name)
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .flatten()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn parse_numeric_marks_bad_cells_missing() {
        assert_eq!(parse_numeric(" 12.5 "), Some(12.5));
        assert_eq!(parse_numeric("7"), Some(7.0));
        assert_eq!(parse_numeric(""), None);
        assert_eq!(parse_numeric("abc"), None);
        assert_eq!(parse_numeric("NaN"), None);
    }

    #[test]
    fn coerce_numeric_turns_text_into_floats() {
        let column = Column::new("Sales".into(), vec![Some("10"), Some("x"), None, Some("2.5")]);
        let coerced = DataProcessor::coerce_numeric(&column).unwrap();

        assert_eq!(coerced.dtype(), &DataType::Float64);
        let values: Vec<Option<f64>> = coerced.f64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(10.0), None, None, Some(2.5)]);
    }

    #[test]
    fn clean_derives_columns() {
        let df = raw_table(vec![Some("10"), Some("30"), Some("20")]);
        let cleaned = DataProcessor::clean(&df, &AnalysisSettings::default()).unwrap();

        let units = DataProcessor::numeric_values(&cleaned, UNITS_SOLD_COL).unwrap();
        let revenue = DataProcessor::numeric_values(&cleaned, REVENUE_COL).unwrap();
        let weeks = DataProcessor::numeric_values(&cleaned, WEEK_COL).unwrap();
        assert_eq!(units, vec![10.0, 30.0, 20.0]);
        assert_eq!(revenue, vec![100.0, 300.0, 200.0]);
        assert_eq!(weeks, vec![1.0, 2.0, 3.0]);
        assert_eq!(strings(&cleaned, PRODUCT_COL), vec!["Product A"; 3]);

        let names: Vec<String> = cleaned
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            &names[4..],
            &["Units_Sold", "Unit_Price", "Revenue", "Week", "Product"]
        );
    }

    #[test]
    fn weeks_are_contiguous_after_drop() {
        let df = raw_table(vec![Some("5"), Some("bad"), None, Some("8"), Some("9")]);
        let cleaned = DataProcessor::clean(&df, &AnalysisSettings::default()).unwrap();

        assert_eq!(cleaned.height(), 3);
        let weeks = DataProcessor::numeric_values(&cleaned, WEEK_COL).unwrap();
        assert_eq!(weeks, vec![1.0, 2.0, 3.0]);
        let units = DataProcessor::numeric_values(&cleaned, UNITS_SOLD_COL).unwrap();
        assert_eq!(units, vec![5.0, 8.0, 9.0]);
    }

    #[test]
    fn null_in_unrelated_column_drops_row() {
        let df = df!(
            "TV" => [1.0, 2.0, 3.0, 4.0],
            "Radio" => [1.0, 2.0, 3.0, 4.0],
            "Newspaper" => [1.0, 2.0, 3.0, 4.0],
            "Sales" => [4.0, 5.0, 6.0, 7.0],
            "Notes" => [Some("a"), None, Some("c"), Some("d")],
            "Extra" => [Some(1.5), Some(2.5), Some(3.5), Some(f64::NAN)],
        )
        .unwrap();
        let cleaned = DataProcessor::clean(&df, &AnalysisSettings::default()).unwrap();

        let units = DataProcessor::numeric_values(&cleaned, UNITS_SOLD_COL).unwrap();
        assert_eq!(units, vec![4.0, 6.0]);
        let weeks = DataProcessor::numeric_values(&cleaned, WEEK_COL).unwrap();
        assert_eq!(weeks, vec![1.0, 2.0]);
    }

    #[test]
    fn boolean_column_coerces_to_one_and_zero() {
        let column = Column::new("Radio".into(), vec![Some(true), Some(false), None]);
        let coerced = DataProcessor::coerce_numeric(&column).unwrap();

        let values: Vec<Option<f64>> = coerced.f64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(1.0), Some(0.0), None]);
    }

    #[test]
    fn missing_required_column_is_reported() {
        let df = df!("TV" => [1.0], "Radio" => [1.0], "Sales" => [1.0]).unwrap();
        let err = DataProcessor::clean(&df, &AnalysisSettings::default()).unwrap_err();
        assert!(matches!(err, ProcessorError::MissingColumn(name) if name == "Newspaper"));
    }

    #[test]
    fn marketing_spend_sums_channels() {
        let df = raw_table(vec![Some("4"), Some("6")]);
        let cleaned = DataProcessor::clean(&df, &AnalysisSettings::default()).unwrap();
        let with_spend = DataProcessor::with_marketing_spend(&cleaned).unwrap();

        let spend = DataProcessor::numeric_values(&with_spend, MARKETING_SPEND_COL).unwrap();
        assert_eq!(spend, vec![6.0, 6.0]);
        assert_eq!(with_spend.width(), cleaned.width() + 1);
        assert!(cleaned.column(MARKETING_SPEND_COL).is_err());
    }
}
