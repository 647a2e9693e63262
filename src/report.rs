//! Report Module
//! Text rendering of stage results for standard output.

use crate::config::{PRODUCT_COL, REVENUE_COL, UNITS_SOLD_COL};
use crate::data::TableProfile;
use crate::stats::{round_to, AnalysisResult, GroupValue, SalesSummary};
use polars::prelude::DataFrame;
use std::fmt;

/// Format a number the way the console report shows it: integral values keep
/// one decimal place, NaN prints as `nan`.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

fn write_aligned<'a>(
    f: &mut fmt::Formatter<'_>,
    rows: impl Iterator<Item = (&'a str, String)> + Clone,
) -> fmt::Result {
    let width = rows.clone().map(|(name, _)| name.len()).max().unwrap_or(0) + 4;
    for (name, value) in rows {
        writeln!(f, "{name:<width$}{value}")?;
    }
    Ok(())
}

/// Grouped values framed like a labelled series: index name, one line per
/// group, then the value name and type.
fn write_groups(
    f: &mut fmt::Formatter<'_>,
    index_name: &str,
    value_name: &str,
    groups: &[GroupValue],
) -> fmt::Result {
    writeln!(f, "{index_name}")?;
    write_aligned(
        f,
        groups
            .iter()
            .map(|g| (g.group.as_str(), format_number(g.value))),
    )?;
    writeln!(f, "Name: {value_name}, dtype: float64")
}

impl fmt::Display for TableProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "First {} rows of the dataset:", self.head_rows)?;
        writeln!(f, "{}", self.head)?;

        writeln!(f, "\nColumn Data Types:")?;
        write_aligned(
            f,
            self.columns
                .iter()
                .map(|c| (c.name.as_str(), c.dtype.to_string())),
        )?;

        writeln!(f, "\nMissing Values:")?;
        write_aligned(
            f,
            self.columns
                .iter()
                .map(|c| (c.name.as_str(), c.null_count.to_string())),
        )
    }
}

/// Preview of the table after cleaning and column derivation.
pub struct CleanedPreview<'a>(pub &'a DataFrame);

impl fmt::Display for CleanedPreview<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\nAfter Cleaning:")?;
        writeln!(f, "{}", self.0)
    }
}

impl fmt::Display for SalesSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\nTotal Revenue Per Product:")?;
        write_groups(f, PRODUCT_COL, REVENUE_COL, &self.total_revenue)?;

        writeln!(f, "\nAverage Units Sold Per Product:")?;
        write_groups(f, PRODUCT_COL, UNITS_SOLD_COL, &self.average_units)?;

        writeln!(f, "\nWeek with the Highest Units Sold:")?;
        writeln!(f, "{}", self.peak_week)
    }
}

impl fmt::Display for AnalysisResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\nCorrelation between Marketing Spend and Units Sold:")?;
        writeln!(f, "{}", format_number(round_to(self.correlation, 2)))?;

        writeln!(f, "\nSales Growth from Week 1 to Last Week:")?;
        writeln!(f, "{}", format_number(self.growth))?;

        writeln!(f, "\nInsights:")?;
        for insight in self.insights {
            writeln!(f, "{insight}")?;
        }
        Ok(())
    }
}
