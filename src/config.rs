//! Analysis Settings
//! Fixed values used across the pipeline. Built once in `main` and passed down.

use std::path::PathBuf;

/// Source columns that are coerced to numeric during cleaning.
pub const NUMERIC_COLUMNS: [&str; 4] = ["TV", "Radio", "Newspaper", "Sales"];

/// Spend columns summed into `Marketing_Spend`.
pub const SPEND_COLUMNS: [&str; 3] = ["TV", "Radio", "Newspaper"];

pub const SALES_COL: &str = "Sales";
pub const UNITS_SOLD_COL: &str = "Units_Sold";
pub const UNIT_PRICE_COL: &str = "Unit_Price";
pub const REVENUE_COL: &str = "Revenue";
pub const WEEK_COL: &str = "Week";
pub const PRODUCT_COL: &str = "Product";
pub const MARKETING_SPEND_COL: &str = "Marketing_Spend";

/// Settings for a single analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisSettings {
    pub csv_path: PathBuf,
    pub unit_price: i64,
    pub product_label: String,
    pub head_rows: usize,
    pub chart_dir: PathBuf,
    pub chart_size: (u32, u32),
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("advertising.csv"),
            unit_price: 10,
            product_label: "Product A".to_string(),
            head_rows: 5,
            chart_dir: PathBuf::from("charts"),
            chart_size: (1000, 600),
        }
    }
}
