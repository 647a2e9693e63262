//! Data module - CSV loading and cleaning

mod loader;
mod processor;

pub use loader::{ColumnInfo, DataLoader, LoaderError, TableProfile};
pub use processor::{parse_numeric, DataProcessor, ProcessorError};
