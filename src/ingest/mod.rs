//! Report ingestion
//!
//! Reads the advertising and business reports (CSV or spreadsheet), resolves
//! the columns each needs, and cleans currency-formatted numbers into typed
//! [`AdRow`](crate::types::AdRow) / [`SalesRow`](crate::types::SalesRow)
//! values for the classifier.

mod columns;
mod numeric;
mod reader;
mod reports;

pub use columns::{
    ColumnOverrides, ColumnResolver, ColumnRole, ConfiguredResolver, ContainsResolver,
};
pub use numeric::NumericCleaner;
pub use reader::{parse_csv, read_csv, read_spreadsheet, read_table, Cell, RawTable};
pub use reports::{extract_ad_rows, extract_sales_rows};
