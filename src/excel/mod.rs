//! Excel export of projection reports
//!
//! One workbook per run: current performance, monthly projection, weekly
//! breakdown, unattributed labels and the assumptions used. Reading
//! spreadsheets in lives in [`crate::ingest`].

mod exporter;

pub use exporter::{
    ExcelExporter, ASSUMPTIONS_SHEET, CURRENT_SHEET, PROJECTION_SHEET, UNATTRIBUTED_SHEET,
    WEEKLY_SHEET,
};
