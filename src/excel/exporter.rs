//! Excel exporter for projection reports

use crate::error::{RoasError, RoasResult};
use crate::types::{ProjectionReport, RowValue, TableRow, Tabular};
use rust_xlsxwriter::{Format, FormatAlign, Note, Workbook, Worksheet};
use std::path::Path;

pub const CURRENT_SHEET: &str = "Current Performance";
pub const PROJECTION_SHEET: &str = "Projection";
pub const WEEKLY_SHEET: &str = "Weekly Breakdown";
pub const UNATTRIBUTED_SHEET: &str = "Unattributed";
pub const ASSUMPTIONS_SHEET: &str = "Assumptions";

const UNATTRIBUTED_HEADERS: [&str; 4] = ["Report", "Label", "Rows", "Amount"];

/// Number formats keyed by [`RowValue`] variant.
struct Formats {
    header: Format,
    money: Format,
    ratio: Format,
    share: Format,
    count: Format,
}

impl Formats {
    fn new() -> Self {
        Self {
            header: Format::new().set_bold().set_align(FormatAlign::Center),
            money: Format::new().set_num_format("#,##0.00"),
            ratio: Format::new().set_num_format("0.00"),
            share: Format::new().set_num_format("0.00%"),
            count: Format::new().set_num_format("#,##0"),
        }
    }
}

/// Writes a [`ProjectionReport`] as a multi-sheet workbook.
pub struct ExcelExporter<'a> {
    report: &'a ProjectionReport,
    formats: Formats,
}

impl<'a> ExcelExporter<'a> {
    pub fn new(report: &'a ProjectionReport) -> Self {
        Self {
            report,
            formats: Formats::new(),
        }
    }

    /// Export the report to an Excel .xlsx file
    pub fn export(&self, output_path: &Path) -> RoasResult<()> {
        let mut workbook = self.build()?;
        workbook
            .save(output_path)
            .map_err(|e| RoasError::Export(format!("Failed to save Excel file: {}", e)))?;
        tracing::info!(path = %output_path.display(), "workbook written");
        Ok(())
    }

    /// Workbook as bytes, for callers that do not write to disk.
    pub fn to_bytes(&self) -> RoasResult<Vec<u8>> {
        let mut workbook = self.build()?;
        workbook
            .save_to_buffer()
            .map_err(|e| RoasError::Export(format!("Failed to build Excel file: {}", e)))
    }

    fn build(&self) -> RoasResult<Workbook> {
        let report = self.report;
        let mut workbook = Workbook::new();

        let current: Vec<TableRow> = report
            .current
            .iter()
            .chain(std::iter::once(&report.current_total))
            .map(Tabular::to_row)
            .collect();
        self.write_table(&mut workbook, CURRENT_SHEET, &current, &[])?;

        let projection: Vec<TableRow> = report
            .brands
            .iter()
            .chain(std::iter::once(&report.total))
            .map(Tabular::to_row)
            .collect();
        self.write_table(&mut workbook, PROJECTION_SHEET, &projection, &[])?;

        let weekly: Vec<TableRow> = report.weekly.iter().map(Tabular::to_row).collect();
        self.write_table(&mut workbook, WEEKLY_SHEET, &weekly, &[])?;

        let diagnostics = &report.diagnostics;
        let unattributed: Vec<TableRow> = diagnostics
            .unmapped_campaigns
            .iter()
            .map(|label| ("ads", label))
            .chain(diagnostics.other_titles.iter().map(|label| ("business", label)))
            .map(|(source, label)| {
                let mut row = TableRow::new().push("Report", RowValue::Text(source.to_string()));
                row.cells.extend(label.to_row().cells);
                row
            })
            .collect();
        self.write_table(
            &mut workbook,
            UNATTRIBUTED_SHEET,
            &unattributed,
            &UNATTRIBUTED_HEADERS,
        )?;

        self.write_assumptions(&mut workbook)?;
        Ok(workbook)
    }

    /// One sheet: bold header row from the first row's keys, then the rows.
    fn write_table(
        &self,
        workbook: &mut Workbook,
        sheet_name: &str,
        rows: &[TableRow],
        empty_headers: &[&str],
    ) -> RoasResult<()> {
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(sheet_name)
            .map_err(|e| RoasError::Export(format!("Failed to set worksheet name: {}", e)))?;

        let headers: Vec<&str> = match rows.first() {
            Some(first) => first.headers(),
            None => empty_headers.to_vec(),
        };

        for (col_idx, header) in headers.iter().enumerate() {
            worksheet
                .write_string_with_format(0, col_idx as u16, *header, &self.formats.header)
                .map_err(|e| RoasError::Export(format!("Failed to write header: {}", e)))?;
            worksheet
                .set_column_width(col_idx as u16, column_width(header))
                .map_err(|e| RoasError::Export(format!("Failed to size column: {}", e)))?;
        }
        worksheet
            .set_freeze_panes(1, 0)
            .map_err(|e| RoasError::Export(format!("Failed to freeze header: {}", e)))?;

        for (row_idx, row) in rows.iter().enumerate() {
            let excel_row = (row_idx + 1) as u32; // +1 for header row
            for (col_idx, header) in headers.iter().enumerate() {
                if let Some(value) = row.get(header) {
                    self.write_cell_value(worksheet, excel_row, col_idx as u16, value)?;
                }
            }
        }

        Ok(())
    }

    /// Write a single cell with the number format of its kind
    fn write_cell_value(
        &self,
        worksheet: &mut Worksheet,
        row: u32,
        col: u16,
        value: &RowValue,
    ) -> RoasResult<()> {
        let result = match value {
            RowValue::Text(text) => worksheet.write_string(row, col, text),
            RowValue::Money(v) => worksheet.write_number_with_format(row, col, *v, &self.formats.money),
            RowValue::Ratio(v) => worksheet.write_number_with_format(row, col, *v, &self.formats.ratio),
            RowValue::Share(v) => worksheet.write_number_with_format(row, col, *v, &self.formats.share),
            RowValue::Count(v) => worksheet.write_number_with_format(row, col, *v, &self.formats.count),
        };
        result
            .map(|_| ())
            .map_err(|e| RoasError::Export(format!("Failed to write cell: {}", e)))
    }

    /// The configuration the projection ran with, as Name / Value rows.
    fn write_assumptions(&self, workbook: &mut Workbook) -> RoasResult<()> {
        let config = &self.report.config;
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(ASSUMPTIONS_SHEET).map_err(|e| {
            RoasError::Export(format!("Failed to set Assumptions worksheet name: {}", e))
        })?;

        for (col, header) in ["Name", "Value"].iter().enumerate() {
            worksheet
                .write_string_with_format(0, col as u16, *header, &self.formats.header)
                .map_err(|e| RoasError::Export(format!("Failed to write header: {}", e)))?;
        }
        worksheet
            .set_column_width(0, 28)
            .map_err(|e| RoasError::Export(format!("Failed to size column: {}", e)))?;

        let fractions = [
            ("roas_uplift_fraction", config.roas_uplift_fraction),
            ("organic_lift_fraction", config.organic_lift_fraction),
            ("spend_growth_fraction", config.spend_growth_fraction),
            ("organic_cap", config.organic_cap),
        ];
        let mut row = 1u32;
        for (name, value) in fractions {
            worksheet
                .write_string(row, 0, name)
                .map_err(|e| RoasError::Export(format!("Failed to write assumption: {}", e)))?;
            self.write_cell_value(worksheet, row, 1, &RowValue::Share(value))?;
            row += 1;
        }

        let weights = config
            .weekly_weights
            .weights()
            .iter()
            .map(|w| format!("{:.2}", w))
            .collect::<Vec<_>>()
            .join(", ");
        worksheet
            .write_string(row, 0, "weekly_weights")
            .and_then(|ws| ws.write_string(row, 1, &weights))
            .map_err(|e| RoasError::Export(format!("Failed to write assumption: {}", e)))?;
        row += 1;

        worksheet
            .write_string(row, 0, "project_traffic")
            .and_then(|ws| ws.write_boolean(row, 1, config.project_traffic))
            .map_err(|e| RoasError::Export(format!("Failed to write assumption: {}", e)))?;
        if config.project_traffic {
            let note = Note::new("Clicks and impressions assume current CPC and CTR")
                .set_author("roas-forge");
            worksheet
                .insert_note(row, 1, &note)
                .map_err(|e| RoasError::Export(format!("Failed to add note: {}", e)))?;
        }
        row += 1;

        worksheet
            .write_string(row, 0, "generated_at")
            .and_then(|ws| ws.write_string(row, 1, self.report.generated_at.to_rfc3339()))
            .map_err(|e| RoasError::Export(format!("Failed to write assumption: {}", e)))?;

        Ok(())
    }
}

fn column_width(header: &str) -> f64 {
    (header.len() as f64 + 4.0).max(12.0)
}
