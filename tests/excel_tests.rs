//! Excel tests: spreadsheet reports in, projection workbook out

use calamine::{open_workbook, Data, Reader, Xlsx};
use roas_forge::config::ConfigFile;
use roas_forge::excel::{
    ExcelExporter, ASSUMPTIONS_SHEET, CURRENT_SHEET, PROJECTION_SHEET, UNATTRIBUTED_SHEET,
    WEEKLY_SHEET,
};
use roas_forge::ingest::{read_table, Cell};
use roas_forge::types::ProjectionReport;
use roas_forge::Pipeline;
use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixture_report() -> ProjectionReport {
    Pipeline::from_config_file(ConfigFile::default())
        .unwrap()
        .run_files(
            Path::new("test-data/ads.csv"),
            Path::new("test-data/business.csv"),
        )
        .unwrap()
}

/// Write an ads report as .xlsx with numeric cells.
fn write_ads_xlsx(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("ads.xlsx");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let headers = ["Campaign Name", "Impressions", "Clicks", "Spend", "7 Day Total Sales"];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    let rows: [(&str, f64, f64, f64, f64); 2] = [
        ("CL_Exact", 10000.0, 200.0, 1000.0, 3000.0),
        ("MA-Auto", 5000.0, 50.0, 100.0, 250.0),
    ];
    for (idx, (campaign, impressions, clicks, spend, sales)) in rows.iter().enumerate() {
        let row = idx as u32 + 1;
        sheet.write_string(row, 0, *campaign).unwrap();
        sheet.write_number(row, 1, *impressions).unwrap();
        sheet.write_number(row, 2, *clicks).unwrap();
        sheet.write_number(row, 3, *spend).unwrap();
        sheet.write_number(row, 4, *sales).unwrap();
    }
    workbook.save(&path).unwrap();
    path
}

fn sheet_rows(path: &Path, sheet: &str) -> Vec<Vec<Data>> {
    let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
    let range = workbook.worksheet_range(sheet).unwrap();
    range.rows().map(|r| r.to_vec()).collect()
}

fn as_f64(cell: &Data) -> f64 {
    match cell {
        Data::Float(f) => *f,
        Data::Int(i) => *i as f64,
        other => panic!("expected a number, got {other:?}"),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// SPREADSHEET INPUT TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_read_xlsx_report() {
    let dir = TempDir::new().unwrap();
    let path = write_ads_xlsx(&dir);

    let table = read_table(&path).unwrap();
    assert_eq!(table.headers[0], "Campaign Name");
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.cell(0, 0), &Cell::Text("CL_Exact".to_string()));
    assert_eq!(table.cell(0, 3), &Cell::Number(1000.0));
}

#[test]
fn test_pipeline_accepts_xlsx_ads() {
    let dir = TempDir::new().unwrap();
    let ads = write_ads_xlsx(&dir);

    let report = Pipeline::from_config_file(ConfigFile::default())
        .unwrap()
        .run_files(&ads, Path::new("test-data/business.csv"))
        .unwrap();
    assert!((report.brands[0].overall_revenue - 8000.0).abs() < 1e-6);
}

// ═══════════════════════════════════════════════════════════════════════════
// WORKBOOK EXPORT TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_export_writes_all_sheets() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("plan.xlsx");
    ExcelExporter::new(&fixture_report()).export(&output).unwrap();

    let workbook: Xlsx<_> = open_workbook(&output).unwrap();
    assert_eq!(
        workbook.sheet_names(),
        vec![
            CURRENT_SHEET,
            PROJECTION_SHEET,
            WEEKLY_SHEET,
            UNATTRIBUTED_SHEET,
            ASSUMPTIONS_SHEET,
        ]
    );
}

#[test]
fn test_projection_sheet_values() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("plan.xlsx");
    let report = fixture_report();
    ExcelExporter::new(&report).export(&output).unwrap();

    let rows = sheet_rows(&output, PROJECTION_SHEET);
    assert_eq!(rows[0][0], Data::String("Brand".to_string()));
    assert_eq!(rows[0][8], Data::String("Overall Revenue".to_string()));
    assert_eq!(rows[1][0], Data::String("Creation Lamis".to_string()));
    assert!((as_f64(&rows[1][8]) - 8000.0).abs() < 1e-6);

    // 6 brands + total below the header
    assert_eq!(rows.len(), 8);
    assert_eq!(rows[7][0], Data::String("Total".to_string()));
    assert!((as_f64(&rows[7][8]) - report.total.overall_revenue).abs() < 1e-6);
}

#[test]
fn test_weekly_and_unattributed_sheets() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("plan.xlsx");
    ExcelExporter::new(&fixture_report()).export(&output).unwrap();

    // (6 brands + total) x 5 weeks, plus header
    assert_eq!(sheet_rows(&output, WEEKLY_SHEET).len(), 36);

    let unattributed = sheet_rows(&output, UNATTRIBUTED_SHEET);
    assert_eq!(unattributed[0][0], Data::String("Report".to_string()));
    // MAX_Promo and Brand Defense from ads, Gift Box from business
    assert_eq!(unattributed.len(), 4);
    assert_eq!(unattributed[3][1], Data::String("Gift Box".to_string()));
}

#[test]
fn test_to_bytes_matches_zip_signature() {
    let bytes = ExcelExporter::new(&fixture_report()).to_bytes().unwrap();
    assert_eq!(&bytes[..2], b"PK");
}
