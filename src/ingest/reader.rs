//! Report readers - CSV and spreadsheet files → [`RawTable`]

use crate::error::{RoasError, RoasResult};
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::fmt;
use std::path::Path;

/// A single cell as read from a report.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            // Whole numbers print without ".0" so a numeric campaign id reads "123"
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Cell::Number(n) => write!(f, "{n}"),
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
        }
    }
}

/// Header row plus data rows of one report.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    /// Where the table came from (file name), used in error messages
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    pub fn new(name: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    /// Cell at (row, column); short rows read as empty.
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        const EMPTY: &Cell = &Cell::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(EMPTY)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Read a report file, picking the reader from the extension.
pub fn read_table(path: &Path) -> RoasResult<RawTable> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let table = match extension.as_str() {
        "csv" => read_csv(path)?,
        "xlsx" | "xlsm" | "xls" | "ods" => read_spreadsheet(path)?,
        _ => {
            return Err(RoasError::Import(format!(
                "Unsupported report format '{}': use .csv, .xlsx, .xls or .ods",
                path.display()
            )))
        }
    };

    tracing::info!(
        report = %table.name,
        rows = table.row_count(),
        columns = table.headers.len(),
        "report loaded"
    );
    Ok(table)
}

/// Read a CSV report. A UTF-8 BOM is stripped and ragged rows are allowed.
pub fn read_csv(path: &Path) -> RoasResult<RawTable> {
    let content = std::fs::read_to_string(path)?;
    parse_csv(&display_name(path), &content)
}

/// Parse CSV text already in memory.
pub fn parse_csv(name: &str, content: &str) -> RoasResult<RawTable> {
    let text = content.trim_start_matches('\u{FEFF}');

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| RoasError::Import(format!("Failed to read CSV headers in {}: {}", name, e)))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut table = RawTable::new(name, headers);
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            RoasError::Import(format!("Failed to read CSV row {} in {}: {}", idx + 2, name, e))
        })?;
        let row: Vec<Cell> = record
            .iter()
            .map(|field| {
                if field.trim().is_empty() {
                    Cell::Empty
                } else {
                    Cell::Text(field.to_string())
                }
            })
            .collect();
        // Separator-only lines (",,") carry no data
        if row.iter().all(|c| matches!(c, Cell::Empty)) {
            continue;
        }
        table.push_row(row);
    }

    Ok(table)
}

/// Read the first non-empty worksheet of a spreadsheet. Row 0 is the header.
pub fn read_spreadsheet(path: &Path) -> RoasResult<RawTable> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| RoasError::Import(format!("Failed to open spreadsheet: {}", e)))?;

    let sheet_names = workbook.sheet_names().to_vec();
    for sheet_name in sheet_names {
        let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
            RoasError::Import(format!("Failed to read worksheet '{}': {}", sheet_name, e))
        })?;
        if range.is_empty() {
            continue;
        }
        let name = format!("{}#{}", display_name(path), sheet_name);
        return Ok(range_to_table(&name, &range));
    }

    Err(RoasError::Import(format!(
        "Spreadsheet {} has no data",
        path.display()
    )))
}

fn range_to_table(name: &str, range: &Range<Data>) -> RawTable {
    let mut rows = range.rows();

    let headers: Vec<String> = rows
        .next()
        .map(|header| {
            header
                .iter()
                .enumerate()
                .map(|(col, cell)| match convert_cell(cell) {
                    Cell::Empty => format!("col_{}", col),
                    other => other.to_string().trim().to_string(),
                })
                .collect()
        })
        .unwrap_or_default();

    let mut table = RawTable::new(name, headers);
    for row in rows {
        let cells: Vec<Cell> = row.iter().map(convert_cell).collect();
        // Trailing blank rows are common in exported sheets
        if cells.iter().all(|c| matches!(c, Cell::Empty)) {
            continue;
        }
        table.push_row(cells);
    }
    table
}

fn convert_cell(cell: &Data) -> Cell {
    match cell {
        Data::Empty => Cell::Empty,
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::String(s) if s.trim().is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        other => Cell::Text(other.to_string()),
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}
