//! Report writers: XLSX, YAML or JSON, picked from the output extension

use crate::error::{RoasError, RoasResult};
use crate::excel::ExcelExporter;
use crate::types::ProjectionReport;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Xlsx,
    Yaml,
    Json,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> RoasResult<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        match extension.as_str() {
            "xlsx" => Ok(ExportFormat::Xlsx),
            "yaml" | "yml" => Ok(ExportFormat::Yaml),
            "json" => Ok(ExportFormat::Json),
            _ => Err(RoasError::Export(format!(
                "Cannot export to '{}': use a .xlsx, .yaml or .json file",
                path.display()
            ))),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Xlsx => write!(f, "xlsx"),
            ExportFormat::Yaml => write!(f, "yaml"),
            ExportFormat::Json => write!(f, "json"),
        }
    }
}

/// Write the report to `path` in the format its extension names.
///
/// An existing file is first copied to `<path>.bak`. Returns the format used.
pub fn export_report(report: &ProjectionReport, path: &Path) -> RoasResult<ExportFormat> {
    let format = ExportFormat::from_path(path)?;

    if path.exists() {
        let backup = backup_path(path);
        fs::copy(path, &backup)?;
        tracing::info!(backup = %backup.display(), "previous export backed up");
    }

    match format {
        ExportFormat::Xlsx => ExcelExporter::new(report).export(path)?,
        ExportFormat::Yaml => fs::write(path, to_yaml(report)?)?,
        ExportFormat::Json => fs::write(path, to_json(report)?)?,
    }
    Ok(format)
}

pub fn to_yaml(report: &ProjectionReport) -> RoasResult<String> {
    Ok(serde_yaml::to_string(report)?)
}

pub fn to_json(report: &ProjectionReport) -> RoasResult<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".bak");
    PathBuf::from(name)
}
