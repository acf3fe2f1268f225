use thiserror::Error;

pub type RoasResult<T> = Result<T, RoasError>;

#[derive(Error, Debug)]
pub enum RoasError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Import error: {0}")]
    Import(String),

    #[error("{report} report has no column for {role} (headers: {headers})")]
    MissingColumn {
        report: String,
        role: String,
        headers: String,
    },

    #[error("{report} report, row {row}, column '{column}': '{value}' is not a number")]
    DataQuality {
        report: String,
        row: usize,
        column: String,
        value: String,
    },

    #[error("Export error: {0}")]
    Export(String),
}
