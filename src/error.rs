//! Application error types with MCP protocol conversion.

use std::path::PathBuf;

use rmcp::model::ErrorCode;
use thiserror::Error;

/// Application-level errors for curricula.
#[derive(Error, Debug)]
pub enum AppError {
    // Workbook errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] calamine::XlsxError),

    #[error("Sheet '{sheet}' not found at {}", path.display())]
    MissingSheet { sheet: String, path: PathBuf },

    #[error("Sheet '{sheet}' is missing column '{column}'")]
    MissingColumn { sheet: String, column: String },

    #[error("Sheet '{sheet}' row {row}: {reason}")]
    MalformedRow {
        sheet: String,
        row: u64,
        reason: String,
    },

    // Output errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Spreadsheet export error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    // Query errors
    #[error("Validation error: {0}")]
    Validation(String),

    // Config errors
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl From<AppError> for rmcp::model::ErrorData {
    fn from(err: AppError) -> Self {
        let (code, app_code) = match &err {
            AppError::Validation(_) => (ErrorCode::INVALID_PARAMS, "VALIDATION_ERROR"),
            AppError::MissingSheet { .. } => (ErrorCode::RESOURCE_NOT_FOUND, "SHEET_NOT_FOUND"),
            AppError::MissingColumn { .. } => (ErrorCode::INTERNAL_ERROR, "MISSING_COLUMN"),
            AppError::MalformedRow { .. } => (ErrorCode::INTERNAL_ERROR, "MALFORMED_ROW"),
            AppError::Csv(_) => (ErrorCode::INTERNAL_ERROR, "CSV_ERROR"),
            AppError::Xlsx(_) => (ErrorCode::INTERNAL_ERROR, "XLSX_ERROR"),
            AppError::XlsxWrite(_) => (ErrorCode::INTERNAL_ERROR, "XLSX_WRITE_ERROR"),
            AppError::Io(_) => (ErrorCode::INTERNAL_ERROR, "IO_ERROR"),
            AppError::Json(_) => (ErrorCode::INTERNAL_ERROR, "JSON_ERROR"),
            AppError::Config(_) => (ErrorCode::INTERNAL_ERROR, "CONFIG_ERROR"),
        };

        rmcp::model::ErrorData::new(code, format!("[{}] {}", app_code, err), None)
    }
}
