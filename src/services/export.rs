//! Export service: writes both report tables as a downloadable workbook.
//!
//! Three layouts:
//! - `xlsx`: a single `<name>.xlsx` with the `Relaciones` and `Descripciones` sheets
//! - `csv`: one file per sheet, `<name>_Relaciones.csv` and `<name>_Descripciones.csv`
//! - `json`: a single `<name>.json` holding both sheets

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use serde::{Deserialize, Serialize};

use crate::context::{AppConfig, Context};
use crate::di::FromRef;
use crate::error::AppError;
use crate::models::{BasicRow, DetailedRow, Reports, BASIC_SHEET, DETAILED_SHEET};

/// Export file layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// Spreadsheet with one worksheet per table (default).
    #[default]
    Xlsx,
    /// One CSV file per sheet.
    Csv,
    /// Single JSON workbook.
    Json,
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Xlsx => f.write_str("xlsx"),
            ExportFormat::Csv => f.write_str("csv"),
            ExportFormat::Json => f.write_str("json"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "xlsx" | "XLSX" => Ok(ExportFormat::Xlsx),
            "csv" | "CSV" => Ok(ExportFormat::Csv),
            "json" | "JSON" => Ok(ExportFormat::Json),
            _ => Err(format!(
                "Invalid export format '{}'. Valid values: xlsx, csv, json",
                s
            )),
        }
    }
}

/// Where an export lands. Unset fields fall back to the `[export]` config.
#[derive(Debug, Clone, Default)]
pub struct ExportTarget {
    pub dir: Option<PathBuf>,
    pub name: Option<String>,
}

/// Service writing reports to disk.
#[derive(Clone)]
pub struct ExportService {
    config: AppConfig,
}

impl FromRef<Context> for ExportService {
    fn from_ref(ctx: &Context) -> Self {
        Self {
            config: AppConfig::from_ref(ctx),
        }
    }
}

impl ExportService {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Write both tables and return the paths written.
    ///
    /// Every file is rendered in memory before anything touches the disk, so a
    /// rendering failure leaves no partial export behind.
    pub fn export(
        &self,
        reports: &Reports,
        target: &ExportTarget,
        format: ExportFormat,
    ) -> Result<Vec<PathBuf>, AppError> {
        let dir = target
            .dir
            .as_deref()
            .unwrap_or(self.config.export.dir.as_path());
        let name = target
            .name
            .as_deref()
            .unwrap_or(self.config.export.name.as_str());
        if name.trim().is_empty() {
            return Err(AppError::Validation("export name is empty".to_string()));
        }

        let files = match format {
            ExportFormat::Xlsx => vec![(
                dir.join(format!("{}.xlsx", name)),
                workbook_xlsx(reports)?,
            )],
            ExportFormat::Csv => vec![
                (
                    dir.join(format!("{}_{}.csv", name, BASIC_SHEET)),
                    basic_csv(&reports.basic)?,
                ),
                (
                    dir.join(format!("{}_{}.csv", name, DETAILED_SHEET)),
                    detailed_csv(&reports.detailed)?,
                ),
            ],
            ExportFormat::Json => vec![(
                dir.join(format!("{}.json", name)),
                serde_json::to_vec_pretty(reports)?,
            )],
        };

        write_all(dir, &files)?;
        let paths: Vec<PathBuf> = files.into_iter().map(|(path, _)| path).collect();
        tracing::info!(format = %format, files = ?paths, "Exported reports");
        Ok(paths)
    }
}

fn write_all(dir: &Path, files: &[(PathBuf, Vec<u8>)]) -> Result<(), AppError> {
    fs::create_dir_all(dir)?;
    for (path, bytes) in files {
        fs::write(path, bytes)?;
    }
    Ok(())
}

/// The basic table as CSV, header row included even when empty.
pub fn basic_csv(rows: &[BasicRow]) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(BasicRow::headers())?;
    for row in rows {
        writer.write_record(row.cells())?;
    }
    into_bytes(writer)
}

/// The detailed table as CSV, header row included even when empty.
pub fn detailed_csv(rows: &[DetailedRow]) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(DetailedRow::headers())?;
    for row in rows {
        writer.write_record(row.cells())?;
    }
    into_bytes(writer)
}

/// Both tables as one spreadsheet, header rows in bold.
pub fn workbook_xlsx(reports: &Reports) -> Result<Vec<u8>, AppError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    write_sheet(
        workbook.add_worksheet(),
        BASIC_SHEET,
        &BasicRow::headers(),
        reports.basic.iter().map(|row| row.cells().to_vec()),
        &header,
    )?;
    write_sheet(
        workbook.add_worksheet(),
        DETAILED_SHEET,
        &DetailedRow::headers(),
        reports.detailed.iter().map(|row| row.cells().to_vec()),
        &header,
    )?;

    Ok(workbook.save_to_buffer()?)
}

fn write_sheet<'a>(
    sheet: &mut Worksheet,
    name: &str,
    headers: &[&str],
    rows: impl Iterator<Item = Vec<&'a str>>,
    header: &Format,
) -> Result<(), XlsxError> {
    sheet.set_name(name)?;
    for (col, title) in (0u16..).zip(headers) {
        sheet.write_string_with_format(0, col, *title, header)?;
    }
    for (row, cells) in (1u32..).zip(rows) {
        for (col, cell) in (0u16..).zip(cells) {
            sheet.write_string(row, col, cell)?;
        }
    }
    Ok(())
}

fn into_bytes(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>, AppError> {
    writer
        .into_inner()
        .map_err(|e| AppError::Io(e.into_error()))
}
