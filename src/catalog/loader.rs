//! Workbook loader: reads the six sheets and normalizes them.
//!
//! Sheets come from a single `.xlsx` spreadsheet or from a directory of CSV
//! files. Code columns are normalized here so the closure and report logic
//! only ever compare plain text: CE columns through [`criterion_code`], every
//! other code column through [`plain_code`].

use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use calamine::{open_workbook, Data, Reader, Xlsx};
use csv::ReaderBuilder;

use crate::config::WorkbookConfig;
use crate::error::AppError;
use crate::models::{
    criterion_code, plain_code, split_codes, CeDoLink, RelationKind, SbRelation, Vocabulary,
};

use super::Catalog;

/// A sheet's name and the columns it must provide.
struct SheetLayout {
    name: &'static str,
    columns: &'static [&'static str],
}

const BASICS: SheetLayout = SheetLayout {
    name: "SSBB",
    columns: &["Saber Básico", "Descripción Completa"],
};

const RELATIONS: SheetLayout = SheetLayout {
    name: "SSBB-CE-CEv",
    columns: &["SB", "CE", "Cev"],
};

const VARIANTS: SheetLayout = SheetLayout {
    name: "CEv",
    columns: &["Número", "Descripción"],
};

const CRITERIA: SheetLayout = SheetLayout {
    name: "CE",
    columns: &["CE", "Descripción del CE"],
};

const DESCRIPTORS: SheetLayout = SheetLayout {
    name: "DO",
    columns: &["Descriptor", "Descripción"],
};

const LINKS: SheetLayout = SheetLayout {
    name: "CE-DO",
    columns: &["CE", "DOs asociados"],
};

/// A parsed sheet: data rows projected onto the required columns.
struct Sheet {
    name: &'static str,
    /// (1-based line number, cells in `SheetLayout::columns` order)
    rows: Vec<(u64, Vec<String>)>,
}

impl Sheet {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            rows: Vec::new(),
        }
    }

    /// Keep a row unless every projected cell is blank.
    fn push(&mut self, line: u64, cells: Vec<String>) {
        if cells.iter().any(|cell| !cell.trim().is_empty()) {
            self.rows.push((line, cells));
        }
    }
}

/// Where the sheets are read from.
enum SheetSource<'a> {
    /// One CSV file per sheet inside `config.dir`.
    Csv {
        config: &'a WorkbookConfig,
        delimiter: u8,
    },
    /// One worksheet per sheet, looked up by sheet name.
    Xlsx {
        path: &'a Path,
        workbook: Xlsx<std::io::BufReader<File>>,
    },
}

impl<'a> SheetSource<'a> {
    fn open(config: &'a WorkbookConfig) -> Result<Self, AppError> {
        match &config.file {
            Some(path) => {
                if !path.is_file() {
                    return Err(AppError::MissingSheet {
                        sheet: "workbook".to_string(),
                        path: path.clone(),
                    });
                }
                Ok(SheetSource::Xlsx {
                    path,
                    workbook: open_workbook(path)?,
                })
            }
            None => Ok(SheetSource::Csv {
                config,
                delimiter: config.delimiter_byte()?,
            }),
        }
    }

    /// Read one sheet; `file` names it inside a CSV directory.
    fn read(&mut self, layout: &SheetLayout, file: &str) -> Result<Sheet, AppError> {
        match self {
            SheetSource::Csv { config, delimiter } => {
                let path = config.sheet_path(file);
                if !path.is_file() {
                    return Err(AppError::MissingSheet {
                        sheet: layout.name.to_string(),
                        path,
                    });
                }
                read_csv(layout, &path, *delimiter)
            }
            SheetSource::Xlsx { path, workbook } => read_worksheet(layout, *path, workbook),
        }
    }
}

/// Loads a [`Catalog`] from a spreadsheet or a directory of CSV sheets.
pub struct WorkbookLoader<'a> {
    config: &'a WorkbookConfig,
}

impl<'a> WorkbookLoader<'a> {
    pub fn new(config: &'a WorkbookConfig) -> Self {
        Self { config }
    }

    /// Read, validate and normalize all six sheets.
    ///
    /// Any missing sheet, missing column or malformed row fails the whole load.
    pub fn load(&self) -> Result<Catalog, AppError> {
        match &self.config.file {
            Some(file) => tracing::info!(file = %file.display(), "Loading workbook"),
            None => tracing::info!(dir = %self.config.dir.display(), "Loading workbook"),
        }
        let sheets = &self.config.sheets;
        let mut source = SheetSource::open(self.config)?;

        let basics = vocabulary(source.read(&BASICS, &sheets.basics)?, plain_code)?;
        let variants = vocabulary(source.read(&VARIANTS, &sheets.variants)?, plain_code)?;
        let criteria = vocabulary(source.read(&CRITERIA, &sheets.criteria)?, criterion_code)?;
        let descriptors = vocabulary(source.read(&DESCRIPTORS, &sheets.descriptors)?, plain_code)?;
        let relations = relations(source.read(&RELATIONS, &sheets.relations)?)?;
        let links = links(source.read(&LINKS, &sheets.links)?)?;

        let catalog = Catalog::new(basics, criteria, variants, descriptors, relations, links);
        let summary = catalog.summary();
        tracing::info!(
            basics = summary.basics,
            criteria = summary.criteria,
            variants = summary.variants,
            descriptors = summary.descriptors,
            relations = summary.relations,
            links = summary.links,
            "Workbook loaded"
        );
        Ok(catalog)
    }
}

fn read_csv(layout: &SheetLayout, path: &Path, delimiter: u8) -> Result<Sheet, AppError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::Headers)
        .from_reader(File::open(path)?);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let positions = column_positions(layout, &headers)?;

    let mut sheet = Sheet::new(layout.name);
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        sheet.push(
            line,
            positions
                .iter()
                .map(|&i| record.get(i).unwrap_or_default().to_string())
                .collect(),
        );
    }

    tracing::debug!(sheet = layout.name, rows = sheet.rows.len(), "Read CSV sheet");
    Ok(sheet)
}

fn read_worksheet<RS: Read + Seek>(
    layout: &SheetLayout,
    path: &Path,
    workbook: &mut Xlsx<RS>,
) -> Result<Sheet, AppError> {
    if !workbook.sheet_names().iter().any(|name| name == layout.name) {
        return Err(AppError::MissingSheet {
            sheet: layout.name.to_string(),
            path: path.to_path_buf(),
        });
    }
    let range = workbook.worksheet_range(layout.name)?;
    let first_line = range.start().map(|(row, _)| u64::from(row) + 1).unwrap_or(1);

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|row| row.iter().map(|cell| cell_text(cell).trim().to_string()).collect())
        .unwrap_or_default();
    let positions = column_positions(layout, &headers)?;

    let mut sheet = Sheet::new(layout.name);
    for (line, row) in (first_line + 1..).zip(rows) {
        sheet.push(
            line,
            positions
                .iter()
                .map(|&i| row.get(i).map(cell_text).unwrap_or_default())
                .collect(),
        );
    }

    tracing::debug!(sheet = layout.name, rows = sheet.rows.len(), "Read worksheet");
    Ok(sheet)
}

/// Text of a spreadsheet cell. Floats keep their fractional part (`2.0`),
/// the way a text export renders a numeric column.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Float(value) => format!("{:?}", value),
        other => other.to_string(),
    }
}

fn column_positions(layout: &SheetLayout, headers: &[String]) -> Result<Vec<usize>, AppError> {
    layout
        .columns
        .iter()
        .map(|column| {
            // Byte-order marks from spreadsheet exports stick to the first header
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}') == *column)
                .ok_or_else(|| AppError::MissingColumn {
                    sheet: layout.name.to_string(),
                    column: column.to_string(),
                })
        })
        .collect()
}

/// Key/description sheet into a vocabulary. A blank key is malformed.
fn vocabulary(sheet: Sheet, normalize: fn(&str) -> String) -> Result<Vocabulary, AppError> {
    let mut vocabulary = Vocabulary::new();
    for (line, cells) in sheet.rows {
        let code = normalize(&cells[0]);
        if code.is_empty() {
            return Err(AppError::MalformedRow {
                sheet: sheet.name.to_string(),
                row: line,
                reason: "empty code".to_string(),
            });
        }
        vocabulary.insert(code, cells[1].trim());
    }
    Ok(vocabulary)
}

/// `SB | CE | Cev` rows exploded into one edge per listed code.
fn relations(sheet: Sheet) -> Result<Vec<SbRelation>, AppError> {
    let mut edges = Vec::new();
    for (line, cells) in sheet.rows {
        let sb = plain_code(&cells[0]);
        if sb.is_empty() {
            return Err(AppError::MalformedRow {
                sheet: sheet.name.to_string(),
                row: line,
                reason: "empty SB code".to_string(),
            });
        }
        let criteria = split_codes(&cells[1], criterion_code);
        let variants = split_codes(&cells[2], plain_code);
        edges.extend(
            criteria
                .into_iter()
                .map(|code| SbRelation::new(sb.clone(), RelationKind::Ce, code)),
        );
        edges.extend(
            variants
                .into_iter()
                .map(|code| SbRelation::new(sb.clone(), RelationKind::CeVariant, code)),
        );
    }
    Ok(edges)
}

/// `CE | DOs asociados` rows exploded into one link per descriptor.
fn links(sheet: Sheet) -> Result<Vec<CeDoLink>, AppError> {
    let mut links = Vec::new();
    for (line, cells) in sheet.rows {
        let ce = criterion_code(&cells[0]);
        if ce.is_empty() {
            return Err(AppError::MalformedRow {
                sheet: sheet.name.to_string(),
                row: line,
                reason: "empty CE code".to_string(),
            });
        }
        links.extend(
            split_codes(&cells[1], plain_code)
                .into_iter()
                .map(|descriptor| CeDoLink::new(ce.clone(), descriptor)),
        );
    }
    Ok(links)
}
