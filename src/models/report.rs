//! Report models: the basic (pivoted) and detailed tables.
//!
//! Field renames are the column headers used in exports.

use serde::{Deserialize, Serialize};

use super::CodeKind;

/// Description shown for codes absent from every vocabulary.
pub const DESCRIPTION_NOT_FOUND: &str = "Descripción no encontrada";

/// Sheet name of the basic table in exports.
pub const BASIC_SHEET: &str = "Relaciones";

/// Sheet name of the detailed table in exports.
pub const DETAILED_SHEET: &str = "Descripciones";

/// One row of the basic table: an SB and everything it relates to.
///
/// List columns hold sorted unique codes joined with `", "`; an SB without
/// matches in a column gets an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicRow {
    #[serde(rename = "SB")]
    pub sb: String,
    #[serde(rename = "CE")]
    pub ce: String,
    #[serde(rename = "CEv")]
    pub cev: String,
    #[serde(rename = "DOs asociados")]
    pub descriptors: String,
}

impl BasicRow {
    /// Column headers in export order.
    pub fn headers() -> [&'static str; 4] {
        ["SB", "CE", "CEv", "DOs asociados"]
    }

    pub fn cells(&self) -> [&str; 4] {
        [&self.sb, &self.ce, &self.cev, &self.descriptors]
    }
}

/// One row of the detailed table: a closure member with its type and description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedRow {
    #[serde(rename = "Elemento")]
    pub code: String,
    #[serde(rename = "Tipo")]
    pub kind: CodeKind,
    #[serde(rename = "Descripción")]
    pub description: String,
}

impl DetailedRow {
    /// Column headers in export order.
    pub fn headers() -> [&'static str; 3] {
        ["Elemento", "Tipo", "Descripción"]
    }

    pub fn cells(&self) -> [&str; 3] {
        [&self.code, self.kind.label(), &self.description]
    }
}

/// Both tables generated for one selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reports {
    /// The selection after trimming, in ascending order. Not part of the
    /// exported workbook, which holds the two sheets only.
    #[serde(skip)]
    pub selection: Vec<String>,
    #[serde(rename = "Relaciones")]
    pub basic: Vec<BasicRow>,
    #[serde(rename = "Descripciones")]
    pub detailed: Vec<DetailedRow>,
}

impl Reports {
    pub fn is_empty(&self) -> bool {
        self.basic.is_empty() && self.detailed.is_empty()
    }
}
