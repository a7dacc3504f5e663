//! Code classification across the four curriculum vocabularies.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The vocabulary a code belongs to.
///
/// Classification tests vocabularies in a fixed priority order
/// (SB → CE → CEv → DO); anything else is `Unclassified`.
/// Ordering follows the textual label, which is how report rows are sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodeKind {
    /// Basic knowledge item (saber básico).
    #[serde(rename = "SB")]
    Sb,
    /// Evaluation criterion.
    #[serde(rename = "CE")]
    Ce,
    /// Evaluation criterion variant.
    #[serde(rename = "CEv")]
    CeVariant,
    /// Operational descriptor.
    #[serde(rename = "DO")]
    Descriptor,
    /// Not a key of any vocabulary.
    #[serde(rename = "Unclassified")]
    Unclassified,
}

impl CodeKind {
    /// Label used in reports and exports.
    pub fn label(&self) -> &'static str {
        match self {
            CodeKind::Sb => "SB",
            CodeKind::Ce => "CE",
            CodeKind::CeVariant => "CEv",
            CodeKind::Descriptor => "DO",
            CodeKind::Unclassified => "Unclassified",
        }
    }

    /// The four vocabularies in classification priority order.
    pub fn vocabularies() -> &'static [CodeKind] {
        &[
            CodeKind::Sb,
            CodeKind::Ce,
            CodeKind::CeVariant,
            CodeKind::Descriptor,
        ]
    }
}

impl Ord for CodeKind {
    fn cmp(&self, other: &Self) -> Ordering {
        self.label().cmp(other.label())
    }
}

impl PartialOrd for CodeKind {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for CodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CodeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SB" | "sb" | "SSBB" | "ssbb" => Ok(CodeKind::Sb),
            "CE" | "ce" => Ok(CodeKind::Ce),
            "CEv" | "cev" | "CEV" | "Cev" => Ok(CodeKind::CeVariant),
            "DO" | "do" => Ok(CodeKind::Descriptor),
            "Unclassified" | "unclassified" => Ok(CodeKind::Unclassified),
            _ => Err(format!(
                "Invalid code kind '{}'. Valid values: SB, CE, CEv, DO, Unclassified",
                s
            )),
        }
    }
}

/// A code tagged with the vocabulary the classifier assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedCode {
    pub code: String,
    pub kind: CodeKind,
}

/// Text form of an SB, CEv or DO code: surrounding whitespace trimmed.
pub fn plain_code(raw: &str) -> String {
    raw.trim().to_string()
}

/// Text form of a CE code.
///
/// CE ids are integers, so integral numeric renderings produced by
/// spreadsheet exports collapse to the integer (`"3.0"` → `"3"`). Variant
/// codes such as `"2.0"` are never passed through here.
pub fn criterion_code(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Some((int, frac)) = trimmed.split_once('.') {
        let integral = !int.is_empty() && int.bytes().all(|b| b.is_ascii_digit());
        if integral && !frac.is_empty() && frac.bytes().all(|b| b == b'0') {
            return int.to_string();
        }
    }
    trimmed.to_string()
}

/// Splits a comma-separated relation cell, normalizing each piece.
///
/// Blank pieces (empty cells, trailing commas) are dropped.
pub fn split_codes(cell: &str, normalize: fn(&str) -> String) -> Vec<String> {
    cell.split(',')
        .map(normalize)
        .filter(|code| !code.is_empty())
        .collect()
}
