//! Domain models for curriculum vocabularies, relations and reports.

mod code;
mod relation;
mod report;
mod vocabulary;

pub use code::{criterion_code, plain_code, split_codes, ClassifiedCode, CodeKind};
pub use relation::{CeDoLink, SbRelation};
pub use report::{
    BasicRow, DetailedRow, Reports, BASIC_SHEET, DESCRIPTION_NOT_FOUND, DETAILED_SHEET,
};
pub use vocabulary::{RelationKind, Vocabulary};
