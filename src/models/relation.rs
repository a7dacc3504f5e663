//! Relation edges between vocabularies.

use serde::{Deserialize, Serialize};

use super::RelationKind;

/// One exploded row of the SB relation sheet: an SB linked to a CE or CEv code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SbRelation {
    /// Basic knowledge item code.
    pub sb: String,
    /// Column the related code came from.
    pub kind: RelationKind,
    /// Related CE or CEv code.
    pub code: String,
}

impl SbRelation {
    pub fn new(sb: impl Into<String>, kind: RelationKind, code: impl Into<String>) -> Self {
        Self {
            sb: sb.into(),
            kind,
            code: code.into(),
        }
    }
}

/// One exploded row of the CE-DO sheet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CeDoLink {
    /// Evaluation criterion code.
    pub ce: String,
    /// Operational descriptor code.
    pub descriptor: String,
}

impl CeDoLink {
    pub fn new(ce: impl Into<String>, descriptor: impl Into<String>) -> Self {
        Self {
            ce: ce.into(),
            descriptor: descriptor.into(),
        }
    }
}
