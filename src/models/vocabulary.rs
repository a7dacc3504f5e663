//! Vocabulary model: one keyed table of codes and their descriptions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::CodeKind;

/// A single vocabulary (SB, CE, CEv or DO) keyed by canonical code.
///
/// A repeated key keeps the description of the last row inserted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vocabulary {
    entries: BTreeMap<String, String>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite an entry.
    pub fn insert(&mut self, code: impl Into<String>, description: impl Into<String>) {
        self.entries.insert(code.into(), description.into());
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(code)
    }

    pub fn description(&self, code: &str) -> Option<&str> {
        self.entries.get(code).map(String::as_str)
    }

    /// Codes in ascending order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(code, description)| (code.as_str(), description.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<C: Into<String>, D: Into<String>> FromIterator<(C, D)> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = (C, D)>>(iter: I) -> Self {
        let mut vocabulary = Vocabulary::new();
        for (code, description) in iter {
            vocabulary.insert(code, description);
        }
        vocabulary
    }
}

/// Which vocabulary a relation edge points into.
///
/// Only CE and CEv codes appear on the related side of an SB relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RelationKind {
    #[serde(rename = "CE")]
    Ce,
    #[serde(rename = "CEv")]
    CeVariant,
}

impl RelationKind {
    /// The vocabulary the related code is expected to belong to.
    pub fn code_kind(&self) -> CodeKind {
        match self {
            RelationKind::Ce => CodeKind::Ce,
            RelationKind::CeVariant => CodeKind::CeVariant,
        }
    }
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code_kind().label())
    }
}
