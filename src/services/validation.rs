//! Validation service for checking catalog integrity.

use serde::Serialize;

use crate::context::{AppCatalog, Context};
use crate::di::FromRef;
use crate::models::CodeKind;

/// A data-quality issue found in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// The offending code.
    pub code: String,
    /// Sheet the issue was found in.
    pub sheet: &'static str,
    /// Description of the issue.
    pub issue: String,
}

/// Service for validating catalog integrity.
///
/// None of these issues stop a query: a colliding code is still classified by
/// priority and a dangling reference is still described as not found. They
/// are surfaced so the workbook can be fixed.
#[derive(Clone)]
pub struct ValidationService {
    catalog: AppCatalog,
}

impl FromRef<Context> for ValidationService {
    fn from_ref(ctx: &Context) -> Self {
        Self {
            catalog: AppCatalog::from_ref(ctx),
        }
    }
}

impl ValidationService {
    pub fn new(catalog: AppCatalog) -> Self {
        Self { catalog }
    }

    /// Run every check, in sheet order.
    pub fn check(&self) -> Vec<ValidationIssue> {
        let mut issues = self.find_collisions();
        issues.extend(self.find_dangling_relations());
        issues.extend(self.find_dangling_links());
        issues
    }

    /// Codes present in more than one vocabulary.
    ///
    /// The classifier resolves these by priority (SB > CE > CEv > DO) and the
    /// description lookup by load order, so the two may disagree.
    pub fn find_collisions(&self) -> Vec<ValidationIssue> {
        let catalog = &self.catalog;
        let selectable = catalog.selectable_codes();

        selectable
            .into_iter()
            .filter_map(|classified| {
                let holders: Vec<&str> = CodeKind::vocabularies()
                    .iter()
                    .filter(|kind| {
                        catalog
                            .vocabulary(**kind)
                            .is_some_and(|vocabulary| vocabulary.contains(&classified.code))
                    })
                    .map(CodeKind::label)
                    .collect();

                (holders.len() > 1).then(|| ValidationIssue {
                    issue: format!(
                        "Code is defined in {}; classified as {}",
                        holders.join(", "),
                        classified.kind
                    ),
                    code: classified.code,
                    sheet: "vocabularies",
                })
            })
            .collect()
    }

    /// SB relation edges pointing at codes missing from their vocabulary.
    pub fn find_dangling_relations(&self) -> Vec<ValidationIssue> {
        let catalog = &self.catalog;
        let mut issues = Vec::new();

        for relation in catalog.relations() {
            if catalog.classify(&relation.sb) != CodeKind::Sb {
                issues.push(ValidationIssue {
                    code: relation.sb.clone(),
                    sheet: "SSBB-CE-CEv",
                    issue: "SB is not a basic knowledge item".to_string(),
                });
            }
            let expected = relation.kind.code_kind();
            let known = catalog
                .vocabulary(expected)
                .is_some_and(|vocabulary| vocabulary.contains(&relation.code));
            if !known {
                issues.push(ValidationIssue {
                    code: relation.code.clone(),
                    sheet: "SSBB-CE-CEv",
                    issue: format!(
                        "{} related to {} is not a known {}",
                        relation.code, relation.sb, expected
                    ),
                });
            }
        }

        issues.sort_by(|a, b| a.code.cmp(&b.code).then_with(|| a.issue.cmp(&b.issue)));
        issues.dedup();
        issues
    }

    /// CE-DO links whose CE or DO is missing from its vocabulary.
    pub fn find_dangling_links(&self) -> Vec<ValidationIssue> {
        let catalog = &self.catalog;
        let mut issues = Vec::new();

        for link in catalog.links() {
            let ce_known = catalog
                .vocabulary(CodeKind::Ce)
                .is_some_and(|vocabulary| vocabulary.contains(&link.ce));
            if !ce_known {
                issues.push(ValidationIssue {
                    code: link.ce.clone(),
                    sheet: "CE-DO",
                    issue: "CE is not a known evaluation criterion".to_string(),
                });
            }
            let do_known = catalog
                .vocabulary(CodeKind::Descriptor)
                .is_some_and(|vocabulary| vocabulary.contains(&link.descriptor));
            if !do_known {
                issues.push(ValidationIssue {
                    code: link.descriptor.clone(),
                    sheet: "CE-DO",
                    issue: format!("DO linked to {} is not a known descriptor", link.ce),
                });
            }
        }

        issues.sort_by(|a, b| a.code.cmp(&b.code).then_with(|| a.issue.cmp(&b.issue)));
        issues.dedup();
        issues
    }
}
