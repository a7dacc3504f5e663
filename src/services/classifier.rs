//! Classifier service: batch classification and the selectable code list.

use crate::context::{AppCatalog, Context};
use crate::di::FromRef;
use crate::models::{ClassifiedCode, CodeKind};

/// Service classifying codes against the four vocabularies.
#[derive(Clone)]
pub struct ClassifierService {
    catalog: AppCatalog,
}

impl FromRef<Context> for ClassifierService {
    fn from_ref(ctx: &Context) -> Self {
        Self {
            catalog: AppCatalog::from_ref(ctx),
        }
    }
}

impl ClassifierService {
    pub fn new(catalog: AppCatalog) -> Self {
        Self { catalog }
    }

    pub fn classify(&self, code: &str) -> CodeKind {
        self.catalog.classify(code)
    }

    /// Classify each code as given, keeping input order.
    pub fn classify_all<I, S>(&self, codes: I) -> Vec<ClassifiedCode>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        codes
            .into_iter()
            .map(|code| {
                let code = code.as_ref();
                ClassifiedCode {
                    code: code.to_string(),
                    kind: self.classify(code),
                }
            })
            .collect()
    }

    /// Codes a user can select, optionally restricted to one type.
    pub fn selectable(&self, kind: Option<CodeKind>) -> Vec<ClassifiedCode> {
        self.catalog
            .selectable_codes()
            .into_iter()
            .filter(|code| kind.map_or(true, |kind| code.kind == kind))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures;
    use std::sync::Arc;

    #[test]
    fn test_classify_all_keeps_order() {
        let service = ClassifierService::new(Arc::new(fixtures::catalog()));
        let kinds: Vec<_> = service
            .classify_all(["D1", "SB1", "zz", "V1"])
            .into_iter()
            .map(|c| c.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                CodeKind::Descriptor,
                CodeKind::Sb,
                CodeKind::Unclassified,
                CodeKind::CeVariant,
            ]
        );
    }

    #[test]
    fn test_selectable_filtered_by_kind() {
        let service = ClassifierService::new(Arc::new(fixtures::catalog()));
        let descriptors: Vec<_> = service
            .selectable(Some(CodeKind::Descriptor))
            .into_iter()
            .map(|c| c.code)
            .collect();
        // X classifies as SB, so it is not offered as a descriptor
        assert_eq!(descriptors, vec!["D1", "D3", "D5", "D9"]);
        assert_eq!(service.selectable(None).len(), 13);
    }
}
