//! Report builder: projects a closure into the basic and detailed tables.

use std::collections::BTreeSet;

use crate::catalog::Catalog;
use crate::context::{AppCatalog, Context};
use crate::di::FromRef;
use crate::error::AppError;
use crate::models::{
    BasicRow, CodeKind, DetailedRow, RelationKind, Reports, DESCRIPTION_NOT_FOUND,
};

use super::ClosureService;

/// Service generating both report tables for a code selection.
#[derive(Clone)]
pub struct ReportService {
    catalog: AppCatalog,
    closure: ClosureService,
}

impl FromRef<Context> for ReportService {
    fn from_ref(ctx: &Context) -> Self {
        Self {
            catalog: AppCatalog::from_ref(ctx),
            closure: ClosureService::from_ref(ctx),
        }
    }
}

impl ReportService {
    pub fn new(catalog: AppCatalog) -> Self {
        Self {
            closure: ClosureService::new(catalog.clone()),
            catalog,
        }
    }

    /// Build both tables for a selection.
    ///
    /// Codes are trimmed; a blank code fails the whole request. An empty
    /// selection produces empty tables.
    pub fn build<I, S>(&self, selection: I) -> Result<Reports, AppError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let selection = parse_selection(selection)?;
        let closure = self.closure.closure(&selection);

        let reports = Reports {
            basic: basic_table(&self.catalog, &closure),
            detailed: detailed_table(&self.catalog, &closure),
            selection: selection.into_iter().collect(),
        };

        tracing::debug!(
            closure = closure.len(),
            basic_rows = reports.basic.len(),
            detailed_rows = reports.detailed.len(),
            "Built reports"
        );
        Ok(reports)
    }
}

fn parse_selection<I, S>(selection: I) -> Result<BTreeSet<String>, AppError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    selection
        .into_iter()
        .map(|code| {
            let code = code.as_ref().trim();
            if code.is_empty() {
                Err(AppError::Validation("empty code in selection".to_string()))
            } else {
                Ok(code.to_string())
            }
        })
        .collect()
}

/// One row per SB in the closure: classified SB, or the SB end of a relation edge.
fn basic_table(catalog: &Catalog, closure: &BTreeSet<String>) -> Vec<BasicRow> {
    closure
        .iter()
        .filter(|code| catalog.classify(code) == CodeKind::Sb || catalog.is_relation_sb(code))
        .map(|sb| {
            let mut ce = BTreeSet::new();
            let mut cev = BTreeSet::new();
            let mut descriptors = BTreeSet::new();

            for edge in catalog.relations_of(sb) {
                match edge.kind {
                    RelationKind::Ce => {
                        ce.insert(edge.code.as_str());
                        descriptors.extend(catalog.descriptors_of_criterion(&edge.code));
                    }
                    RelationKind::CeVariant => {
                        cev.insert(edge.code.as_str());
                    }
                }
            }

            BasicRow {
                sb: sb.clone(),
                ce: join(ce),
                cev: join(cev),
                descriptors: join(descriptors),
            }
        })
        .collect()
}

/// One row per closure member, ordered by type label then code.
fn detailed_table(catalog: &Catalog, closure: &BTreeSet<String>) -> Vec<DetailedRow> {
    let mut rows: Vec<DetailedRow> = closure
        .iter()
        .map(|code| DetailedRow {
            code: code.clone(),
            kind: catalog.classify(code),
            description: catalog
                .description(code)
                .unwrap_or(DESCRIPTION_NOT_FOUND)
                .to_string(),
        })
        .collect();
    rows.sort_by(|a, b| a.kind.cmp(&b.kind).then_with(|| a.code.cmp(&b.code)));
    rows
}

fn join(codes: BTreeSet<&str>) -> String {
    codes.into_iter().collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures;
    use std::sync::Arc;

    fn service() -> ReportService {
        ReportService::new(Arc::new(fixtures::catalog()))
    }

    #[test]
    fn test_basic_table_for_single_sb() {
        let reports = service().build(["SB1"]).unwrap();

        assert_eq!(
            reports.basic,
            vec![BasicRow {
                sb: "SB1".to_string(),
                ce: "C1, C2".to_string(),
                cev: "V1".to_string(),
                descriptors: "D1".to_string(),
            }]
        );
    }

    #[test]
    fn test_detailed_table_sorted_by_kind_then_code() {
        let reports = service().build(["SB1", "nope"]).unwrap();
        let rows: Vec<_> = reports
            .detailed
            .iter()
            .map(|r| (r.code.as_str(), r.kind))
            .collect();

        assert_eq!(
            rows,
            vec![
                ("C1", CodeKind::Ce),
                ("C2", CodeKind::Ce),
                ("V1", CodeKind::CeVariant),
                ("D1", CodeKind::Descriptor),
                ("SB1", CodeKind::Sb),
                ("nope", CodeKind::Unclassified),
            ]
        );
        let missing = reports.detailed.last().unwrap();
        assert_eq!(missing.description, DESCRIPTION_NOT_FOUND);
        assert_eq!(reports.detailed[0].description, "Criterio uno");
    }

    #[test]
    fn test_row_counts_match_closure() {
        let service = service();
        let closure = ClosureService::new(Arc::new(fixtures::catalog()));

        for selection in [vec!["D9"], vec!["SB1", "SB2"], vec!["X"], vec!["D5"]] {
            let reports = service.build(&selection).unwrap();
            let expected = closure.closure(&selection);

            assert_eq!(reports.detailed.len(), expected.len());
            let listed: BTreeSet<String> =
                reports.detailed.iter().map(|r| r.code.clone()).collect();
            assert_eq!(listed, expected);

            let sb_count = expected
                .iter()
                .filter(|c| fixtures::catalog().classify(c) == CodeKind::Sb)
                .count();
            assert_eq!(reports.basic.len(), sb_count);
        }
    }

    #[test]
    fn test_sb_without_relations_gets_empty_columns() {
        // X is an SB (and a DO) with no relation edges
        let reports = service().build(["X"]).unwrap();
        assert_eq!(
            reports.basic,
            vec![BasicRow {
                sb: "X".to_string(),
                ce: String::new(),
                cev: String::new(),
                descriptors: String::new(),
            }]
        );
        // Description lookup layers DO over SB
        assert_eq!(reports.detailed[0].description, "Descriptor X");
        assert_eq!(reports.detailed[0].kind, CodeKind::Sb);
    }

    #[test]
    fn test_descriptor_seed_reaches_sb_row() {
        let reports = service().build(["D9"]).unwrap();
        assert_eq!(reports.basic.len(), 1);
        assert_eq!(reports.basic[0].sb, "SB9");
        assert_eq!(reports.basic[0].ce, "C9");
        assert_eq!(reports.basic[0].descriptors, "D1, D9");
    }

    #[test]
    fn test_selection_is_trimmed() {
        let reports = service().build([" SB1 "]).unwrap();
        assert_eq!(reports.selection, vec!["SB1".to_string()]);
        assert_eq!(reports.basic[0].sb, "SB1");
    }

    #[test]
    fn test_blank_code_is_rejected() {
        let err = service().build(["SB1", "  "]).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_empty_selection_yields_empty_reports() {
        let reports = service().build(Vec::<String>::new()).unwrap();
        assert!(reports.is_empty());
        assert!(reports.selection.is_empty());
    }

    #[test]
    fn test_unrelated_sb_endpoint_counts_as_sb_row() {
        // An SB that only exists in the relation sheet still gets a basic row
        let catalog = Catalog::new(
            Default::default(),
            [("1", "Crit")].into_iter().collect(),
            Default::default(),
            Default::default(),
            vec![crate::models::SbRelation::new("Z", RelationKind::Ce, "1")],
            vec![],
        );
        let reports = ReportService::new(Arc::new(catalog)).build(["1"]).unwrap();
        assert_eq!(reports.basic.len(), 1);
        assert_eq!(reports.basic[0].sb, "Z");
        let z = reports.detailed.iter().find(|r| r.code == "Z").unwrap();
        assert_eq!(z.kind, CodeKind::Unclassified);
    }
}
