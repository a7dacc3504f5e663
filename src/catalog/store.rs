//! Immutable in-memory store of the four vocabularies and two relation tables.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::models::{CeDoLink, ClassifiedCode, CodeKind, SbRelation, Vocabulary};

/// The curriculum catalog: vocabularies, exploded relation edges, the merged
/// description lookup and the join indexes the closure walks.
///
/// Built once, then shared read-only (behind `Arc`) for the whole session.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    basics: Vocabulary,
    criteria: Vocabulary,
    variants: Vocabulary,
    descriptors: Vocabulary,
    relations: Vec<SbRelation>,
    links: Vec<CeDoLink>,
    descriptions: HashMap<String, String>,
    // Join indexes
    sbs_by_code: HashMap<String, BTreeSet<String>>,
    relations_by_sb: BTreeMap<String, Vec<SbRelation>>,
    criteria_by_descriptor: HashMap<String, BTreeSet<String>>,
    descriptors_by_criterion: HashMap<String, BTreeSet<String>>,
}

impl Catalog {
    /// Build a catalog from already-normalized tables.
    pub fn new(
        basics: Vocabulary,
        criteria: Vocabulary,
        variants: Vocabulary,
        descriptors: Vocabulary,
        relations: Vec<SbRelation>,
        links: Vec<CeDoLink>,
    ) -> Self {
        // Later layers win on collision: SB, CEv, CE, DO.
        let mut descriptions = HashMap::new();
        for vocabulary in [&basics, &variants, &criteria, &descriptors] {
            for (code, description) in vocabulary.iter() {
                descriptions.insert(code.to_string(), description.to_string());
            }
        }

        let mut sbs_by_code: HashMap<String, BTreeSet<String>> = HashMap::new();
        let mut relations_by_sb: BTreeMap<String, Vec<SbRelation>> = BTreeMap::new();
        for relation in &relations {
            sbs_by_code
                .entry(relation.code.clone())
                .or_default()
                .insert(relation.sb.clone());
            relations_by_sb
                .entry(relation.sb.clone())
                .or_default()
                .push(relation.clone());
        }

        let mut criteria_by_descriptor: HashMap<String, BTreeSet<String>> = HashMap::new();
        let mut descriptors_by_criterion: HashMap<String, BTreeSet<String>> = HashMap::new();
        for link in &links {
            criteria_by_descriptor
                .entry(link.descriptor.clone())
                .or_default()
                .insert(link.ce.clone());
            descriptors_by_criterion
                .entry(link.ce.clone())
                .or_default()
                .insert(link.descriptor.clone());
        }

        Self {
            basics,
            criteria,
            variants,
            descriptors,
            relations,
            links,
            descriptions,
            sbs_by_code,
            relations_by_sb,
            criteria_by_descriptor,
            descriptors_by_criterion,
        }
    }

    /// The vocabulary for a kind; `Unclassified` has none.
    pub fn vocabulary(&self, kind: CodeKind) -> Option<&Vocabulary> {
        match kind {
            CodeKind::Sb => Some(&self.basics),
            CodeKind::Ce => Some(&self.criteria),
            CodeKind::CeVariant => Some(&self.variants),
            CodeKind::Descriptor => Some(&self.descriptors),
            CodeKind::Unclassified => None,
        }
    }

    pub fn relations(&self) -> &[SbRelation] {
        &self.relations
    }

    pub fn links(&self) -> &[CeDoLink] {
        &self.links
    }

    /// Description of any code, trying it as given and then trimmed.
    pub fn description(&self, code: &str) -> Option<&str> {
        self.descriptions
            .get(code)
            .or_else(|| self.descriptions.get(code.trim()))
            .map(String::as_str)
    }

    /// SB codes with a relation edge to `code`.
    pub fn sbs_related_to(&self, code: &str) -> impl Iterator<Item = &str> {
        self.sbs_by_code
            .get(code)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// Relation edges whose SB endpoint is `sb`.
    pub fn relations_of(&self, sb: &str) -> &[SbRelation] {
        self.relations_by_sb
            .get(sb)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether `code` is the SB endpoint of at least one relation edge.
    pub fn is_relation_sb(&self, code: &str) -> bool {
        self.relations_by_sb.contains_key(code)
    }

    /// CE codes linked to descriptor `code`.
    pub fn criteria_of_descriptor(&self, code: &str) -> impl Iterator<Item = &str> {
        self.criteria_by_descriptor
            .get(code)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// Descriptors linked to CE `code`.
    pub fn descriptors_of_criterion(&self, code: &str) -> impl Iterator<Item = &str> {
        self.descriptors_by_criterion
            .get(code)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// Every vocabulary key once, tagged with its classified type.
    ///
    /// Sorted by code, then stably by type label, which is the order a
    /// selection list presents them in.
    pub fn selectable_codes(&self) -> Vec<ClassifiedCode> {
        let codes: BTreeSet<&str> = CodeKind::vocabularies()
            .iter()
            .filter_map(|kind| self.vocabulary(*kind))
            .flat_map(Vocabulary::codes)
            .collect();

        let mut classified: Vec<ClassifiedCode> = codes
            .into_iter()
            .map(|code| ClassifiedCode {
                code: code.to_string(),
                kind: self.classify(code),
            })
            .collect();
        classified.sort_by(|a, b| a.kind.cmp(&b.kind));
        classified
    }

    /// Determine which vocabulary `code` belongs to.
    ///
    /// Membership is tested in priority order SB, CE, CEv, DO; the first hit
    /// wins. A code in none of them is `Unclassified`.
    pub fn classify(&self, code: &str) -> CodeKind {
        CodeKind::vocabularies()
            .iter()
            .copied()
            .find(|kind| {
                self.vocabulary(*kind)
                    .is_some_and(|vocabulary| vocabulary.contains(code))
            })
            .unwrap_or(CodeKind::Unclassified)
    }

    /// Row counts for logging.
    pub fn summary(&self) -> CatalogSummary {
        CatalogSummary {
            basics: self.basics.len(),
            criteria: self.criteria.len(),
            variants: self.variants.len(),
            descriptors: self.descriptors.len(),
            relations: self.relations.len(),
            links: self.links.len(),
        }
    }
}

/// Table sizes of a loaded catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct CatalogSummary {
    pub basics: usize,
    pub criteria: usize,
    pub variants: usize,
    pub descriptors: usize,
    pub relations: usize,
    pub links: usize,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::models::RelationKind;

    /// Small catalog used across service tests.
    ///
    /// - SB1 → CE {C1, C2}, CEv {V1}; C1 → D1
    /// - SB9 → CE {C9}; C9 → {D9, D1}
    /// - SB2 → CE {C3}; C3 → D3
    /// - D5 is a descriptor with no links
    /// - `X` is both an SB and a DO key
    pub fn catalog() -> Catalog {
        let basics: Vocabulary = [
            ("SB1", "Saber uno"),
            ("SB2", "Saber dos"),
            ("SB9", "Saber nueve"),
            ("X", "Saber X"),
        ]
        .into_iter()
        .collect();
        let criteria: Vocabulary = [
            ("C1", "Criterio uno"),
            ("C2", "Criterio dos"),
            ("C3", "Criterio tres"),
            ("C9", "Criterio nueve"),
        ]
        .into_iter()
        .collect();
        let variants: Vocabulary = [("V1", "Variante uno")].into_iter().collect();
        let descriptors: Vocabulary = [
            ("D1", "Descriptor uno"),
            ("D3", "Descriptor tres"),
            ("D5", "Descriptor cinco"),
            ("D9", "Descriptor nueve"),
            ("X", "Descriptor X"),
        ]
        .into_iter()
        .collect();

        let relations = vec![
            SbRelation::new("SB1", RelationKind::Ce, "C1"),
            SbRelation::new("SB1", RelationKind::Ce, "C2"),
            SbRelation::new("SB1", RelationKind::CeVariant, "V1"),
            SbRelation::new("SB9", RelationKind::Ce, "C9"),
            SbRelation::new("SB2", RelationKind::Ce, "C3"),
        ];
        let links = vec![
            CeDoLink::new("C1", "D1"),
            CeDoLink::new("C9", "D9"),
            CeDoLink::new("C9", "D1"),
            CeDoLink::new("C3", "D3"),
        ];

        Catalog::new(basics, criteria, variants, descriptors, relations, links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_priority() {
        let catalog = fixtures::catalog();
        assert_eq!(catalog.classify("SB1"), CodeKind::Sb);
        assert_eq!(catalog.classify("C1"), CodeKind::Ce);
        assert_eq!(catalog.classify("V1"), CodeKind::CeVariant);
        assert_eq!(catalog.classify("D1"), CodeKind::Descriptor);
        // Collides between SB and DO; SB wins
        assert_eq!(catalog.classify("X"), CodeKind::Sb);
        assert_eq!(catalog.classify("nope"), CodeKind::Unclassified);
    }

    #[test]
    fn test_classify_priority_for_every_collision() {
        // Each key is defined in exactly the vocabularies listed in its name
        let basics: Vocabulary = [("sb-ce", ""), ("sb-cev", ""), ("sb-do", ""), ("all", "")]
            .into_iter()
            .collect();
        let criteria: Vocabulary = [
            ("sb-ce", ""),
            ("ce-cev", ""),
            ("ce-do", ""),
            ("all", ""),
        ]
        .into_iter()
        .collect();
        let variants: Vocabulary = [
            ("sb-cev", ""),
            ("ce-cev", ""),
            ("cev-do", ""),
            ("all", ""),
        ]
        .into_iter()
        .collect();
        let descriptors: Vocabulary = [
            ("sb-do", ""),
            ("ce-do", ""),
            ("cev-do", ""),
            ("all", ""),
        ]
        .into_iter()
        .collect();
        let catalog = Catalog::new(basics, criteria, variants, descriptors, vec![], vec![]);

        assert_eq!(catalog.classify("sb-ce"), CodeKind::Sb);
        assert_eq!(catalog.classify("sb-cev"), CodeKind::Sb);
        assert_eq!(catalog.classify("sb-do"), CodeKind::Sb);
        assert_eq!(catalog.classify("ce-cev"), CodeKind::Ce);
        assert_eq!(catalog.classify("ce-do"), CodeKind::Ce);
        assert_eq!(catalog.classify("cev-do"), CodeKind::CeVariant);
        assert_eq!(catalog.classify("all"), CodeKind::Sb);
    }

    #[test]
    fn test_classify_is_deterministic() {
        let catalog = fixtures::catalog();
        for code in ["SB1", "X", "D5", "", "nope"] {
            assert_eq!(catalog.classify(code), catalog.classify(code));
        }
    }

    #[test]
    fn test_description_layering_later_wins() {
        let catalog = fixtures::catalog();
        // DO is layered after SB
        assert_eq!(catalog.description("X"), Some("Descriptor X"));
        assert_eq!(catalog.description("C1"), Some("Criterio uno"));
        assert_eq!(catalog.description(" C1 "), Some("Criterio uno"));
        assert_eq!(catalog.description("nope"), None);
    }

    #[test]
    fn test_indexes() {
        let catalog = fixtures::catalog();
        let sbs: Vec<_> = catalog.sbs_related_to("C9").collect();
        assert_eq!(sbs, vec!["SB9"]);
        let ces: Vec<_> = catalog.criteria_of_descriptor("D1").collect();
        assert_eq!(ces, vec!["C1", "C9"]);
        let dos: Vec<_> = catalog.descriptors_of_criterion("C9").collect();
        assert_eq!(dos, vec!["D1", "D9"]);
        assert_eq!(catalog.relations_of("SB1").len(), 3);
        assert!(catalog.relations_of("nope").is_empty());
    }

    #[test]
    fn test_selectable_codes_sorted_by_kind_then_code() {
        let catalog = fixtures::catalog();
        let codes = catalog.selectable_codes();

        // "X" appears once even though two vocabularies hold it
        assert_eq!(codes.iter().filter(|c| c.code == "X").count(), 1);
        assert_eq!(codes.len(), 13);

        let first = &codes[0];
        assert_eq!((first.code.as_str(), first.kind), ("C1", CodeKind::Ce));
        let sbs: Vec<_> = codes
            .iter()
            .filter(|c| c.kind == CodeKind::Sb)
            .map(|c| c.code.as_str())
            .collect();
        assert_eq!(sbs, vec!["SB1", "SB2", "SB9", "X"]);
    }
}
