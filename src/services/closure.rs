//! Closure engine: bounded four-pass expansion of a seed selection.
//!
//! The expansion runs exactly once through four steps:
//!
//! 1. DO → CE: criteria linked to seed descriptors
//! 2. working set → SB: items whose relation edge touches the working set
//!    (either the related code or the SB itself)
//! 3. SB → CE/CEv: every code related to the items found in step 2
//! 4. CE → DO: descriptors of the CE edges found in step 3
//!
//! It is not iterated to a fixpoint. A code reachable only through a fifth hop
//! stays out, so feeding a closure back in as a new seed can grow it.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::catalog::Catalog;
use crate::context::{AppCatalog, Context};
use crate::di::FromRef;
use crate::models::RelationKind;

/// Codes added by each step of one expansion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClosureTrace {
    /// The seed codes.
    pub seeds: BTreeSet<String>,
    /// Step 1: CE codes linked to seed descriptors.
    pub criteria_from_descriptors: BTreeSet<String>,
    /// Step 2: SB codes touching the working set.
    pub basics: BTreeSet<String>,
    /// Step 3: CE and CEv codes related to those SBs.
    pub related: BTreeSet<String>,
    /// Step 4: descriptors of the step-3 CE codes.
    pub descriptors: BTreeSet<String>,
}

impl ClosureTrace {
    /// Union of the seeds and every step's additions.
    pub fn into_closure(self) -> BTreeSet<String> {
        let mut closure = self.seeds;
        closure.extend(self.criteria_from_descriptors);
        closure.extend(self.basics);
        closure.extend(self.related);
        closure.extend(self.descriptors);
        closure
    }
}

/// Service computing relationship closures over the catalog.
#[derive(Clone)]
pub struct ClosureService {
    catalog: AppCatalog,
}

impl FromRef<Context> for ClosureService {
    fn from_ref(ctx: &Context) -> Self {
        Self {
            catalog: AppCatalog::from_ref(ctx),
        }
    }
}

impl ClosureService {
    pub fn new(catalog: AppCatalog) -> Self {
        Self { catalog }
    }

    /// Every code related to `seeds` within the four-step radius, seeds included.
    pub fn closure<I, S>(&self, seeds: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.trace(seeds).into_closure()
    }

    /// Run the expansion and keep each step's additions apart.
    pub fn trace<I, S>(&self, seeds: I) -> ClosureTrace
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let seeds: BTreeSet<String> = seeds
            .into_iter()
            .map(|code| code.as_ref().to_string())
            .collect();
        expand(&self.catalog, seeds)
    }
}

fn expand(catalog: &Catalog, seeds: BTreeSet<String>) -> ClosureTrace {
    // Step 1: DO → CE, from the seeds only
    let criteria_from_descriptors: BTreeSet<String> = seeds
        .iter()
        .flat_map(|code| catalog.criteria_of_descriptor(code))
        .map(str::to_string)
        .collect();

    // Step 2: working set → SB, matching either end of a relation edge
    let basics: BTreeSet<String> = seeds
        .iter()
        .chain(&criteria_from_descriptors)
        .flat_map(|code| {
            let own = catalog.is_relation_sb(code).then_some(code.as_str());
            catalog.sbs_related_to(code).chain(own)
        })
        .map(str::to_string)
        .collect();

    // Step 3: SB → CE/CEv
    let edges: Vec<_> = basics
        .iter()
        .flat_map(|sb| catalog.relations_of(sb))
        .collect();
    let related: BTreeSet<String> = edges.iter().map(|edge| edge.code.clone()).collect();

    // Step 4: CE edges of step 3 → DO
    let descriptors: BTreeSet<String> = edges
        .iter()
        .filter(|edge| edge.kind == RelationKind::Ce)
        .flat_map(|edge| catalog.descriptors_of_criterion(&edge.code))
        .map(str::to_string)
        .collect();

    tracing::debug!(
        seeds = seeds.len(),
        criteria_from_descriptors = criteria_from_descriptors.len(),
        basics = basics.len(),
        related = related.len(),
        descriptors = descriptors.len(),
        "Expanded closure"
    );

    ClosureTrace {
        seeds,
        criteria_from_descriptors,
        basics,
        related,
        descriptors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures;
    use crate::models::{CeDoLink, SbRelation, Vocabulary};
    use std::sync::Arc;

    fn service() -> ClosureService {
        ClosureService::new(Arc::new(fixtures::catalog()))
    }

    fn set(codes: &[&str]) -> BTreeSet<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_closure_from_sb() {
        let closure = service().closure(["SB1"]);
        assert_eq!(closure, set(&["C1", "C2", "D1", "SB1", "V1"]));
    }

    #[test]
    fn test_closure_from_descriptor_reaches_sb_and_reexpands() {
        let trace = service().trace(["D9"]);
        assert_eq!(trace.criteria_from_descriptors, set(&["C9"]));
        assert_eq!(trace.basics, set(&["SB9"]));
        assert_eq!(trace.related, set(&["C9"]));
        // C9 also links to D1
        assert_eq!(trace.descriptors, set(&["D1", "D9"]));
        assert_eq!(trace.into_closure(), set(&["C9", "D1", "D9", "SB9"]));
    }

    #[test]
    fn test_closure_is_extensive() {
        let service = service();
        for seeds in [
            vec!["SB1"],
            vec!["D1", "V1"],
            vec!["nope", "C3"],
            vec!["X", "D5", "SB2"],
        ] {
            let closure = service.closure(&seeds);
            for seed in seeds {
                assert!(closure.contains(seed), "{seed} missing from closure");
            }
        }
    }

    #[test]
    fn test_closure_ignores_seed_order_and_duplicates() {
        let service = service();
        let a = service.closure(["D1", "SB2", "V1"]);
        let b = service.closure(["V1", "D1", "SB2", "D1"]);
        assert_eq!(a, b);
        assert_eq!(a, service.closure(["D1", "SB2", "V1"]));
    }

    #[test]
    fn test_descriptor_without_links_stays_alone() {
        assert_eq!(service().closure(["D5"]), set(&["D5"]));
    }

    #[test]
    fn test_unmatched_and_empty_seeds() {
        let service = service();
        assert_eq!(service.closure(["nope"]), set(&["nope"]));
        assert!(service.closure(Vec::<String>::new()).is_empty());
    }

    #[test]
    fn test_variant_seed_reaches_its_sb() {
        let closure = service().closure(["V1"]);
        assert_eq!(closure, set(&["C1", "C2", "D1", "SB1", "V1"]));
    }

    #[test]
    fn test_step_one_uses_seeds_only() {
        // D1 is added by step 4 from SB1, but step 1 never sees it, so C9 stays out
        let closure = service().closure(["SB1"]);
        assert!(closure.contains("D1"));
        assert!(!closure.contains("C9"));
    }

    #[test]
    fn test_bounded_radius_is_not_a_fixpoint() {
        let service = service();
        let first = service.closure(["SB1"]);
        let second = service.closure(&first);

        // Re-seeding with D1 walks D1 → C9 → SB9, a hop past the first radius
        assert_ne!(first, second);
        assert!(first.is_subset(&second));
        assert!(second.contains("SB9"));
        assert!(!first.contains("SB9"));
    }

    #[test]
    fn test_fifth_hop_is_excluded() {
        // S1 -CE-> A; A -DO-> D; D <-DO- B; B <-CE- S2. From S1 the chain needs
        // DO → CE after step 4, which the expansion never performs.
        let basics: Vocabulary = [("S1", ""), ("S2", "")].into_iter().collect();
        let criteria: Vocabulary = [("A", ""), ("B", "")].into_iter().collect();
        let descriptors: Vocabulary = [("D", "")].into_iter().collect();
        let catalog = Catalog::new(
            basics,
            criteria,
            Vocabulary::new(),
            descriptors,
            vec![
                SbRelation::new("S1", RelationKind::Ce, "A"),
                SbRelation::new("S2", RelationKind::Ce, "B"),
            ],
            vec![CeDoLink::new("A", "D"), CeDoLink::new("B", "D")],
        );
        let service = ClosureService::new(Arc::new(catalog));

        assert_eq!(service.closure(["S1"]), set(&["A", "D", "S1"]));
    }

    #[test]
    fn test_variant_edges_do_not_reach_descriptors() {
        // A CEv code that happens to share text with a linked CE is not joined in step 4
        let basics: Vocabulary = [("S", "")].into_iter().collect();
        let catalog = Catalog::new(
            basics,
            Vocabulary::new(),
            Vocabulary::new(),
            Vocabulary::new(),
            vec![SbRelation::new("S", RelationKind::CeVariant, "7")],
            vec![CeDoLink::new("7", "D7")],
        );
        let service = ClosureService::new(Arc::new(catalog));

        assert_eq!(service.closure(["S"]), set(&["7", "S"]));
    }
}
