//src/matcher.rs

use ahash::AHashMap;

use crate::normalize::base_identifier;
use crate::types::{Feature, ResolvedFeature};

/// How to choose between matching features with the same number of qualifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TieBreak {
    /// Keep whichever feature appears first in the genome.
    #[default]
    FirstSeen,
    /// Prefer `CDS` (any type containing it) `> rRNA > ncRNA > gene > anything else`, then first seen.
    TypePriority,
}

impl TieBreak {
    fn rank(self, feature: &Feature) -> u8 {
        match self {
            TieBreak::FirstSeen => 0,
            TieBreak::TypePriority => match feature.kind.as_str() {
                _ if feature.is_coding() => 4,
                "rRNA" => 3,
                "ncRNA" => 2,
                "gene" => 1,
                _ => 0,
            },
        }
    }

    /// Richness score: distinct qualifier count first, type rank second.
    #[inline]
    fn score(self, feature: &Feature) -> (usize, u8) {
        (feature.qualifiers.len(), self.rank(feature))
    }
}

/// True if the first value of any qualifier equals `base_id` once normalized.
#[inline]
fn mentions(feature: &Feature, base_id: &str) -> bool {
    feature
        .qualifiers
        .first_values()
        .any(|value| base_identifier(value) == base_id)
}

/// Keeps the richest candidate; an equal score never displaces the current best.
fn pick_richest<'g>(
    candidates: impl Iterator<Item = &'g Feature>,
    tie_break: TieBreak,
) -> Option<ResolvedFeature<'g>> {
    let mut best: Option<(&'g Feature, (usize, u8))> = None;
    for feature in candidates {
        let score = tie_break.score(feature);
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((feature, score));
        }
    }
    best.and_then(|(feature, _)| {
        feature
            .locus_tag()
            .map(|locus| ResolvedFeature { locus, feature })
    })
}

/// Linear scan over every feature for one requested identifier.
///
/// Features without a `locus_tag` are ignored. Among the features whose
/// qualifiers mention the identifier (version suffixes ignored on both sides),
/// the one with the most distinct qualifier keys wins. A request that is
/// empty once normalized matches nothing, not even valueless flags.
pub fn find_feature<'g>(
    request: &str,
    features: &'g [Feature],
    tie_break: TieBreak,
) -> Option<ResolvedFeature<'g>> {
    let base_id = base_identifier(request);
    if base_id.is_empty() {
        return None;
    }
    pick_richest(
        features
            .iter()
            .filter(|f| f.qualifiers.contains("locus_tag"))
            .filter(|f| mentions(f, base_id)),
        tie_break,
    )
}

/// Reverse index from normalized qualifier value to feature positions.
/// Lookups give the same answer as [`find_feature`] without scanning.
pub struct FeatureIndex<'g> {
    features: &'g [Feature],
    by_id: AHashMap<&'g str, Vec<usize>>,
}

impl<'g> FeatureIndex<'g> {
    pub fn build(features: &'g [Feature]) -> Self {
        let mut by_id: AHashMap<&'g str, Vec<usize>> = AHashMap::with_capacity(features.len() * 4);

        for (pos, feature) in features.iter().enumerate() {
            if !feature.qualifiers.contains("locus_tag") {
                continue;
            }
            for value in feature.qualifiers.first_values() {
                let base_id = base_identifier(value);
                if base_id.is_empty() {
                    continue;
                }
                let positions = by_id.entry(base_id).or_default();
                // Positions are pushed in ascending order, so a repeat is always last.
                if positions.last() != Some(&pos) {
                    positions.push(pos);
                }
            }
        }

        log::debug!(
            "Indexed {} distinct identifiers over {} features",
            by_id.len(),
            features.len()
        );

        Self { features, by_id }
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn find(&self, request: &str, tie_break: TieBreak) -> Option<ResolvedFeature<'g>> {
        let positions = self.by_id.get(base_identifier(request))?;
        let features = self.features;
        pick_richest(positions.iter().map(|&pos| &features[pos]), tie_break)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Location, Qualifiers};

    fn feature(kind: &str, quals: &[(&str, &str)]) -> Feature {
        Feature::new(kind, quals.iter().copied().collect::<Qualifiers>(), Location::forward(0, 3))
    }

    fn coxiella_features() -> Vec<Feature> {
        vec![
            feature("source", &[("organism", "Coxiella burnetii"), ("db_xref", "taxon:227377")]),
            feature("gene", &[("locus_tag", "CBU_1234"), ("gene", "dnaA")]),
            feature(
                "CDS",
                &[
                    ("locus_tag", "CBU_1234"),
                    ("gene", "dnaA"),
                    ("protein_id", "NP_820224.1"),
                    ("db_xref", "GI:29654532"),
                    ("product", "chromosomal replication initiator"),
                ],
            ),
            feature("gene", &[("locus_tag", "CBU_0001"), ("note", "NP_820224")]),
        ]
    }

    #[test]
    fn test_richest_feature_wins() {
        let features = coxiella_features();
        let hit = find_feature("CBU_1234", &features, TieBreak::FirstSeen).unwrap();
        assert_eq!(hit.locus, "CBU_1234");
        assert_eq!(hit.feature.kind, "CDS");

        // The bare gene on CBU_0001 also mentions the protein, but has fewer qualifiers.
        let hit = find_feature("NP_820224", &features, TieBreak::FirstSeen).unwrap();
        assert_eq!(hit.locus, "CBU_1234");
    }

    #[test]
    fn test_version_suffix_ignored() {
        let features = coxiella_features();
        for request in ["NP_820224", "NP_820224.1", "NP_820224.2"] {
            let hit = find_feature(request, &features, TieBreak::FirstSeen).unwrap();
            assert_eq!(hit.feature.qualifiers.first("protein_id"), Some("NP_820224.1"));
        }
    }

    #[test]
    fn test_features_without_locus_tag_never_match() {
        let features = coxiella_features();
        assert!(find_feature("taxon:227377", &features, TieBreak::FirstSeen).is_none());
        assert!(find_feature("Coxiella burnetii", &features, TieBreak::FirstSeen).is_none());
    }

    #[test]
    fn test_only_first_value_is_examined() {
        let features = vec![feature(
            "CDS",
            &[("locus_tag", "CBU_1"), ("db_xref", "GI:1"), ("db_xref", "UniProt:Q83")],
        )];
        assert!(find_feature("GI:1", &features, TieBreak::FirstSeen).is_some());
        assert!(find_feature("UniProt:Q83", &features, TieBreak::FirstSeen).is_none());
    }

    #[test]
    fn test_blank_request_ignores_flag_qualifiers() {
        let features = vec![feature("CDS", &[("locus_tag", "CBU_p"), ("pseudo", "")])];
        assert!(find_feature("", &features, TieBreak::FirstSeen).is_none());
        assert!(find_feature(".1", &features, TieBreak::FirstSeen).is_none());
        assert!(FeatureIndex::build(&features).find("", TieBreak::FirstSeen).is_none());
    }

    #[test]
    fn test_tie_break_policies() {
        let features = vec![
            feature("gene", &[("locus_tag", "CBU_2"), ("gene", "rrs")]),
            feature("rRNA", &[("locus_tag", "CBU_2"), ("product", "rrs")]),
        ];
        let first = find_feature("rrs", &features, TieBreak::FirstSeen).unwrap();
        assert_eq!(first.feature.kind, "gene");

        let ranked = find_feature("rrs", &features, TieBreak::TypePriority).unwrap();
        assert_eq!(ranked.feature.kind, "rRNA");
    }

    #[test]
    fn test_type_priority_uses_the_same_cds_test_as_dedup() {
        let features = vec![
            feature("rRNA", &[("locus_tag", "CBU_3"), ("product", "orf7")]),
            feature("CDS_fragment", &[("locus_tag", "CBU_3"), ("gene", "orf7")]),
        ];
        assert!(features[1].is_coding());
        let ranked = find_feature("orf7", &features, TieBreak::TypePriority).unwrap();
        assert_eq!(ranked.feature.kind, "CDS_fragment");
    }

    #[test]
    fn test_index_agrees_with_linear_scan() {
        let features = coxiella_features();
        let index = FeatureIndex::build(&features);
        assert!(!index.is_empty());

        for request in ["CBU_1234", "NP_820224.9", "dnaA", "CBU_0001", "taxon:227377", "missing", ""] {
            for tie_break in [TieBreak::FirstSeen, TieBreak::TypePriority] {
                let linear = find_feature(request, &features, tie_break);
                let indexed = index.find(request, tie_break);
                assert_eq!(
                    linear.map(|r| r.feature as *const Feature),
                    indexed.map(|r| r.feature as *const Feature),
                    "mismatch for {request:?}"
                );
            }
        }
    }
}
