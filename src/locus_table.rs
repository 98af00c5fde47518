//src/locus_table.rs

use ahash::AHashMap;

use crate::types::ResolvedFeature;

/// What happened when a match was offered to the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    /// First match for this locus; its output position is now fixed.
    Inserted,
    /// A CDS overwrote the stored feature in place.
    Replaced,
    /// The locus was already present and the new match was not a CDS.
    Discarded,
}

/// Locus tag -> resolved feature, iterated in first-insertion order.
#[derive(Debug, Default)]
pub struct LocusTable<'g> {
    entries: Vec<ResolvedFeature<'g>>,
    positions: AHashMap<&'g str, usize>,
}

impl<'g> LocusTable<'g> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            positions: AHashMap::new(),
        }
    }

    /// Merge one match. A CDS replaces whatever is stored for its locus,
    /// anything else only fills an empty slot.
    pub fn offer(&mut self, resolved: ResolvedFeature<'g>) -> Offer {
        match self.positions.get(resolved.locus).copied() {
            None => {
                self.positions.insert(resolved.locus, self.entries.len());
                self.entries.push(resolved);
                Offer::Inserted
            }
            Some(_) if !resolved.feature.is_coding() => Offer::Discarded,
            Some(pos) => {
                self.entries[pos] = resolved;
                Offer::Replaced
            }
        }
    }

    pub fn get(&self, locus: &str) -> Option<&ResolvedFeature<'g>> {
        self.positions.get(locus).map(|&pos| &self.entries[pos])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedFeature<'g>> {
        self.entries.iter()
    }
}

impl<'g> IntoIterator for LocusTable<'g> {
    type Item = ResolvedFeature<'g>;
    type IntoIter = std::vec::IntoIter<ResolvedFeature<'g>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Feature, Location, Qualifiers};

    fn feature(kind: &str, locus: &str) -> Feature {
        Feature::new(kind, [("locus_tag", locus)].into_iter().collect::<Qualifiers>(), Location::forward(0, 1))
    }

    fn resolved(feature: &Feature) -> ResolvedFeature<'_> {
        ResolvedFeature {
            locus: feature.locus_tag().unwrap(),
            feature,
        }
    }

    #[test]
    fn test_cds_replaces_gene_but_keeps_position() {
        let gene_a = feature("gene", "A");
        let gene_b = feature("gene", "B");
        let cds_a = feature("CDS", "A");

        let mut table = LocusTable::new();
        assert_eq!(table.offer(resolved(&gene_a)), Offer::Inserted);
        assert_eq!(table.offer(resolved(&gene_b)), Offer::Inserted);
        assert_eq!(table.offer(resolved(&cds_a)), Offer::Replaced);

        let order: Vec<_> = table.iter().map(|r| (r.locus, r.feature.kind.as_str())).collect();
        assert_eq!(order, vec![("A", "CDS"), ("B", "gene")]);
    }

    #[test]
    fn test_non_cds_never_overwrites() {
        let cds = feature("CDS", "A");
        let gene = feature("gene", "A");
        let rrna = feature("rRNA", "A");

        let mut table = LocusTable::new();
        table.offer(resolved(&cds));
        assert_eq!(table.offer(resolved(&gene)), Offer::Discarded);
        assert_eq!(table.offer(resolved(&rrna)), Offer::Discarded);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("A").unwrap().feature.kind, "CDS");
    }

    #[test]
    fn test_rrna_stored_first_is_kept_over_later_gene() {
        let rrna = feature("rRNA", "R");
        let gene = feature("gene", "R");

        let mut table = LocusTable::new();
        table.offer(resolved(&rrna));
        table.offer(resolved(&gene));
        assert_eq!(table.get("R").unwrap().feature.kind, "rRNA");
    }
}
