//src/resolve.rs

use rayon::prelude::*;

use crate::error::ExtractError;
use crate::locus_table::{LocusTable, Offer};
use crate::matcher::{FeatureIndex, TieBreak};
use crate::record::build_record;
use crate::types::{Genome, OutputRecord, ResolvedFeature};

/// Knobs for a resolution run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveOptions {
    pub tie_break: TieBreak,
    /// Match requests on the rayon pool. The merge stays serial and in
    /// request order, so output is identical to a sequential run.
    pub parallel: bool,
}

/// Counters for one run, logged once matching is done.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionStats {
    pub requests: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub loci: usize,
    pub replaced: usize,
    pub discarded: usize,
}

/// The matched loci of one run, ready to be turned into records.
pub struct Resolution<'g> {
    sequence: &'g [u8],
    table: LocusTable<'g>,
    stats: ResolutionStats,
}

impl<'g> Resolution<'g> {
    pub fn table(&self) -> &LocusTable<'g> {
        &self.table
    }

    pub fn stats(&self) -> ResolutionStats {
        self.stats
    }

    /// Lazily extracts and formats one record per locus, in first-seen order.
    /// Consumes the resolution; resolve again to regenerate.
    pub fn into_records(self) -> Records<'g> {
        Records {
            sequence: self.sequence,
            loci: self.table.into_iter(),
        }
    }
}

/// One-shot iterator over the output records of a [`Resolution`].
pub struct Records<'g> {
    sequence: &'g [u8],
    loci: std::vec::IntoIter<ResolvedFeature<'g>>,
}

impl Iterator for Records<'_> {
    type Item = Result<OutputRecord, ExtractError>;

    fn next(&mut self) -> Option<Self::Item> {
        let resolved = self.loci.next()?;
        Some(build_record(self.sequence, &resolved))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.loci.size_hint()
    }
}

/// Match every request against `genome` and merge the hits by locus.
/// Requests that match nothing are skipped.
pub fn resolve<'g, S>(genome: &'g Genome, requests: &[S], options: &ResolveOptions) -> Resolution<'g>
where
    S: AsRef<str> + Sync,
{
    let index = FeatureIndex::build(&genome.features);
    let tie_break = options.tie_break;

    // Each hit keeps its request number so the merge below follows request order.
    let mut hits: Vec<(usize, Option<ResolvedFeature<'g>>)> = if options.parallel {
        requests
            .par_iter()
            .enumerate()
            .map(|(seq_no, request)| (seq_no, index.find(request.as_ref(), tie_break)))
            .collect()
    } else {
        requests
            .iter()
            .enumerate()
            .map(|(seq_no, request)| (seq_no, index.find(request.as_ref(), tie_break)))
            .collect()
    };
    hits.sort_unstable_by_key(|(seq_no, _)| *seq_no);

    let mut table = LocusTable::new();
    let mut stats = ResolutionStats {
        requests: requests.len(),
        ..Default::default()
    };

    for (seq_no, hit) in hits {
        let Some(resolved) = hit else {
            log::debug!("Request {} ({:?}) matched no feature", seq_no + 1, requests[seq_no].as_ref());
            stats.unmatched += 1;
            continue;
        };
        stats.matched += 1;
        match table.offer(resolved) {
            Offer::Inserted => {}
            Offer::Replaced => stats.replaced += 1,
            Offer::Discarded => stats.discarded += 1,
        }
    }
    stats.loci = table.len();

    log::info!(
        "Resolved {} of {} requests to {} loci ({} unmatched)",
        stats.matched,
        stats.requests,
        stats.loci,
        stats.unmatched
    );

    Resolution {
        sequence: &genome.sequence,
        table,
        stats,
    }
}
