// src/lib.rs
pub mod types;
pub mod error;
pub mod normalize;
pub mod matcher;
pub mod locus_table;
pub mod extract;
pub mod record;
pub mod resolve;
pub mod genbank;
pub mod requests;
pub mod input;

use std::fmt::Write as FmtWrite;
use std::io::Write;
use std::path::Path;

pub use crate::error::ExtractError;
pub use crate::matcher::TieBreak;
pub use crate::resolve::{resolve, ResolutionStats, ResolveOptions};
pub use crate::types::{Feature, Genome, Location, OutputRecord, Qualifiers, Strand};

use crate::genbank::load_genome;
use crate::requests::read_requests;

/// Everything produced by one extraction run.
pub struct ExtractionResults {
    /// One record per resolved locus, in the order loci were first requested
    pub records: Vec<OutputRecord>,

    /// Request/locus counters for the run
    pub stats: ResolutionStats,
}

impl ExtractionResults {
    /// Generate the FASTA text on demand
    pub fn get_fasta_output(&self) -> String {
        let mut output = String::new();
        for record in &self.records {
            write!(output, "{}", record).unwrap();
        }
        output
    }
}

/// Load a GenBank genome and a request list, then resolve the requests.
///
/// The run stops at the first record that cannot be built (a CDS without a
/// `protein_id`, or a location outside the sequence).
pub fn extract_records<P: AsRef<Path>, Q: AsRef<Path>>(
    genbank_path: P,
    list_path: Q,
    options: &ResolveOptions,
) -> Result<ExtractionResults, ExtractError> {
    // 1. Load inputs
    let genome = load_genome(genbank_path)?;
    let requests = read_requests(list_path)?;
    log::info!("Read {} requested identifiers", requests.len());

    // 2. Match and deduplicate
    let resolution = resolve(&genome, &requests, options);
    let stats = resolution.stats();

    // 3. Extract and format
    let records = resolution
        .into_records()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ExtractionResults { records, stats })
}

/// Stream records to `writer` as FASTA, stopping at the first failure.
/// Returns the number of records written.
pub fn write_fasta<I, W>(records: I, writer: &mut W) -> Result<usize, ExtractError>
where
    I: IntoIterator<Item = Result<OutputRecord, ExtractError>>,
    W: Write,
{
    let mut written = 0;
    for record in records {
        write!(writer, "{}", record?)?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calibration_genome() -> Genome {
        let qualifiers: Qualifiers = [
            ("locus_tag", "abc123"),
            ("protein_id", "XP_1"),
            ("db_xref", "GI:999"),
            ("db_xref", "taxon:42"),
            ("product", "hypothetical protein"),
        ]
        .into_iter()
        .collect();
        Genome {
            sequence: b"ATGCTTT".to_vec(),
            features: vec![Feature::new("CDS", qualifiers, Location::forward(0, 4))],
        }
    }

    #[test]
    fn test_end_to_end_single_cds() {
        let genome = calibration_genome();
        let resolution = resolve(&genome, &["abc123"], &ResolveOptions::default());

        let mut out = Vec::new();
        let written = write_fasta(resolution.into_records(), &mut out).unwrap();
        assert_eq!(written, 1);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            ">abc123 | XP_1 | GI:999 | hypothetical protein\nATGC\n"
        );
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let genome = calibration_genome();
        let requests = ["XP_1.3", "abc123", "nothing"];

        let run = || {
            let mut out = Vec::new();
            write_fasta(resolve(&genome, &requests, &ResolveOptions::default()).into_records(), &mut out).unwrap();
            out
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_write_fasta_stops_at_malformed_record() {
        let mut genome = calibration_genome();
        genome.features[0].location = Location::forward(2, 40);

        let mut out = Vec::new();
        let err = write_fasta(resolve(&genome, &["abc123"], &ResolveOptions::default()).into_records(), &mut out)
            .unwrap_err();
        assert!(matches!(err, ExtractError::LocationOutOfBounds { end: 40, len: 7, .. }));
        assert!(out.is_empty());
    }
}
