//src/genbank.rs

use std::io::Read;
use std::path::Path;

use gb_io::reader::SeqReader;
use gb_io::seq::Location as GbLocation;

use crate::error::ExtractError;
use crate::input::open_input;
use crate::types::{Feature, Genome, Location, Qualifiers, Strand};

/// Loads the first record of a GenBank file (optionally `.gz`) as a [`Genome`].
pub fn load_genome<P: AsRef<Path>>(path: P) -> Result<Genome, ExtractError> {
    let path = path.as_ref();
    let genome = read_genome(open_input(path)?)
        .map_err(|e| match e {
            ExtractError::NoRecords(_) => ExtractError::NoRecords(path.display().to_string()),
            other => other,
        })?;

    log::info!(
        "Loaded genome from {} with {} bp and {} features",
        path.display(),
        genome.sequence.len(),
        genome.features.len()
    );
    Ok(genome)
}

/// Parses the first GenBank record from `reader`.
pub fn read_genome<R: Read>(reader: R) -> Result<Genome, ExtractError> {
    let seq = SeqReader::new(reader)
        .next()
        .ok_or_else(|| ExtractError::NoRecords("input".to_string()))?
        .map_err(|e| ExtractError::GenBank(e.to_string()))?;

    let features = seq
        .features
        .iter()
        .filter_map(|f| convert_feature(f).transpose())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Genome {
        sequence: seq.seq.to_ascii_uppercase(),
        features,
    })
}

/// Converts one feature, or returns `None` (with a warning) when its location
/// has no bounds on this sequence, such as a gap or another accession.
fn convert_feature(feature: &gb_io::seq::Feature) -> Result<Option<Feature>, ExtractError> {
    let mut qualifiers = Qualifiers::new();
    for (key, value) in &feature.qualifiers {
        // Flag qualifiers such as /pseudo have no value.
        qualifiers.push(key.as_ref(), value.clone().unwrap_or_default());
    }

    let Some(location) = convert_location(&feature.location)? else {
        log::warn!(
            "Skipping {} feature {} with no local location: {:?}",
            feature.kind,
            qualifiers.first("locus_tag").unwrap_or("(no locus_tag)"),
            feature.location
        );
        return Ok(None);
    };

    Ok(Some(Feature {
        kind: feature.kind.to_string(),
        qualifiers,
        location,
    }))
}

/// Collapses a GenBank location into its outer bounds.
///
/// `complement(..)` flips the strand; `join`, `order`, `bond` and `one-of`
/// span from the smallest start to the largest end of their local parts.
/// A `12^13` site becomes an empty span after base 12. Gaps and references
/// to other accessions have no bounds here and yield `None`.
fn convert_location(location: &GbLocation) -> Result<Option<Location>, ExtractError> {
    match location {
        GbLocation::Range((start, _), (end, _)) => Ok(Some(Location::forward(
            to_offset(*start, location)?,
            to_offset(*end, location)?,
        ))),
        GbLocation::Between(_, after) => {
            let site = to_offset(*after, location)?;
            Ok(Some(Location::forward(site, site)))
        }
        GbLocation::Complement(inner) => Ok(convert_location(inner)?.map(|inner| {
            let strand = match inner.strand {
                Strand::Forward => Strand::Reverse,
                Strand::Reverse => Strand::Forward,
            };
            Location::new(inner.start, inner.end, strand)
        })),
        GbLocation::Join(parts)
        | GbLocation::Order(parts)
        | GbLocation::Bond(parts)
        | GbLocation::OneOf(parts) => {
            let mut local = Vec::with_capacity(parts.len());
            for part in parts {
                if let Some(part) = convert_location(part)? {
                    local.push(part);
                }
            }
            let (Some(start), Some(end)) = (
                local.iter().map(|p| p.start).min(),
                local.iter().map(|p| p.end).max(),
            ) else {
                return Ok(None);
            };
            let strand = if local.iter().all(|p| p.strand == Strand::Reverse) {
                Strand::Reverse
            } else {
                Strand::Forward
            };
            Ok(Some(Location::new(start, end, strand)))
        }
        // External(..) and Gap(..)
        _ => Ok(None),
    }
}

fn to_offset(pos: i64, location: &GbLocation) -> Result<usize, ExtractError> {
    usize::try_from(pos).map_err(|_| ExtractError::UnsupportedLocation(format!("{location:?}")))
}
