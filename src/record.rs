//src/record.rs

use std::fmt;

use crate::error::ExtractError;
use crate::extract::extract_sequence;
use crate::types::{OutputRecord, ResolvedFeature};

/// Placeholder printed for header fields that have no value.
pub const MISSING_FIELD: &str = "None";

/// Prefix identifying a GI number among the `db_xref` values.
pub const GI_PREFIX: &str = "GI:";

/// Build the output record for one resolved locus.
///
/// CDS features must carry a `protein_id`; a CDS without one is reported as
/// malformed rather than emitted with a blank id. A CDS without any `db_xref`
/// is deliberately not an error: it just has no GI number.
pub fn build_record(sequence: &[u8], resolved: &ResolvedFeature<'_>) -> Result<OutputRecord, ExtractError> {
    let feature = resolved.feature;
    let quals = &feature.qualifiers;

    let (protein_id, gi_number) = if feature.is_coding() {
        let protein_id = quals
            .first("protein_id")
            .ok_or_else(|| ExtractError::MalformedFeature {
                locus: resolved.locus.to_string(),
                reason: format!("{} feature has no protein_id qualifier", feature.kind),
            })?;
        let gi_number = quals
            .get("db_xref")
            .unwrap_or_default()
            .iter()
            .find(|xref| xref.starts_with(GI_PREFIX));
        (Some(protein_id.to_string()), gi_number.cloned())
    } else {
        (None, None)
    };

    let product = quals.first("product").map(str::to_string);

    let nucl = extract_sequence(sequence, &feature.location, resolved.locus)?;

    Ok(OutputRecord {
        locus_tag: resolved.locus.to_string(),
        protein_id,
        gi_number,
        product,
        sequence: String::from_utf8_lossy(nucl).into_owned(),
    })
}

impl OutputRecord {
    /// `>{locus_tag} | {protein_id} | {gi_number} | {product}`
    pub fn header(&self) -> String {
        let field = |v: &Option<String>| v.as_deref().unwrap_or(MISSING_FIELD).to_string();
        format!(
            ">{} | {} | {} | {}",
            self.locus_tag,
            field(&self.protein_id),
            field(&self.gi_number),
            field(&self.product)
        )
    }
}

/// FASTA form: header line, then the sequence on one line.
impl fmt::Display for OutputRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header())?;
        writeln!(f, "{}", self.sequence)
    }
}
