//src/error.rs

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("unable to parse GenBank record: {0}")]
    GenBank(String),

    #[error("no GenBank records found in {0}")]
    NoRecords(String),

    #[error("unsupported feature location: {0}")]
    UnsupportedLocation(String),

    #[error("malformed feature for locus {locus}: {reason}")]
    MalformedFeature { locus: String, reason: String },

    #[error("location {start}..{end} of locus {locus} is outside the {len} bp sequence")]
    LocationOutOfBounds {
        locus: String,
        start: usize,
        end: usize,
        len: usize,
    },
}
