//! Parsers for the two local input formats.
//!
//! - **FASTA**: `>` header lines followed by sequence lines
//! - **CIF**: the `_entity`, `_entity_poly_seq` and `_atom_site` categories of
//!   an mmCIF model, enough to recover one-letter sequences per chain
//!
//! Both readers accept plain or gzip-compressed (`.gz`, `.bgz`) files.
//!
//! ## Example
//!
//! ```rust
//! use cryo_fasta::core::types::DuplicatePolicy;
//! use cryo_fasta::parsing::{cif::parse_cif_text, fasta::parse_fasta_text};
//!
//! let records = parse_fasta_text(">sp|P1\nAGS\n", DuplicatePolicy::KeepFirst).unwrap();
//! assert_eq!(records.sequence("sp|P1"), Some("AGS"));
//!
//! let cif = "loop_\n_entity_poly_seq.entity_id\n_entity_poly_seq.num\n_entity_poly_seq.mon_id\n\
//!            A 1 ALA\nA 2 GLY\nA 3 SER\n";
//! let model = parse_cif_text(cif).unwrap();
//! assert_eq!(model.chain_sequences()[0].sequence(), "AGS");
//! ```

use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use thiserror::Error;

pub mod cif;
pub mod fasta;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid {format} format: {message}")]
    InvalidFormat {
        format: &'static str,
        message: String,
    },

    #[error("No {0} found")]
    Empty(&'static str),

    #[error("Duplicate FASTA header: {0}")]
    DuplicateHeader(String),

    #[error("Too many records: {0} exceeds maximum allowed")]
    TooManyRecords(usize),
}

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
pub(crate) fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// Read a whole text file, transparently decompressing gzip input
pub(crate) fn read_text(path: &Path) -> Result<String, ParseError> {
    let file = std::fs::File::open(path)?;
    let mut text = String::new();
    if is_gzipped(path) {
        GzDecoder::new(file).read_to_string(&mut text)?;
    } else {
        std::io::BufReader::new(file).read_to_string(&mut text)?;
    }
    Ok(text)
}
