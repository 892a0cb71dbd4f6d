//! Limits on what a single input file may hold.

use crate::parsing::ParseError;

/// Maximum number of records accepted from one FASTA file
pub const MAX_FASTA_RECORDS: usize = 100_000;

/// Maximum number of distinct chains or entities accepted from one CIF model
pub const MAX_CIF_SEQUENCES: usize = 10_000;

/// Check that one more record fits when `count` are already held.
///
/// Call this BEFORE adding the new record.
///
/// # Errors
///
/// Returns `ParseError::TooManyRecords` once `count` has reached `limit`.
pub fn check_record_limit(count: usize, limit: usize) -> Result<(), ParseError> {
    if count >= limit {
        return Err(ParseError::TooManyRecords(count));
    }
    Ok(())
}
