//! Parser for FASTA files using noodles.
//!
//! Records are keyed by the full header line (everything after `>`), so
//! descriptions such as `2BG9_1|Chains A, B|...` are preserved. The header is
//! rebuilt from the noodles name and description, joined by one space.
//!
//! Text is tidied before it reaches the reader: lines are trimmed, blank
//! lines and anything before the first header are dropped, and headers with
//! no name or no sequence lines are skipped.

use std::io::BufRead;
use std::path::Path;

use noodles::fasta;
use tracing::warn;

use crate::core::record::{FastaRecords, SequenceRecord};
use crate::core::types::DuplicatePolicy;
use crate::parsing::{read_text, ParseError};
use crate::utils::validation::{check_record_limit, MAX_FASTA_RECORDS};

/// Check if the path has a FASTA extension
pub fn is_fasta_file(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    let stem = path_str
        .strip_suffix(".gz")
        .or_else(|| path_str.strip_suffix(".bgz"))
        .unwrap_or(&path_str);
    [".fa", ".fasta", ".fna", ".faa"]
        .iter()
        .any(|ext| stem.ends_with(ext))
}

/// Parse a FASTA file (plain or gzip-compressed).
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, `ParseError::Empty` if
/// no records are found, or any error from [`parse_fasta_text`].
pub fn parse_fasta_file(path: &Path, policy: DuplicatePolicy) -> Result<FastaRecords, ParseError> {
    let text = read_text(path)?;
    let records = parse_fasta_text(&text, policy)?;
    if records.is_empty() {
        return Err(ParseError::Empty("sequences in FASTA file"));
    }
    Ok(records)
}

/// Parse FASTA text into header → sequence records.
///
/// - Lines before the first header are ignored.
/// - A header with no sequence lines produces no record.
/// - Repeated headers are resolved by `policy`.
///
/// An input with no records parses to an empty collection; callers decide
/// whether that is an error.
///
/// # Errors
///
/// Returns `ParseError::DuplicateHeader` under `DuplicatePolicy::Reject`, or
/// `ParseError::TooManyRecords` if the record limit is exceeded.
pub fn parse_fasta_text(text: &str, policy: DuplicatePolicy) -> Result<FastaRecords, ParseError> {
    let tidy = tidy_fasta_text(text);
    let mut reader = fasta::io::Reader::new(tidy.as_bytes());
    parse_fasta_reader(&mut reader, policy)
}

/// Parse records from a noodles FASTA reader.
///
/// Empty sequences are skipped. Unlike [`parse_fasta_text`] the input must
/// already be well-formed.
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if noodles rejects a record, plus the
/// errors of [`parse_fasta_text`].
pub fn parse_fasta_reader<R: BufRead>(
    reader: &mut fasta::io::Reader<R>,
    policy: DuplicatePolicy,
) -> Result<FastaRecords, ParseError> {
    let mut records = FastaRecords::new();

    for result in reader.records() {
        let record = result.map_err(|e| ParseError::InvalidFormat {
            format: "FASTA",
            message: format!("Failed to parse FASTA record: {e}"),
        })?;

        let mut header = String::from_utf8_lossy(record.name()).into_owned();
        if let Some(description) = record.description() {
            header.push(' ');
            header.push_str(&String::from_utf8_lossy(description));
        }
        let mut sequence = String::from_utf8_lossy(record.sequence().as_ref()).into_owned();

        flush(&mut records, &header, &mut sequence, policy)?;
    }

    Ok(records)
}

/// Keep only header lines that carry a name and have at least one sequence
/// line, with every line trimmed
fn tidy_fasta_text(text: &str) -> String {
    let mut tidy = String::with_capacity(text.len());
    let mut header: Option<&str> = None;
    let mut has_sequence = false;

    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        if let Some(next) = line.strip_prefix('>') {
            header = Some(next.trim()).filter(|h| !h.is_empty());
            has_sequence = false;
            continue;
        }
        let Some(h) = header else { continue };
        if !has_sequence {
            tidy.push('>');
            tidy.push_str(h);
            tidy.push('\n');
            has_sequence = true;
        }
        tidy.push_str(line);
        tidy.push('\n');
    }
    tidy
}

fn flush(
    records: &mut FastaRecords,
    header: &str,
    sequence: &mut String,
    policy: DuplicatePolicy,
) -> Result<(), ParseError> {
    if header.is_empty() || sequence.is_empty() {
        sequence.clear();
        return Ok(());
    }

    if records.contains(header) {
        match policy {
            DuplicatePolicy::KeepFirst => {
                warn!("Duplicate FASTA header '{header}', keeping the first record");
                sequence.clear();
                return Ok(());
            }
            DuplicatePolicy::KeepLast => {
                warn!("Duplicate FASTA header '{header}', keeping the last record");
            }
            DuplicatePolicy::Reject => {
                return Err(ParseError::DuplicateHeader(header.to_string()));
            }
        }
    } else {
        check_record_limit(records.len(), MAX_FASTA_RECORDS)?;
    }

    records.insert(SequenceRecord::new(header, std::mem::take(sequence)));
    Ok(())
}
