use std::path::Path;

use crate::matching::AlignmentResult;
use crate::output::WriteError;

/// Column order of the alignment report
pub const REPORT_HEADER: [&str; 3] = ["cif_chain", "fasta_sequence", "sequence_similarity"];

/// Written in place of a header for chains without a match
pub const NO_MATCH: &str = "No match found";

fn row(result: &AlignmentResult) -> [String; 3] {
    [
        result.chain_id.clone(),
        result.header.clone().unwrap_or_else(|| NO_MATCH.to_string()),
        format!("{:.4}", result.similarity),
    ]
}

fn write_rows<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    results: &[AlignmentResult],
) -> Result<(), csv::Error> {
    writer.write_record(REPORT_HEADER)?;
    for result in results {
        writer.write_record(row(result))?;
    }
    writer.flush()?;
    Ok(())
}

/// Render the report as CSV text
#[must_use]
pub fn render_alignment_report(results: &[AlignmentResult]) -> String {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if write_rows(&mut writer, results).is_err() {
        return String::new();
    }
    writer
        .into_inner()
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}

/// Write the report to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns `WriteError::Csv` if the file cannot be created or written.
pub fn write_alignment_report(path: &Path, results: &[AlignmentResult]) -> Result<(), WriteError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| WriteError::csv(path, e))?;
    write_rows(&mut writer, results).map_err(|e| WriteError::csv(path, e))
}
