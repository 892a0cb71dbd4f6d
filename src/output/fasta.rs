use std::io::Write as _;
use std::path::Path;

use serde::Serialize;

use crate::core::record::SequenceRecord;
use crate::output::WriteError;

/// Residues per sequence line
pub const LINE_WIDTH: usize = 80;

/// Title used when a CIF entity has no description
pub const UNKNOWN_TITLE: &str = "Unknown";

/// Render records as FASTA: `>header`, the sequence wrapped at
/// [`LINE_WIDTH`] columns, then one blank line.
pub fn render_fasta<'a>(records: impl IntoIterator<Item = &'a SequenceRecord>) -> String {
    let mut out = String::new();
    for record in records {
        push_record(&mut out, &record.header, &record.sequence);
    }
    out
}

fn push_record(out: &mut String, header: &str, sequence: &str) {
    out.push('>');
    out.push_str(header);
    out.push('\n');
    let mut column = 0;
    for residue in sequence.chars() {
        if column == LINE_WIDTH {
            out.push('\n');
            column = 0;
        }
        out.push(residue);
        column += 1;
    }
    if column > 0 {
        out.push('\n');
    }
    out.push('\n');
}

/// Write records to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns `WriteError::Io` if the file cannot be created or written.
pub fn write_fasta_file<'a>(
    path: &Path,
    records: impl IntoIterator<Item = &'a SequenceRecord>,
) -> Result<(), WriteError> {
    write_text(path, &render_fasta(records))
}

pub(crate) fn write_text(path: &Path, text: &str) -> Result<(), WriteError> {
    let file = std::fs::File::create(path).map_err(|e| WriteError::io(path, e))?;
    let mut writer = std::io::BufWriter::new(file);
    writer
        .write_all(text.as_bytes())
        .and_then(|()| writer.flush())
        .map_err(|e| WriteError::io(path, e))
}

/// Where an annotated sequence came from in the CIF model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AnnotationSource {
    Entity,
    Chain,
}

impl AnnotationSource {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Entity => "Entity",
            Self::Chain => "Chain",
        }
    }
}

/// A CIF entity or chain paired with the FASTA record that contains it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    pub source: AnnotationSource,
    pub id: String,
    pub kind: String,
    pub title: String,
    pub cif_sequence: String,
    pub fasta_header: Option<String>,
    pub fasta_sequence: Option<String>,
}

impl Annotation {
    /// `Entity_1 | polymer | Acetylcholine receptor`
    #[must_use]
    pub fn header(&self) -> String {
        format!(
            "{}_{} | {} | {}",
            self.source.label(),
            self.id,
            self.kind,
            self.title
        )
    }

    /// Matched FASTA sequence when there is one, else the CIF sequence
    #[must_use]
    pub fn sequence(&self) -> &str {
        self.fasta_sequence
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.cif_sequence)
    }

    #[must_use]
    pub fn is_matched(&self) -> bool {
        self.fasta_header.is_some()
    }
}

#[must_use]
pub fn render_annotations(annotations: &[Annotation]) -> String {
    let mut out = String::new();
    for annotation in annotations {
        push_record(&mut out, &annotation.header(), annotation.sequence());
    }
    out
}

/// # Errors
///
/// Returns `WriteError::Io` if the file cannot be created or written.
pub fn write_annotations_file(path: &Path, annotations: &[Annotation]) -> Result<(), WriteError> {
    write_text(path, &render_annotations(annotations))
}
