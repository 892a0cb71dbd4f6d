//! End-to-end operations: fetch to file, batch fetch, entity fetch, CIF
//! annotation and alignment reports.
//!
//! Workflows never return an error. Every failure, from an invalid
//! identifier to a full disk, becomes an [`Outcome`] with `success == false`
//! and a message for the user; the CLI maps that to the exit code.

use serde::Serialize;

pub mod annotate;
pub mod builder;

pub use annotate::Annotator;
pub use builder::FastaBuilder;

/// Result of one workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub success: bool,
    pub message: String,
}

impl Outcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Per-item results of a batch, rendered as
/// `Successfully created FASTA file: out.fasta | Successfully processed: … | Failed to process: …`
#[derive(Debug, Default)]
pub(crate) struct BatchReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<String>,
}

impl BatchReport {
    pub fn into_outcome(self, created: Option<&str>) -> Outcome {
        let mut parts = Vec::new();
        if let Some(path) = created {
            parts.push(format!("Successfully created FASTA file: {path}"));
        }
        if !self.succeeded.is_empty() {
            parts.push(format!("Successfully processed: {}", self.succeeded.join(", ")));
        }
        if !self.failed.is_empty() {
            parts.push(format!("Failed to process: {}", self.failed.join(", ")));
        }
        let message = parts.join(" | ");
        if created.is_some() && !self.succeeded.is_empty() {
            Outcome::success(message)
        } else {
            Outcome::failure(message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_message() {
        let report = BatchReport {
            succeeded: vec!["PDB:2BG9".to_string(), "UniProt:Q8N3Y1".to_string()],
            failed: vec!["PDB:1ABC (failed to fetch)".to_string()],
        };
        let outcome = report.into_outcome(Some("combined_protein.fasta"));
        assert!(outcome.success);
        assert_eq!(
            outcome.message,
            "Successfully created FASTA file: combined_protein.fasta | \
             Successfully processed: PDB:2BG9, UniProt:Q8N3Y1 | \
             Failed to process: PDB:1ABC (failed to fetch)"
        );
    }

    #[test]
    fn test_batch_all_failed() {
        let report = BatchReport {
            succeeded: Vec::new(),
            failed: vec!["XYZ (invalid identifier)".to_string()],
        };
        let outcome = report.into_outcome(None);
        assert!(!outcome.success);
        assert_eq!(outcome.message, "Failed to process: XYZ (invalid identifier)");
    }
}
