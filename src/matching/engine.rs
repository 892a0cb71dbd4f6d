use serde::Serialize;
use tracing::debug;

use crate::core::record::{FastaRecords, SequenceRecord};
use crate::core::structure::CifModel;
use crate::matching::scoring::{ScoringWeights, SimilarityScore};

/// Best FASTA record for one structural chain
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignmentResult {
    pub chain_id: String,

    /// Header of the best-scoring record, `None` if nothing scored above zero
    pub header: Option<String>,

    /// Combined similarity in `[0.0, 1.0]`
    pub similarity: f64,
}

impl AlignmentResult {
    #[must_use]
    pub fn is_match(&self) -> bool {
        self.header.is_some()
    }
}

/// Configuration for the sequence matcher
#[derive(Debug, Clone, Default)]
pub struct MatchingConfig {
    /// Custom scoring weights
    pub scoring_weights: ScoringWeights,
}

/// Pairs chain sequences with their most similar FASTA record
#[derive(Debug, Clone, Default)]
pub struct SequenceMatcher {
    config: MatchingConfig,
}

impl SequenceMatcher {
    /// Create a matcher with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a matcher with custom configuration
    #[must_use]
    pub fn with_config(config: MatchingConfig) -> Self {
        let scoring_weights = config.scoring_weights.normalized();
        Self {
            config: MatchingConfig { scoring_weights },
        }
    }

    /// Score one pair of sequences
    #[must_use]
    pub fn score(&self, a: &str, b: &str) -> SimilarityScore {
        SimilarityScore::calculate_with_weights(a, b, &self.config.scoring_weights)
    }

    /// Best-matching header for `sequence` and its score.
    ///
    /// Records are scanned in file order and only a strictly higher score
    /// replaces the current best, so the first of equal candidates wins.
    /// Returns `(None, 0.0)` for an empty sequence or when no record scores
    /// above zero.
    #[must_use]
    pub fn best_match(&self, sequence: &str, records: &FastaRecords) -> (Option<String>, f64) {
        if sequence.is_empty() {
            return (None, 0.0);
        }

        let mut best: Option<&SequenceRecord> = None;
        let mut best_score = 0.0;
        for record in records {
            let score = self.score(sequence, &record.sequence).combined;
            if score > best_score {
                best = Some(record);
                best_score = score;
            }
        }

        (best.map(|r| r.header.clone()), best_score)
    }

    /// Align every chain of the model against the records, in chain order.
    ///
    /// Uses atom-site chains when present, otherwise entity sequences.
    #[must_use]
    pub fn align_chains(&self, model: &CifModel, records: &FastaRecords) -> Vec<AlignmentResult> {
        model
            .chain_sequences()
            .iter()
            .map(|chain| {
                let (header, similarity) = self.best_match(&chain.sequence(), records);
                debug!(
                    "Chain {}: {} ({similarity:.4})",
                    chain.id,
                    header.as_deref().unwrap_or("no match")
                );
                AlignmentResult {
                    chain_id: chain.id.clone(),
                    header,
                    similarity,
                }
            })
            .collect()
    }
}

/// First record whose sequence equals `sequence`, otherwise the first whose
/// sequence contains it or is contained by it.
///
/// Returns `None` for an empty sequence.
#[must_use]
pub fn find_containing_record<'a>(
    sequence: &str,
    records: &'a FastaRecords,
) -> Option<&'a SequenceRecord> {
    if sequence.is_empty() {
        return None;
    }

    records
        .iter()
        .find(|r| r.sequence == sequence)
        .or_else(|| {
            records
                .iter()
                .find(|r| r.sequence.contains(sequence) || sequence.contains(r.sequence.as_str()))
        })
}
