//! Chain-to-reference sequence matching.
//!
//! - [`SequenceMatcher`]: pairs each structural chain with its most similar
//!   FASTA record
//! - [`SimilarityScore`]: the component scores behind one comparison
//! - [`find_containing_record`]: exact-or-containment lookup used when
//!   annotating entities
//!
//! ## Scoring
//!
//! Two sequences are compared on:
//!
//! - **Positional identity**: residues equal at the same index, over the
//!   shorter length
//! - **Coverage**: longest common substring over the shorter length
//!
//! The combined score is `0.6 * identity + 0.4 * coverage`, capped at 1.0.
//! There are no gaps; this is a ranking heuristic, not an alignment.
//!
//! ## Example
//!
//! ```rust
//! use cryo_fasta::core::record::{FastaRecords, SequenceRecord};
//! use cryo_fasta::matching::SequenceMatcher;
//!
//! let records: FastaRecords = [
//!     SequenceRecord::new("h1", "AAAAA"),
//!     SequenceRecord::new("h2", "ABCDE"),
//! ]
//! .into_iter()
//! .collect();
//!
//! let (header, score) = SequenceMatcher::new().best_match("ABCDE", &records);
//! assert_eq!(header.as_deref(), Some("h2"));
//! assert!((score - 1.0).abs() < 1e-9);
//! ```

pub mod engine;
pub mod scoring;

pub use engine::{find_containing_record, AlignmentResult, MatchingConfig, SequenceMatcher};
pub use scoring::{similarity, ScoringWeights, SimilarityScore};
