//! Core data types for sequence retrieval and chain annotation.
//!
//! - [`Identifier`](types::Identifier): a PDB or UniProt accession with its classification
//! - [`SequenceRecord`](record::SequenceRecord), [`FastaRecords`](record::FastaRecords): FASTA records
//! - [`PolymerSequence`](structure::PolymerSequence), [`CifModel`](structure::CifModel): sequences recovered from CIF files
//! - [`RunContext`](context::RunContext): per-run logging scope
//!
//! ## Residue alphabet
//!
//! Sequences use one-letter codes for the 20 standard amino acids,
//! selenocysteine (`U`), pyrrolysine (`O`) and `X` for anything else.

pub mod context;
pub mod record;
pub mod residue;
pub mod structure;
pub mod types;
