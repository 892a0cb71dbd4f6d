//! # cryo-fasta
//!
//! A library for fetching reference protein sequences and annotating the
//! chains of cryo-EM models.
//!
//! Model-building tools such as ModelAngelo write a CIF model whose chains
//! carry residues but no names. `cryo-fasta` recovers the one-letter sequence
//! of every chain and entity from the CIF, matches them against a FASTA file
//! of reference sequences, and writes either an annotated FASTA or a CSV
//! report. It also builds those reference FASTA files from PDB and UniProt
//! identifiers.
//!
//! ## Features
//!
//! - **Identifier classification**: PDB IDs, UniProt accessions and entry names
//! - **Resilient fetching**: fixed-delay retry over RCSB and UniProt endpoints
//! - **RCSB search**: full-text and UniProt-accession queries, entity download
//! - **CIF reading**: `_entity`, `_entity_poly_seq` and `_atom_site` by tag name
//! - **Chain matching**: positional identity plus longest-common-substring
//!   coverage
//!
//! ## Example
//!
//! ```rust
//! use cryo_fasta::core::types::DuplicatePolicy;
//! use cryo_fasta::matching::SequenceMatcher;
//! use cryo_fasta::parsing::{cif::parse_cif_text, fasta::parse_fasta_text};
//!
//! let cif = "loop_\n_entity_poly_seq.entity_id\n_entity_poly_seq.num\n_entity_poly_seq.mon_id\n\
//!            A 1 ALA\nA 2 GLY\nA 3 SER\n";
//! let model = parse_cif_text(cif).unwrap();
//! let records = parse_fasta_text(">h1\nAAAAA\n>h2\nAGS\n", DuplicatePolicy::KeepFirst).unwrap();
//!
//! let results = SequenceMatcher::new().align_chains(&model, &records);
//! assert_eq!(results[0].header.as_deref(), Some("h2"));
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Identifiers, FASTA records, CIF model types, run context
//! - [`fetch`]: Transport, retry, endpoints and RCSB search
//! - [`parsing`]: FASTA and CIF parsers
//! - [`matching`]: Similarity scoring and chain matching
//! - [`output`]: FASTA and CSV writers
//! - [`workflow`]: End-to-end operations returning an [`Outcome`]
//! - [`config`]: JSON settings
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod fetch;
pub mod matching;
pub mod output;
pub mod parsing;
pub mod utils;
pub mod workflow;

// Re-export commonly used types for convenience
pub use config::Settings;
pub use core::record::{FastaRecords, SequenceRecord};
pub use core::structure::CifModel;
pub use core::types::*;
pub use error::{Error, Result};
pub use matching::{AlignmentResult, SequenceMatcher};
pub use workflow::{Annotator, FastaBuilder, Outcome};
