use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::core::context::RunContext;
use crate::core::record::FastaRecords;
use crate::core::structure::CifModel;
use crate::core::types::DuplicatePolicy;
use crate::matching::{find_containing_record, AlignmentResult, SequenceMatcher};
use crate::output::fasta::{write_annotations_file, Annotation, AnnotationSource, UNKNOWN_TITLE};
use crate::output::report::write_alignment_report;
use crate::parsing::cif::{is_cif_file, parse_cif_file};
use crate::parsing::fasta::{is_fasta_file, parse_fasta_file};
use crate::workflow::Outcome;

/// Output of an annotation run when none is given
pub const DEFAULT_ANNOTATION_OUTPUT: &str = "annotated_sequence.fasta";

/// Output of an alignment report when none is given
pub const DEFAULT_REPORT_OUTPUT: &str = "alignment_report.csv";

/// Entity type written for chains when the CIF has no `_entity` block
const CHAIN_TYPE: &str = "polymer";

/// Pairs a CIF model with a FASTA file and writes the result
#[derive(Debug, Clone, Default)]
pub struct Annotator {
    duplicates: DuplicatePolicy,
    matcher: SequenceMatcher,
    ctx: RunContext,
}

impl Annotator {
    #[must_use]
    pub fn new(duplicates: DuplicatePolicy) -> Self {
        Self {
            duplicates,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_matcher(mut self, matcher: SequenceMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Log this annotator's runs under `ctx`
    #[must_use]
    pub fn with_context(mut self, ctx: RunContext) -> Self {
        self.ctx = ctx;
        self
    }

    /// Write every polymer entity of `cif` as FASTA, titled from the CIF and
    /// carrying the sequence of the FASTA record that contains it
    /// (default output `annotated_sequence.fasta`)
    pub fn create_annotated_sequence(&self, cif: &Path, fasta: &Path, output: Option<&Path>) -> Outcome {
        let _guard = self.ctx.enter();
        let output = output.map_or_else(|| PathBuf::from(DEFAULT_ANNOTATION_OUTPUT), Path::to_path_buf);
        let (model, records) = match self.load_inputs(cif, fasta) {
            Ok(inputs) => inputs,
            Err(outcome) => return outcome,
        };

        let annotations = annotate(&model, &records);
        let matched = annotations.iter().filter(|a| a.is_matched()).count();
        info!("Matched {matched} of {} sequences", annotations.len());
        if annotations.is_empty() {
            warn!("No polymer entities in {}", cif.display());
        }

        match write_annotations_file(&output, &annotations) {
            Ok(()) => Outcome::success(format!(
                "Successfully created annotated sequence file: {}",
                output.display()
            )),
            Err(e) => {
                error!("{e}");
                Outcome::failure(format!("Error: {e}"))
            }
        }
    }

    /// Write a CSV with the best FASTA record and score for every chain
    /// (default output `alignment_report.csv`)
    pub fn create_alignment_report(&self, cif: &Path, fasta: &Path, output: Option<&Path>) -> Outcome {
        let _guard = self.ctx.enter();
        let output = output.map_or_else(|| PathBuf::from(DEFAULT_REPORT_OUTPUT), Path::to_path_buf);
        let (model, records) = match self.load_inputs(cif, fasta) {
            Ok(inputs) => inputs,
            Err(outcome) => return outcome,
        };

        let results = self.matcher.align_chains(&model, &records);
        let matched = results.iter().filter(|r| r.is_match()).count();
        info!("Matched {matched} of {} chains", results.len());

        match write_alignment_report(&output, &results) {
            Ok(()) => Outcome::success(format!(
                "Successfully created alignment report: {}",
                output.display()
            )),
            Err(e) => {
                error!("{e}");
                Outcome::failure(format!("Error: {e}"))
            }
        }
    }

    /// Align every chain without writing anything
    ///
    /// # Errors
    ///
    /// Returns the failure `Outcome` when an input is missing or unparsable.
    pub fn align(&self, cif: &Path, fasta: &Path) -> Result<Vec<AlignmentResult>, Outcome> {
        let _guard = self.ctx.enter();
        let (model, records) = self.load_inputs(cif, fasta)?;
        Ok(self.matcher.align_chains(&model, &records))
    }

    fn load_inputs(&self, cif: &Path, fasta: &Path) -> Result<(CifModel, FastaRecords), Outcome> {
        if !cif.exists() {
            return Err(Outcome::failure(format!(
                "Error: CIF file not found: {}",
                cif.display()
            )));
        }
        if !fasta.exists() {
            return Err(Outcome::failure(format!(
                "Error: FASTA file not found: {}",
                fasta.display()
            )));
        }

        if !is_cif_file(cif) {
            warn!("{} does not have a CIF extension", cif.display());
        }
        if !is_fasta_file(fasta) {
            warn!("{} does not have a FASTA extension", fasta.display());
        }

        let model = parse_cif_file(cif).map_err(|e| {
            error!("{e}");
            Outcome::failure(format!("Error: Failed to parse CIF file: {}", cif.display()))
        })?;
        let records = parse_fasta_file(fasta, self.duplicates).map_err(|e| {
            error!("{e}");
            Outcome::failure(format!(
                "Error: Failed to parse FASTA file: {}",
                fasta.display()
            ))
        })?;
        debug!(
            "Loaded {} chains and {} FASTA records",
            model.chain_sequences().len(),
            records.len()
        );
        Ok((model, records))
    }
}

/// Annotate the polymer entities of `model` with the FASTA records that
/// contain their sequences.
///
/// Entities come from `_entity`, in file order, keeping only polymer types.
/// A model without an `_entity` block is annotated per chain instead, with
/// the matched header as the title.
#[must_use]
pub fn annotate(model: &CifModel, records: &FastaRecords) -> Vec<Annotation> {
    if model.entities.is_empty() {
        return model
            .chain_sequences()
            .iter()
            .map(|chain| {
                let cif_sequence = chain.sequence();
                let matched = find_containing_record(&cif_sequence, records);
                Annotation {
                    source: AnnotationSource::Chain,
                    id: chain.id.clone(),
                    kind: CHAIN_TYPE.to_string(),
                    title: matched.map_or_else(|| UNKNOWN_TITLE.to_string(), |r| r.header.clone()),
                    cif_sequence,
                    fasta_header: matched.map(|r| r.header.clone()),
                    fasta_sequence: matched.map(|r| r.sequence.clone()),
                }
            })
            .collect();
    }

    model
        .entities
        .iter()
        .filter(|entity| entity.is_polymer())
        .map(|entity| {
            let cif_sequence = model
                .entity_sequence(&entity.id)
                .map(|s| s.sequence())
                .unwrap_or_default();
            let matched = find_containing_record(&cif_sequence, records);
            Annotation {
                source: AnnotationSource::Entity,
                id: entity.id.clone(),
                kind: entity.entity_type.clone().unwrap_or_default(),
                title: entity
                    .description
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
                cif_sequence,
                fasta_header: matched.map(|r| r.header.clone()),
                fasta_sequence: matched.map(|r| r.sequence.clone()),
            }
        })
        .collect()
}
